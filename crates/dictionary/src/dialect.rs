use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Regional pronunciation. The API encodes it in the audio file name,
/// e.g. `hello-uk.mp3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Us,
    Uk,
    Au,
    Any,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown dialect \"{0}\", expected one of us, uk, au, any")]
pub struct UnknownDialect(String);

impl Dialect {
    fn marker(self) -> Option<&'static str> {
        match self {
            Self::Us => Some("-us"),
            Self::Uk => Some("-uk"),
            Self::Au => Some("-au"),
            Self::Any => None,
        }
    }

    pub fn matches(self, audio_url: &str) -> bool {
        let Some(marker) = self.marker() else {
            return true;
        };
        let file_name = audio_url
            .split(['?', '#'])
            .next()
            .unwrap_or(audio_url)
            .rsplit('/')
            .next()
            .unwrap_or_default();
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _extension)| stem);
        stem.to_ascii_lowercase().ends_with(marker)
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "uk" | "gb" => Ok(Self::Uk),
            "au" => Ok(Self::Au),
            "any" | "all" => Ok(Self::Any),
            _ => Err(UnknownDialect(s.to_owned())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Us => "us",
            Self::Uk => "uk",
            Self::Au => "au",
            Self::Any => "any",
        })
    }
}
