use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::DictionaryError;

/// One record returned by the entries endpoint.
///
/// The API may return several entries for a single word, one per etymology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: PartOfSpeech,
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// Part of speech as tagged by the API. Tags we don't know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartOfSpeech {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
    Exclamation,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

impl DictionaryEntry {
    /// Rejects entries without a headword.
    pub(crate) fn validate(&self) -> Result<(), DictionaryError> {
        if self.word.trim().is_empty() {
            return Err(DictionaryError::Invalid("entry without a word".to_owned()));
        }
        Ok(())
    }

    /// Whether any meaning carries at least one definition.
    pub fn has_definitions(&self) -> bool {
        self.meanings.iter().any(|meaning| !meaning.definitions.is_empty())
    }

    /// Phonetics with a recorded pronunciation, narrowed to `dialect` when any
    /// recording for it exists.
    pub fn pronunciations(&self, dialect: Dialect) -> Vec<&Phonetic> {
        let recorded: Vec<&Phonetic> = self
            .phonetics
            .iter()
            .filter(|phonetic| phonetic.audio_url().is_some())
            .collect();
        let matching: Vec<&Phonetic> = recorded
            .iter()
            .copied()
            .filter(|phonetic| phonetic.audio_url().is_some_and(|url| dialect.matches(url)))
            .collect();
        if matching.is_empty() {
            recorded
        } else {
            matching
        }
    }

    /// The transcription to show next to the headword.
    pub fn transcription(&self) -> Option<&str> {
        self.phonetic
            .as_deref()
            .or_else(|| self.phonetics.iter().find_map(|phonetic| phonetic.text.as_deref()))
            .filter(|text| !text.trim().is_empty())
    }
}

impl Phonetic {
    /// The audio URL, ignoring the empty strings the API uses for "no recording".
    pub fn audio_url(&self) -> Option<&str> {
        self.audio.as_deref().filter(|url| !url.trim().is_empty())
    }
}

impl From<String> for PartOfSpeech {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "noun" => Self::Noun,
            "pronoun" => Self::Pronoun,
            "verb" => Self::Verb,
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "preposition" => Self::Preposition,
            "conjunction" => Self::Conjunction,
            "interjection" => Self::Interjection,
            "exclamation" => Self::Exclamation,
            _ => Self::Other(tag),
        }
    }
}

impl From<PartOfSpeech> for String {
    fn from(part_of_speech: PartOfSpeech) -> Self {
        part_of_speech.to_string()
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Noun => "noun",
            Self::Pronoun => "pronoun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Exclamation => "exclamation",
            Self::Other(tag) => tag.as_str(),
        };
        f.write_str(tag)
    }
}
