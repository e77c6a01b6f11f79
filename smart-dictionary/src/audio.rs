use std::process::Stdio;

use dictionary::{Dialect, LookupState};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::AudioConfig;

/// What [`Pronouncer::pronounce`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pronunciation {
    Recorded(String),
    Spoken(String),
    Nothing,
}

pub struct Pronouncer {
    player: Vec<String>,
    speech: Vec<String>,
    locale: String,
}

impl Pronouncer {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            player: config.player.clone(),
            speech: config.speech.clone(),
            locale: config.locale.clone(),
        }
    }

    /// Plays the recorded pronunciation of the shown word, or speaks it when
    /// there is no recording. Failures are logged, never returned.
    pub async fn pronounce(&self, state: &LookupState, dialect: Dialect) -> Pronunciation {
        let choice = self.choose(state, dialect);
        match &choice {
            Pronunciation::Recorded(url) => {
                let replacements = [("{url}", url.as_str())];
                if let Some((program, args)) = command_line(&self.player, &replacements, url) {
                    run(program, args).await;
                }
            }
            Pronunciation::Spoken(word) => {
                let replacements = [("{word}", word.as_str()), ("{locale}", self.locale.as_str())];
                if let Some((program, args)) = command_line(&self.speech, &replacements, word) {
                    run(program, args).await;
                }
            }
            Pronunciation::Nothing => {}
        }
        choice
    }

    fn choose(&self, state: &LookupState, dialect: Dialect) -> Pronunciation {
        let recorded = state
            .first_entry()
            .and_then(|entry| entry.pronunciations(dialect).first().copied())
            .and_then(|phonetic| phonetic.audio_url())
            .map(normalize_audio_url);
        if let Some(url) = recorded {
            return Pronunciation::Recorded(url);
        }
        let word = state
            .first_entry()
            .map(|entry| entry.word.clone())
            .or_else(|| state.current_word.clone());
        match word {
            Some(word) => Pronunciation::Spoken(word),
            None => Pronunciation::Nothing,
        }
    }
}

/// Older API responses use protocol-relative audio links.
fn normalize_audio_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_owned()
    }
}

/// Substitutes placeholders into `template`; when none of the arguments
/// mention the first placeholder, `trailing` is appended instead.
fn command_line(
    template: &[String],
    replacements: &[(&str, &str)],
    trailing: &str,
) -> Option<(String, Vec<String>)> {
    let (program, args) = template.split_first()?;
    let primary = replacements.first().map(|(placeholder, _)| *placeholder);
    let mut args = args
        .iter()
        .map(|arg| {
            replacements
                .iter()
                .fold(arg.clone(), |arg, (placeholder, value)| arg.replace(placeholder, value))
        })
        .collect::<Vec<String>>();
    if let Some(primary) = primary {
        if !template.iter().any(|arg| arg.contains(primary)) {
            args.push(trailing.to_owned());
        }
    }
    Some((program.clone(), args))
}

async fn run(program: String, args: Vec<String>) {
    debug!(program = program.as_str(), ?args, "starting audio command");
    let status = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(program = program.as_str(), %status, "playback failed"),
        Err(error) => warn!(program = program.as_str(), %error, "could not start audio command"),
    }
}
