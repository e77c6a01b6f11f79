use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

mod autocomplete;
mod controller;
mod dialect;
mod dictionary;
mod dictionary_api;
mod picker;
mod state;
mod suggestion_api;

pub use autocomplete::{Autocomplete, DEFAULT_DEBOUNCE};
pub use controller::{LookupController, DEFAULT_MAX_CANDIDATES};
pub use dialect::{Dialect, UnknownDialect};
pub use dictionary::{Definition, DictionaryEntry, License, Meaning, PartOfSpeech, Phonetic};
pub use picker::{PickerIntent, PickerReducer, SuggestionPicker};
pub use reqwest::Url;
pub use state::{LookupIntent, LookupReducer, LookupState, Reducer};

const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries";
const SUGGESTION_API_URL: &str = "https://api.datamuse.com/sug";
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("{0}")]
    Fetch(#[source] reqwest::Error),
    #[error("service answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(NotFoundError),
}

/// The body the entries endpoint sends along with a 404.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotFoundError {
    #[serde(default)]
    title: String,
    message: String,
    #[serde(default)]
    resolution: Option<String>,
}

impl NotFoundError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "No Definitions Found".to_owned(),
            message: message.into(),
            resolution: None,
        }
    }

    /// The terminal "nothing matched" error, with a hint when the suggestion
    /// service offered anything.
    pub fn no_result(term: &str, did_you_mean: Option<&str>) -> Self {
        match did_you_mean {
            Some(candidate) => Self::new(format!(
                "No result found for \"{term}\". Did you mean \"{candidate}\"?"
            )),
            None => Self::new(format!("No result found for \"{term}\".")),
        }
    }

    pub(crate) fn from_body(word: &str, body: &str) -> Self {
        serde_json::from_str(body)
            .unwrap_or_else(|_| Self::new(format!("No definitions found for \"{word}\".")))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl DictionaryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Text suitable for the `error` field of [`LookupState`].
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_owned()
        } else {
            message
        }
    }
}

/// Where the two services live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    entries: Url,
    suggestions: Url,
    language: String,
}

impl Endpoints {
    pub fn new(entries: Url, suggestions: Url, language: &str) -> Result<Self, DictionaryError> {
        for url in [&entries, &suggestions] {
            if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
                return Err(DictionaryError::Invalid(format!(
                    "{url} is not an http(s) endpoint"
                )));
            }
        }
        let language = language.trim();
        if language.is_empty() || language.contains('/') {
            return Err(DictionaryError::Invalid(format!(
                "\"{language}\" is not a language code"
            )));
        }
        Ok(Self {
            entries,
            suggestions,
            language: language.to_owned(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// `<entries>/<language>/<word>`, with the word percent-encoded as a
    /// single path segment.
    pub(crate) fn entries_url(&self, word: &str) -> Url {
        let mut url = self.entries.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.language).push(word);
        }
        url
    }

    pub(crate) fn suggestions_url(&self) -> Url {
        self.suggestions.clone()
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            entries: Url::parse(DICTIONARY_API_URL).expect("default entries url is valid"),
            suggestions: Url::parse(SUGGESTION_API_URL).expect("default suggestion url is valid"),
            language: DEFAULT_LANGUAGE.to_owned(),
        }
    }
}

/// Anything that can look words up and suggest alternatives.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Entries for `word`. A word the service doesn't know is
    /// [`DictionaryError::NotFound`].
    async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, DictionaryError>;

    /// Words the suggestion service offers for `term`, best first.
    async fn suggest(&self, term: &str) -> Result<Vec<String>, DictionaryError>;
}

#[async_trait]
impl<S: WordSource + ?Sized> WordSource for Arc<S> {
    async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        (**self).lookup(word).await
    }

    async fn suggest(&self, term: &str) -> Result<Vec<String>, DictionaryError> {
        (**self).suggest(term).await
    }
}

pub struct Dictionary {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn get_definition(&self, word: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        dictionary_api::get_definition(&self.client, &self.endpoints, word).await
    }

    pub async fn get_suggestions(&self, term: &str) -> Result<Vec<String>, DictionaryError> {
        suggestion_api::get_suggestions(&self.client, &self.endpoints, term).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WordSource for Dictionary {
    async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        self.get_definition(word).await
    }

    async fn suggest(&self, term: &str) -> Result<Vec<String>, DictionaryError> {
        self.get_suggestions(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_url_encodes_word_as_one_segment() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.entries_url("ice cream").as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/ice%20cream"
        );
        assert_eq!(
            endpoints.entries_url("a/b?c").as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/a%2Fb%3Fc"
        );
    }

    #[test]
    fn entries_url_tolerates_trailing_slash() {
        let endpoints = Endpoints::new(
            Url::parse("http://localhost:8080/entries/").unwrap(),
            Url::parse("http://localhost:8080/sug").unwrap(),
            "en",
        )
        .unwrap();
        assert_eq!(
            endpoints.entries_url("hello").as_str(),
            "http://localhost:8080/entries/en/hello"
        );
    }

    #[test]
    fn endpoints_reject_non_http_urls_and_empty_language() {
        let http = Url::parse("http://localhost/").unwrap();
        let mailto = Url::parse("mailto:someone@example.com").unwrap();
        assert!(Endpoints::new(mailto, http.clone(), "en").is_err());
        assert!(Endpoints::new(http.clone(), http, "  ").is_err());
    }

    #[test]
    fn no_result_message_includes_hint() {
        assert_eq!(
            NotFoundError::no_result("xyzzyqq", Some("puzzle")).to_string(),
            "No result found for \"xyzzyqq\". Did you mean \"puzzle\"?"
        );
        assert_eq!(
            NotFoundError::no_result("xyzzyqq", None).to_string(),
            "No result found for \"xyzzyqq\"."
        );
    }

    #[test]
    fn not_found_body_is_parsed_when_present() {
        let body = r#"{"title":"No Definitions Found","message":"Sorry pal.","resolution":"Try the web."}"#;
        let error = NotFoundError::from_body("qqq", body);
        assert_eq!(error.message(), "Sorry pal.");
        assert_eq!(error.resolution(), Some("Try the web."));

        let fallback = NotFoundError::from_body("qqq", "<html>");
        assert_eq!(fallback.message(), "No definitions found for \"qqq\".");
    }

    #[test]
    fn blank_error_text_becomes_unknown_error() {
        let error = DictionaryError::NotFound(NotFoundError::new(""));
        assert_eq!(error.user_message(), "Unknown error");
    }
}
