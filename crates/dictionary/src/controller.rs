use tokio::sync::watch;
use tracing::{debug, warn};

use crate::state::{LookupIntent, LookupReducer, LookupState, Reducer};
use crate::{DictionaryEntry, DictionaryError, NotFoundError, WordSource};

/// How many suggestions are tried when the exact term is unknown.
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

/// Resolves user input to dictionary entries and owns the resulting state.
///
/// `resolve` borrows the controller mutably, so a controller never has two
/// lookups in flight. Observers get snapshots through [`subscribe`].
///
/// [`subscribe`]: LookupController::subscribe
pub struct LookupController<S> {
    source: S,
    max_candidates: usize,
    state: watch::Sender<LookupState>,
}

impl<S: WordSource> LookupController<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            source,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            state,
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn clear(&mut self) {
        self.dispatch(LookupIntent::Clear);
    }

    /// Looks `term` up, falling back to spelling suggestions when the exact
    /// term is unknown. Blank input is ignored without touching the state.
    pub async fn resolve(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.dispatch(LookupIntent::Start {
            term: term.to_owned(),
        });
        let intent = match self.find_entries(term).await {
            Ok(entries) => LookupIntent::Success(entries),
            Err(error) => {
                debug!(term, %error, "lookup failed");
                LookupIntent::Error(error.user_message())
            }
        };
        self.dispatch(intent);
    }

    async fn find_entries(&self, term: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        if let Some(entries) = self.try_lookup(term).await? {
            return Ok(entries);
        }

        let candidates: Vec<String> = match self.source.suggest(term).await {
            Ok(words) => words
                .into_iter()
                .filter(|word| !word.trim().is_empty())
                .take(self.max_candidates)
                .collect(),
            Err(DictionaryError::Status(status)) => {
                warn!(term, %status, "suggestion service unavailable");
                Vec::new()
            }
            Err(error) => return Err(error),
        };

        for candidate in &candidates {
            if let Some(entries) = self.try_lookup(candidate).await? {
                debug!(term, candidate = candidate.as_str(), "resolved through suggestion");
                return Ok(entries);
            }
        }

        Err(DictionaryError::NotFound(NotFoundError::no_result(
            term,
            candidates.first().map(String::as_str),
        )))
    }

    /// `Ok(None)` when the source doesn't know the word.
    async fn try_lookup(&self, word: &str) -> Result<Option<Vec<DictionaryEntry>>, DictionaryError> {
        match self.source.lookup(word).await {
            Ok(entries) if !entries.is_empty() => Ok(Some(entries)),
            Ok(_) => Ok(None),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn dispatch(&self, intent: LookupIntent) {
        self.state.send_modify(|state| {
            *state = LookupReducer::reduce(std::mem::take(state), intent);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Canned answers keyed by word; unknown words are not found.
    struct FakeSource {
        entries: HashMap<String, Vec<DictionaryEntry>>,
        suggestions: Result<Vec<String>, u16>,
        broken: Option<String>,
        lookups: Mutex<Vec<String>>,
    }

    impl Default for FakeSource {
        fn default() -> Self {
            Self {
                entries: HashMap::new(),
                suggestions: Ok(Vec::new()),
                broken: None,
                lookups: Mutex::new(Vec::new()),
            }
        }
    }

    impl FakeSource {
        fn with_entry(mut self, word: &str, definition: &str) -> Self {
            self.entries.insert(word.to_owned(), vec![entry(word, definition)]);
            self
        }

        fn with_suggestions(mut self, words: &[&str]) -> Self {
            self.suggestions = Ok(words.iter().map(|word| word.to_string()).collect());
            self
        }

        fn looked_up(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WordSource for FakeSource {
        async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, DictionaryError> {
            self.lookups.lock().unwrap().push(word.to_owned());
            if self.broken.as_deref() == Some(word) {
                return Err(DictionaryError::Invalid("connection reset".to_owned()));
            }
            self.entries
                .get(word)
                .cloned()
                .ok_or_else(|| DictionaryError::NotFound(NotFoundError::new("not found")))
        }

        async fn suggest(&self, _term: &str) -> Result<Vec<String>, DictionaryError> {
            match &self.suggestions {
                Ok(words) => Ok(words.clone()),
                Err(code) => Err(DictionaryError::Status(
                    reqwest::StatusCode::from_u16(*code).unwrap(),
                )),
            }
        }
    }

    fn entry(word: &str, definition: &str) -> DictionaryEntry {
        serde_json::from_value(serde_json::json!({
            "word": word,
            "meanings": [{"partOfSpeech": "exclamation", "definitions": [{"definition": definition}]}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn resolves_known_word() {
        let source = FakeSource::default().with_entry("hello", "used as a greeting");
        let mut controller = LookupController::new(source);

        controller.resolve("hello").await;

        let state = controller.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.data[0].word, "hello");
        assert_eq!(
            state.data[0].meanings[0].definitions[0].definition,
            "used as a greeting"
        );
        assert_eq!(state.current_word.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn trims_before_lookup() {
        let source = FakeSource::default().with_entry("hello", "greeting");
        let mut controller = LookupController::new(source);

        controller.resolve("  hello \n").await;

        assert_eq!(controller.source().looked_up(), vec!["hello"]);
        assert_eq!(controller.state().current_word.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn blank_input_publishes_nothing() {
        let mut controller = LookupController::new(FakeSource::default());
        let observer = controller.subscribe();

        controller.resolve("").await;
        controller.resolve("   ").await;

        assert!(!observer.has_changed().unwrap());
        assert_eq!(controller.state(), LookupState::default());
        assert!(controller.source().looked_up().is_empty());
    }

    #[tokio::test]
    async fn falls_back_to_first_working_candidate() {
        let source = FakeSource::default()
            .with_entry("cat", "a small feline")
            .with_entry("car", "a road vehicle")
            .with_suggestions(&["cta", "cat", "car"]);
        let mut controller = LookupController::new(source);

        controller.resolve("catt").await;

        let state = controller.state();
        assert_eq!(state.data[0].word, "cat");
        assert_eq!(state.error, None);
        assert_eq!(state.current_word.as_deref(), Some("catt"));
        assert_eq!(controller.source().looked_up(), vec!["catt", "cta", "cat"]);
    }

    #[tokio::test]
    async fn did_you_mean_names_first_candidate() {
        let source = FakeSource::default().with_suggestions(&["puzzle"]);
        let mut controller = LookupController::new(source);

        controller.resolve("xyzzyqq").await;

        let state = controller.state();
        assert!(state.data.is_empty());
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("No result found for \"xyzzyqq\". Did you mean \"puzzle\"?")
        );
    }

    #[tokio::test]
    async fn only_the_first_candidates_are_tried() {
        let source = FakeSource::default()
            .with_entry("f", "the sixth letter")
            .with_suggestions(&["a", "", "b", "c", "d", "e", "f"]);
        let mut controller = LookupController::new(source);

        controller.resolve("zzz").await;

        assert_eq!(
            controller.source().looked_up(),
            vec!["zzz", "a", "b", "c", "d", "e"]
        );
        assert_eq!(
            controller.state().error.as_deref(),
            Some("No result found for \"zzz\". Did you mean \"a\"?")
        );
    }

    #[tokio::test]
    async fn candidate_limit_is_configurable() {
        let source = FakeSource::default().with_suggestions(&["a", "b", "c"]);
        let mut controller = LookupController::new(source).with_max_candidates(1);

        controller.resolve("zzz").await;

        assert_eq!(controller.source().looked_up(), vec!["zzz", "a"]);
    }

    #[tokio::test]
    async fn generic_message_without_candidates() {
        let mut controller = LookupController::new(FakeSource::default());

        controller.resolve("qwrtp").await;

        assert_eq!(
            controller.state().error.as_deref(),
            Some("No result found for \"qwrtp\".")
        );
    }

    #[tokio::test]
    async fn generic_message_when_suggestions_unavailable() {
        let source = FakeSource {
            suggestions: Err(503),
            ..FakeSource::default()
        };
        let mut controller = LookupController::new(source);

        controller.resolve("qwrtp").await;

        assert_eq!(
            controller.state().error.as_deref(),
            Some("No result found for \"qwrtp\".")
        );
    }

    #[tokio::test]
    async fn transport_failure_surfaces_its_message() {
        let source = FakeSource {
            broken: Some("cta".to_owned()),
            ..FakeSource::default()
        }
        .with_entry("cat", "a small feline")
        .with_suggestions(&["cta", "cat"]);
        let mut controller = LookupController::new(source);

        controller.resolve("catt").await;

        let state = controller.state();
        assert!(state.data.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("invalid response: connection reset")
        );
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn failure_replaces_previous_result() {
        let source = FakeSource::default().with_entry("hello", "greeting");
        let mut controller = LookupController::new(source);

        controller.resolve("hello").await;
        controller.resolve("qqq").await;

        let state = controller.state();
        assert!(state.data.is_empty());
        assert!(state.error.is_some());
        assert_eq!(state.current_word.as_deref(), Some("qqq"));
    }

    #[tokio::test]
    async fn observers_see_start_then_settle() {
        let source = FakeSource::default().with_entry("hello", "greeting");
        let mut controller = LookupController::new(source);
        let observer = controller.subscribe();

        controller.resolve("hello").await;

        assert!(observer.has_changed().unwrap());
        assert!(observer.borrow().is_settled());

        controller.clear();
        assert_eq!(*observer.borrow(), LookupState::default());
    }
}
