//! Lookup state and the transitions that move it.
//!
//! State only changes by feeding an intent through a [`Reducer`]:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ observers
//! ```

use crate::DictionaryEntry;

/// Pure state transition: `(State, Intent) -> State`.
pub trait Reducer {
    type State: Clone + PartialEq + Default;
    type Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupState {
    pub data: Vec<DictionaryEntry>,
    pub loading: bool,
    pub error: Option<String>,
    /// Last submitted term, whether or not it resolved.
    pub current_word: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupIntent {
    Start { term: String },
    Success(Vec<DictionaryEntry>),
    Error(String),
    Clear,
}

pub struct LookupReducer;

impl Reducer for LookupReducer {
    type State = LookupState;
    type Intent = LookupIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            LookupIntent::Start { term } => LookupState {
                loading: true,
                error: None,
                current_word: Some(term),
                ..state
            },
            LookupIntent::Success(data) => LookupState {
                data,
                loading: false,
                error: None,
                ..state
            },
            // data is dropped so that a settled state holds either entries or an error
            LookupIntent::Error(message) => LookupState {
                data: Vec::new(),
                loading: false,
                error: Some(message),
                ..state
            },
            LookupIntent::Clear => LookupState::default(),
        }
    }
}

impl LookupState {
    /// The entry shown as the headword, if any.
    pub fn first_entry(&self) -> Option<&DictionaryEntry> {
        self.data.first()
    }

    pub fn is_settled(&self) -> bool {
        !self.loading && (!self.data.is_empty() || self.error.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> DictionaryEntry {
        serde_json::from_value(serde_json::json!({
            "word": word,
            "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "a thing"}]}]
        }))
        .unwrap()
    }

    #[test]
    fn start_sets_loading_and_word_and_clears_error() {
        let state = LookupState {
            error: Some("boom".to_owned()),
            ..LookupState::default()
        };
        let state = LookupReducer::reduce(
            state,
            LookupIntent::Start {
                term: "hello".to_owned(),
            },
        );
        assert!(state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.current_word.as_deref(), Some("hello"));
    }

    #[test]
    fn start_keeps_previous_entries_until_settled() {
        let state = LookupReducer::reduce(
            LookupState::default(),
            LookupIntent::Success(vec![entry("cat")]),
        );
        let state = LookupReducer::reduce(
            state,
            LookupIntent::Start {
                term: "dog".to_owned(),
            },
        );
        assert_eq!(state.data.len(), 1);
        assert!(!state.is_settled());
    }

    #[test]
    fn success_and_error_are_mutually_exclusive() {
        let state = LookupReducer::reduce(
            LookupState::default(),
            LookupIntent::Success(vec![entry("cat")]),
        );
        assert!(state.is_settled());
        assert_eq!(state.error, None);

        let state = LookupReducer::reduce(state, LookupIntent::Error("nope".to_owned()));
        assert!(state.data.is_empty());
        assert_eq!(state.error.as_deref(), Some("nope"));
        assert!(!state.loading);
    }

    #[test]
    fn error_keeps_current_word() {
        let state = LookupReducer::reduce(
            LookupState::default(),
            LookupIntent::Start {
                term: "qqq".to_owned(),
            },
        );
        let state = LookupReducer::reduce(state, LookupIntent::Error("nope".to_owned()));
        assert_eq!(state.current_word.as_deref(), Some("qqq"));
    }

    #[test]
    fn clear_resets_everything() {
        let state = LookupState {
            data: vec![entry("cat")],
            loading: false,
            error: None,
            current_word: Some("cat".to_owned()),
        };
        assert_eq!(
            LookupReducer::reduce(state, LookupIntent::Clear),
            LookupState::default()
        );
    }
}
