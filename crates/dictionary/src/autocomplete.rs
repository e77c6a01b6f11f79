use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::WordSource;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Debounced, cancellable suggestion fetching for partially typed input.
///
/// Each [`request`](Autocomplete::request) aborts the previous one, so at most
/// one suggestion request is outstanding and results of superseded requests
/// are never published. Must be used from inside a tokio runtime.
pub struct Autocomplete<S> {
    source: Arc<S>,
    debounce: Duration,
    suggestions: Arc<watch::Sender<Vec<String>>>,
    generation: Arc<AtomicU64>,
    pending: Option<AbortHandle>,
}

impl<S: WordSource + 'static> Autocomplete<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            source,
            debounce: DEFAULT_DEBOUNCE,
            suggestions: Arc::new(suggestions),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.suggestions.subscribe()
    }

    /// Latest published suggestions.
    pub fn current(&self) -> Vec<String> {
        self.suggestions.borrow().clone()
    }

    pub fn request(&mut self, partial: &str) {
        let generation = self.supersede();
        let term = partial.trim().to_owned();
        if term.is_empty() {
            self.suggestions.send_replace(Vec::new());
            return;
        }

        let (handle, registration) = AbortHandle::new_pair();
        let source = Arc::clone(&self.source);
        let suggestions = Arc::clone(&self.suggestions);
        let current = Arc::clone(&self.generation);
        let debounce = self.debounce;
        let fetch = async move {
            tokio::time::sleep(debounce).await;
            let words = match source.suggest(&term).await {
                Ok(words) => words,
                Err(error) => {
                    warn!(term = term.as_str(), %error, "suggestion request failed");
                    Vec::new()
                }
            };
            // checked under the channel lock so a newer request always wins
            suggestions.send_if_modified(|published| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *published = words;
                true
            });
        };
        tokio::spawn(async move {
            if Abortable::new(fetch, registration).await.is_err() {
                debug!("suggestion request superseded");
            }
        });
        self.pending = Some(handle);
    }

    /// Drops the outstanding request, if any, leaving published suggestions as
    /// they are.
    pub fn cancel(&mut self) {
        self.supersede();
    }

    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl<S> Drop for Autocomplete<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
