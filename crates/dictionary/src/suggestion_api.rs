// https://www.datamuse.com/api/ - /sug does prefix completion plus spelling correction
// https://api.datamuse.com/words?sp= - pattern matching, no misspelling tolerance // not useful as a fallback

use serde::Deserialize;
use tracing::debug;

use crate::{DictionaryError, Endpoints};

#[derive(Debug, Deserialize)]
struct Suggestion {
    word: String,
}

pub(crate) async fn get_suggestions(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    term: &str,
) -> Result<Vec<String>, DictionaryError> {
    let req = client
        .get(endpoints.suggestions_url())
        .query(&[("s", term)]);
    let res: reqwest::Response = req.send().await.map_err(DictionaryError::Fetch)?;
    let status = res.status();
    if !status.is_success() {
        return Err(DictionaryError::Status(status));
    }
    let body = res.text().await.map_err(DictionaryError::Fetch)?;
    let suggestions: Vec<Suggestion> = serde_json::from_str(&body)?;
    debug!(term, count = suggestions.len(), "suggestions received");
    Ok(suggestions
        .into_iter()
        .map(|suggestion| suggestion.word)
        .collect())
}
