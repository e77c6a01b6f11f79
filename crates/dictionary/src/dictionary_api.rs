// https://dictionaryapi.dev/ - free, no key, wiktionary backed
// GET /api/v2/entries/<language>/<word>, 404 with a {title, message, resolution} body when unknown

use tracing::debug;

use crate::{DictionaryEntry, DictionaryError, Endpoints, NotFoundError};

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    word: &str,
) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    let url = endpoints.entries_url(word);
    debug!(%url, "requesting definition");
    let res: reqwest::Response = client.get(url).send().await.map_err(DictionaryError::Fetch)?;
    let status = res.status();
    let body = res.text().await.map_err(DictionaryError::Fetch)?;
    if !status.is_success() {
        // anything but 2xx means "no entry" to us; the body explains when it can
        debug!(%status, word, "no definition");
        return Err(DictionaryError::NotFound(NotFoundError::from_body(word, &body)));
    }
    let entries: Vec<DictionaryEntry> = serde_json::from_str(&body)?;
    for entry in &entries {
        entry.validate()?;
    }
    // sparse entries are kept alongside full ones, but a list of only sparse
    // entries is as good as no entry
    if !entries.iter().any(DictionaryEntry::has_definitions) {
        debug!(word, entries = entries.len(), "no usable definition");
        return Err(DictionaryError::NotFound(NotFoundError::no_result(word, None)));
    }
    debug!(word, entries = entries.len(), "definition found");
    Ok(entries)
}
