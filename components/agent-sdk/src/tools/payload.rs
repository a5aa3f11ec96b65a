//! Best-effort extraction of a JSON object embedded in free text.
//!
//! Models often wrap structured tool input in prose, code fences or stray
//! template braces. Every `{` is tried as the start of a JSON object and the
//! first one that parses wins, instead of requiring the whole input to be
//! JSON.

use serde::de::DeserializeOwned;
use serde_json::{Deserializer, Value};
use thiserror::Error;

/// Failure to obtain a structured payload from tool input.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// No JSON object was found.
    #[error("no JSON object found in input")]
    NotFound,

    /// Objects were found but none decodes into the expected shape.
    #[error("invalid JSON payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Top-level JSON objects in `text`, in order, with their source spans.
fn objects(text: &str) -> impl Iterator<Item = (&str, Value)> + '_ {
    let mut from = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[from..].find('{') {
            let start = from + offset;
            let mut stream = Deserializer::from_str(&text[start..]).into_iter::<Value>();
            if let Some(Ok(value @ Value::Object(_))) = stream.next() {
                let end = start + stream.byte_offset();
                from = end;
                return Some((&text[start..end], value));
            }
            from = start + 1;
        }
        None
    })
}

/// Returns the first top-level JSON object in `text`.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    objects(text).next().map(|(span, _)| span)
}

/// Decodes the first JSON object in `text` that fits `T`.
///
/// # Errors
///
/// Returns [`PayloadError::NotFound`] when there is no object and
/// [`PayloadError::Invalid`] with the first decode error when none fits.
pub fn decode_payload<T: DeserializeOwned>(text: &str) -> Result<T, PayloadError> {
    let mut first_error = None;
    for (_, value) in objects(text) {
        match serde_json::from_value(value) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.map_or(PayloadError::NotFound, PayloadError::Invalid))
}
