//! Response decoding, including the concatenated-JSON repair.
//!
//! The daemon's RPC-style endpoints emit newline-delimited JSON objects
//! back-to-back (`{"a":1}{"b":2}`) instead of a framed array. [`decode`]
//! first tries a standard JSON parse and, when that fails for an
//! `application/json` body, applies a narrow repair: a `,` after every
//! `}`, trailing comma stripped, the whole thing wrapped in `[` `]`.
//!
//! The repair assumes no `}` occurs inside a JSON string value before the
//! next object boundary. That holds for the daemon's known payloads; this
//! is deliberately not a general JSON-repair algorithm.

use serde_json::Value;

use crate::response::Body;
use crate::{Error, Result};

/// A decoded response.
#[derive(Debug)]
pub enum Decoded {
    /// Parsed JSON body (an object, or an array for repaired
    /// concatenated-JSON bodies). An empty body decodes to an empty object.
    Json(Value),
    /// The untouched body handle, when a streaming response was requested.
    /// The caller owns its lifecycle.
    Raw(Body),
    /// Non-JSON body, returned verbatim as text.
    Content(String),
}

impl Decoded {
    /// Borrow the JSON value, if this is a decoded JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into the JSON value, if this is a decoded JSON body.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the text content, if this is a non-JSON body.
    #[must_use]
    pub fn as_content(&self) -> Option<&str> {
        match self {
            Self::Content(text) => Some(text),
            _ => None,
        }
    }
}

/// Decode a response body according to its declared content type.
///
/// Rules, in order: a requested stream is returned untouched; an empty
/// body decodes to an empty JSON object; an `application/json` body is
/// parsed, with the concatenated-JSON repair as fallback; anything else
/// comes back as [`Decoded::Content`].
pub fn decode(body: Body, content_type: Option<&str>, stream: bool) -> Result<Decoded> {
    if stream {
        return Ok(Decoded::Raw(body));
    }

    let bytes = body.into_bytes()?;
    if bytes.is_empty() {
        return Ok(Decoded::Json(Value::Object(serde_json::Map::new())));
    }

    if content_type == Some("application/json") {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return Ok(Decoded::Json(value));
        }

        let text = String::from_utf8_lossy(&bytes);
        return match serde_json::from_str::<Value>(&repair(&text)) {
            Ok(value) => Ok(Decoded::Json(value)),
            Err(err) => Err(Error::decode_failure(err.to_string(), bytes)),
        };
    }

    Ok(Decoded::Content(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Reframe concatenated JSON objects as a JSON array.
fn repair(raw: &str) -> String {
    let expanded = raw.replace('}', "},");
    let trimmed = expanded.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);
    format!("[{trimmed}]")
}
