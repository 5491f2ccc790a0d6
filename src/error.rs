//! Error types for casd-client.

use bytes::Bytes;
use derive_more::{Display, Error, From};

/// Main error type for client operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The daemon answered with a non-200 status.
    #[display("API error {code}: {message}")]
    #[from(skip)]
    Api {
        /// Upstream error message (daemon `Message` field or reason phrase).
        message: String,
        /// Upstream error code (daemon `Code` field or HTTP status).
        code: i64,
    },

    /// The response claimed JSON but stayed unparseable even after repair.
    #[display("decode error: {message}")]
    #[from(skip)]
    Decode {
        /// Parser message.
        message: String,
        /// The offending body, kept for diagnosis.
        #[error(not(source))]
        body: Bytes,
    },

    /// The MIME probe failed to initialize. Fatal, not recoverable per call.
    #[display("probe configuration error: {_0}")]
    #[from(skip)]
    Config(#[error(not(source))] String),

    /// Filesystem error while opening or reading attachment content.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    /// Socket-level failure reported by the transport collaborator.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(#[error(not(source))] String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Shape of the daemon's JSON error bodies.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "Code")]
    code: i64,
}

impl Error {
    /// Create an API error from a message and code.
    #[must_use]
    pub fn api(message: impl Into<String>, code: i64) -> Self {
        Self::Api {
            message: message.into(),
            code,
        }
    }

    /// Build an [`Error::Api`] from a failed response.
    ///
    /// A non-empty body is decoded as the daemon's `{"Message", "Code"}`
    /// shape; a non-JSON body becomes the message verbatim with the HTTP
    /// status as code; an empty body falls back to the status reason phrase.
    #[must_use]
    pub fn api_failure(status: u16, body: &Bytes) -> Self {
        if body.is_empty() {
            return Self::Api {
                message: reason_phrase(status).to_owned(),
                code: i64::from(status),
            };
        }
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(err) => Self::Api {
                message: err.message,
                code: err.code,
            },
            Err(_) => Self::Api {
                message: String::from_utf8_lossy(body).into_owned(),
                code: i64::from(status),
            },
        }
    }

    /// Create a decode error, keeping the offending body.
    #[must_use]
    pub fn decode_failure(message: impl Into<String>, body: Bytes) -> Self {
        Self::Decode {
            message: message.into(),
            body,
        }
    }

    /// Create a probe configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns `true` if this is an API (non-200) error.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns the upstream code if this is an API error.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the offending body if this is a decode error.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Canonical reason phrase for an HTTP status code.
fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::api("boom", 500);
        assert_eq!(err.to_string(), "API error 500: boom");

        let err = Error::decode_failure("unexpected character", Bytes::from("{oops"));
        assert_eq!(err.to_string(), "decode error: unexpected character");

        let err = Error::config("libmagic unavailable");
        assert_eq!(
            err.to_string(),
            "probe configuration error: libmagic unavailable"
        );

        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn api_failure_from_json_body() {
        let body = Bytes::from(r#"{"Message":"boom","Code":500}"#);
        let err = Error::api_failure(500, &body);

        assert!(err.is_api());
        assert_eq!(err.code(), Some(500));
        assert_eq!(err.to_string(), "API error 500: boom");
    }

    #[test]
    fn api_failure_daemon_code_wins_over_status() {
        let body = Bytes::from(r#"{"Message":"not pinned","Code":0}"#);
        let err = Error::api_failure(500, &body);

        assert_eq!(err.code(), Some(0));
        assert_eq!(err.to_string(), "API error 0: not pinned");
    }

    #[test]
    fn api_failure_from_empty_body_uses_reason_phrase() {
        let err = Error::api_failure(500, &Bytes::new());
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = Error::api_failure(404, &Bytes::new());
        assert_eq!(err.to_string(), "API error 404: Not Found");
    }

    #[test]
    fn api_failure_from_plain_text_body() {
        let body = Bytes::from("something broke");
        let err = Error::api_failure(502, &body);

        assert_eq!(err.code(), Some(502));
        assert_eq!(err.to_string(), "API error 502: something broke");
    }

    #[test]
    fn decode_error_keeps_body() {
        let body = Bytes::from("{not json");
        let err = Error::decode_failure("parse failed", body.clone());
        assert_eq!(err.body(), Some(&body));

        assert!(Error::api("x", 1).body().is_none());
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
    }
}
