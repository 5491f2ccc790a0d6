//! Raw responses as returned by the transport collaborator.
//!
//! The transport hands back a [`Response`] for every completed exchange,
//! non-200 included; turning failures into errors is the client's job.
//! The body is a [`Body`]: buffered bytes, or an open handle when the
//! caller asked for a streaming response.

use std::collections::HashMap;
use std::io::Read;

use bytes::Bytes;

use crate::Result;

/// A response body: buffered, or an open handle for streaming.
pub enum Body {
    /// Fully buffered body.
    Buffered(Bytes),
    /// An open handle; the owner is responsible for consuming and
    /// dropping it.
    Stream(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}

impl Body {
    /// An empty buffered body.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Buffered(Bytes::new())
    }

    /// Buffer the whole body, consuming it.
    ///
    /// Reads a streamed handle to end and drops it.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Self::Buffered(bytes) => Ok(bytes),
            Self::Stream(mut reader) => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data)?;
                Ok(Bytes::from(data))
            }
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Buffered(bytes)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::Buffered(Bytes::from_static(text.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffered(Bytes::from(bytes))
    }
}

/// HTTP response with status, headers, and body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Body,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (ASCII-case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The media type of the `Content-Type` header, parameters stripped.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
            .and_then(|value| value.split(';').next())
            .map(str::trim)
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, Body) {
        (self.status, self.headers, self.body)
    }
}
