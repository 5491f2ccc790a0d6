//! Requests handed to the transport collaborator.

use std::collections::HashMap;

use bytes::Bytes;

/// A fully-built request, ready for the transport.
///
/// The daemon's control API is POST-only, so the method is a constant.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    url: String,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl ApiRequest {
    /// The method used for every control API call.
    pub const METHOD: &'static str = "POST";

    /// Creates a request for the given target URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Target URL (scheme-relative `host:port/api/v0/...` form).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (String, HashMap<String, String>, Option<Bytes>) {
        (self.url, self.headers, self.body)
    }
}

/// Per-send options passed through to the transport.
///
/// Transports must return non-2xx responses as values rather than errors;
/// the client builds its own [`crate::Error::Api`] from them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendOptions {
    /// Return the response body as an open handle instead of buffering
    /// and decoding it. The caller owns the handle's lifecycle.
    pub stream: bool,
}

impl SendOptions {
    /// Options requesting a streaming response body.
    #[must_use]
    pub const fn streaming() -> Self {
        Self { stream: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = ApiRequest::new("localhost:5001/api/v0/id")
            .header("Accept", "application/json")
            .body(Bytes::from_static(b"payload"));

        assert_eq!(ApiRequest::METHOD, "POST");
        assert_eq!(request.url(), "localhost:5001/api/v0/id");
        assert_eq!(request.header_value("Accept"), Some("application/json"));
        assert_eq!(
            request.body_bytes().map(Bytes::as_ref),
            Some(b"payload".as_slice())
        );
    }

    #[test]
    fn send_options() {
        assert!(!SendOptions::default().stream);
        assert!(SendOptions::streaming().stream);
    }
}
