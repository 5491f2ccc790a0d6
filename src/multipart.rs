//! Multipart form data encoding for daemon uploads.
//!
//! Upload endpoints take one or more `file` parts in a
//! multipart/form-data body. [`Part`] describes one part (name, body,
//! content type, filename) and [`Form`] assembles parts into a body with
//! a generated boundary.
//!
//! Part bodies are either buffered bytes or an open read handle
//! ([`PartBody::Stream`]). Encoding consumes the form, so any open file
//! handles are dropped once the body has been assembled, on every path.

use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};

use crate::Result;

/// Body of a single multipart part.
pub enum PartBody {
    /// Buffered content.
    Bytes(Bytes),
    /// An open handle, read to end at encode time and then dropped.
    Stream(Box<dyn Read + Send>),
}

impl std::fmt::Debug for PartBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish(),
        }
    }
}

impl PartBody {
    /// Wrap an open read handle.
    #[must_use]
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }
}

impl From<Bytes> for PartBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for PartBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static str> for PartBody {
    fn from(text: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for PartBody {
    fn from(text: String) -> Self {
        Self::Bytes(Bytes::from(text))
    }
}

/// A single part in a multipart form.
#[derive(Debug)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    body: PartBody,
}

impl Part {
    /// Create a new part with the given name and body.
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<PartBody>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            body: body.into(),
        }
    }

    /// Set the filename for this part.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type for this part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Get the part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the part body.
    #[must_use]
    pub const fn body(&self) -> &PartBody {
        &self.body
    }
}

/// A multipart form containing multiple parts.
#[derive(Debug)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form with a generated boundary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            boundary: generate_boundary(),
        }
    }

    /// Create a new form with a custom boundary.
    ///
    /// The boundary must not appear in any part data.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Append a part to the form.
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Append a part, builder style.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.push(part);
        self
    }

    /// Get the boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the parts in this form.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `true` if the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Get the Content-Type header value for this form.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode the form into a body, consuming it.
    ///
    /// Returns the Content-Type header value and the assembled body.
    /// Streamed part bodies are read to end here and their handles
    /// dropped, whether or not encoding succeeds.
    pub fn into_body(self) -> Result<(String, Bytes)> {
        let content_type = self.content_type();
        let mut buf = BytesMut::new();

        for part in self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");

            match part.body {
                PartBody::Bytes(bytes) => buf.put_slice(&bytes),
                PartBody::Stream(mut reader) => {
                    let mut data = Vec::new();
                    reader.read_to_end(&mut data)?;
                    buf.put_slice(&data);
                }
            }
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        Ok((content_type, buf.freeze()))
    }
}

/// Generate a boundary string unlikely to collide with part data.
fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    format!("----CasdBoundary{timestamp:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_builder() {
        let part = Part::new("file", "hello")
            .with_filename("greeting.txt")
            .with_content_type("text/plain");

        assert_eq!(part.name(), "file");
        assert_eq!(part.filename(), Some("greeting.txt"));
        assert_eq!(part.content_type(), Some("text/plain"));
        assert!(matches!(part.body(), PartBody::Bytes(b) if b.as_ref() == b"hello"));
    }

    #[test]
    fn form_empty() {
        let form = Form::new();
        assert!(form.is_empty());
        assert!(form.boundary().starts_with("----CasdBoundary"));
    }

    #[test]
    fn form_content_type() {
        let form = Form::with_boundary("test-boundary");
        assert_eq!(
            form.content_type(),
            "multipart/form-data; boundary=test-boundary"
        );
    }

    #[test]
    fn form_encode() {
        let form = Form::with_boundary("boundary123").part(
            Part::new("file", "value")
                .with_filename("v.txt")
                .with_content_type("text/plain"),
        );

        let (content_type, body) = form.into_body().expect("encode");

        assert_eq!(content_type, "multipart/form-data; boundary=boundary123");

        let body_str = String::from_utf8_lossy(&body);
        assert!(body_str.contains("--boundary123\r\n"));
        assert!(
            body_str
                .contains("Content-Disposition: form-data; name=\"file\"; filename=\"v.txt\"\r\n")
        );
        assert!(body_str.contains("Content-Type: text/plain\r\n"));
        assert!(body_str.contains("value\r\n"));
        assert!(body_str.contains("--boundary123--\r\n"));
    }

    #[test]
    fn form_encode_streamed_part() {
        let reader = std::io::Cursor::new(b"streamed content".to_vec());
        let form = Form::with_boundary("b").part(
            Part::new("file", PartBody::stream(reader)).with_filename("s.bin"),
        );

        let (_, body) = form.into_body().expect("encode");
        let body_str = String::from_utf8_lossy(&body);

        assert!(body_str.contains("streamed content\r\n"));
    }

    #[test]
    fn form_encode_multiple_parts() {
        let form = Form::with_boundary("b")
            .part(Part::new("file", "one").with_filename("a"))
            .part(Part::new("file", "two").with_filename("b"));

        let (_, body) = form.into_body().expect("encode");
        let body_str = String::from_utf8_lossy(&body);

        assert_eq!(body_str.matches("Content-Disposition").count(), 2);
        assert!(body_str.contains("one\r\n"));
        assert!(body_str.contains("two\r\n"));
    }

    #[test]
    fn failing_stream_surfaces_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("broken pipe"))
            }
        }

        let form = Form::with_boundary("b").part(Part::new("file", PartBody::stream(Broken)));
        let err = form.into_body().expect_err("should fail");
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
