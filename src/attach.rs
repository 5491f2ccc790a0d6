//! Attachment encoding for upload endpoints.
//!
//! [`encode_attachment`] turns a source description into one multipart
//! [`Part`] named `file`, following the daemon's upload conventions:
//!
//! - explicit content is sent as-is, defaulting to
//!   `application/octet-stream`;
//! - a path to an existing file is opened for streaming and its MIME type
//!   sniffed;
//! - any other path is treated as a directory reference and sent as an
//!   `application/x-directory` placeholder part with the literal body
//!   `directory`.
//!
//! Filesystem access and MIME sniffing sit behind the [`FileProbe`] seam;
//! [`StdProbe`] is the `std::fs`-backed default.

use std::io::Read;
use std::path::Path;

use crate::multipart::{Part, PartBody};
use crate::Result;

/// Filesystem and MIME-sniffing collaborator.
///
/// A probe whose sniffing backend cannot initialize must return
/// [`Error::Config`] from [`FileProbe::mime_type`]; there is no silent
/// fallback.
pub trait FileProbe {
    /// Returns `true` if `path` refers to an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    /// Open `path` for streaming read.
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Base name of `path`.
    fn base_name(&self, path: &Path) -> String;

    /// Sniff the MIME type of the file at `path`.
    fn mime_type(&self, path: &Path) -> Result<String>;
}

/// Default probe backed by `std::fs` and extension-based sniffing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdProbe;

impl FileProbe for StdProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(file))
    }

    fn base_name(&self, path: &Path) -> String {
        path.file_name()
            .map_or_else(|| path.to_string_lossy().into_owned(), |name| {
                name.to_string_lossy().into_owned()
            })
    }

    fn mime_type(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(mime_for_extension(&extension).to_owned())
    }
}

/// MIME type for a lowercase file extension.
fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" | "gzip" => "application/gzip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Encode one attachment into a multipart [`Part`].
///
/// The three cases are mutually exclusive, selected by input shape:
/// explicit `content` wins; otherwise an existing file at `path` is
/// streamed; otherwise `path` is sent as a directory placeholder.
pub fn encode_attachment<P: FileProbe>(
    probe: &P,
    path: &str,
    name: Option<&str>,
    content: Option<PartBody>,
    mime: Option<&str>,
) -> Result<Part> {
    if let Some(body) = content {
        return Ok(Part::new("file", body)
            .with_content_type(mime.unwrap_or("application/octet-stream"))
            .with_filename(name.unwrap_or(path)));
    }

    let fs_path = Path::new(path);
    if probe.exists(fs_path) {
        let content_type = match mime {
            Some(mime) => mime.to_owned(),
            None => probe.mime_type(fs_path)?,
        };
        let filename = name.map_or_else(|| probe.base_name(fs_path), str::to_owned);
        let reader = probe.open(fs_path)?;

        return Ok(Part::new("file", PartBody::Stream(reader))
            .with_content_type(content_type)
            .with_filename(filename));
    }

    Ok(Part::new("file", "directory")
        .with_content_type("application/x-directory")
        .with_filename(path))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::Error;
    use crate::multipart::PartBody;

    #[test]
    fn explicit_content_defaults() {
        let part = encode_attachment(
            &StdProbe,
            "notes/draft",
            None,
            Some(PartBody::from("hello")),
            None,
        )
        .expect("encode");

        assert_eq!(part.name(), "file");
        assert_eq!(part.content_type(), Some("application/octet-stream"));
        assert_eq!(part.filename(), Some("notes/draft"));
    }

    #[test]
    fn explicit_content_with_name_and_mime() {
        let part = encode_attachment(
            &StdProbe,
            "ignored",
            Some("report.csv"),
            Some(PartBody::from("a,b")),
            Some("text/csv"),
        )
        .expect("encode");

        assert_eq!(part.content_type(), Some("text/csv"));
        assert_eq!(part.filename(), Some("report.csv"));
    }

    #[test]
    fn existing_file_is_sniffed_and_streamed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_path = dir.path().join("photo.png");
        let mut file = std::fs::File::create(&file_path).expect("create");
        file.write_all(&[0x89, 0x50, 0x4E, 0x47]).expect("write");

        let part = encode_attachment(
            &StdProbe,
            file_path.to_str().expect("utf8 path"),
            None,
            None,
            None,
        )
        .expect("encode");

        assert_eq!(part.content_type(), Some("image/png"));
        assert_eq!(part.filename(), Some("photo.png"));
        assert!(matches!(part.body(), PartBody::Stream(_)));
    }

    #[test]
    fn explicit_mime_overrides_sniffing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_path = dir.path().join("data.json");
        std::fs::write(&file_path, "{}").expect("write");

        let part = encode_attachment(
            &StdProbe,
            file_path.to_str().expect("utf8 path"),
            Some("custom"),
            None,
            Some("application/x-custom"),
        )
        .expect("encode");

        assert_eq!(part.content_type(), Some("application/x-custom"));
        assert_eq!(part.filename(), Some("custom"));
    }

    #[test]
    fn missing_path_becomes_directory_placeholder() {
        let part = encode_attachment(&StdProbe, "my/folder", None, None, None).expect("encode");

        assert_eq!(part.content_type(), Some("application/x-directory"));
        assert_eq!(part.filename(), Some("my/folder"));
        assert!(matches!(part.body(), PartBody::Bytes(b) if b.as_ref() == b"directory"));
    }

    #[test]
    fn broken_probe_surfaces_config_error() {
        struct NoMagic;
        impl FileProbe for NoMagic {
            fn exists(&self, _: &Path) -> bool {
                true
            }
            fn open(&self, _: &Path) -> Result<Box<dyn Read + Send>> {
                Ok(Box::new(std::io::empty()))
            }
            fn base_name(&self, _: &Path) -> String {
                "x".to_owned()
            }
            fn mime_type(&self, _: &Path) -> Result<String> {
                Err(Error::config("sniffing backend failed to initialize"))
            }
        }

        let err = encode_attachment(&NoMagic, "x", None, None, None).expect_err("should fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn mime_table() {
        assert_eq!(mime_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_for_extension("json"), "application/json");
        assert_eq!(mime_for_extension("xyz"), "application/octet-stream");
        assert_eq!(mime_for_extension(""), "application/octet-stream");
    }

    #[test]
    fn std_probe_base_name() {
        assert_eq!(StdProbe.base_name(Path::new("a/b/c.txt")), "c.txt");
        assert_eq!(StdProbe.base_name(Path::new("c.txt")), "c.txt");
    }
}
