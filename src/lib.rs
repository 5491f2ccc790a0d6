//! Synchronous client for the HTTP control API of content-addressed
//! storage daemons (IPFS-style `/api/v0` RPC surface).
//!
//! The crate translates method-style calls into HTTP POST requests,
//! encodes multipart file/directory uploads, and decodes the daemon's
//! streaming-JSON response framing, mapping failures to structured
//! errors:
//! - [`Params`] / [`build_query`] - heterogeneous query parameter maps
//!   (scalars, booleans, repeated array parameters) and their encoding
//! - [`Form`] / [`Part`] / [`encode_attachment`] - multipart upload
//!   encoding for files, in-memory content, and directory placeholders
//! - [`Decoded`] / [`decode`] - tolerant response parsing, including the
//!   concatenated-JSON repair for RPC-style endpoints
//! - [`Client`] / [`Call`] - orchestration over a [`Transport`]
//!   collaborator
//! - [`Error`] and [`Result`] - error handling
//!
//! The HTTP transport itself (pooling, TLS, socket timeouts) is not part
//! of this crate: implement [`Transport`] over the HTTP stack of your
//! choice and hand it to [`Client::new`].

mod attach;
mod client;
mod config;
mod decode;
mod error;
mod multipart;
pub mod prelude;
mod query;
mod request;
mod response;

pub use attach::{FileProbe, StdProbe, encode_attachment};
pub use client::{Call, Client, Transport};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use decode::{Decoded, decode};
pub use error::{Error, Result};
pub use multipart::{Form, Part, PartBody};
pub use query::{ParamValue, Params, build_query};
pub use request::{ApiRequest, SendOptions};
pub use response::{Body, Response};
