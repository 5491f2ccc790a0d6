//! Client orchestration: build, attach, send, decode.
//!
//! [`Client`] ties the pieces together. [`Client::request`] builds the
//! target URL with its query string and returns a [`Call`]; attachments
//! accumulate on the call; [`Call::send`] dispatches through the
//! [`Transport`] collaborator and decodes the result or maps a non-200
//! response to [`crate::Error::Api`].
//!
//! A call is an owned value consumed by `send`, so no query or attachment
//! state can leak between requests, whatever the outcome. A single
//! [`Client`] is not meant to interleave concurrent logical requests;
//! issue concurrent calls from separate clients or synchronize externally.
//!
//! # Example
//!
//! ```ignore
//! let client = Client::new(transport, ClientConfig::new("http://127.0.0.1", 5001));
//!
//! let decoded = client
//!     .request("add", &Params::new().with("pin", true))
//!     .attach("notes.txt", None, None, None)?
//!     .send()?;
//! ```

use tracing::debug;

use crate::attach::{FileProbe, StdProbe, encode_attachment};
use crate::config::ClientConfig;
use crate::decode::{Decoded, decode};
use crate::multipart::{Form, PartBody};
use crate::query::{Params, build_query};
use crate::request::{ApiRequest, SendOptions};
use crate::response::Response;
use crate::{Error, Result};

/// Base path of the daemon's control API.
const API_PATH: &str = "api/v0";

/// Transport collaborator: one blocking request/response exchange.
///
/// Implementations own pooling, TLS, and timeouts
/// ([`ClientConfig::timeout`]). They must return non-2xx responses as
/// [`Response`] values — never as errors — so the client can build its
/// own [`Error::Api`] from the body. When `options.stream` is set, the
/// returned body should be a [`crate::Body::Stream`] handle; the handle
/// must be released once consumed or dropped.
pub trait Transport {
    /// Send a request and return the daemon's response.
    fn send(&self, request: ApiRequest, options: &SendOptions) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: ApiRequest, options: &SendOptions) -> Result<Response> {
        (**self).send(request, options)
    }
}

/// Client for a daemon's HTTP control API.
///
/// Long-lived; holds the transport and configuration. Per-request state
/// lives in the [`Call`] values it hands out.
#[derive(Debug, Clone)]
pub struct Client<T, P = StdProbe> {
    transport: T,
    probe: P,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    /// Create a client over the given transport.
    #[must_use]
    pub const fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            probe: StdProbe,
            config,
        }
    }
}

impl<T: Transport, P: FileProbe> Client<T, P> {
    /// Create a client with a custom filesystem/MIME probe.
    #[must_use]
    pub const fn with_probe(transport: T, config: ClientConfig, probe: P) -> Self {
        Self {
            transport,
            probe,
            config,
        }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a pending call for an endpoint.
    ///
    /// `path` is the endpoint path under `api/v0` (e.g. `pin/add`);
    /// `params` become the query string per [`build_query`].
    #[must_use]
    pub fn request(&self, path: &str, params: &Params) -> Call<'_, T, P> {
        let url = format!(
            "{}:{}/{}/{}",
            self.config.host,
            self.config.port,
            API_PATH,
            build_query(path, params),
        );
        debug!(%url, "request built");

        Call {
            client: self,
            url,
            form: Form::new(),
        }
    }
}

/// A pending request: target URL plus accumulated attachments.
///
/// Consumed by [`Call::send`], which guarantees nothing carries over to
/// the next request on any path.
#[derive(Debug)]
pub struct Call<'a, T, P = StdProbe> {
    client: &'a Client<T, P>,
    url: String,
    form: Form,
}

impl<T: Transport, P: FileProbe> Call<'_, T, P> {
    /// The fully-built target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of attachments accumulated so far.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.form.parts().len()
    }

    /// Attach upload content to this call.
    ///
    /// See [`encode_attachment`] for how `path`, `name`, `content`, and
    /// `mime` select between explicit content, a streamed file, and a
    /// directory placeholder. May be called multiple times; each
    /// attachment becomes one `file` part of the multipart body.
    pub fn attach(
        mut self,
        path: &str,
        name: Option<&str>,
        content: Option<PartBody>,
        mime: Option<&str>,
    ) -> Result<Self> {
        let part = encode_attachment(&self.client.probe, path, name, content, mime)?;
        self.form.push(part);
        Ok(self)
    }

    /// Send with default options (buffered, decoded response).
    pub fn send(self) -> Result<Decoded> {
        self.send_with(SendOptions::default())
    }

    /// Send the call through the transport and decode the outcome.
    ///
    /// Consumes the call; attachment handles are released here whether
    /// the exchange succeeds or fails. A non-200 status yields
    /// [`Error::Api`] built from the response body.
    pub fn send_with(self, options: SendOptions) -> Result<Decoded> {
        let mut request = ApiRequest::new(self.url).header("Accept", "application/json");

        if !self.form.is_empty() {
            let (content_type, body) = self.form.into_body()?;
            request = request.header("Content-Type", content_type).body(body);
        }

        debug!(url = request.url(), stream = options.stream, "sending");
        let response = self.client.transport.send(request, &options)?;

        let status = response.status();
        if status != 200 {
            let body = response.into_body().into_bytes()?;
            debug!(status, "daemon returned failure");
            return Err(Error::api_failure(status, &body));
        }

        let content_type = response.content_type().map(str::to_owned);
        decode(response.into_body(), content_type.as_deref(), options.stream)
    }
}
