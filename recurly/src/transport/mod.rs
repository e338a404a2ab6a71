//! Transport abstraction between the resource layer and the network.
//!
//! The resource services build a [`Request`] and hand it to a [`Transport`]; the
//! transport performs the call and returns the raw status, headers and body. Status
//! interpretation and decoding happen in the client, so a transport only moves bytes.
//!
//! [`HttpTransport`] is the production implementation. Tests substitute an
//! in-memory transport that records requests and replays canned responses.
//!
//! # Examples
//!
//! ```rust,no_run
//! use recurly::transport::{HttpTransport, Method, Request, Transport};
//!
//! # async fn example() -> recurly::Result<()> {
//! let transport = HttpTransport::new("https://your-subdomain.recurly.com/v2/", "api-key")?;
//!
//! let response = transport.send(Request::new(Method::Get, "accounts/1")).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Content type of every XML request and response.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API root, without a leading slash (`accounts/1`).
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Extra headers; an `Accept` entry replaces the XML default.
    pub headers: Vec<(&'static str, String)>,
    /// Request body (an XML document), if any.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a request with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), headers: Vec::new(), body: None }
    }

    /// Adds query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up an extra header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Looks up a response header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Moves a [`Request`] to the API and returns the raw response.
///
/// Implementations report network failures as errors and return every HTTP status,
/// success or not, as a [`TransportResponse`].
pub trait Transport: Send + Sync {
    /// Executes a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or no response is received.
    fn send(&self, request: Request) -> impl Future<Output = Result<TransportResponse>> + Send;

    /// Protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}
