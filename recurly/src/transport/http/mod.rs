//! HTTP transport over reqwest.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{RecurlyError, Result},
    transport::{Method, Request, Transport, TransportResponse, XML_CONTENT_TYPE},
};

/// Ensures the base URL uses HTTPS and can carry relative paths.
pub(crate) fn validate_base_url(url: &Url) -> Result<()> {
    if url.scheme() != "https" {
        return Err(RecurlyError::Config("Only HTTPS base URLs are allowed".to_owned()));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(RecurlyError::Config(format!("base URL has no host: {url}")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RecurlyError::Config("base URL must not carry a query or fragment".to_owned()));
    }
    Ok(())
}

/// Rejects paths that would escape the API root.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") || path.contains(['?', '#']) {
        return Err(RecurlyError::InvalidInput(format!("invalid request path: {path:?}")));
    }
    Ok(path.trim_start_matches('/'))
}

/// Rejects header values that would allow CRLF injection.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(RecurlyError::InvalidInput(format!(
            "invalid value for header {name}: control characters not allowed"
        )));
    }
    Ok(())
}

/// HTTP transport authenticated with the account's private API key.
///
/// The key is sent as the user name of HTTP basic auth. Every request carries
/// `Accept: application/xml` unless the request overrides it, and bodies are sent as
/// `application/xml; charset=utf-8`.
///
/// # Examples
///
/// ```
/// use recurly::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig { timeout_secs: 60, http_version: HttpVersion::Http1, ..HttpConfig::default() };
/// let transport =
///     HttpTransport::with_config("https://your-subdomain.recurly.com/v2/", "key", &config)
///         .unwrap();
///
/// assert!(HttpTransport::new("http://your-subdomain.recurly.com/v2/", "key").is_err());
/// ```
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: String,
    http_version: HttpVersion,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("http_version", &self.http_version)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport with the default [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] if the base URL is not an absolute HTTPS URL,
    /// or [`RecurlyError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, api_key, &HttpConfig::default())
    }

    /// Creates a transport with custom connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] if the base URL or the configuration is
    /// invalid, or [`RecurlyError::Http`] if the HTTP client cannot be built.
    pub fn with_config(
        base_url: &str,
        api_key: impl Into<String>,
        config: &HttpConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut base_url = Url::parse(base_url)
            .map_err(|e| RecurlyError::Config(format!("invalid base_url: {e}")))?;
        validate_base_url(&base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build()?;

        Ok(Self { client, base_url, api_key: api_key.into(), http_version: config.http_version })
    }

    /// API root every request path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path and query against the base URL.
    fn url_for(&self, request: &Request) -> Result<Url> {
        let path = sanitize_path(&request.path)?;
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| RecurlyError::InvalidInput(format!("invalid request path: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: Request) -> Result<TransportResponse> {
        let url = self.url_for(&request)?;
        for (name, value) in &request.headers {
            validate_header(name, value)?;
        }

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        builder = builder.basic_auth(&self.api_key, None::<&str>);
        if request.header("Accept").is_none() {
            builder = builder.header("Accept", "application/xml");
        }
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.header("Content-Type", XML_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_owned()))
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "received response");
        Ok(TransportResponse { status, headers, body })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse> {
        self.execute(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
