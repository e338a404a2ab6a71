//! Resource layer: typed services over a [`Transport`].
//!
//! Every service method builds a request path, delegates the call to the
//! transport, checks the status and decodes the body. Non-success statuses become
//! [`RecurlyError::Api`] with the decoded error document; `get` methods map 404 to
//! `Ok(None)`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use recurly::{Client, ClientConfig, client::Params};
//!
//! # async fn example() -> recurly::Result<()> {
//! let config = ClientConfig::from_toml(r#"subdomain = "your-subdomain""#)?;
//! let client = Client::from_config(&config)?;
//!
//! let page = client.accounts().list(&Params::new().per_page(50)).await?;
//! for account in &page.items {
//!     println!("{} <{}>", account.account_code, account.email);
//! }
//! if let Some(next) = page.next_params(&Params::new().per_page(50)) {
//!     let _second = client.accounts().list(&next).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod accounts;
mod add_ons;
mod invoices;
mod subscriptions;
mod transactions;

use tracing::debug;
use url::Url;

pub use self::{
    accounts::Accounts,
    add_ons::AddOns,
    invoices::{DEFAULT_PDF_LANGUAGE, Invoices},
    subscriptions::{RefundType, Subscriptions},
    transactions::Transactions,
};
use crate::{
    config::ClientConfig,
    error::{RecurlyError, Result},
    models::{UpdatePolicy, parse_api_errors},
    transport::{HttpTransport, Request, Transport, TransportResponse},
    xml::{self, FromXml, ToXml},
};

/// Entry point for the REST resources.
///
/// Holds no mutable state; share it behind an `Arc` or clone the transport.
#[derive(Debug)]
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    update_policy: UpdatePolicy,
}

impl Client<HttpTransport> {
    /// Builds a client with an [`HttpTransport`] from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] if the configuration is invalid or the API key
    /// cannot be resolved, or [`RecurlyError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport =
            HttpTransport::with_config(&config.base_url()?, config.resolve_api_key()?, &config.http)?;
        Ok(Self::new(transport).with_update_policy(config.subscription_updates.clone()))
    }
}

impl<T: Transport> Client<T> {
    /// Wraps a transport with the default [`UpdatePolicy`].
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport, update_policy: UpdatePolicy::default() }
    }

    /// Replaces the policy used by [`Subscriptions::prepare_update`].
    #[must_use]
    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Fields carried forward on subscription updates.
    #[must_use]
    pub const fn update_policy(&self) -> &UpdatePolicy {
        &self.update_policy
    }

    /// Account operations.
    #[must_use]
    pub const fn accounts(&self) -> Accounts<'_, T> {
        Accounts::new(self)
    }

    /// Subscription operations.
    #[must_use]
    pub const fn subscriptions(&self) -> Subscriptions<'_, T> {
        Subscriptions::new(self)
    }

    /// Invoice operations.
    #[must_use]
    pub const fn invoices(&self) -> Invoices<'_, T> {
        Invoices::new(self)
    }

    /// Transaction operations.
    #[must_use]
    pub const fn transactions(&self) -> Transactions<'_, T> {
        Transactions::new(self)
    }

    /// Plan add-on operations.
    #[must_use]
    pub const fn add_ons(&self) -> AddOns<'_, T> {
        AddOns::new(self)
    }

    /// Sends a request and turns a non-success status into [`RecurlyError::Api`].
    pub(crate) async fn execute(&self, request: Request) -> Result<TransportResponse> {
        let method = request.method;
        let response = self.transport.send(request).await?;
        debug!(
            protocol = self.transport.protocol_name(),
            %method,
            status = response.status,
            "recurly response"
        );
        if response.is_success() {
            return Ok(response);
        }
        let errors = parse_api_errors(&response.body).unwrap_or_default();
        Err(RecurlyError::Api { status: response.status, errors })
    }

    /// Sends a request and decodes a single entity.
    pub(crate) async fn fetch<E: FromXml>(&self, request: Request) -> Result<E> {
        let response = self.execute(request).await?;
        xml::decode(&response.body)
    }

    /// Like [`Self::fetch`], with 404 mapped to `None`.
    pub(crate) async fn fetch_optional<E: FromXml>(&self, request: Request) -> Result<Option<E>> {
        match self.fetch(request).await {
            Ok(entity) => Ok(Some(entity)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Sends a list request and decodes one page.
    pub(crate) async fn fetch_page<E: FromXml>(
        &self,
        request: Request,
        container: &str,
    ) -> Result<Page<E>> {
        let response = self.execute(request).await?;
        let items = xml::decode_list(&response.body, container)?;
        Ok(Page {
            items,
            next_cursor: response.header("Link").and_then(next_cursor),
            total: response.header("X-Records").and_then(|v| v.trim().parse().ok()),
        })
    }

    /// Sends a request whose response body is not needed.
    pub(crate) async fn send_empty(&self, request: Request) -> Result<()> {
        self.execute(request).await.map(drop)
    }
}

/// Encodes a request body.
pub(crate) fn body<E: ToXml>(entity: &E) -> Result<Vec<u8>> {
    xml::encode(entity)
}

/// Checks an identifier before it is placed in a request path.
pub(crate) fn segment(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '+'));
    if valid {
        Ok(id)
    } else {
        Err(RecurlyError::InvalidInput(format!("invalid resource identifier: {id:?}")))
    }
}

/// Query parameters for list requests.
///
/// # Examples
///
/// ```
/// use recurly::client::Params;
///
/// let params = Params::new().per_page(20).state("active").set("sort", "updated_at");
/// assert_eq!(params.get("per_page"), Some("20"));
/// assert_eq!(params.get("sort"), Some("updated_at"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Page size.
    #[must_use]
    pub fn per_page(self, per_page: u32) -> Self {
        self.set("per_page", per_page)
    }

    /// Cursor returned by a previous page.
    #[must_use]
    pub fn cursor(self, cursor: impl Into<String>) -> Self {
        self.set("cursor", cursor.into())
    }

    /// State filter.
    #[must_use]
    pub fn state(self, state: impl Into<String>) -> Self {
        self.set("state", state.into())
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// True when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        self.pairs.clone()
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Entities on this page.
    pub items: Vec<T>,
    /// Cursor of the next page, from the `Link: <...>; rel="next"` header.
    pub next_cursor: Option<String>,
    /// Total number of records, from the `X-Records` header.
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Parameters for the next page, or `None` on the last page.
    #[must_use]
    pub fn next_params(&self, params: &Params) -> Option<Params> {
        self.next_cursor.as_ref().map(|cursor| params.clone().cursor(cursor.clone()))
    }

    /// True when there is another page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Extracts the `cursor` query parameter of the `rel="next"` link.
fn next_cursor(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| matches!(p.trim(), r#"rel="next""# | "rel=next"));
        if !is_next {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs().find(|(k, _)| k == "cursor").map(|(_, v)| v.into_owned())
    })
}
