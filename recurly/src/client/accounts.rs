//! Account endpoints.

use tracing::instrument;

use super::{Client, Page, Params, body, segment};
use crate::{
    error::Result,
    models::Account,
    transport::{Method, Request, Transport},
};

/// Account operations, obtained from [`Client::accounts`].
#[derive(Debug)]
pub struct Accounts<'a, T: Transport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Accounts<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Lists accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &Params) -> Result<Page<Account>> {
        let request = Request::new(Method::Get, "accounts").with_query(params.to_query());
        self.client.fetch_page(request, "accounts").await
    }

    /// Looks up an account; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get(&self, account_code: &str) -> Result<Option<Account>> {
        let path = format!("accounts/{}", segment(account_code)?);
        self.client.fetch_optional(Request::new(Method::Get, path)).await
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Api`](crate::RecurlyError::Api) with the validation
    /// errors if the API rejects the account.
    #[instrument(skip(self, account), fields(account_code = %account.account_code))]
    pub async fn create(&self, account: &Account) -> Result<Account> {
        let request = Request::new(Method::Post, "accounts").with_body(body(account)?);
        self.client.fetch(request).await
    }

    /// Updates an account's writable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the update.
    #[instrument(skip(self, account))]
    pub async fn update(&self, account_code: &str, account: &Account) -> Result<Account> {
        let path = format!("accounts/{}", segment(account_code)?);
        let request = Request::new(Method::Put, path).with_body(body(account)?);
        self.client.fetch(request).await
    }

    /// Closes an account, canceling its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn close(&self, account_code: &str) -> Result<()> {
        let path = format!("accounts/{}", segment(account_code)?);
        self.client.send_empty(Request::new(Method::Delete, path)).await
    }

    /// Reopens a closed account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn reopen(&self, account_code: &str) -> Result<Account> {
        let path = format!("accounts/{}/reopen", segment(account_code)?);
        self.client.fetch(Request::new(Method::Put, path)).await
    }
}
