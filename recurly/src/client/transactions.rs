//! Transaction endpoints.

use tracing::instrument;

use super::{Client, Page, Params, body, segment};
use crate::{
    error::Result,
    models::Transaction,
    transport::{Method, Request, Transport},
};

/// Transaction operations, obtained from [`Client::transactions`].
#[derive(Debug)]
pub struct Transactions<'a, T: Transport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Transactions<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Lists transactions across all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &Params) -> Result<Page<Transaction>> {
        let request = Request::new(Method::Get, "transactions").with_query(params.to_query());
        self.client.fetch_page(request, "transactions").await
    }

    /// Lists an account's transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_account(
        &self,
        account_code: &str,
        params: &Params,
    ) -> Result<Page<Transaction>> {
        let path = format!("accounts/{}/transactions", segment(account_code)?);
        let request = Request::new(Method::Get, path).with_query(params.to_query());
        self.client.fetch_page(request, "transactions").await
    }

    /// Looks up a transaction; `None` if it does not exist.
    ///
    /// The embedded account reflects the account at the time of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get(&self, uuid: &str) -> Result<Option<Transaction>> {
        let path = format!("transactions/{}", segment(uuid)?);
        self.client.fetch_optional(Request::new(Method::Get, path)).await
    }

    /// Charges an account immediately, creating the invoice in the same call.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Api`](crate::RecurlyError::Api) if the payment is
    /// declined or the request is invalid.
    #[instrument(skip(self, transaction), fields(amount_in_cents = transaction.amount_in_cents))]
    pub async fn create(&self, transaction: &Transaction) -> Result<Transaction> {
        let request = Request::new(Method::Post, "transactions").with_body(body(transaction)?);
        self.client.fetch(request).await
    }
}
