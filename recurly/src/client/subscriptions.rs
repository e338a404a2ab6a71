//! Subscription endpoints.

use tracing::instrument;

use super::{Client, Page, Params, body, segment};
use crate::{
    error::Result,
    models::{NewSubscription, Subscription, SubscriptionNotes, UpdateSubscription},
    transport::{Method, Request, Transport},
};

/// Refund applied when a subscription is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefundType {
    /// Prorated refund of the current period.
    Partial,
    /// Refund of the last charge.
    Full,
    /// No refund.
    #[default]
    None,
}

impl RefundType {
    /// Value of the `refund` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Full => "full",
            Self::None => "none",
        }
    }
}

/// Subscription operations, obtained from [`Client::subscriptions`].
#[derive(Debug)]
pub struct Subscriptions<'a, T: Transport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Subscriptions<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Lists subscriptions across all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &Params) -> Result<Page<Subscription>> {
        let request = Request::new(Method::Get, "subscriptions").with_query(params.to_query());
        self.client.fetch_page(request, "subscriptions").await
    }

    /// Lists an account's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_account(
        &self,
        account_code: &str,
        params: &Params,
    ) -> Result<Page<Subscription>> {
        let path = format!("accounts/{}/subscriptions", segment(account_code)?);
        let request = Request::new(Method::Get, path).with_query(params.to_query());
        self.client.fetch_page(request, "subscriptions").await
    }

    /// Looks up a subscription; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get(&self, uuid: &str) -> Result<Option<Subscription>> {
        let path = format!("subscriptions/{}", segment(uuid)?);
        self.client.fetch_optional(Request::new(Method::Get, path)).await
    }

    /// Creates a subscription, and the account if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Api`](crate::RecurlyError::Api) if the API rejects the
    /// subscription (declined card, unknown plan, ...).
    #[instrument(skip(self, subscription), fields(plan_code = %subscription.plan_code))]
    pub async fn create(&self, subscription: &NewSubscription) -> Result<Subscription> {
        let request = Request::new(Method::Post, "subscriptions").with_body(body(subscription)?);
        self.client.fetch(request).await
    }

    /// Builds an update request pre-filled according to the client's
    /// [`UpdatePolicy`](crate::models::UpdatePolicy).
    #[must_use]
    pub fn prepare_update(&self, subscription: &Subscription) -> UpdateSubscription {
        subscription.make_update(self.client.update_policy())
    }

    /// Changes a subscription.
    ///
    /// Omitted fields are reset by the API; start from [`Self::prepare_update`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update(&self, uuid: &str, update: &UpdateSubscription) -> Result<Subscription> {
        let path = format!("subscriptions/{}", segment(uuid)?);
        let request = Request::new(Method::Put, path).with_body(body(update)?);
        self.client.fetch(request).await
    }

    /// Replaces the notes printed on the subscription's invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the notes.
    #[instrument(skip(self, notes))]
    pub async fn update_notes(&self, uuid: &str, notes: &SubscriptionNotes) -> Result<Subscription> {
        let path = format!("subscriptions/{}/notes", segment(uuid)?);
        let request = Request::new(Method::Put, path).with_body(body(notes)?);
        self.client.fetch(request).await
    }

    /// Cancels at the end of the current period.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn cancel(&self, uuid: &str) -> Result<Subscription> {
        let path = format!("subscriptions/{}/cancel", segment(uuid)?);
        self.client.fetch(Request::new(Method::Put, path)).await
    }

    /// Reactivates a canceled subscription before it expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn reactivate(&self, uuid: &str) -> Result<Subscription> {
        let path = format!("subscriptions/{}/reactivate", segment(uuid)?);
        self.client.fetch(Request::new(Method::Put, path)).await
    }

    /// Ends a subscription immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn terminate(&self, uuid: &str, refund: RefundType) -> Result<Subscription> {
        let path = format!("subscriptions/{}/terminate", segment(uuid)?);
        let request = Request::new(Method::Put, path)
            .with_query(vec![("refund".to_owned(), refund.as_str().to_owned())]);
        self.client.fetch(request).await
    }
}
