//! Plan add-on endpoints.

use tracing::instrument;

use super::{Client, Page, Params, body, segment};
use crate::{
    error::Result,
    models::AddOn,
    transport::{Method, Request, Transport},
};

/// Add-on operations, obtained from [`Client::add_ons`].
#[derive(Debug)]
pub struct AddOns<'a, T: Transport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> AddOns<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    fn path(plan_code: &str, add_on_code: Option<&str>) -> Result<String> {
        let plan = segment(plan_code)?;
        Ok(match add_on_code {
            Some(code) => format!("plans/{plan}/add_ons/{}", segment(code)?),
            None => format!("plans/{plan}/add_ons"),
        })
    }

    /// Lists a plan's add-ons.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, plan_code: &str, params: &Params) -> Result<Page<AddOn>> {
        let request =
            Request::new(Method::Get, Self::path(plan_code, None)?).with_query(params.to_query());
        self.client.fetch_page(request, "add_ons").await
    }

    /// Looks up an add-on; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get(&self, plan_code: &str, add_on_code: &str) -> Result<Option<AddOn>> {
        let request = Request::new(Method::Get, Self::path(plan_code, Some(add_on_code))?);
        self.client.fetch_optional(request).await
    }

    /// Adds an add-on to a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the add-on.
    #[instrument(skip(self, add_on), fields(add_on_code = %add_on.add_on_code))]
    pub async fn create(&self, plan_code: &str, add_on: &AddOn) -> Result<AddOn> {
        let request =
            Request::new(Method::Post, Self::path(plan_code, None)?).with_body(body(add_on)?);
        self.client.fetch(request).await
    }

    /// Updates an add-on's pricing or description.
    ///
    /// Existing subscribers keep their current price.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the update.
    #[instrument(skip(self, add_on))]
    pub async fn update(&self, plan_code: &str, add_on_code: &str, add_on: &AddOn) -> Result<AddOn> {
        let request = Request::new(Method::Put, Self::path(plan_code, Some(add_on_code))?)
            .with_body(body(add_on)?);
        self.client.fetch(request).await
    }

    /// Removes an add-on from a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn delete(&self, plan_code: &str, add_on_code: &str) -> Result<()> {
        let request = Request::new(Method::Delete, Self::path(plan_code, Some(add_on_code))?);
        self.client.send_empty(request).await
    }
}
