//! Invoice endpoints.

use tracing::instrument;

use super::{Client, Page, Params, body, segment};
use crate::{
    error::Result,
    models::Invoice,
    transport::{Method, Request, Transport},
};

/// Language used for PDFs when none is given.
pub const DEFAULT_PDF_LANGUAGE: &str = "English";

/// Invoice operations, obtained from [`Client::invoices`].
#[derive(Debug)]
pub struct Invoices<'a, T: Transport> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Invoices<'a, T> {
    pub(crate) const fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Lists invoices across all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &Params) -> Result<Page<Invoice>> {
        let request = Request::new(Method::Get, "invoices").with_query(params.to_query());
        self.client.fetch_page(request, "invoices").await
    }

    /// Lists an account's invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_account(&self, account_code: &str, params: &Params) -> Result<Page<Invoice>> {
        let path = format!("accounts/{}/invoices", segment(account_code)?);
        let request = Request::new(Method::Get, path).with_query(params.to_query());
        self.client.fetch_page(request, "invoices").await
    }

    /// Looks up an invoice by number; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get(&self, invoice_number: i64) -> Result<Option<Invoice>> {
        let path = format!("invoices/{invoice_number}");
        self.client.fetch_optional(Request::new(Method::Get, path)).await
    }

    /// Downloads the invoice as PDF.
    ///
    /// `language` selects the document language (`English`, `French`, ...); an empty
    /// string means [`DEFAULT_PDF_LANGUAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn get_pdf(&self, invoice_number: i64, language: &str) -> Result<Vec<u8>> {
        let language = if language.is_empty() { DEFAULT_PDF_LANGUAGE } else { language };
        let request = Request::new(Method::Get, format!("invoices/{invoice_number}"))
            .with_header("Accept", "application/pdf")
            .with_header("Accept-Language", language);
        let response = self.client.execute(request).await?;
        Ok(response.body)
    }

    /// Previews the invoice that would be created for an account's pending charges.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or there is nothing to invoice.
    #[instrument(skip(self))]
    pub async fn preview(&self, account_code: &str) -> Result<Invoice> {
        let path = format!("accounts/{}/invoices/preview", segment(account_code)?);
        self.client.fetch(Request::new(Method::Post, path)).await
    }

    /// Invoices an account's pending charges.
    ///
    /// Only the invoice's notes and collection terms are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or there is nothing to invoice.
    #[instrument(skip(self, invoice))]
    pub async fn create(&self, account_code: &str, invoice: &Invoice) -> Result<Invoice> {
        let path = format!("accounts/{}/invoices", segment(account_code)?);
        let request = Request::new(Method::Post, path).with_body(body(invoice)?);
        self.client.fetch(request).await
    }

    /// Marks a manual invoice as paid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, invoice_number: i64) -> Result<Invoice> {
        let path = format!("invoices/{invoice_number}/mark_successful");
        self.client.fetch(Request::new(Method::Put, path)).await
    }

    /// Marks a manual invoice as failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn mark_failed(&self, invoice_number: i64) -> Result<Invoice> {
        let path = format!("invoices/{invoice_number}/mark_failed");
        self.client.fetch(Request::new(Method::Put, path)).await
    }
}
