//! Invoices.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::Result,
    models::{Address, Adjustment, Transaction},
    xml::{self, Element, FromXml, Href, Nullable, ToXml, XmlElement, XmlWriter},
};

/// Awaiting payment.
pub const INVOICE_STATE_OPEN: &str = "open";
/// Paid in full.
pub const INVOICE_STATE_COLLECTED: &str = "collected";
/// Collection failed.
pub const INVOICE_STATE_FAILED: &str = "failed";
/// Past its due date.
pub const INVOICE_STATE_PAST_DUE: &str = "past_due";

/// An invoice with its line items and payments.
///
/// Only the notes and collection terms are writable; everything else is computed by
/// the server when the invoice is posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Invoice {
    /// Link to the account (read-only).
    pub account: Href,
    /// Billing address snapshot (read-only).
    pub address: Address,
    /// Link to the subscription (read-only).
    pub subscription: Href,
    /// Link to the invoice this one refunds (read-only).
    pub original_invoice: Href,
    /// Unique identifier (read-only).
    pub uuid: String,
    /// Lifecycle state (read-only).
    pub state: String,
    /// Prefix such as `FR` for country-specific numbering (read-only).
    pub invoice_number_prefix: String,
    /// Sequential invoice number (read-only).
    pub invoice_number: i64,
    /// Purchase order number.
    pub po_number: String,
    /// VAT number (read-only).
    pub vat_number: String,
    /// Sum of line items before tax (read-only).
    pub subtotal_in_cents: i64,
    /// Tax total (read-only).
    pub tax_in_cents: i64,
    /// Grand total (read-only).
    pub total_in_cents: i64,
    /// ISO 4217 currency code (read-only).
    pub currency: String,
    /// Creation time (read-only).
    pub created_at: Nullable<DateTime<Utc>>,
    /// Closing time (read-only).
    pub closed_at: Nullable<DateTime<Utc>>,
    /// Tax type (read-only).
    pub tax_type: String,
    /// Tax region (read-only).
    pub tax_region: String,
    /// Tax rate (read-only).
    pub tax_rate: Nullable<f64>,
    /// Payment terms in days.
    pub net_terms: Nullable<i64>,
    /// `automatic` or `manual`.
    pub collection_method: String,
    /// Terms and conditions printed on the invoice.
    pub terms_and_conditions: String,
    /// Customer notes printed on the invoice.
    pub customer_notes: String,
    /// VAT reverse charge notes.
    pub vat_reverse_charge_notes: String,
    /// Charges and credits (read-only).
    pub line_items: Vec<Adjustment>,
    /// Payments applied (read-only).
    pub transactions: Vec<Transaction>,
}

impl XmlElement for Invoice {
    const NAME: &'static str = "invoice";
}

impl FromXml for Invoice {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account: el.href("account"),
            address: xml::nested_or_default(el, "address")?,
            subscription: el.href("subscription"),
            original_invoice: el.href("original_invoice"),
            uuid: el.string("uuid"),
            state: el.string("state"),
            invoice_number_prefix: el.string("invoice_number_prefix"),
            invoice_number: el.field("invoice_number")?,
            po_number: el.string("po_number"),
            vat_number: el.string("vat_number"),
            subtotal_in_cents: el.field("subtotal_in_cents")?,
            tax_in_cents: el.field("tax_in_cents")?,
            total_in_cents: el.field("total_in_cents")?,
            currency: el.string("currency"),
            created_at: el.nullable("created_at")?,
            closed_at: el.nullable("closed_at")?,
            tax_type: el.string("tax_type"),
            tax_region: el.string("tax_region"),
            tax_rate: el.nullable("tax_rate")?,
            net_terms: el.nullable("net_terms")?,
            collection_method: el.string("collection_method"),
            terms_and_conditions: el.string("terms_and_conditions"),
            customer_notes: el.string("customer_notes"),
            vat_reverse_charge_notes: el.string("vat_reverse_charge_notes"),
            line_items: xml::nested_list(el, "line_items")?,
            transactions: xml::nested_list(el, "transactions")?,
        })
    }
}

impl ToXml for Invoice {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("po_number", &self.po_number)?;
        w.nullable("net_terms", &self.net_terms)?;
        w.optional("collection_method", &self.collection_method)?;
        w.optional("terms_and_conditions", &self.terms_and_conditions)?;
        w.optional("customer_notes", &self.customer_notes)?;
        w.optional("vat_reverse_charge_notes", &self.vat_reverse_charge_notes)
    }
}

impl Invoice {
    /// Invoice number with its prefix, as printed (`FR1005`).
    #[must_use]
    pub fn display_number(&self) -> String {
        format!("{}{}", self.invoice_number_prefix, self.invoice_number)
    }
}
