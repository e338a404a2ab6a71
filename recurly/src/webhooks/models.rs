//! Notification payloads.
//!
//! Subscription and invoice notifications embed the regular API shapes. Payment
//! notifications use a flatter account and transaction layout of their own.

use serde::Serialize;

use crate::{
    error::Result,
    models,
    xml::{self, Element, FromXml, XmlElement},
};

/// Account as sent in payment notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account code.
    pub account_code: String,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Company name.
    pub company_name: String,
    /// Phone number.
    pub phone: String,
}

impl XmlElement for Account {
    const NAME: &'static str = "account";
}

impl FromXml for Account {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account_code: el.string("account_code"),
            username: el.string("username"),
            email: el.string("email"),
            first_name: el.string("first_name"),
            last_name: el.string("last_name"),
            company_name: el.string("company_name"),
            phone: el.string("phone"),
        })
    }
}

/// Transaction as sent in payment notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction UUID.
    pub id: String,
    /// Invoice the payment applied to.
    pub invoice_number: i64,
    /// Subscription UUID, if any.
    pub subscription_id: String,
    /// `purchase`, `refund`, ...
    pub action: String,
    /// Amount charged.
    pub amount_in_cents: i64,
    /// `success`, `failed` or `void`.
    pub status: String,
    /// Gateway message.
    pub message: String,
    /// Raw gateway error codes.
    pub gateway_error_codes: String,
    /// Failure classification (`declined`, `fraud_gateway`, ...).
    pub failure_type: String,
    /// Gateway reference.
    pub reference: String,
    /// `subscription`, `transaction`, ...
    pub source: String,
    /// Processed on a test gateway.
    pub test: bool,
    /// Can still be voided.
    pub voidable: bool,
    /// Can still be refunded.
    pub refundable: bool,
}

impl XmlElement for Transaction {
    const NAME: &'static str = "transaction";
}

impl FromXml for Transaction {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            id: el.string("id"),
            invoice_number: el.field("invoice_number")?,
            subscription_id: el.string("subscription_id"),
            action: el.string("action"),
            amount_in_cents: el.field("amount_in_cents")?,
            status: el.string("status"),
            message: el.string("message"),
            gateway_error_codes: el.string("gateway_error_codes"),
            failure_type: el.string("failure_type"),
            reference: el.string("reference"),
            source: el.string("source"),
            test: el.field("test")?,
            voidable: el.field("voidable")?,
            refundable: el.field("refundable")?,
        })
    }
}

/// Payload of the subscription notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriptionNotification {
    /// Subscriber account.
    pub account: models::Account,
    /// Subscription after the event.
    pub subscription: models::Subscription,
}

impl SubscriptionNotification {
    pub(crate) fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account: xml::nested_or_default(el, "account")?,
            subscription: xml::nested_or_default(el, "subscription")?,
        })
    }
}

/// Payload of the invoice notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceNotification {
    /// Billed account.
    pub account: models::Account,
    /// Invoice after the event.
    pub invoice: models::Invoice,
}

impl InvoiceNotification {
    pub(crate) fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account: xml::nested_or_default(el, "account")?,
            invoice: xml::nested_or_default(el, "invoice")?,
        })
    }
}

/// Payload of the payment notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentNotification {
    /// Paying account.
    pub account: Account,
    /// Payment, refund or void.
    pub transaction: Transaction,
}

impl PaymentNotification {
    pub(crate) fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account: xml::nested_or_default(el, "account")?,
            transaction: xml::nested_or_default(el, "transaction")?,
        })
    }
}
