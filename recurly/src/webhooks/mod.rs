//! Inbound webhook notifications.
//!
//! A webhook body is an anonymous XML document whose root element names the event
//! (`<new_subscription_notification>`, `<failed_payment_notification>`, ...).
//! [`parse_notification`] reads the root name, looks it up in a fixed registry and
//! decodes the matching payload shape.
//!
//! # Examples
//!
//! ```
//! use recurly::webhooks::{Notification, parse_notification};
//!
//! let body = br#"<?xml version="1.0" encoding="UTF-8"?>
//! <successful_payment_notification>
//!   <account><account_code>1</account_code></account>
//!   <transaction>
//!     <id>a5143c1d3a6f4a8287d0e2cc1d4c0427</id>
//!     <amount_in_cents type="integer">1000</amount_in_cents>
//!     <status>success</status>
//!   </transaction>
//! </successful_payment_notification>"#;
//!
//! match parse_notification(body.as_slice())? {
//!     Notification::SuccessfulPayment(payment) => {
//!         assert_eq!(payment.transaction.amount_in_cents, 1000);
//!     }
//!     other => panic!("unexpected notification: {other:?}"),
//! }
//! # Ok::<(), recurly::RecurlyError>(())
//! ```

mod models;

use std::{fmt, io::Read};

use serde::Serialize;
use tracing::debug;

pub use self::models::{
    Account, InvoiceNotification, PaymentNotification, SubscriptionNotification, Transaction,
};
use crate::{
    error::{RecurlyError, Result},
    xml::Element,
};

/// A decoded webhook notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// `new_subscription_notification`
    NewSubscription(SubscriptionNotification),
    /// `updated_subscription_notification`
    UpdatedSubscription(SubscriptionNotification),
    /// `renewed_subscription_notification`
    RenewedSubscription(SubscriptionNotification),
    /// `expired_subscription_notification`
    ExpiredSubscription(SubscriptionNotification),
    /// `canceled_subscription_notification`
    CanceledSubscription(SubscriptionNotification),
    /// `new_invoice_notification`
    NewInvoice(InvoiceNotification),
    /// `past_due_invoice_notification`
    PastDueInvoice(InvoiceNotification),
    /// `successful_payment_notification`
    SuccessfulPayment(PaymentNotification),
    /// `failed_payment_notification`
    FailedPayment(PaymentNotification),
    /// `void_payment_notification`
    VoidPayment(PaymentNotification),
    /// `successful_refund_notification`
    SuccessfulRefund(PaymentNotification),
}

impl Notification {
    /// Registry entry this notification was decoded from.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::NewSubscription(_) => NotificationKind::NewSubscription,
            Self::UpdatedSubscription(_) => NotificationKind::UpdatedSubscription,
            Self::RenewedSubscription(_) => NotificationKind::RenewedSubscription,
            Self::ExpiredSubscription(_) => NotificationKind::ExpiredSubscription,
            Self::CanceledSubscription(_) => NotificationKind::CanceledSubscription,
            Self::NewInvoice(_) => NotificationKind::NewInvoice,
            Self::PastDueInvoice(_) => NotificationKind::PastDueInvoice,
            Self::SuccessfulPayment(_) => NotificationKind::SuccessfulPayment,
            Self::FailedPayment(_) => NotificationKind::FailedPayment,
            Self::VoidPayment(_) => NotificationKind::VoidPayment,
            Self::SuccessfulRefund(_) => NotificationKind::SuccessfulRefund,
        }
    }
}

/// Names of the notifications this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A subscription was created.
    NewSubscription,
    /// A subscription was upgraded or downgraded.
    UpdatedSubscription,
    /// A subscription renewed.
    RenewedSubscription,
    /// A subscription is no longer valid.
    ExpiredSubscription,
    /// A subscription was canceled.
    CanceledSubscription,
    /// An invoice was generated.
    NewInvoice,
    /// An invoice is past due.
    PastDueInvoice,
    /// A payment succeeded.
    SuccessfulPayment,
    /// A payment failed.
    FailedPayment,
    /// A successful payment was voided.
    VoidPayment,
    /// An amount was refunded.
    SuccessfulRefund,
}

impl NotificationKind {
    /// Every registered kind, in registry order.
    pub const ALL: [Self; 11] = [
        Self::NewSubscription,
        Self::UpdatedSubscription,
        Self::RenewedSubscription,
        Self::ExpiredSubscription,
        Self::CanceledSubscription,
        Self::NewInvoice,
        Self::PastDueInvoice,
        Self::SuccessfulPayment,
        Self::FailedPayment,
        Self::VoidPayment,
        Self::SuccessfulRefund,
    ];

    /// Root element name of this notification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewSubscription => "new_subscription_notification",
            Self::UpdatedSubscription => "updated_subscription_notification",
            Self::RenewedSubscription => "renewed_subscription_notification",
            Self::ExpiredSubscription => "expired_subscription_notification",
            Self::CanceledSubscription => "canceled_subscription_notification",
            Self::NewInvoice => "new_invoice_notification",
            Self::PastDueInvoice => "past_due_invoice_notification",
            Self::SuccessfulPayment => "successful_payment_notification",
            Self::FailedPayment => "failed_payment_notification",
            Self::VoidPayment => "void_payment_notification",
            Self::SuccessfulRefund => "successful_refund_notification",
        }
    }

    /// Looks up a root element name in the registry.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.iter().find(|(kind, _)| kind.as_str() == name).map(|(kind, _)| *kind)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload decoder plus the variant that wraps its result.
#[derive(Clone, Copy)]
enum Constructor {
    Subscription(fn(SubscriptionNotification) -> Notification),
    Invoice(fn(InvoiceNotification) -> Notification),
    Payment(fn(PaymentNotification) -> Notification),
}

impl Constructor {
    fn build(self, root: &Element) -> Result<Notification> {
        match self {
            Self::Subscription(wrap) => SubscriptionNotification::from_element(root).map(wrap),
            Self::Invoice(wrap) => InvoiceNotification::from_element(root).map(wrap),
            Self::Payment(wrap) => PaymentNotification::from_element(root).map(wrap),
        }
    }
}

static REGISTRY: [(NotificationKind, Constructor); 11] = [
    (NotificationKind::NewSubscription, Constructor::Subscription(Notification::NewSubscription)),
    (
        NotificationKind::UpdatedSubscription,
        Constructor::Subscription(Notification::UpdatedSubscription),
    ),
    (
        NotificationKind::RenewedSubscription,
        Constructor::Subscription(Notification::RenewedSubscription),
    ),
    (
        NotificationKind::ExpiredSubscription,
        Constructor::Subscription(Notification::ExpiredSubscription),
    ),
    (
        NotificationKind::CanceledSubscription,
        Constructor::Subscription(Notification::CanceledSubscription),
    ),
    (NotificationKind::NewInvoice, Constructor::Invoice(Notification::NewInvoice)),
    (NotificationKind::PastDueInvoice, Constructor::Invoice(Notification::PastDueInvoice)),
    (NotificationKind::SuccessfulPayment, Constructor::Payment(Notification::SuccessfulPayment)),
    (NotificationKind::FailedPayment, Constructor::Payment(Notification::FailedPayment)),
    (NotificationKind::VoidPayment, Constructor::Payment(Notification::VoidPayment)),
    (NotificationKind::SuccessfulRefund, Constructor::Payment(Notification::SuccessfulRefund)),
];

/// Reads a webhook body from `reader` and decodes it.
///
/// The stream is read to the end once, then dropped whatever the outcome.
///
/// # Errors
///
/// - [`RecurlyError::Io`] if reading fails
/// - [`RecurlyError::Parse`] if the body is not well-formed XML, whether or not
///   the root name is registered
/// - [`RecurlyError::UnknownNotification`] if the body is well-formed but the root
///   element is not registered; the error carries the exact root name
/// - [`RecurlyError::Format`] if a scalar in a registered payload is malformed
pub fn parse_notification<R: Read>(mut reader: R) -> Result<Notification> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    drop(reader);
    parse_notification_bytes(&body)
}

/// Decodes a webhook body that is already in memory.
///
/// # Errors
///
/// Same as [`parse_notification`], minus I/O failures.
pub fn parse_notification_bytes(body: &[u8]) -> Result<Notification> {
    let name = Element::sniff_root_name(body)?;
    let Some((kind, constructor)) = REGISTRY.iter().find(|(kind, _)| kind.as_str() == name)
    else {
        Element::parse(body)?;
        debug!(name = %name, "unregistered webhook notification");
        return Err(RecurlyError::UnknownNotification { name });
    };

    debug!(kind = %kind, bytes = body.len(), "decoding webhook notification");
    let root = Element::parse(body)?;
    constructor.build(&root)
}
