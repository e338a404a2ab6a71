//! Typed API resources and request documents.
//!
//! Every resource implements [`FromXml`](crate::xml::FromXml) and, where the API
//! accepts it, [`ToXml`](crate::xml::ToXml). Encoding writes writable fields only:
//! links, server-assigned identifiers, computed totals, lifecycle timestamps and
//! states are dropped, so a decode → encode → decode cycle clears them.

mod account;
mod add_on;
mod adjustment;
mod api_errors;
mod invoice;
mod subscription;
mod transaction;

pub use account::{ACCOUNT_STATE_ACTIVE, ACCOUNT_STATE_CLOSED, Account, Address, Billing};
pub use add_on::{AddOn, UnitAmount};
pub use adjustment::{Adjustment, AdjustmentKind, CreditDetails};
pub use api_errors::parse_api_errors;
pub use invoice::{
    INVOICE_STATE_COLLECTED, INVOICE_STATE_FAILED, INVOICE_STATE_OPEN, INVOICE_STATE_PAST_DUE,
    Invoice,
};
pub use subscription::{
    CarriedField, NestedPlan, NewSubscription, SUBSCRIPTION_STATE_ACTIVE,
    SUBSCRIPTION_STATE_CANCELED, SUBSCRIPTION_STATE_EXPIRED, SUBSCRIPTION_STATE_FUTURE,
    SUBSCRIPTION_STATE_IN_TRIAL, SUBSCRIPTION_STATE_LIVE, SUBSCRIPTION_STATE_PAST_DUE,
    Subscription, SubscriptionAddOn, SubscriptionNotes, TIMEFRAME_NOW, TIMEFRAME_RENEWAL,
    UpdatePolicy, UpdateSubscription,
};
pub use transaction::{
    TRANSACTION_STATUS_FAILED, TRANSACTION_STATUS_SUCCESS, TRANSACTION_STATUS_VOID, Transaction,
    TransactionError, TransactionResult,
};
