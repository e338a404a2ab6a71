//! Subscriptions and the request documents used to create and change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::Account,
    xml::{self, Element, FromXml, Href, Nullable, ToXml, XmlElement, XmlWriter},
};

/// Valid for the current time, including trials.
pub const SUBSCRIPTION_STATE_ACTIVE: &str = "active";
/// Valid for the current time but will not renew.
pub const SUBSCRIPTION_STATE_CANCELED: &str = "canceled";
/// No longer valid.
pub const SUBSCRIPTION_STATE_EXPIRED: &str = "expired";
/// Starts in the future.
pub const SUBSCRIPTION_STATE_FUTURE: &str = "future";
/// Active or canceled and inside a trial period (list filter).
pub const SUBSCRIPTION_STATE_IN_TRIAL: &str = "in_trial";
/// Every subscription that is not expired (list filter).
pub const SUBSCRIPTION_STATE_LIVE: &str = "live";
/// Active or canceled with a past-due invoice (list filter).
pub const SUBSCRIPTION_STATE_PAST_DUE: &str = "past_due";

/// Apply a change immediately.
pub const TIMEFRAME_NOW: &str = "now";
/// Apply a change at the next renewal.
pub const TIMEFRAME_RENEWAL: &str = "renewal";

/// A subscription as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subscription {
    /// Link to the owning account (read-only).
    pub account: Href,
    /// Link to the invoice that opened the subscription (read-only).
    pub invoice: Href,
    /// Plan summary.
    pub plan: NestedPlan,
    /// Unique identifier (read-only).
    pub uuid: String,
    /// Lifecycle state (read-only).
    pub state: String,
    /// Price per unit.
    pub unit_amount_in_cents: i64,
    /// ISO 4217 currency code, always sent.
    pub currency: String,
    /// Number of plan units.
    pub quantity: i64,
    /// Activation time (read-only).
    pub activated_at: Nullable<DateTime<Utc>>,
    /// Cancellation time (read-only).
    pub canceled_at: Nullable<DateTime<Utc>>,
    /// Expiration time (read-only).
    pub expires_at: Nullable<DateTime<Utc>>,
    /// Start of the current billing period (read-only).
    pub current_period_started_at: Nullable<DateTime<Utc>>,
    /// End of the current billing period (read-only).
    pub current_period_ends_at: Nullable<DateTime<Utc>>,
    /// Trial start (read-only).
    pub trial_started_at: Nullable<DateTime<Utc>>,
    /// Trial end.
    pub trial_ends_at: Nullable<DateTime<Utc>>,
    /// Tax charged per period (read-only).
    pub tax_in_cents: i64,
    /// Tax type (read-only).
    pub tax_type: String,
    /// Tax region (read-only).
    pub tax_region: String,
    /// Tax rate (read-only).
    pub tax_rate: Nullable<f64>,
    /// Purchase order number.
    pub po_number: String,
    /// Payment terms in days for manual collection.
    pub net_terms: Nullable<i64>,
    /// `automatic` or `manual`.
    pub collection_method: String,
    /// Add-ons attached to the subscription.
    pub subscription_add_ons: Vec<SubscriptionAddOn>,
}

impl XmlElement for Subscription {
    const NAME: &'static str = "subscription";
}

impl FromXml for Subscription {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            account: el.href("account"),
            invoice: el.href("invoice"),
            plan: xml::nested_or_default(el, "plan")?,
            uuid: el.string("uuid"),
            state: el.string("state"),
            unit_amount_in_cents: el.field("unit_amount_in_cents")?,
            currency: el.string("currency"),
            quantity: el.field("quantity")?,
            activated_at: el.nullable("activated_at")?,
            canceled_at: el.nullable("canceled_at")?,
            expires_at: el.nullable("expires_at")?,
            current_period_started_at: el.nullable("current_period_started_at")?,
            current_period_ends_at: el.nullable("current_period_ends_at")?,
            trial_started_at: el.nullable("trial_started_at")?,
            trial_ends_at: el.nullable("trial_ends_at")?,
            tax_in_cents: el.field("tax_in_cents")?,
            tax_type: el.string("tax_type"),
            tax_region: el.string("tax_region"),
            tax_rate: el.nullable("tax_rate")?,
            po_number: el.string("po_number"),
            net_terms: el.nullable("net_terms")?,
            collection_method: el.string("collection_method"),
            subscription_add_ons: xml::nested_list(el, "subscription_add_ons")?,
        })
    }
}

impl ToXml for Subscription {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        if self.plan != NestedPlan::default() {
            w.entity(&self.plan)?;
        }
        w.optional("unit_amount_in_cents", &self.unit_amount_in_cents)?;
        w.required("currency", &self.currency)?;
        w.optional("quantity", &self.quantity)?;
        w.nullable("trial_ends_at", &self.trial_ends_at)?;
        w.optional("po_number", &self.po_number)?;
        w.nullable("net_terms", &self.net_terms)?;
        w.optional("collection_method", &self.collection_method)?;
        if !self.subscription_add_ons.is_empty() {
            w.list("subscription_add_ons", &self.subscription_add_ons)?;
        }
        Ok(())
    }
}

impl Subscription {
    /// Account code taken from the account link.
    #[must_use]
    pub fn account_code(&self) -> &str {
        self.account.code()
    }

    /// Invoice number taken from the invoice link, if numeric.
    #[must_use]
    pub fn invoice_number(&self) -> Option<i64> {
        self.invoice.number()
    }

    /// Builds an update request pre-filled with the fields `policy` carries forward.
    ///
    /// The API resets omitted fields on update (net terms fall back to zero, add-ons
    /// are removed), so the listed fields are copied from the current subscription.
    /// Adjust the returned value before sending it.
    #[must_use]
    pub fn make_update(&self, policy: &UpdatePolicy) -> UpdateSubscription {
        let mut update = UpdateSubscription::default();
        for field in &policy.carry_forward {
            match field {
                CarriedField::NetTerms => update.net_terms = self.net_terms,
                CarriedField::SubscriptionAddOns => {
                    update.subscription_add_ons = Some(self.subscription_add_ons.clone());
                }
                CarriedField::PoNumber => update.po_number.clone_from(&self.po_number),
                CarriedField::CollectionMethod => {
                    update.collection_method.clone_from(&self.collection_method);
                }
                CarriedField::Quantity => update.quantity = self.quantity,
                CarriedField::UnitAmountInCents => {
                    update.unit_amount_in_cents = self.unit_amount_in_cents;
                }
            }
        }
        update
    }
}

/// Plan code and name embedded in a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NestedPlan {
    /// Plan code.
    pub code: String,
    /// Plan display name.
    pub name: String,
}

impl XmlElement for NestedPlan {
    const NAME: &'static str = "plan";
}

impl FromXml for NestedPlan {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self { code: el.string("plan_code"), name: el.string("name") })
    }
}

impl ToXml for NestedPlan {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("plan_code", &self.code)?;
        w.optional("name", &self.name)
    }
}

/// An add-on attached to a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionAddOn {
    /// `fixed` or `usage`.
    pub add_on_type: String,
    /// Add-on code, always sent.
    pub add_on_code: String,
    /// Price per unit, always sent.
    pub unit_amount_in_cents: i64,
    /// Number of units.
    pub quantity: i64,
}

impl XmlElement for SubscriptionAddOn {
    const NAME: &'static str = "subscription_add_on";
}

impl FromXml for SubscriptionAddOn {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            add_on_type: el.string("add_on_type"),
            add_on_code: el.string("add_on_code"),
            unit_amount_in_cents: el.field("unit_amount_in_cents")?,
            quantity: el.field("quantity")?,
        })
    }
}

impl ToXml for SubscriptionAddOn {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("add_on_type", &self.add_on_type)?;
        w.required("add_on_code", &self.add_on_code)?;
        w.required("unit_amount_in_cents", &self.unit_amount_in_cents)?;
        w.optional("quantity", &self.quantity)
    }
}

/// Request document for creating a subscription.
///
/// `plan_code`, `account` and `currency` are always sent. The account may be an
/// existing one (only `account_code` set) or a full new account with billing info.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSubscription {
    /// Plan to subscribe to.
    pub plan_code: String,
    /// Subscriber account.
    pub account: Account,
    /// Add-ons; `Some(vec![])` sends an empty list, `None` omits it.
    pub subscription_add_ons: Option<Vec<SubscriptionAddOn>>,
    /// Coupon to redeem.
    pub coupon_code: String,
    /// Price override per unit.
    pub unit_amount_in_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Number of plan units.
    pub quantity: i64,
    /// Trial end override.
    pub trial_ends_at: Nullable<DateTime<Utc>>,
    /// Deferred start.
    pub starts_at: Nullable<DateTime<Utc>>,
    /// Number of billing cycles before expiry.
    pub total_billing_cycles: i64,
    /// First renewal date override.
    pub first_renewal_date: Nullable<DateTime<Utc>>,
    /// `automatic` or `manual`.
    pub collection_method: String,
    /// Payment terms in days.
    pub net_terms: Nullable<i64>,
    /// Purchase order number.
    pub po_number: String,
    /// Allow multiple subscriptions to the same plan.
    pub bulk: bool,
    /// Invoice terms and conditions.
    pub terms_and_conditions: String,
    /// Invoice customer notes.
    pub customer_notes: String,
    /// VAT reverse charge notes.
    pub vat_reverse_charge_notes: String,
    /// Time the customer authorized a bank account debit.
    pub bank_account_authorized_at: Nullable<DateTime<Utc>>,
}

impl XmlElement for NewSubscription {
    const NAME: &'static str = "subscription";
}

impl ToXml for NewSubscription {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.required("plan_code", &self.plan_code)?;
        w.entity(&self.account)?;
        if let Some(add_ons) = &self.subscription_add_ons {
            w.list("subscription_add_ons", add_ons)?;
        }
        w.optional("coupon_code", &self.coupon_code)?;
        w.optional("unit_amount_in_cents", &self.unit_amount_in_cents)?;
        w.required("currency", &self.currency)?;
        w.optional("quantity", &self.quantity)?;
        w.nullable("trial_ends_at", &self.trial_ends_at)?;
        w.nullable("starts_at", &self.starts_at)?;
        w.optional("total_billing_cycles", &self.total_billing_cycles)?;
        w.nullable("first_renewal_date", &self.first_renewal_date)?;
        w.optional("collection_method", &self.collection_method)?;
        w.nullable("net_terms", &self.net_terms)?;
        w.optional("po_number", &self.po_number)?;
        w.optional("bulk", &self.bulk)?;
        w.optional("terms_and_conditions", &self.terms_and_conditions)?;
        w.optional("customer_notes", &self.customer_notes)?;
        w.optional("vat_reverse_charge_notes", &self.vat_reverse_charge_notes)?;
        w.nullable("bank_account_authorized_at", &self.bank_account_authorized_at)
    }
}

/// Request document for changing a subscription.
///
/// Fields left at their default are omitted, which the API treats as "reset" for
/// net terms and add-ons. Use [`Subscription::make_update`] to start from the values
/// that must be preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubscription {
    /// [`TIMEFRAME_NOW`] or [`TIMEFRAME_RENEWAL`].
    pub timeframe: String,
    /// New plan.
    pub plan_code: String,
    /// New quantity.
    pub quantity: i64,
    /// New price per unit.
    pub unit_amount_in_cents: i64,
    /// `automatic` or `manual`.
    pub collection_method: String,
    /// Payment terms in days.
    pub net_terms: Nullable<i64>,
    /// Purchase order number.
    pub po_number: String,
    /// Replacement add-on list; `None` omits it.
    pub subscription_add_ons: Option<Vec<SubscriptionAddOn>>,
}

impl XmlElement for UpdateSubscription {
    const NAME: &'static str = "subscription";
}

impl ToXml for UpdateSubscription {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("timeframe", &self.timeframe)?;
        w.optional("plan_code", &self.plan_code)?;
        w.optional("quantity", &self.quantity)?;
        w.optional("unit_amount_in_cents", &self.unit_amount_in_cents)?;
        w.optional("collection_method", &self.collection_method)?;
        w.nullable("net_terms", &self.net_terms)?;
        w.optional("po_number", &self.po_number)?;
        if let Some(add_ons) = &self.subscription_add_ons {
            w.list("subscription_add_ons", add_ons)?;
        }
        Ok(())
    }
}

/// Request document for a subscription's invoice notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionNotes {
    /// Terms and conditions.
    pub terms_and_conditions: String,
    /// Customer notes.
    pub customer_notes: String,
    /// VAT reverse charge notes.
    pub vat_reverse_charge_notes: String,
}

impl XmlElement for SubscriptionNotes {
    const NAME: &'static str = "subscription";
}

impl ToXml for SubscriptionNotes {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("terms_and_conditions", &self.terms_and_conditions)?;
        w.optional("customer_notes", &self.customer_notes)?;
        w.optional("vat_reverse_charge_notes", &self.vat_reverse_charge_notes)
    }
}

/// A subscription field that [`Subscription::make_update`] can copy forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarriedField {
    /// `net_terms`
    NetTerms,
    /// `subscription_add_ons`
    SubscriptionAddOns,
    /// `po_number`
    PoNumber,
    /// `collection_method`
    CollectionMethod,
    /// `quantity`
    Quantity,
    /// `unit_amount_in_cents`
    UnitAmountInCents,
}

/// Which fields survive a subscription update unless the caller changes them.
///
/// # Examples
///
/// ```
/// use recurly::models::{CarriedField, UpdatePolicy};
///
/// let policy: UpdatePolicy = toml::from_str(r#"carry_forward = ["net_terms", "po_number"]"#)?;
/// assert_eq!(policy.carry_forward, vec![CarriedField::NetTerms, CarriedField::PoNumber]);
/// assert_eq!(
///     UpdatePolicy::default().carry_forward,
///     vec![CarriedField::NetTerms, CarriedField::SubscriptionAddOns]
/// );
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePolicy {
    /// Fields copied from the current subscription.
    pub carry_forward: Vec<CarriedField>,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self { carry_forward: vec![CarriedField::NetTerms, CarriedField::SubscriptionAddOns] }
    }
}

impl UpdatePolicy {
    /// A policy that carries nothing forward.
    #[must_use]
    pub const fn none() -> Self {
        Self { carry_forward: Vec::new() }
    }
}
