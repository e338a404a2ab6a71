//! Adjustments: the charge and credit line items of an invoice.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::Result,
    xml::{Element, FromXml, Href, Nullable, ToXml, XmlElement, XmlWriter},
};

/// Variant of a line item, selected by the element's `type` attribute.
///
/// Only [`AdjustmentKind::Credit`] carries credit-specific data; decoding a charge
/// never fills it in, even when the document contains credit-only elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// No `type` attribute.
    #[default]
    Unspecified,
    /// `type="charge"`.
    Charge,
    /// `type="credit"`.
    Credit(CreditDetails),
    /// Any other `type` value, kept verbatim.
    Unrecognized {
        /// Raw attribute value.
        value: String,
    },
}

impl AdjustmentKind {
    /// Wire value of the `type` attribute, `None` when unspecified.
    #[must_use]
    pub fn as_type(&self) -> Option<&str> {
        match self {
            Self::Unspecified => None,
            Self::Charge => Some("charge"),
            Self::Credit(_) => Some("credit"),
            Self::Unrecognized { value } => Some(value),
        }
    }

    /// Credit data, if this is a credit.
    #[must_use]
    pub const fn credit(&self) -> Option<&CreditDetails> {
        match self {
            Self::Credit(details) => Some(details),
            _ => None,
        }
    }
}

/// Fields that only exist on credits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreditDetails {
    /// Credit this credit was created from (read-only).
    pub original_adjustment_uuid: String,
}

/// A charge or credit on an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adjustment {
    /// Line item variant.
    #[serde(flatten)]
    pub kind: AdjustmentKind,
    /// Link to the account (read-only).
    pub account: Href,
    /// Link to the invoice (read-only).
    pub invoice: Href,
    /// Link to the originating subscription (read-only).
    pub subscription: Href,
    /// Unique identifier (read-only).
    pub uuid: String,
    /// `pending` or `invoiced` (read-only).
    pub state: String,
    /// Description shown on the invoice.
    pub description: String,
    /// Accounting code.
    pub accounting_code: String,
    /// Product code.
    pub product_code: String,
    /// Origin such as `plan`, `add_on` or `debit` (read-only).
    pub origin: String,
    /// Price per unit; negative for credits.
    pub unit_amount_in_cents: i64,
    /// Number of units.
    pub quantity: i64,
    /// Discount applied (read-only).
    pub discount_in_cents: i64,
    /// Tax applied (read-only).
    pub tax_in_cents: i64,
    /// Total after discount and tax (read-only).
    pub total_in_cents: i64,
    /// ISO 4217 currency code, always sent.
    pub currency: String,
    /// Whether tax applies (read-only).
    pub taxable: Nullable<bool>,
    /// Tax exemption flag.
    pub tax_exempt: Nullable<bool>,
    /// Tax code.
    pub tax_code: String,
    /// Service period start.
    pub start_date: Nullable<DateTime<Utc>>,
    /// Service period end.
    pub end_date: Nullable<DateTime<Utc>>,
    /// Creation time (read-only).
    pub created_at: Nullable<DateTime<Utc>>,
}

impl XmlElement for Adjustment {
    const NAME: &'static str = "adjustment";
}

impl FromXml for Adjustment {
    fn from_element(el: &Element) -> Result<Self> {
        let kind = match el.attr("type") {
            None => AdjustmentKind::Unspecified,
            Some("charge") => AdjustmentKind::Charge,
            Some("credit") => AdjustmentKind::Credit(CreditDetails {
                original_adjustment_uuid: el.string("original_adjustment_uuid"),
            }),
            Some(other) => AdjustmentKind::Unrecognized { value: other.to_owned() },
        };

        Ok(Self {
            kind,
            account: el.href("account"),
            invoice: el.href("invoice"),
            subscription: el.href("subscription"),
            uuid: el.string("uuid"),
            state: el.string("state"),
            description: el.string("description"),
            accounting_code: el.string("accounting_code"),
            product_code: el.string("product_code"),
            origin: el.string("origin"),
            unit_amount_in_cents: el.field("unit_amount_in_cents")?,
            quantity: el.field("quantity")?,
            discount_in_cents: el.field("discount_in_cents")?,
            tax_in_cents: el.field("tax_in_cents")?,
            total_in_cents: el.field("total_in_cents")?,
            currency: el.string("currency"),
            taxable: el.nullable("taxable")?,
            tax_exempt: el.nullable("tax_exempt")?,
            tax_code: el.string("tax_code"),
            start_date: el.nullable("start_date")?,
            end_date: el.nullable("end_date")?,
            created_at: el.nullable("created_at")?,
        })
    }
}

impl ToXml for Adjustment {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("description", &self.description)?;
        w.optional("accounting_code", &self.accounting_code)?;
        w.optional("product_code", &self.product_code)?;
        w.optional("unit_amount_in_cents", &self.unit_amount_in_cents)?;
        w.optional("quantity", &self.quantity)?;
        w.required("currency", &self.currency)?;
        w.nullable("tax_exempt", &self.tax_exempt)?;
        w.optional("tax_code", &self.tax_code)?;
        w.nullable("start_date", &self.start_date)?;
        w.nullable("end_date", &self.end_date)
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        self.kind.as_type().map(|ty| vec![("type", ty.to_owned())]).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    fn adjustment_xml(type_attr: &str) -> String {
        format!(
            r#"<adjustment href="https://x.recurly.com/v2/adjustments/626db1"{type_attr}>
                <account href="https://x.recurly.com/v2/accounts/100"/>
                <uuid>626db1</uuid>
                <description>One-time Charged Fee</description>
                <unit_amount_in_cents type="integer">2000</unit_amount_in_cents>
                <quantity type="integer">1</quantity>
                <original_adjustment_uuid>2cc95aa62517e56d5bec3a48afa1b3b9</original_adjustment_uuid>
                <total_in_cents type="integer">2180</total_in_cents>
                <currency>USD</currency>
                <end_date nil="nil"/>
            </adjustment>"#
        )
    }

    fn decode(type_attr: &str) -> Adjustment {
        xml::decode(adjustment_xml(type_attr).as_bytes()).unwrap()
    }

    #[test]
    fn test_charge_never_populates_credit_fields() {
        let adj = decode(r#" type="charge""#);
        assert_eq!(adj.kind, AdjustmentKind::Charge);
        assert!(adj.kind.credit().is_none());
        assert_eq!(adj.total_in_cents, 2180);
        assert_eq!(adj.account.code(), "100");
    }

    #[test]
    fn test_missing_type_is_unspecified() {
        let adj = decode("");
        assert_eq!(adj.kind, AdjustmentKind::Unspecified);
        assert!(adj.kind.credit().is_none());
        assert_eq!(adj.description, "One-time Charged Fee");
    }

    #[test]
    fn test_credit_populates_credit_fields() {
        let adj = decode(r#" type="credit""#);
        assert_eq!(
            adj.kind.credit().map(|c| c.original_adjustment_uuid.as_str()),
            Some("2cc95aa62517e56d5bec3a48afa1b3b9")
        );
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let adj = decode(r#" type="gift_card""#);
        assert_eq!(adj.kind, AdjustmentKind::Unrecognized { value: "gift_card".to_owned() });
        assert_eq!(adj.unit_amount_in_cents, 2000);
    }

    #[test]
    fn test_encode_keeps_discriminator() {
        let adj = decode(r#" type="credit""#);
        let text = String::from_utf8(xml::encode(&adj).unwrap()).unwrap();
        assert!(text.contains(r#"<adjustment type="credit">"#));
        assert!(!text.contains("original_adjustment_uuid"));
        assert!(!text.contains("total_in_cents"));
        assert!(text.contains(r#"<end_date nil="nil"></end_date>"#));

        let back: Adjustment = xml::decode(text.as_bytes()).unwrap();
        assert_eq!(back.kind, AdjustmentKind::Credit(CreditDetails::default()));
        assert_eq!(back.unit_amount_in_cents, 2000);
        assert!(back.end_date.is_null());
    }

    #[test]
    fn test_unspecified_has_no_type_attribute() {
        let adj = Adjustment { currency: "USD".to_owned(), ..Adjustment::default() };
        let text = String::from_utf8(xml::encode(&adj).unwrap()).unwrap();
        assert!(text.ends_with("<adjustment><currency>USD</currency></adjustment>"));
    }
}
