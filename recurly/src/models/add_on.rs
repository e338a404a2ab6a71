//! Plan add-ons.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{RecurlyError, Result},
    xml::{Element, FromXml, Href, Nullable, Scalar, ToXml, XmlElement, XmlWriter},
};

/// Price per currency: `<unit_amount_in_cents><USD type="integer">200</USD></unit_amount_in_cents>`.
///
/// An empty or nil currency element decodes to zero, as with any other integer field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnitAmount(pub BTreeMap<String, i64>);

impl UnitAmount {
    /// Builds an amount for a single currency.
    #[must_use]
    pub fn single(currency: impl Into<String>, cents: i64) -> Self {
        Self(BTreeMap::from([(currency.into(), cents)]))
    }

    /// Amount in the given currency.
    #[must_use]
    pub fn get(&self, currency: &str) -> Option<i64> {
        self.0.get(currency).copied()
    }

    /// True when no currency is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_element(el: &Element) -> Result<Self> {
        let mut amounts = BTreeMap::new();
        for currency in el.children() {
            if currency.is_nil() || currency.text().trim().is_empty() {
                amounts.insert(currency.name().to_owned(), 0);
                continue;
            }
            let cents = i64::parse(currency.text()).ok_or_else(|| {
                RecurlyError::format(
                    format!("{}.{}", el.name(), currency.name()),
                    i64::EXPECTED,
                    currency.text(),
                )
            })?;
            amounts.insert(currency.name().to_owned(), cents);
        }
        Ok(Self(amounts))
    }

    fn write(&self, name: &str, w: &mut XmlWriter) -> Result<()> {
        w.start(name, &[])?;
        for (currency, cents) in &self.0 {
            w.required(currency, cents)?;
        }
        w.end(name)
    }
}

/// An add-on that can be attached to subscriptions of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddOn {
    /// Link to the plan (read-only).
    pub plan: Href,
    /// Add-on code, unique within the plan.
    pub add_on_code: String,
    /// Display name.
    pub name: String,
    /// Quantity preselected on hosted pages.
    pub default_quantity: Nullable<i64>,
    /// Whether hosted pages show a quantity field.
    pub display_quantity_on_hosted_page: Nullable<bool>,
    /// Tax code.
    pub tax_code: String,
    /// Accounting code.
    pub accounting_code: String,
    /// Price per unit per currency.
    pub unit_amount_in_cents: UnitAmount,
    /// Creation time (read-only).
    pub created_at: Nullable<DateTime<Utc>>,
}

impl XmlElement for AddOn {
    const NAME: &'static str = "add_on";
}

impl FromXml for AddOn {
    fn from_element(el: &Element) -> Result<Self> {
        let unit_amount_in_cents = match el.child("unit_amount_in_cents") {
            Some(amounts) => UnitAmount::from_element(amounts)?,
            None => UnitAmount::default(),
        };
        Ok(Self {
            plan: el.href("plan"),
            add_on_code: el.string("add_on_code"),
            name: el.string("name"),
            default_quantity: el.nullable("default_quantity")?,
            display_quantity_on_hosted_page: el.nullable("display_quantity_on_hosted_page")?,
            tax_code: el.string("tax_code"),
            accounting_code: el.string("accounting_code"),
            unit_amount_in_cents,
            created_at: el.nullable("created_at")?,
        })
    }
}

impl ToXml for AddOn {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("add_on_code", &self.add_on_code)?;
        w.optional("name", &self.name)?;
        w.nullable("default_quantity", &self.default_quantity)?;
        w.nullable("display_quantity_on_hosted_page", &self.display_quantity_on_hosted_page)?;
        w.optional("tax_code", &self.tax_code)?;
        w.optional("accounting_code", &self.accounting_code)?;
        if !self.unit_amount_in_cents.is_empty() {
            self.unit_amount_in_cents.write("unit_amount_in_cents", w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    const ADD_ON_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <add_on href="https://your-subdomain.recurly.com/v2/plans/gold/add_ons/ipaddresses">
            <plan href="https://your-subdomain.recurly.com/v2/plans/gold"/>
            <add_on_code>ipaddresses</add_on_code>
            <name>IP Addresses</name>
            <default_quantity type="integer">1</default_quantity>
            <display_quantity_on_hosted_page type="boolean">false</display_quantity_on_hosted_page>
            <tax_code>digital</tax_code>
            <unit_amount_in_cents>
                <USD type="integer">200</USD>
                <EUR type="integer">180</EUR>
            </unit_amount_in_cents>
            <accounting_code>abc123</accounting_code>
            <created_at type="datetime">2011-06-28T12:34:56Z</created_at>
        </add_on>"#;

    #[test]
    fn test_decode_add_on() {
        let add_on: AddOn = xml::decode(ADD_ON_XML).unwrap();
        assert_eq!(add_on.plan.code(), "gold");
        assert_eq!(add_on.add_on_code, "ipaddresses");
        assert_eq!(add_on.default_quantity, Nullable::Value(1));
        assert_eq!(add_on.display_quantity_on_hosted_page, Nullable::Value(false));
        assert_eq!(add_on.unit_amount_in_cents.get("USD"), Some(200));
        assert_eq!(add_on.unit_amount_in_cents.get("EUR"), Some(180));
        assert_eq!(add_on.unit_amount_in_cents.get("GBP"), None);
    }

    #[test]
    fn test_round_trip_clears_read_only_fields() {
        let add_on: AddOn = xml::decode(ADD_ON_XML).unwrap();
        let back: AddOn = xml::decode(&xml::encode(&add_on).unwrap()).unwrap();
        assert_eq!(
            back,
            AddOn { plan: Href::default(), created_at: Nullable::Absent, ..add_on }
        );
    }

    #[test]
    fn test_bad_currency_amount() {
        let err = xml::decode::<AddOn>(
            b"<add_on><unit_amount_in_cents><USD>ten</USD></unit_amount_in_cents></add_on>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecurlyError::Format { ref field, .. } if field == "unit_amount_in_cents.USD"
        ));
    }

    #[test]
    fn test_empty_currency_amount_is_zero() {
        let add_on: AddOn = xml::decode(
            br#"<add_on><unit_amount_in_cents>
                <USD type="integer"></USD>
                <EUR nil="nil"/>
                <GBP type="integer">150</GBP>
            </unit_amount_in_cents></add_on>"#,
        )
        .unwrap();
        assert_eq!(add_on.unit_amount_in_cents.get("USD"), Some(0));
        assert_eq!(add_on.unit_amount_in_cents.get("EUR"), Some(0));
        assert_eq!(add_on.unit_amount_in_cents.get("GBP"), Some(150));
    }

    #[test]
    fn test_single_currency() {
        let add_on = AddOn {
            add_on_code: "seats".to_owned(),
            unit_amount_in_cents: UnitAmount::single("USD", 500),
            ..AddOn::default()
        };
        let text = String::from_utf8(xml::encode(&add_on).unwrap()).unwrap();
        assert!(text.contains(
            r#"<unit_amount_in_cents><USD type="integer">500</USD></unit_amount_in_cents>"#
        ));
    }
}
