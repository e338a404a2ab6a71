//! Accounts, postal addresses and billing information.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::Result,
    xml::{self, Element, FromXml, Nullable, ToXml, XmlElement, XmlWriter},
};

/// Account state reported by the API.
pub const ACCOUNT_STATE_ACTIVE: &str = "active";
/// Account state after the account is closed.
pub const ACCOUNT_STATE_CLOSED: &str = "closed";

/// A customer account.
///
/// `state`, `hosted_login_token`, `created_at` and `closed_at` are assigned by the
/// server and never sent back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Account {
    /// Unique account code chosen by the merchant.
    pub account_code: String,
    /// Account state (read-only).
    pub state: String,
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
    /// VAT number.
    pub vat_number: String,
    /// Preferred language for emails (`en-US`, ...).
    pub accept_language: String,
    /// Comma-separated additional email recipients.
    pub cc_emails: String,
    /// Tax exemption flag.
    pub tax_exempt: Nullable<bool>,
    /// Postal address.
    pub address: Address,
    /// Token for the hosted account management page (read-only).
    pub hosted_login_token: String,
    /// Billing information, when the document carried it.
    pub billing_info: Option<Billing>,
    /// Creation time (read-only).
    pub created_at: Nullable<DateTime<Utc>>,
    /// Closing time (read-only).
    pub closed_at: Nullable<DateTime<Utc>>,
}

impl XmlElement for Account {
    const NAME: &'static str = "account";
}

impl FromXml for Account {
    fn from_element(el: &Element) -> Result<Self> {
        // Transaction details carry `company` instead of `company_name`.
        let company_name = match el.child("company_name") {
            Some(_) => el.string("company_name"),
            None => el.string("company"),
        };
        Ok(Self {
            account_code: el.string("account_code"),
            state: el.string("state"),
            username: el.string("username"),
            email: el.string("email"),
            first_name: el.string("first_name"),
            last_name: el.string("last_name"),
            company_name,
            vat_number: el.string("vat_number"),
            accept_language: el.string("accept_language"),
            cc_emails: el.string("cc_emails"),
            tax_exempt: el.nullable("tax_exempt")?,
            address: xml::nested_or_default(el, "address")?,
            hosted_login_token: el.string("hosted_login_token"),
            billing_info: xml::nested(el, "billing_info")?,
            created_at: el.nullable("created_at")?,
            closed_at: el.nullable("closed_at")?,
        })
    }
}

impl ToXml for Account {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("account_code", &self.account_code)?;
        w.optional("username", &self.username)?;
        w.optional("email", &self.email)?;
        w.optional("first_name", &self.first_name)?;
        w.optional("last_name", &self.last_name)?;
        w.optional("company_name", &self.company_name)?;
        w.optional("vat_number", &self.vat_number)?;
        w.optional("accept_language", &self.accept_language)?;
        w.optional("cc_emails", &self.cc_emails)?;
        w.nullable("tax_exempt", &self.tax_exempt)?;
        if self.address != Address::default() {
            w.entity(&self.address)?;
        }
        if let Some(billing) = &self.billing_info {
            w.entity(billing)?;
        }
        Ok(())
    }
}

impl Account {
    /// Returns true once the account has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ACCOUNT_STATE_CLOSED
    }
}

/// Postal address attached to accounts and invoices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    /// First address line.
    pub address1: String,
    /// Second address line.
    pub address2: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// ISO 3166 country code.
    pub country: String,
    /// Phone number.
    pub phone: String,
}

impl XmlElement for Address {
    const NAME: &'static str = "address";
}

impl FromXml for Address {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            address1: el.string("address1"),
            address2: el.string("address2"),
            city: el.string("city"),
            state: el.string("state"),
            zip: el.string("zip"),
            country: el.string("country"),
            phone: el.string("phone"),
        })
    }
}

impl ToXml for Address {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        w.optional("address1", &self.address1)?;
        w.optional("address2", &self.address2)?;
        w.optional("city", &self.city)?;
        w.optional("state", &self.state)?;
        w.optional("zip", &self.zip)?;
        w.optional("country", &self.country)?;
        w.optional("phone", &self.phone)
    }
}

/// Billing information: card or token, plus billing address.
///
/// `card_type`, `first_six` and `last_four` are masked card details returned by the
/// server. `number` and `verification_value` are write-only and never echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Billing {
    /// Cardholder first name.
    pub first_name: String,
    /// Cardholder last name.
    pub last_name: String,
    /// Company.
    pub company: String,
    /// First address line.
    pub address1: String,
    /// Second address line.
    pub address2: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// ISO 3166 country code.
    pub country: String,
    /// Phone number.
    pub phone: String,
    /// VAT number.
    pub vat_number: String,
    /// Customer IP address at the time of entry.
    pub ip_address: String,
    /// Card number (write-only).
    #[serde(skip_serializing)]
    pub number: String,
    /// Expiration year.
    pub year: i64,
    /// Expiration month.
    pub month: i64,
    /// Card security code (write-only).
    #[serde(skip_serializing)]
    pub verification_value: String,
    /// Recurly.js token used instead of raw card data.
    pub token_id: String,
    /// Card brand (read-only).
    pub card_type: String,
    /// First six digits of the card (read-only).
    pub first_six: String,
    /// Last four digits of the card (read-only).
    pub last_four: String,
}

impl XmlElement for Billing {
    const NAME: &'static str = "billing_info";
}

impl FromXml for Billing {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            first_name: el.string("first_name"),
            last_name: el.string("last_name"),
            company: el.string("company"),
            address1: el.string("address1"),
            address2: el.string("address2"),
            city: el.string("city"),
            state: el.string("state"),
            zip: el.string("zip"),
            country: el.string("country"),
            phone: el.string("phone"),
            vat_number: el.string("vat_number"),
            ip_address: el.string("ip_address"),
            number: el.string("number"),
            year: el.field("year")?,
            month: el.field("month")?,
            verification_value: el.string("verification_value"),
            token_id: el.string("token_id"),
            card_type: el.string("card_type"),
            first_six: el.string("first_six"),
            last_four: el.string("last_four"),
        })
    }
}

impl ToXml for Billing {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        if !self.token_id.is_empty() {
            // A token stands in for every other billing field.
            return w.required("token_id", &self.token_id);
        }
        w.optional("first_name", &self.first_name)?;
        w.optional("last_name", &self.last_name)?;
        w.optional("company", &self.company)?;
        w.optional("address1", &self.address1)?;
        w.optional("address2", &self.address2)?;
        w.optional("city", &self.city)?;
        w.optional("state", &self.state)?;
        w.optional("zip", &self.zip)?;
        w.optional("country", &self.country)?;
        w.optional("phone", &self.phone)?;
        w.optional("vat_number", &self.vat_number)?;
        w.optional("ip_address", &self.ip_address)?;
        w.optional("number", &self.number)?;
        w.optional("month", &self.month)?;
        w.optional("year", &self.year)?;
        w.optional("verification_value", &self.verification_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecurlyError;

    const ACCOUNT_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <account href="https://your-subdomain.recurly.com/v2/accounts/1">
            <adjustments href="https://your-subdomain.recurly.com/v2/accounts/1/adjustments"/>
            <account_code>1</account_code>
            <state>active</state>
            <username nil="nil"></username>
            <email>verena@example.com</email>
            <cc_emails>bob@example.com,susan@example.com</cc_emails>
            <first_name>Verena</first_name>
            <last_name>Example</last_name>
            <company_name nil="nil"></company_name>
            <vat_number nil="nil"></vat_number>
            <tax_exempt type="boolean">false</tax_exempt>
            <address>
                <address1>123 Main St.</address1>
                <address2 nil="nil"></address2>
                <city>San Francisco</city>
                <state>CA</state>
                <zip>94105</zip>
                <country>US</country>
                <phone nil="nil"></phone>
            </address>
            <accept_language nil="nil"></accept_language>
            <hosted_login_token>a92468579e9c4231a6c0031c4716c01d</hosted_login_token>
            <created_at type="datetime">2011-10-25T12:00:00Z</created_at>
            <closed_at nil="nil"></closed_at>
        </account>"#;

    #[test]
    fn test_decode_account() {
        let account: Account = xml::decode(ACCOUNT_XML).unwrap();
        assert_eq!(account.account_code, "1");
        assert_eq!(account.state, ACCOUNT_STATE_ACTIVE);
        assert_eq!(account.username, "");
        assert_eq!(account.cc_emails, "bob@example.com,susan@example.com");
        assert_eq!(account.tax_exempt, Nullable::Value(false));
        assert_eq!(account.address.city, "San Francisco");
        assert_eq!(account.address.address2, "");
        assert_eq!(account.hosted_login_token, "a92468579e9c4231a6c0031c4716c01d");
        assert!(account.created_at.value().is_some());
        assert!(account.closed_at.is_null());
        assert!(account.billing_info.is_none());
        assert!(!account.is_closed());
    }

    #[test]
    fn test_round_trip_clears_read_only_fields() {
        let account: Account = xml::decode(ACCOUNT_XML).unwrap();
        let back: Account = xml::decode(&xml::encode(&account).unwrap()).unwrap();

        let expected = Account {
            state: String::new(),
            hosted_login_token: String::new(),
            created_at: Nullable::Absent,
            closed_at: Nullable::Absent,
            ..account
        };
        assert_eq!(back, expected);
    }

    #[test]
    fn test_encode_is_sparse() {
        let account = Account { account_code: "abc".to_owned(), ..Account::default() };
        let text = String::from_utf8(xml::encode(&account).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"<?xml version="1.0" encoding="UTF-8"?><account><account_code>abc</account_code></account>"#
        );
    }

    #[test]
    fn test_billing_token_only() {
        let billing = Billing {
            token_id: "tok".to_owned(),
            first_name: "ignored".to_owned(),
            ..Billing::default()
        };
        let text = String::from_utf8(xml::encode(&billing).unwrap()).unwrap();
        assert!(text.ends_with("<billing_info><token_id>tok</token_id></billing_info>"));
    }

    #[test]
    fn test_billing_masked_card() {
        let billing: Billing = xml::decode(
            br#"<billing_info type="credit_card">
                <card_type>Visa</card_type>
                <year type="integer">2017</year>
                <month type="integer">11</month>
                <first_six>411111</first_six>
                <last_four>1111</last_four>
            </billing_info>"#,
        )
        .unwrap();
        assert_eq!(billing.year, 2017);
        assert_eq!(billing.first_six, "411111");
        assert_eq!(billing.last_four, "1111");

        let back: Billing = xml::decode(&xml::encode(&billing).unwrap()).unwrap();
        assert_eq!(back.last_four, "");
        assert_eq!(back.year, 2017);
    }

    #[test]
    fn test_bad_boolean_is_format_error() {
        let err = xml::decode::<Account>(
            br#"<account><tax_exempt type="boolean">yes</tax_exempt></account>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RecurlyError::Format { expected: "boolean", .. }));
    }
}
