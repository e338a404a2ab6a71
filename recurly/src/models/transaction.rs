//! Payment transactions.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{RecurlyError, Result},
    models::Account,
    xml::{self, Element, FromXml, Href, Nullable, ToXml, XmlElement, XmlWriter},
};

/// Transaction completed.
pub const TRANSACTION_STATUS_SUCCESS: &str = "success";
/// Transaction declined or errored.
pub const TRANSACTION_STATUS_FAILED: &str = "failed";
/// Transaction voided.
pub const TRANSACTION_STATUS_VOID: &str = "void";

/// A payment, refund or verification.
///
/// On decode, the account snapshot comes from `<details><account>` and reflects the
/// account at the time of the transaction. On encode only `account`,
/// `amount_in_cents`, `currency` and `description` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transaction {
    /// Link to the invoice (read-only).
    pub invoice: Href,
    /// Link to the subscription (read-only).
    pub subscription: Href,
    /// Unique identifier (read-only).
    pub uuid: String,
    /// `purchase`, `refund`, `verify` (read-only).
    pub action: String,
    /// Amount charged.
    pub amount_in_cents: i64,
    /// Tax portion (read-only).
    pub tax_in_cents: i64,
    /// ISO 4217 currency code, always sent.
    pub currency: String,
    /// Description for a one-off charge.
    pub description: String,
    /// `success`, `failed` or `void` (read-only).
    pub status: String,
    /// `credit_card`, `paypal`, ... (read-only).
    pub payment_method: String,
    /// Gateway reference (read-only).
    pub reference: String,
    /// `subscription`, `transaction`, ... (read-only).
    pub source: String,
    /// Renewal payment (read-only).
    pub recurring: Nullable<bool>,
    /// Processed on a test gateway (read-only).
    pub test: bool,
    /// Can still be voided (read-only).
    pub voidable: Nullable<bool>,
    /// Can still be refunded (read-only).
    pub refundable: Nullable<bool>,
    /// Customer IP address (read-only).
    pub ip_address: Option<IpAddr>,
    /// Card verification result (read-only).
    pub cvv_result: TransactionResult,
    /// Address verification result (read-only).
    pub avs_result: TransactionResult,
    /// Street match result (read-only).
    pub avs_result_street: String,
    /// Postal code match result (read-only).
    pub avs_result_postal: String,
    /// Creation time (read-only).
    pub created_at: Nullable<DateTime<Utc>>,
    /// Account snapshot; the account to charge on create.
    pub account: Account,
    /// Failure details for declined transactions (read-only).
    pub transaction_error: Option<TransactionError>,
}

impl XmlElement for Transaction {
    const NAME: &'static str = "transaction";
}

impl FromXml for Transaction {
    fn from_element(el: &Element) -> Result<Self> {
        let account = match el.child("details") {
            Some(details) => xml::nested_or_default(details, "account")?,
            // An unlinked top-level account is what encode writes.
            None => match el.child("account") {
                Some(account) if account.attr("href").is_none() => {
                    Account::from_element(account)?
                }
                _ => Account::default(),
            },
        };

        let ip_address = match el.string("ip_address") {
            text if text.trim().is_empty() => None,
            text => Some(
                text.trim()
                    .parse()
                    .map_err(|_| RecurlyError::format("ip_address", "ip address", &text))?,
            ),
        };

        Ok(Self {
            invoice: el.href("invoice"),
            subscription: el.href("subscription"),
            uuid: el.string("uuid"),
            action: el.string("action"),
            amount_in_cents: el.field("amount_in_cents")?,
            tax_in_cents: el.field("tax_in_cents")?,
            currency: el.string("currency"),
            description: el.string("description"),
            status: el.string("status"),
            payment_method: el.string("payment_method"),
            reference: el.string("reference"),
            source: el.string("source"),
            recurring: el.nullable("recurring")?,
            test: el.field("test")?,
            voidable: el.nullable("voidable")?,
            refundable: el.nullable("refundable")?,
            ip_address,
            cvv_result: xml::nested_or_default(el, "cvv_result")?,
            avs_result: xml::nested_or_default(el, "avs_result")?,
            avs_result_street: el.string("avs_result_street"),
            avs_result_postal: el.string("avs_result_postal"),
            created_at: el.nullable("created_at")?,
            account,
            transaction_error: xml::nested(el, "transaction_error")?,
        })
    }
}

impl ToXml for Transaction {
    fn write_body(&self, w: &mut XmlWriter) -> Result<()> {
        if self.account != Account::default() {
            w.entity(&self.account)?;
        }
        w.optional("amount_in_cents", &self.amount_in_cents)?;
        w.required("currency", &self.currency)?;
        w.optional("description", &self.description)
    }
}

impl Transaction {
    /// Returns true for a successful transaction.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == TRANSACTION_STATUS_SUCCESS
    }
}

/// A gateway check result: `<cvv_result code="M">Match</cvv_result>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionResult {
    /// Result code attribute.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl XmlElement for TransactionResult {
    const NAME: &'static str = "result";
}

impl FromXml for TransactionResult {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            code: el.attr("code").unwrap_or_default().to_owned(),
            message: el.text().trim().to_owned(),
        })
    }
}

/// Failure details attached to a declined transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionError {
    /// Recurly error code.
    pub error_code: String,
    /// Error category (`soft`, `hard`, `fraud`, ...).
    pub error_category: String,
    /// Message intended for the merchant.
    pub merchant_message: String,
    /// Message safe to show the customer.
    pub customer_message: String,
    /// Raw gateway error code.
    pub gateway_error_code: String,
}

impl XmlElement for TransactionError {
    const NAME: &'static str = "transaction_error";
}

impl FromXml for TransactionError {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            error_code: el.string("error_code"),
            error_category: el.string("error_category"),
            merchant_message: el.string("merchant_message"),
            customer_message: el.string("customer_message"),
            gateway_error_code: el.string("gateway_error_code"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED_TRANSACTION_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <transaction href="https://x.recurly.com/v2/transactions/a13acd8fe4294916b79aec87b7ea441f" type="credit_card">
            <account href="https://x.recurly.com/v2/accounts/1"/>
            <invoice href="https://x.recurly.com/v2/invoices/1108"/>
            <uuid>a13acd8fe4294916b79aec87b7ea441f</uuid>
            <action>purchase</action>
            <amount_in_cents type="integer">1000</amount_in_cents>
            <currency>USD</currency>
            <status>failed</status>
            <recurring type="boolean">false</recurring>
            <test type="boolean">true</test>
            <voidable type="boolean">false</voidable>
            <refundable type="boolean">false</refundable>
            <ip_address>2001:db8::1</ip_address>
            <cvv_result code="N">No Match</cvv_result>
            <avs_result code="D">Street address and postal code match.</avs_result>
            <avs_result_street nil="nil"/>
            <transaction_error>
                <error_code>declined</error_code>
                <error_category>soft</error_category>
                <merchant_message>The customer's bank has declined their card.</merchant_message>
                <customer_message>The transaction was declined.</customer_message>
                <gateway_error_code nil="nil"/>
            </transaction_error>
            <details>
                <account>
                    <account_code>1</account_code>
                    <company nil="nil"/>
                    <email>verena@test.com</email>
                </account>
            </details>
        </transaction>"#;

    #[test]
    fn test_decode_failed_transaction() {
        let tx: Transaction = xml::decode(FAILED_TRANSACTION_XML).unwrap();
        assert_eq!(tx.status, TRANSACTION_STATUS_FAILED);
        assert!(!tx.is_success());
        assert!(tx.test);
        assert_eq!(tx.voidable, Nullable::Value(false));
        assert_eq!(tx.ip_address, Some("2001:db8::1".parse().unwrap()));
        assert_eq!(tx.cvv_result, TransactionResult {
            code: "N".to_owned(),
            message: "No Match".to_owned(),
        });
        assert_eq!(tx.account.account_code, "1");
        assert_eq!(tx.account.email, "verena@test.com");
        assert_eq!(tx.invoice.number(), Some(1108));

        let error = tx.transaction_error.unwrap();
        assert_eq!(error.error_code, "declined");
        assert_eq!(error.gateway_error_code, "");
    }

    #[test]
    fn test_invalid_ip_address() {
        let err = xml::decode::<Transaction>(
            b"<transaction><ip_address>999.1.1.1</ip_address></transaction>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecurlyError::Format { ref field, expected: "ip address", .. } if field == "ip_address"
        ));
    }

    #[test]
    fn test_round_trip_keeps_writable_fields() {
        let tx = Transaction {
            account: Account { account_code: "100".to_owned(), ..Account::default() },
            amount_in_cents: 1500,
            currency: "USD".to_owned(),
            description: "Setup fee".to_owned(),
            ..Transaction::default()
        };
        let text = String::from_utf8(xml::encode(&tx).unwrap()).unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><transaction><account><account_code>100\
             </account_code></account><amount_in_cents type=\"integer\">1500</amount_in_cents>\
             <currency>USD</currency><description>Setup fee</description></transaction>"
        );
        let back: Transaction = xml::decode(text.as_bytes()).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_read_only_fields_are_not_sent() {
        let tx: Transaction = xml::decode(FAILED_TRANSACTION_XML).unwrap();
        let text = String::from_utf8(xml::encode(&tx).unwrap()).unwrap();
        for field in ["uuid", "status", "ip_address", "cvv_result", "transaction_error", "href"] {
            assert!(!text.contains(field), "{field} leaked into {text}");
        }
    }
}
