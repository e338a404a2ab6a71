//! End-to-end decoding of webhook bodies as Recurly posts them.

use std::io::Cursor;

use chrono::{TimeZone, Utc};
use recurly::{
    RecurlyError,
    models::{SUBSCRIPTION_STATE_ACTIVE, SUBSCRIPTION_STATE_CANCELED},
    webhooks::{Notification, NotificationKind, parse_notification},
    xml::Nullable,
};

const NEW_SUBSCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<new_subscription_notification>
  <account>
    <account_code>1</account_code>
    <username nil="true"></username>
    <email>verena@example.com</email>
    <first_name>Verena</first_name>
    <last_name>Example</last_name>
    <company_name nil="true"></company_name>
  </account>
  <subscription>
    <plan>
      <plan_code>bronze</plan_code>
      <name>Bronze Plan</name>
    </plan>
    <uuid>8047cb4fd5f874b14d713d785436ebd3</uuid>
    <state>active</state>
    <quantity type="integer">2</quantity>
    <total_amount_in_cents type="integer">17000</total_amount_in_cents>
    <activated_at type="datetime">2009-11-22T13:10:38Z</activated_at>
    <canceled_at type="datetime"></canceled_at>
    <expires_at type="datetime"></expires_at>
    <current_period_started_at type="datetime">2009-11-22T13:10:38Z</current_period_started_at>
    <current_period_ends_at type="datetime">2009-11-29T13:10:38Z</current_period_ends_at>
    <trial_started_at type="datetime">2009-11-22T13:10:38Z</trial_started_at>
    <trial_ends_at type="datetime">2009-11-29T13:10:38Z</trial_ends_at>
  </subscription>
</new_subscription_notification>"#;

const CANCELED_SUBSCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<canceled_subscription_notification>
  <account>
    <account_code>1</account_code>
    <email>verena@example.com</email>
  </account>
  <subscription>
    <plan>
      <plan_code>1dpt</plan_code>
      <name>Subscription One</name>
    </plan>
    <uuid>dccd742f4710e78515714d275839f891</uuid>
    <state>canceled</state>
    <quantity type="integer">1</quantity>
    <activated_at type="datetime">2010-07-22T20:42:05Z</activated_at>
    <canceled_at type="datetime">2010-09-23T22:05:03Z</canceled_at>
    <expires_at type="datetime">2010-09-24T22:05:03Z</expires_at>
  </subscription>
</canceled_subscription_notification>"#;

const PAST_DUE_INVOICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<past_due_invoice_notification>
  <account>
    <account_code>1</account_code>
    <username nil="true"></username>
    <email>verena@example.com</email>
    <first_name>Max</first_name>
    <last_name>Power</last_name>
    <company_name nil="true"></company_name>
  </account>
  <invoice>
    <uuid>ffc64d71d4b5404e93f13aac9c63b007</uuid>
    <state>past_due</state>
    <invoice_number type="integer">1000</invoice_number>
    <po_number></po_number>
    <vat_number></vat_number>
    <total_in_cents type="integer">1100</total_in_cents>
    <currency>USD</currency>
    <created_at type="datetime">2014-01-01T20:20:29Z</created_at>
    <closed_at type="datetime"></closed_at>
    <net_terms type="integer">0</net_terms>
    <collection_method>manual</collection_method>
  </invoice>
</past_due_invoice_notification>"#;

const FAILED_PAYMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<failed_payment_notification>
  <account>
    <account_code>1</account_code>
    <username nil="true">verena</username>
    <email>verena@example.com</email>
    <first_name>Verena</first_name>
    <last_name>Example</last_name>
    <company_name nil="true">Company, Inc.</company_name>
  </account>
  <transaction>
    <id>a5143c1d3a6f4a8287d0e2cc1d4c0427</id>
    <invoice_id>8fjk3sd7j90s0789k</invoice_id>
    <invoice_number type="integer">2059</invoice_number>
    <subscription_id>1974a098jhlkjasdfljkha898326881c</subscription_id>
    <action>purchase</action>
    <date type="datetime">2009-11-22T13:10:38Z</date>
    <amount_in_cents type="integer">1000</amount_in_cents>
    <status>declined</status>
    <message>This transaction has been declined</message>
    <failure_type>Declined by the gateway</failure_type>
    <reference></reference>
    <source>subscription</source>
    <cvv_result code=""></cvv_result>
    <avs_result code=""></avs_result>
    <avs_result_street></avs_result_street>
    <avs_result_postal></avs_result_postal>
    <test type="boolean">true</test>
    <voidable type="boolean">false</voidable>
    <refundable type="boolean">false</refundable>
  </transaction>
</failed_payment_notification>"#;

#[test]
fn test_new_subscription() {
    let notification = parse_notification(NEW_SUBSCRIPTION.as_bytes()).unwrap();
    assert_eq!(notification.kind(), NotificationKind::NewSubscription);

    let Notification::NewSubscription(payload) = notification else {
        panic!("expected new subscription");
    };
    assert_eq!(payload.account.account_code, "1");
    assert_eq!(payload.account.username, "");
    assert_eq!(payload.account.email, "verena@example.com");

    let subscription = payload.subscription;
    assert_eq!(subscription.plan.code, "bronze");
    assert_eq!(subscription.plan.name, "Bronze Plan");
    assert_eq!(subscription.state, SUBSCRIPTION_STATE_ACTIVE);
    assert_eq!(subscription.quantity, 2);
    assert_eq!(
        subscription.activated_at,
        Nullable::Value(Utc.with_ymd_and_hms(2009, 11, 22, 13, 10, 38).unwrap())
    );
    assert_eq!(subscription.canceled_at, Nullable::Null);
}

#[test]
fn test_canceled_subscription() {
    let Notification::CanceledSubscription(payload) =
        parse_notification(CANCELED_SUBSCRIPTION.as_bytes()).unwrap()
    else {
        panic!("expected canceled subscription");
    };
    assert_eq!(payload.subscription.state, SUBSCRIPTION_STATE_CANCELED);
    assert_eq!(
        payload.subscription.expires_at,
        Nullable::Value(Utc.with_ymd_and_hms(2010, 9, 24, 22, 5, 3).unwrap())
    );
}

#[test]
fn test_past_due_invoice() {
    let Notification::PastDueInvoice(payload) =
        parse_notification(PAST_DUE_INVOICE.as_bytes()).unwrap()
    else {
        panic!("expected past due invoice");
    };
    assert_eq!(payload.account.first_name, "Max");
    assert_eq!(payload.invoice.invoice_number, 1000);
    assert_eq!(payload.invoice.total_in_cents, 1100);
    assert_eq!(payload.invoice.state, "past_due");
    assert_eq!(payload.invoice.closed_at, Nullable::Null);
    assert_eq!(payload.invoice.collection_method, "manual");
}

#[test]
fn test_failed_payment() {
    let Notification::FailedPayment(payload) =
        parse_notification(Cursor::new(FAILED_PAYMENT.as_bytes().to_vec())).unwrap()
    else {
        panic!("expected failed payment");
    };
    assert_eq!(payload.account.account_code, "1");
    assert_eq!(payload.account.username, "");
    assert_eq!(payload.account.company_name, "");

    let transaction = payload.transaction;
    assert_eq!(transaction.id, "a5143c1d3a6f4a8287d0e2cc1d4c0427");
    assert_eq!(transaction.invoice_number, 2059);
    assert_eq!(transaction.amount_in_cents, 1000);
    assert_eq!(transaction.status, "declined");
    assert_eq!(transaction.failure_type, "Declined by the gateway");
    assert!(transaction.test);
    assert!(!transaction.voidable);
}

#[test]
fn test_payment_kinds_share_payload_shape() {
    for kind in [
        NotificationKind::SuccessfulPayment,
        NotificationKind::VoidPayment,
        NotificationKind::SuccessfulRefund,
    ] {
        let body = FAILED_PAYMENT.replace("failed_payment_notification", kind.as_str());
        let notification = parse_notification(body.as_bytes()).unwrap();
        assert_eq!(notification.kind(), kind);
    }
}

#[test]
fn test_unknown_notification_carries_root_name() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
        <billing_info_updated_notification>
          <account><account_code>1</account_code></account>
        </billing_info_updated_notification>"#;
    let err = parse_notification(body.as_bytes()).unwrap_err();
    assert!(matches!(
        &err,
        RecurlyError::UnknownNotification { name } if name == "billing_info_updated_notification"
    ));
}

#[test]
fn test_bad_scalar_in_registered_payload() {
    let body = FAILED_PAYMENT.replace(
        r#"<amount_in_cents type="integer">1000</amount_in_cents>"#,
        r#"<amount_in_cents type="integer">ten dollars</amount_in_cents>"#,
    );
    let err = parse_notification(body.as_bytes()).unwrap_err();
    assert!(matches!(err, RecurlyError::Format { field, .. } if field == "amount_in_cents"));
}

#[test]
fn test_notification_json_is_tagged() {
    let notification = parse_notification(FAILED_PAYMENT.as_bytes()).unwrap();
    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["kind"], "failed_payment");
    assert_eq!(json["transaction"]["amount_in_cents"], 1000);
}
