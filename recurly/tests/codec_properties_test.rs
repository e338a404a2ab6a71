//! Property tests for the XML codec.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use recurly::{
    RecurlyError,
    models::{Account, Adjustment, Invoice},
    webhooks::{NotificationKind, parse_notification},
    xml::{self, Href, Nullable},
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_href_code_is_last_segment(
        subdomain in "[a-z0-9]{1,20}",
        resource in "accounts|plans|subscriptions|invoices",
        code in "[a-zA-Z0-9_-]{1,40}",
    ) {
        let href = Href::new(format!("https://{subdomain}.recurly.com/v2/{resource}/{code}"));
        prop_assert_eq!(href.code(), code.as_str());
    }

    #[test]
    fn test_numeric_href(number in 1i64..10_000_000) {
        let href = Href::new(format!("https://x.recurly.com/v2/invoices/{number}"));
        prop_assert_eq!(href.number(), Some(number));
    }

    #[test]
    fn test_text_survives_escaping(
        email in "[a-zA-Z0-9<>&'\"./@ -]{1,40}",
        first_name in "[\\p{L}\\p{N} ]{1,20}",
    ) {
        let account = Account {
            account_code: "1".to_owned(),
            email: email.clone(),
            first_name: first_name.clone(),
            ..Account::default()
        };
        let encoded = xml::encode(&account).unwrap();
        let decoded: Account = xml::decode(&encoded).unwrap();
        prop_assert_eq!(decoded.email, email);
        prop_assert_eq!(decoded.first_name, first_name);
    }

    #[test]
    fn test_nullable_integer_survives(net_terms in any::<i64>()) {
        let invoice = Invoice { net_terms: Nullable::Value(net_terms), ..Invoice::default() };
        let decoded: Invoice = xml::decode(&xml::encode(&invoice).unwrap()).unwrap();
        prop_assert_eq!(decoded.net_terms, Nullable::Value(net_terms));
    }

    #[test]
    fn test_datetime_survives(secs in 0i64..4_102_444_800) {
        let start = Utc.timestamp_opt(secs, 0).unwrap();
        let adjustment = Adjustment {
            currency: "USD".to_owned(),
            start_date: Nullable::Value(start),
            end_date: Nullable::Null,
            ..Adjustment::default()
        };
        let decoded: Adjustment = xml::decode(&xml::encode(&adjustment).unwrap()).unwrap();
        prop_assert_eq!(decoded.start_date, Nullable::Value(start));
        prop_assert_eq!(decoded.end_date, Nullable::Null);
    }

    #[test]
    fn test_unregistered_root_is_reported_verbatim(name in "[a-z][a-z_]{0,30}") {
        prop_assume!(NotificationKind::from_name(&name).is_none());
        let body = format!("<?xml version=\"1.0\"?><{name}><account/></{name}>");
        let err = parse_notification(body.as_bytes()).unwrap_err();
        let reported_verbatim =
            matches!(err, RecurlyError::UnknownNotification { name: ref n } if *n == name);
        prop_assert!(reported_verbatim);
    }

    #[test]
    fn test_garbage_never_panics(body in any::<Vec<u8>>()) {
        let _ = parse_notification(body.as_slice());
    }
}
