//! Error types for the Recurly client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], an alias over
//! [`RecurlyError`]. The variants follow the three codec failure kinds plus the
//! failures the resource layer can surface.
//!
//! # Error Categories
//!
//! - **Codec errors** ([`RecurlyError::Parse`], [`RecurlyError::Format`]): the wire document
//!   is malformed or a scalar does not match its declared type
//! - **Dispatch errors** ([`RecurlyError::UnknownNotification`]): a webhook payload with an
//!   unregistered root element; callers are expected to branch on it
//! - **Transport errors** ([`RecurlyError::Http`], [`RecurlyError::Io`]): network or stream
//!   failures
//! - **API errors** ([`RecurlyError::Api`]): the service answered with a non-success status
//!
//! # Examples
//!
//! ```
//! use recurly::{RecurlyError, webhooks::parse_notification};
//!
//! let payload = b"<some_unregistered_notification/>".as_slice();
//! match parse_notification(payload) {
//!     Err(RecurlyError::UnknownNotification { name }) => {
//!         assert_eq!(name, "some_unregistered_notification");
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Result type alias for client, codec and dispatch operations.
pub type Result<T> = std::result::Result<T, RecurlyError>;

/// Errors that can occur while talking to Recurly or decoding its documents.
///
/// No variant carries a partially decoded value: a decode either yields a complete
/// entity or one of these errors.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum RecurlyError {
    /// The document is not well-formed XML, or its root element is not the expected one.
    ///
    /// Fatal to the decode call that produced it and never retried.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A scalar's content does not match the format of its declared type.
    ///
    /// `field` is the element path relative to the decoded entity
    /// (for example `invoice_number` or `unit_amount_in_cents.USD`).
    #[error("invalid {expected} value for field '{field}': {value:?}")]
    Format {
        /// Offending field name.
        field: String,
        /// Expected wire type (`integer`, `boolean`, `float`, `datetime`, `ip address`).
        expected: &'static str,
        /// Raw content that failed to parse.
        value: String,
    },

    /// The webhook root element has no entry in the notification registry.
    ///
    /// This is an expected outcome, not a crash: log-and-ignore is a legitimate policy.
    #[error("unknown notification: {name}")]
    UnknownNotification {
        /// Root element name of the unrecognized payload.
        name: String,
    },

    /// Reading the input stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing an XML document failed.
    #[error("XML encode error: {0}")]
    Encode(String),

    /// HTTP request failed before a response was received.
    ///
    /// # Recovery
    ///
    /// Network errors are not retried by this crate; wrap calls in your own policy.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Recurly API returned status {status}: {}", ApiErrorList(.errors))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded error details (empty when the body carried none).
        errors: Vec<ApiErrorDetail>,
    },

    /// Client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Caller supplied an argument the client cannot send.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RecurlyError {
    /// Builds a [`RecurlyError::Format`] for `field`.
    pub(crate) fn format(field: impl Into<String>, expected: &'static str, value: &str) -> Self {
        Self::Format { field: field.into(), expected, value: value.to_owned() }
    }

    /// Returns the root element name if this is an unknown notification.
    #[must_use]
    pub fn unknown_notification_name(&self) -> Option<&str> {
        match self {
            Self::UnknownNotification { name } => Some(name),
            _ => None,
        }
    }

    /// Returns true if the API reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

impl From<quick_xml::Error> for RecurlyError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for RecurlyError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A single error entry from an API error document.
///
/// Recurly reports validation failures as
/// `<errors><error field="account.email" symbol="invalid_email">is invalid</error></errors>`
/// and other failures as `<error><symbol>..</symbol><description>..</description></error>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetail {
    /// Field the error refers to, if any.
    pub field: Option<String>,
    /// Machine-readable error symbol.
    pub symbol: String,
    /// Human-readable description.
    pub description: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field} {} ({})", self.description, self.symbol),
            None => write!(f, "{} ({})", self.description, self.symbol),
        }
    }
}

struct ApiErrorList<'a>(&'a [ApiErrorDetail]);

impl fmt::Display for ApiErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no error details");
        }
        for (i, detail) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let error = RecurlyError::format("invoice_number", "integer", "abc");
        assert_eq!(error.to_string(), "invalid integer value for field 'invoice_number': \"abc\"");
    }

    #[test]
    fn test_unknown_notification_name() {
        let error = RecurlyError::UnknownNotification { name: "foo_notification".to_owned() };
        assert_eq!(error.unknown_notification_name(), Some("foo_notification"));
        assert_eq!(error.to_string(), "unknown notification: foo_notification");

        let error = RecurlyError::Parse("bad".to_owned());
        assert_eq!(error.unknown_notification_name(), None);
    }

    #[test]
    fn test_api_error_display() {
        let error = RecurlyError::Api {
            status: 422,
            errors: vec![
                ApiErrorDetail {
                    field: Some("account.email".to_owned()),
                    symbol: "invalid_email".to_owned(),
                    description: "is invalid".to_owned(),
                },
                ApiErrorDetail {
                    field: None,
                    symbol: "declined".to_owned(),
                    description: "card declined".to_owned(),
                },
            ],
        };
        assert_eq!(
            error.to_string(),
            "Recurly API returned status 422: account.email is invalid (invalid_email); card \
             declined (declined)"
        );
    }

    #[test]
    fn test_api_error_without_details() {
        let error = RecurlyError::Api { status: 500, errors: Vec::new() };
        assert!(error.to_string().ends_with("no error details"));
        assert!(!error.is_not_found());
        assert!(RecurlyError::Api { status: 404, errors: Vec::new() }.is_not_found());
    }
}
