//! Typed scalar formats and the three-state [`Nullable`] wrapper.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};

/// Timestamp profile used by every `type="datetime"` element.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A value that can appear as the text content of a wire element.
///
/// `TYPE` is the value of the `type` attribute carried on encode, if any.
pub trait Scalar: Sized {
    /// Wire `type` attribute, `None` for plain text.
    const TYPE: Option<&'static str>;

    /// Name used in [`RecurlyError::Format`](crate::RecurlyError::Format) messages.
    const EXPECTED: &'static str;

    /// Parses element content. `None` means the content violates the format.
    fn parse(text: &str) -> Option<Self>;

    /// Formats the value as element content.
    fn format(&self) -> String;

    /// True for the value treated as "unset" by sparse encoding.
    fn is_zero(&self) -> bool;
}

impl Scalar for String {
    const TYPE: Option<&'static str> = None;
    const EXPECTED: &'static str = "string";

    fn parse(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }

    fn format(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Scalar for i64 {
    const TYPE: Option<&'static str> = Some("integer");
    const EXPECTED: &'static str = "integer";

    fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Scalar for f64 {
    const TYPE: Option<&'static str> = Some("float");
    const EXPECTED: &'static str = "float";

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        // Rust accepts "inf" and "NaN", the wire format does not.
        if !text.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            return None;
        }
        text.parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Scalar for bool {
    const TYPE: Option<&'static str> = Some("boolean");
    const EXPECTED: &'static str = "boolean";

    fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Scalar for DateTime<Utc> {
    const TYPE: Option<&'static str> = Some("datetime");
    const EXPECTED: &'static str = "datetime";

    fn parse(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).ok().map(|dt| dt.and_utc())
    }

    fn format(&self) -> String {
        self.format(DATETIME_FORMAT).to_string()
    }

    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

/// A field that distinguishes "not sent", "sent as nil" and "sent with a value".
///
/// On the wire:
///
/// | state | element |
/// |---|---|
/// | `Absent` | omitted |
/// | `Null` | `<net_terms nil="nil"></net_terms>` |
/// | `Value(0)` | `<net_terms type="integer">0</net_terms>` |
///
/// # Examples
///
/// ```
/// use recurly::xml::Nullable;
///
/// let terms = Nullable::Value(0_i64);
/// assert_eq!(terms.value(), Some(&0));
/// assert!(!terms.is_null());
/// assert_ne!(terms, Nullable::Absent);
/// assert_ne!(Nullable::<i64>::Null, Nullable::Absent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// The element was not present.
    Absent,
    /// The element was present with `nil="nil"`.
    Null,
    /// The element was present with a value.
    Value(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> Nullable<T> {
    /// Returns the contained value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    /// Consumes the wrapper and returns the value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    /// True for the explicit-null state.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when the element was not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Maps the contained value, preserving `Absent` and `Null`.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
        match self {
            Self::Absent => Nullable::Absent,
            Self::Null => Nullable::Null,
            Self::Value(v) => Nullable::Value(f(v)),
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parse() {
        assert_eq!(i64::parse("1005"), Some(1005));
        assert_eq!(i64::parse(" -3 "), Some(-3));
        assert_eq!(i64::parse("12.5"), None);
        assert_eq!(i64::parse("abc"), None);
    }

    #[test]
    fn test_boolean_parse_is_literal() {
        assert_eq!(bool::parse("true"), Some(true));
        assert_eq!(bool::parse("false"), Some(false));
        assert_eq!(bool::parse("1"), None);
        assert_eq!(bool::parse("True"), None);
    }

    #[test]
    fn test_float_rejects_special_values() {
        assert_eq!(f64::parse("0"), Some(0.0));
        assert_eq!(f64::parse("0.0875"), Some(0.0875));
        assert_eq!(f64::parse("inf"), None);
        assert_eq!(f64::parse("NaN"), None);
        assert_eq!(0.0_f64.format(), "0");
        assert_eq!(0.0875_f64.format(), "0.0875");
    }

    #[test]
    fn test_datetime_profile() {
        let dt = DateTime::<Utc>::parse("2011-08-25T12:00:00Z").unwrap();
        assert_eq!(Scalar::format(&dt), "2011-08-25T12:00:00Z");

        assert!(DateTime::<Utc>::parse("2011-08-25 12:00:00").is_none());
        assert!(DateTime::<Utc>::parse("2011-08-25T12:00:00+00:00").is_none());
        assert!(DateTime::<Utc>::parse("yesterday").is_none());
    }

    #[test]
    fn test_nullable_states_are_distinct() {
        let absent: Nullable<i64> = Nullable::default();
        let null: Nullable<i64> = Nullable::Null;
        let zero: Nullable<i64> = 0.into();

        assert!(absent.is_absent());
        assert!(null.is_null());
        assert_eq!(zero.value(), Some(&0));
        assert_ne!(absent, null);
        assert_ne!(null, zero);
        assert_ne!(absent, zero);
    }

    #[test]
    fn test_nullable_map_preserves_state() {
        assert_eq!(Nullable::<i64>::Null.map(|v| v + 1), Nullable::Null);
        assert_eq!(Nullable::Value(1_i64).map(|v| v + 1), Nullable::Value(2));
        assert_eq!(Nullable::<i64>::Absent.into_value(), None);
    }
}
