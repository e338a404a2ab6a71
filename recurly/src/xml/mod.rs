//! XML codec layer.
//!
//! Decoding happens in two stages: [`Element::parse`] builds a raw tree from the
//! bytes, then a [`FromXml`] impl projects the tree into a typed entity. Encoding goes
//! through [`ToXml`] and the [`XmlWriter`], which emits writable fields only.
//!
//! # Wire conventions
//!
//! | shape | meaning |
//! |---|---|
//! | element omitted | field absent, decodes to the default |
//! | `<x nil="nil"></x>` | explicit null ([`Nullable::Null`]) |
//! | `<x type="integer">5</x>` | typed scalar |
//! | `<account href=".../accounts/100"/>` | relational link ([`Href`]) |
//!
//! # Examples
//!
//! ```
//! use recurly::{models::Account, xml};
//!
//! let account: Account = xml::decode(
//!     br#"<account><account_code>100</account_code><email>a@b.c</email></account>"#,
//! )?;
//! assert_eq!(account.account_code, "100");
//!
//! let bytes = xml::encode(&account)?;
//! let back: Account = xml::decode(&bytes)?;
//! assert_eq!(back.email, "a@b.c");
//! # Ok::<(), recurly::RecurlyError>(())
//! ```

mod document;
mod href;
mod scalar;
mod writer;

pub use document::Element;
pub use href::Href;
pub use scalar::{DATETIME_FORMAT, Nullable, Scalar};
pub use writer::XmlWriter;

use crate::error::Result;

/// An entity with a fixed wire element name.
pub trait XmlElement {
    /// Root element name (`account`, `invoice`, ...).
    const NAME: &'static str;
}

/// Projection of a raw [`Element`] into a typed entity.
pub trait FromXml: XmlElement + Sized {
    /// Builds the entity from an element whose name is already checked.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Format`](crate::RecurlyError::Format) when a scalar
    /// violates its declared format.
    fn from_element(element: &Element) -> Result<Self>;
}

/// Serialization of an entity's writable fields.
pub trait ToXml: XmlElement {
    /// Writes the child elements.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`](crate::RecurlyError::Encode) if the writer fails.
    fn write_body(&self, writer: &mut XmlWriter) -> Result<()>;

    /// Attributes placed on the entity's own element.
    fn attributes(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Decodes a single-entity document.
///
/// # Errors
///
/// Returns [`RecurlyError::Parse`](crate::RecurlyError::Parse) for malformed markup or
/// a root element other than `T::NAME`, and
/// [`RecurlyError::Format`](crate::RecurlyError::Format) for a scalar format violation.
pub fn decode<T: FromXml>(bytes: &[u8]) -> Result<T> {
    let root = Element::parse(bytes)?;
    T::from_element(root.expect_name(T::NAME)?)
}

/// Decodes a collection document such as `<invoices type="array">...</invoices>`.
///
/// Children other than `T::NAME` are ignored.
///
/// # Errors
///
/// Same as [`decode`], with the root checked against `container`.
pub fn decode_list<T: FromXml>(bytes: &[u8], container: &str) -> Result<Vec<T>> {
    let root = Element::parse(bytes)?;
    root.expect_name(container)?.children_named(T::NAME).map(T::from_element).collect()
}

/// Encodes an entity as a complete document with an XML declaration.
///
/// # Errors
///
/// Returns [`RecurlyError::Encode`](crate::RecurlyError::Encode) if the writer fails.
pub fn encode<T: ToXml>(value: &T) -> Result<Vec<u8>> {
    let mut writer = XmlWriter::new();
    writer.declaration()?;
    writer.entity(value)?;
    Ok(writer.into_inner())
}

/// Decodes an optional nested entity: absent or nil yields `None`.
pub(crate) fn nested<T: FromXml>(parent: &Element, name: &str) -> Result<Option<T>> {
    match parent.child(name) {
        Some(el) if !el.is_nil() => T::from_element(el).map(Some),
        _ => Ok(None),
    }
}

/// Decodes a nested entity, falling back to the default when absent or nil.
pub(crate) fn nested_or_default<T: FromXml + Default>(parent: &Element, name: &str) -> Result<T> {
    nested(parent, name).map(Option::unwrap_or_default)
}

/// Decodes every `T` inside the `container` child of `parent`.
pub(crate) fn nested_list<T: FromXml>(parent: &Element, container: &str) -> Result<Vec<T>> {
    parent
        .child(container)
        .map(|list| list.children_named(T::NAME).map(T::from_element).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}
