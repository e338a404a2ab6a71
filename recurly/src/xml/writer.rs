//! Document writer used by every [`ToXml`](crate::xml::ToXml) impl.

use std::fmt;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::{RecurlyError, Result},
    xml::{Nullable, Scalar, ToXml},
};

/// Streaming writer that knows the wire conventions: `type` attributes on typed
/// scalars, `nil="nil"` for explicit nulls and omission of unset optional fields.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl fmt::Debug for XmlWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlWriter").field("len", &self.inner.get_ref().len()).finish()
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Writer::new(Vec::new()) }
    }

    /// Writes the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Opens an element with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(start))
    }

    /// Closes an element.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes escaped character data.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.write(Event::Text(BytesText::new(text)))
    }

    /// Writes `<name attrs>text</name>`.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.text(text)?;
        self.end(name)
    }

    /// Writes a scalar unconditionally, with its `type` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn required<T: Scalar>(&mut self, name: &str, value: &T) -> Result<()> {
        let text = value.format();
        match T::TYPE {
            Some(ty) => self.text_element(name, &[("type", ty)], &text),
            None => self.text_element(name, &[], &text),
        }
    }

    /// Writes a scalar unless it holds its zero value.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn optional<T: Scalar>(&mut self, name: &str, value: &T) -> Result<()> {
        if value.is_zero() {
            return Ok(());
        }
        self.required(name, value)
    }

    /// Writes a three-state field: nothing, `<name nil="nil"></name>`, or the value.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn nullable<T: Scalar>(&mut self, name: &str, value: &Nullable<T>) -> Result<()> {
        match value {
            Nullable::Absent => Ok(()),
            Nullable::Null => self.text_element(name, &[("nil", "nil")], ""),
            Nullable::Value(v) => self.required(name, v),
        }
    }

    /// Writes a nested entity under its own element name.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn entity<T: ToXml>(&mut self, value: &T) -> Result<()> {
        let attributes = value.attributes();
        let borrowed: Vec<(&str, &str)> =
            attributes.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.start(T::NAME, &borrowed)?;
        value.write_body(self)?;
        self.end(T::NAME)
    }

    /// Writes a list of entities inside a container element.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Encode`] if the underlying writer fails.
    pub fn list<T: ToXml>(&mut self, container: &str, items: &[T]) -> Result<()> {
        self.start(container, &[])?;
        for item in items {
            self.entity(item)?;
        }
        self.end(container)
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(|e| RecurlyError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut XmlWriter) -> Result<()>) -> String {
        let mut w = XmlWriter::new();
        f(&mut w).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn test_required_carries_type() {
        assert_eq!(
            written(|w| w.required("quantity", &0_i64)),
            r#"<quantity type="integer">0</quantity>"#
        );
        assert_eq!(written(|w| w.required("currency", &"USD".to_owned())), "<currency>USD</currency>");
    }

    #[test]
    fn test_optional_skips_zero() {
        assert_eq!(written(|w| w.optional("quantity", &0_i64)), "");
        assert_eq!(written(|w| w.optional("po_number", &String::new())), "");
        assert_eq!(
            written(|w| w.optional("bulk", &true)),
            r#"<bulk type="boolean">true</bulk>"#
        );
    }

    #[test]
    fn test_nullable_states() {
        assert_eq!(written(|w| w.nullable::<i64>("net_terms", &Nullable::Absent)), "");
        assert_eq!(
            written(|w| w.nullable::<i64>("net_terms", &Nullable::Null)),
            r#"<net_terms nil="nil"></net_terms>"#
        );
        assert_eq!(
            written(|w| w.nullable("net_terms", &Nullable::Value(0_i64))),
            r#"<net_terms type="integer">0</net_terms>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            written(|w| w.required("company_name", &"A & B <Co>".to_owned())),
            "<company_name>A &amp; B &lt;Co&gt;</company_name>"
        );
    }
}
