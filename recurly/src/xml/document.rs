//! Raw element tree: the first stage of every decode.
//!
//! A wire document is parsed into an attribute-complete [`Element`] tree before any
//! entity sees it. Entities then project the tree into their typed fields with the
//! accessor methods defined here, so href derivation, nil handling and scalar
//! format checks live in one place.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    error::{RecurlyError, Result},
    xml::{Href, Nullable, Scalar},
};

/// A parsed XML element with its attributes, text and child elements.
///
/// Names are stored without namespace prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Parses a complete document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Parse`] for malformed markup, a document without a root
    /// element, unterminated elements, or content after the root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(trailing_root_error(&start));
                    }
                    stack.push(Self::from_start(&start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(trailing_root_error(&start));
                    }
                    let element = Self::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        RecurlyError::Parse("closing tag without matching opening tag".to_owned())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&text),
                        None if is_blank(&text) => {}
                        None => return Err(stray_text_error(root.is_some())),
                    }
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    let text = utf8(&data, "CDATA section")?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(text),
                        None => return Err(stray_text_error(root.is_some())),
                    }
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(RecurlyError::Parse(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| RecurlyError::Parse("document has no root element".to_owned()))
    }

    /// Returns the name of the root element without reading past its start tag.
    ///
    /// Only the prolog and the first tag are inspected, so the body may be any shape.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Parse`] if the document ends or is malformed before the
    /// first element.
    pub fn sniff_root_name(bytes: &[u8]) -> Result<String> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) | Event::Empty(start) => {
                    return local_name(&start);
                }
                Event::Eof => {
                    return Err(RecurlyError::Parse("document has no root element".to_owned()));
                }
                Event::End(_) => {
                    return Err(RecurlyError::Parse(
                        "closing tag without matching opening tag".to_owned(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.local_name().as_ref(), "attribute name")?.to_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name: local_name(start)?, attributes, text: String::new(), children: Vec::new() })
    }

    /// Creates an element with the given name and no content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw text content, entity references already resolved.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Looks up an attribute by local name.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// True if the element carries the nil sentinel (`nil="nil"` or `nil="true"`).
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self.attr("nil"), Some("nil" | "true"))
    }

    /// First child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }

    /// Child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Plain optional field: absent or nil yields the default.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Format`] if the content violates `T`'s format.
    pub fn field<T: Scalar + Default>(&self, name: &str) -> Result<T> {
        match self.child(name) {
            None => Ok(T::default()),
            Some(el) if el.is_nil() => Ok(T::default()),
            Some(el) if T::TYPE.is_some() && el.text.trim().is_empty() => Ok(T::default()),
            Some(el) => el.scalar(name),
        }
    }

    /// String field: absent or nil yields an empty string.
    #[must_use]
    pub fn string(&self, name: &str) -> String {
        self.child(name).filter(|el| !el.is_nil()).map(|el| el.text.clone()).unwrap_or_default()
    }

    /// Three-state field.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Format`] if the content violates `T`'s format.
    pub fn nullable<T: Scalar>(&self, name: &str) -> Result<Nullable<T>> {
        match self.child(name) {
            None => Ok(Nullable::Absent),
            Some(el) if el.is_nil() => Ok(Nullable::Null),
            Some(el) if T::TYPE.is_some() && el.text.trim().is_empty() => Ok(Nullable::Null),
            Some(el) => el.scalar(name).map(Nullable::Value),
        }
    }

    /// Relational link carried by a child's `href` attribute.
    #[must_use]
    pub fn href(&self, name: &str) -> Href {
        self.child(name).and_then(|el| el.attr("href")).map(Href::new).unwrap_or_default()
    }

    /// Parses this element's own content as `T`, reporting `field` on failure.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Format`] if the content violates `T`'s format.
    pub fn scalar<T: Scalar>(&self, field: &str) -> Result<T> {
        T::parse(&self.text).ok_or_else(|| RecurlyError::format(field, T::EXPECTED, &self.text))
    }

    /// Ensures the element has the expected name.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Parse`] when the name differs.
    pub fn expect_name(&self, expected: &str) -> Result<&Self> {
        if self.name == expected {
            Ok(self)
        } else {
            Err(RecurlyError::Parse(format!(
                "expected element <{expected}>, found <{}>",
                self.name
            )))
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> Result<String> {
    utf8(start.local_name().as_ref(), "element name").map(str::to_owned)
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| RecurlyError::Parse(format!("invalid UTF-8 in {what}: {e}")))
}

fn trailing_root_error(start: &BytesStart<'_>) -> RecurlyError {
    match local_name(start) {
        Ok(name) => RecurlyError::Parse(format!("unexpected element <{name}> after root element")),
        Err(err) => err,
    }
}

/// Whitespace or a byte-order mark may surround the root element.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}

fn stray_text_error(after_root: bool) -> RecurlyError {
    let place = if after_root { "after" } else { "before" };
    RecurlyError::Parse(format!("unexpected text {place} root element"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
            <invoice href="https://x.recurly.com/v2/invoices/1005">
                <account href="https://x.recurly.com/v2/accounts/1"/>
                <state>open</state>
                <!-- comment -->
                <po_number nil="nil"></po_number>
            </invoice>"#;

        let root = Element::parse(doc).unwrap();
        assert_eq!(root.name(), "invoice");
        assert_eq!(root.attr("href"), Some("https://x.recurly.com/v2/invoices/1005"));
        assert_eq!(root.children().count(), 3);
        assert_eq!(root.string("state"), "open");
        assert!(root.child("po_number").unwrap().is_nil());
    }

    #[test]
    fn test_text_entities_are_unescaped() {
        let root = Element::parse(b"<a><b>Tom &amp; Jerry &lt;3</b></a>").unwrap();
        assert_eq!(root.string("b"), "Tom & Jerry <3");
    }

    #[test]
    fn test_cdata_is_text() {
        let root = Element::parse(b"<a><b><![CDATA[x < y]]></b></a>").unwrap();
        assert_eq!(root.string("b"), "x < y");
    }

    #[test]
    fn test_cdata_invalid_utf8_is_parse_error() {
        let err = Element::parse(b"<account><email><![CDATA[\xff\xfe]]></email></account>")
            .unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_invalid_utf8_names_are_parse_errors() {
        let err = Element::parse(b"<account><e\xffmail/></account>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));

        let err = Element::parse(b"<account k\xff=\"1\"></account>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_trailing_text_rejected() {
        let err = Element::parse(b"<account></account>garbage").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));

        let err = Element::parse(b"<account></account><![CDATA[x]]>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));

        let root = Element::parse(b"<?xml version=\"1.0\"?>\n<account></account>\n  \n").unwrap();
        assert_eq!(root.name(), "account");
    }

    #[test]
    fn test_unterminated_document() {
        let err = Element::parse(b"<invoice><state>open</state>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_truncated_tag() {
        let err = Element::parse(b"<invoice><sta").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = Element::parse(b"<invoice><state>open</status></invoice>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(Element::parse(b"").unwrap_err(), RecurlyError::Parse(_)));
        assert!(matches!(Element::parse(b"   ").unwrap_err(), RecurlyError::Parse(_)));
    }

    #[test]
    fn test_second_root_rejected() {
        let err = Element::parse(b"<a></a><b></b>").unwrap_err();
        assert!(matches!(err, RecurlyError::Parse(_)));
    }

    #[test]
    fn test_sniff_ignores_body() {
        let name = Element::sniff_root_name(
            b"<?xml version=\"1.0\"?><new_account_notification><broken",
        )
        .unwrap();
        assert_eq!(name, "new_account_notification");
    }

    #[test]
    fn test_sniff_empty_root() {
        assert_eq!(Element::sniff_root_name(b"<ping/>").unwrap(), "ping");
        assert!(Element::sniff_root_name(b"").is_err());
    }

    #[test]
    fn test_field_accessors() {
        let root = Element::parse(
            br#"<x>
                <n type="integer">5</n>
                <blank type="integer"></blank>
                <nil type="integer" nil="nil"/>
                <bad type="integer">five</bad>
            </x>"#,
        )
        .unwrap();

        assert_eq!(root.field::<i64>("n").unwrap(), 5);
        assert_eq!(root.field::<i64>("blank").unwrap(), 0);
        assert_eq!(root.field::<i64>("nil").unwrap(), 0);
        assert_eq!(root.field::<i64>("missing").unwrap(), 0);

        assert_eq!(root.nullable::<i64>("n").unwrap(), Nullable::Value(5));
        assert_eq!(root.nullable::<i64>("nil").unwrap(), Nullable::Null);
        assert_eq!(root.nullable::<i64>("missing").unwrap(), Nullable::Absent);

        let err = root.field::<i64>("bad").unwrap_err();
        assert!(
            matches!(err, RecurlyError::Format { ref field, expected: "integer", .. } if field == "bad")
        );
    }

    #[test]
    fn test_expect_name() {
        let root = Element::new("invoice");
        assert!(root.expect_name("invoice").is_ok());
        assert!(matches!(root.expect_name("account").unwrap_err(), RecurlyError::Parse(_)));
    }
}
