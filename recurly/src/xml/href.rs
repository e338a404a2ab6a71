//! Relational links expressed as `href` attributes.

use serde::Serialize;
use url::Url;

/// A read-only reference to another resource.
///
/// The wire form is an empty element such as
/// `<account href="https://your-subdomain.recurly.com/v2/accounts/100"/>`. The
/// referenced resource is never embedded; only its link and the trailing
/// identifier segment (`code`) are kept.
///
/// # Examples
///
/// ```
/// use recurly::xml::Href;
///
/// let href = Href::new("https://your-subdomain.recurly.com/v2/accounts/100");
/// assert_eq!(href.code(), "100");
///
/// let empty = Href::default();
/// assert!(empty.is_empty());
/// assert_eq!(empty.code(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Href {
    href: String,
    code: String,
}

impl Href {
    /// Builds a link and derives its identifier segment.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        let code = last_segment(&href);
        Self { href, code }
    }

    /// Full link URL.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Final path segment of the link, empty when there is no link.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Identifier segment parsed as an integer (invoice numbers are numeric).
    #[must_use]
    pub fn number(&self) -> Option<i64> {
        self.code.parse().ok()
    }

    /// True when no link was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.href.is_empty()
    }
}

fn last_segment(href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    if let Ok(url) = Url::parse(href)
        && let Some(mut segments) = url.path_segments()
    {
        return segments.next_back().unwrap_or_default().to_owned();
    }
    // Relative links: strip query and fragment by hand.
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/').next().unwrap_or(path).to_owned()
}
