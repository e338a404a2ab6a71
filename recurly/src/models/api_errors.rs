//! Error documents returned with non-success responses.

use crate::{
    error::{ApiErrorDetail, Result},
    xml::Element,
};

/// Decodes an API error document.
///
/// Two shapes are accepted: a validation list
/// (`<errors><error field=".." symbol="..">message</error></errors>`) and a single
/// error (`<error><symbol>..</symbol><description>..</description></error>`). Any other
/// root yields an empty list.
///
/// # Errors
///
/// Returns [`RecurlyError::Parse`](crate::RecurlyError::Parse) if the body is not
/// well-formed XML.
pub fn parse_api_errors(bytes: &[u8]) -> Result<Vec<ApiErrorDetail>> {
    let root = Element::parse(bytes)?;
    let details = match root.name() {
        "errors" => root.children_named("error").map(inline_error).collect(),
        "error" => vec![structured_error(&root)],
        _ => Vec::new(),
    };
    Ok(details)
}

fn inline_error(el: &Element) -> ApiErrorDetail {
    ApiErrorDetail {
        field: el.attr("field").map(str::to_owned),
        symbol: el.attr("symbol").unwrap_or_default().to_owned(),
        description: el.text().trim().to_owned(),
    }
}

fn structured_error(el: &Element) -> ApiErrorDetail {
    // Some services answer with the inline shape as the root element.
    if el.children().next().is_none() {
        return inline_error(el);
    }
    ApiErrorDetail {
        field: el.child("field").map(|f| f.text().trim().to_owned()),
        symbol: el.string("symbol"),
        description: el.string("description"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors() {
        let errors = parse_api_errors(
            br#"<?xml version="1.0" encoding="UTF-8"?>
            <errors>
                <error field="account.email" symbol="invalid_email">is invalid</error>
                <error field="account.account_code" symbol="taken">has already been taken</error>
                <transaction_error><error_code>declined</error_code></transaction_error>
            </errors>"#,
        )
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_deref(), Some("account.email"));
        assert_eq!(errors[0].symbol, "invalid_email");
        assert_eq!(errors[1].description, "has already been taken");
    }

    #[test]
    fn test_single_error() {
        let errors = parse_api_errors(
            br#"<error>
                <symbol>not_found</symbol>
                <description lang="en-US">Couldn't find Account with account_code = 9</description>
            </error>"#,
        )
        .unwrap();
        assert_eq!(errors, vec![ApiErrorDetail {
            field: None,
            symbol: "not_found".to_owned(),
            description: "Couldn't find Account with account_code = 9".to_owned(),
        }]);
    }

    #[test]
    fn test_unrelated_root_is_empty() {
        assert!(parse_api_errors(b"<html><body>Bad Gateway</body></html>").unwrap().is_empty());
        assert!(parse_api_errors(b"Bad Gateway").is_err());
    }
}
