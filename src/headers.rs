//! Inertia wire headers and request negotiation.

use axum::http::{HeaderMap, HeaderValue};

use crate::error::InertiaError;

pub const X_INERTIA: &str = "x-inertia";
pub const X_INERTIA_VERSION: &str = "x-inertia-version";
pub const X_INERTIA_LOCATION: &str = "x-inertia-location";
pub const X_INERTIA_PARTIAL_DATA: &str = "x-inertia-partial-data";
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "x-inertia-partial-component";
pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// `Vary` token for responses that differ on `X-Inertia`.
pub const VARY_INERTIA: &str = "X-Inertia";

/// What the request headers say about how the client wants its page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Negotiation {
    /// `X-Inertia: true` was sent.
    pub inertia: bool,
    /// `X-Requested-With: XMLHttpRequest` was sent.
    pub xhr: bool,
    pub version: Option<String>,
    pub partial_data: Option<String>,
    pub partial_component: Option<String>,
}

impl Negotiation {
    /// Reads the negotiation headers. An `X-Inertia` value that isn't a
    /// boolean is an error, not `false`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, InertiaError> {
        let inertia = match header_str(headers, X_INERTIA)? {
            Some(value) => parse_bool(value).ok_or_else(|| InertiaError::MalformedHeader {
                header: X_INERTIA,
                value: value.to_string(),
            })?,
            None => false,
        };

        Ok(Self {
            inertia,
            xhr: is_xhr(headers),
            version: header_str(headers, X_INERTIA_VERSION)?.map(str::to_string),
            partial_data: header_str(headers, X_INERTIA_PARTIAL_DATA)?.map(str::to_string),
            partial_component: header_str(headers, X_INERTIA_PARTIAL_COMPONENT)?
                .map(str::to_string),
        })
    }

    /// Whether the response should be the bare JSON page object.
    pub fn wants_json(&self) -> bool {
        self.inertia && self.xhr
    }
}

/// Whether the request came from an XHR-style client.
pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get(X_REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<Option<&'a str>, InertiaError> {
    match headers.get(name) {
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| InertiaError::MalformedHeader {
                header: name,
                value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            }),
        None => Ok(None),
    }
}

/// Accepts the same spellings clients commonly send for booleans.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Adds `token` to the `Vary` header unless an existing value already names it.
pub fn append_vary(headers: &mut HeaderMap, token: &'static str) {
    let present = headers
        .get_all(axum::http::header::VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|v| v.trim().eq_ignore_ascii_case(token));

    if !present {
        headers.append(axum::http::header::VARY, HeaderValue::from_static(token));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_plain_request_is_html() {
        let n = Negotiation::from_headers(&HeaderMap::new()).unwrap();
        assert!(!n.inertia);
        assert!(!n.xhr);
        assert!(!n.wants_json());
    }

    #[test]
    fn test_inertia_xhr_wants_json() {
        let n = Negotiation::from_headers(&headers(&[
            ("x-inertia", "true"),
            ("x-requested-with", "XMLHttpRequest"),
        ]))
        .unwrap();
        assert!(n.wants_json());
    }

    #[test]
    fn test_inertia_without_xhr_is_html() {
        let n = Negotiation::from_headers(&headers(&[("x-inertia", "true")])).unwrap();
        assert!(n.inertia);
        assert!(!n.wants_json());
    }

    #[test]
    fn test_bool_spellings() {
        for value in ["1", "t", "TRUE", "True"] {
            let mut map = HeaderMap::new();
            map.insert(X_INERTIA, HeaderValue::from_str(value).unwrap());
            assert!(Negotiation::from_headers(&map).unwrap().inertia, "{value}");
        }
        let n = Negotiation::from_headers(&headers(&[("x-inertia", "false")])).unwrap();
        assert!(!n.inertia);
    }

    #[test]
    fn test_malformed_bool_is_error() {
        let err = Negotiation::from_headers(&headers(&[("x-inertia", "yes")])).unwrap_err();
        match err {
            InertiaError::MalformedHeader { header, value } => {
                assert_eq!(header, X_INERTIA);
                assert_eq!(value, "yes");
            }
            other => panic!("Expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_append_vary_skips_duplicates() {
        let mut map = headers(&[("vary", "Accept, X-Inertia")]);
        append_vary(&mut map, "X-Inertia");
        assert_eq!(map.get_all("vary").iter().count(), 1);

        append_vary(&mut map, "Cookie");
        assert_eq!(map.get_all("vary").iter().count(), 2);
    }
}
