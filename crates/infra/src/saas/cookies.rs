//! Set-Cookie parsing and the outgoing auth cookie header
//!
//! The platform issues its credentials as plain cookies and expects them back
//! as one hand-assembled `Cookie` header, so no cookie store is involved.

use frostlink_domain::constants::{
    LOCALE_COOKIE, PRIMARY_SESSION_COOKIE, SECONDARY_SESSION_COOKIE,
};
use reqwest::header::{HeaderMap, SET_COOKIE};

/// Extract the `name=value` pair from one `Set-Cookie` header value,
/// discarding attributes (`Path`, `HttpOnly`, ...).
pub fn parse_set_cookie(raw: &str) -> Option<(&str, &str)> {
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        None
    } else {
        Some((name, value))
    }
}

/// Find a named cookie across all `Set-Cookie` headers of one response.
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(parse_set_cookie)
        .find(|(cookie_name, _)| *cookie_name == name)
        .map(|(_, cookie_value)| cookie_value.to_owned())
}

/// Assemble the `Cookie` header value business calls authenticate with.
///
/// Order matters to the platform: app-context session first, then the locale
/// pin, then the service-level `sid`.
pub fn auth_cookie_value(app_session: &str, secondary_session: &str) -> String {
    format!(
        "{PRIMARY_SESSION_COOKIE}={app_session}; {LOCALE_COOKIE}; \
         {SECONDARY_SESSION_COOKIE}={secondary_session}"
    )
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn pair_is_taken_from_before_the_first_attribute() {
        assert_eq!(
            parse_set_cookie("JSESSIONID=abc123; Path=/; HttpOnly"),
            Some(("JSESSIONID", "abc123"))
        );
    }

    #[test]
    fn attribute_only_or_empty_values_are_rejected() {
        assert_eq!(parse_set_cookie("HttpOnly"), None);
        assert_eq!(parse_set_cookie("sid="), None);
        assert_eq!(parse_set_cookie(""), None);
    }

    #[test]
    fn find_cookie_scans_every_set_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("lang=en; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("sid=s-77; HttpOnly"));
        assert_eq!(find_cookie(&headers, "sid").as_deref(), Some("s-77"));
        assert_eq!(find_cookie(&headers, "JSESSIONID"), None);
    }

    #[test]
    fn auth_header_carries_all_three_parts_in_order() {
        assert_eq!(auth_cookie_value("app-1", "sid-2"), "JSESSIONID=app-1; lang=zh-cn; sid=sid-2");
    }
}
