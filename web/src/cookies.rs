//! Session cookie helpers.

use http::HeaderMap;
use http::header::COOKIE;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionToken";

/// Attributes of the session cookie.
///
/// The cookie is always `HttpOnly` with path `/`. `Secure` is opt-in, so
/// plain-HTTP deployments keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// `Max-Age` in seconds; matches the session lifetime.
    pub max_age_secs: i64,
    /// Whether to mark the cookie `Secure`.
    pub secure: bool,
}

impl CookiePolicy {
    /// Policy for a session lifetime of `max_age_secs`, not `Secure`.
    #[must_use]
    pub const fn new(max_age_secs: i64) -> Self {
        Self {
            max_age_secs,
            secure: false,
        }
    }

    /// Set the `Secure` attribute.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// `Set-Cookie` value issuing `token`.
    #[must_use]
    pub fn issue(&self, token: &str) -> String {
        self.render(token, self.max_age_secs)
    }

    /// `Set-Cookie` value telling the browser to drop the session cookie.
    #[must_use]
    pub fn clear(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: i64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!("{SESSION_COOKIE}={value}; Path=/; Max-Age={max_age}; HttpOnly{secure}")
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new(3600)
    }
}

/// Value of the cookie `name` across every `Cookie` header, first match wins.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn issue_and_clear() {
        let policy = CookiePolicy::new(3600);
        assert_eq!(
            policy.issue("1735689600000000000"),
            "sessionToken=1735689600000000000; Path=/; Max-Age=3600; HttpOnly"
        );
        assert_eq!(policy.clear(), "sessionToken=; Path=/; Max-Age=0; HttpOnly");
    }

    #[test]
    fn secure_is_opt_in() {
        let policy = CookiePolicy::new(60).with_secure(true);
        assert_eq!(policy.issue("1"), "sessionToken=1; Path=/; Max-Age=60; HttpOnly; Secure");
    }

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en; sessionToken=42 ; x=1"));

        assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("42"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("oldsessionToken=1"));
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
    }
}
