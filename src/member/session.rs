// Token propagation over cookies and the Authorization header

use axum::http::{header, HeaderMap, HeaderValue};

use crate::member::error::MemberError;

/// Cookie carrying the bearer token
pub const AUTH_COOKIE_NAME: &str = "X-AUTH-TOKEN";

/// Cookie attributes shared by the set and clear variants
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    pub secure: bool,
}

impl CookieSettings {
    fn attributes(&self, max_age: i64) -> String {
        let mut attrs = format!("Path=/; Max-Age={}; HttpOnly; SameSite=Lax", max_age);
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` value storing `token` for `max_age` seconds
    pub fn token_cookie(&self, token: &str, max_age: i64) -> Result<HeaderValue, MemberError> {
        HeaderValue::from_str(&format!(
            "{}={}; {}",
            AUTH_COOKIE_NAME,
            token,
            self.attributes(max_age)
        ))
        .map_err(|e| MemberError::TokenGeneration(e.to_string()))
    }

    /// `Set-Cookie` value that empties the token cookie
    pub fn clear_cookie(&self) -> HeaderValue {
        // Built only from constant parts, always a valid header value
        HeaderValue::from_str(&format!("{}=; {}", AUTH_COOKIE_NAME, self.attributes(0)))
            .unwrap_or_else(|_| HeaderValue::from_static("X-AUTH-TOKEN=; Path=/; Max-Age=0"))
    }
}

/// `Authorization` value for a bearer token
pub fn bearer_header(token: &str) -> Result<HeaderValue, MemberError> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| MemberError::TokenGeneration(e.to_string()))
}

/// Read a cookie value from the `Cookie` request headers
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Find the request's token: the `Authorization: Bearer` header wins, the
/// `X-AUTH-TOKEN` cookie is the fallback. An empty cookie counts as absent.
pub fn extract_token(headers: &HeaderMap) -> Result<String, MemberError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| MemberError::InvalidToken)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(MemberError::InvalidToken)?;
        return Ok(token.to_string());
    }

    parse_cookie(headers, AUTH_COOKIE_NAME)
        .filter(|token| !token.is_empty())
        .ok_or(MemberError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_cookie_format() {
        let cookie = CookieSettings::default().token_cookie("abc.def.ghi", 3600).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "X-AUTH-TOKEN=abc.def.ghi; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_secure_flag() {
        let cookie = CookieSettings { secure: true }.token_cookie("t", 60).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_empties_value() {
        let cookie = CookieSettings::default().clear_cookie();
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("X-AUTH-TOKEN=;"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(bearer_header("abc").unwrap().to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_parse_cookie_among_others() {
        let headers = headers_with(header::COOKIE, "theme=dark; X-AUTH-TOKEN=tok; lang=en");
        assert_eq!(parse_cookie(&headers, AUTH_COOKIE_NAME).as_deref(), Some("tok"));
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_prefers_authorization_header() {
        let mut headers = headers_with(header::AUTHORIZATION, "Bearer from-header");
        headers.insert(header::COOKIE, HeaderValue::from_static("X-AUTH-TOKEN=from-cookie"));
        assert_eq!(extract_token(&headers).unwrap(), "from-header");
    }

    #[test]
    fn test_extract_falls_back_to_cookie() {
        let headers = headers_with(header::COOKIE, "X-AUTH-TOKEN=from-cookie");
        assert_eq!(extract_token(&headers).unwrap(), "from-cookie");
    }

    #[test]
    fn test_extract_rejects_non_bearer_scheme() {
        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert!(matches!(extract_token(&headers), Err(MemberError::InvalidToken)));
    }

    #[test]
    fn test_extract_treats_cleared_cookie_as_missing() {
        let headers = headers_with(header::COOKIE, "X-AUTH-TOKEN=");
        assert!(matches!(extract_token(&headers), Err(MemberError::MissingToken)));
        assert!(matches!(extract_token(&HeaderMap::new()), Err(MemberError::MissingToken)));
    }
}
