use http::header::{HeaderName, HeaderValue, SET_COOKIE};
use http::{HeaderMap, StatusCode};

use super::cookies::Cookie;
use super::request::HttpRequestData;

/// Returns true for the statuses the redirect feature follows: 301, 302,
/// 307 and 308. `303 See Other` is not followed.
pub fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates an empty response with `status`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the first value of `name` if it is valid visible ASCII.
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns true if the status is one the redirect feature follows.
    pub fn is_redirect(&self) -> bool {
        is_redirect(self.status)
    }

    /// Parses every `Set-Cookie` header, skipping malformed ones.
    pub fn set_cookies(&self) -> Vec<Cookie> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(Cookie::parse_set_cookie)
            .collect()
    }
}

/// A completed exchange: the request that was actually sent and its response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientCall {
    /// The request as it reached the engine
    pub request: HttpRequestData,
    /// The engine's response
    pub response: HttpResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::LOCATION;

    #[test]
    fn redirect_classification() {
        for code in [301, 302, 307, 308] {
            assert!(is_redirect(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [200, 204, 303, 304, 400, 500] {
            assert!(!is_redirect(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(StatusCode::FOUND)
            .with_header(LOCATION, HeaderValue::from_static("/next"));

        assert_eq!(response.header(HeaderName::from_static("location")), Some("/next"));
        assert!(response.is_redirect());
    }

    #[test]
    fn set_cookies_skips_malformed_values() {
        let response = HttpResponse::new(StatusCode::OK)
            .with_header(SET_COOKIE, HeaderValue::from_static("session=abc; Path=/"))
            .with_header(SET_COOKIE, HeaderValue::from_static("no-equals-sign"))
            .with_header(SET_COOKIE, HeaderValue::from_static("theme=dark"));

        let names: Vec<String> = response
            .set_cookies()
            .into_iter()
            .map(|cookie| cookie.name)
            .collect();
        assert_eq!(names, vec!["session", "theme"]);
    }
}
