//! Outgoing request values and their builder.

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

/// An immutable description of an outgoing HTTP request.
///
/// Interceptors never edit a request in place; they derive a new one with
/// [`HttpRequestBuilder`] and pass that downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestData {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Vec<u8>,
}

impl HttpRequestData {
    /// Builds a body-less GET request for `url`.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `url` is not an absolute URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use chain_pipeline::client::HttpRequestData;
    ///
    /// let request = HttpRequestData::get("https://example.com/a").unwrap();
    /// assert_eq!(request.url.host_str(), Some("example.com"));
    /// assert!(request.headers.is_empty());
    /// ```
    pub fn get(url: &str) -> Result<Self, url::ParseError> {
        Ok(HttpRequestBuilder::new(Url::parse(url)?).build())
    }

    /// Returns the lowercased host of the target URL, or an empty string.
    pub fn host(&self) -> String {
        self.url.host_str().unwrap_or_default().to_lowercase()
    }
}

/// Builder for [`HttpRequestData`].
///
/// [`take_from`](Self::take_from) copies every field of an existing request,
/// so callers only override what changes:
///
/// ```
/// use chain_pipeline::client::{HttpRequestBuilder, HttpRequestData};
/// use http::header::{HeaderValue, ACCEPT};
///
/// let original = HttpRequestData::get("https://example.com/old").unwrap();
/// let moved = HttpRequestBuilder::take_from(&original)
///     .follow_location("/new")
///     .unwrap()
///     .header(ACCEPT, HeaderValue::from_static("text/html"))
///     .build();
///
/// assert_eq!(moved.url.as_str(), "https://example.com/new");
/// assert_eq!(original.url.as_str(), "https://example.com/old");
/// assert!(original.headers.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpRequestBuilder {
    /// Starts a GET request for `url`.
    pub fn new(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Starts from a copy of `request`.
    pub fn take_from(request: &HttpRequestData) -> Self {
        Self::from(request.clone())
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Replaces the target URL.
    pub fn url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }

    /// Points the request at `location`, resolved against the current URL.
    ///
    /// Absolute locations replace the URL outright; relative ones keep the
    /// current scheme and authority.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `location` cannot be resolved.
    pub fn follow_location(mut self, location: &str) -> Result<Self, url::ParseError> {
        self.url = self.url.join(location)?;
        Ok(self)
    }

    /// Appends a header, keeping existing values with the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets a header, dropping every existing value with the same name.
    pub fn set_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Finishes the request.
    pub fn build(self) -> HttpRequestData {
        HttpRequestData {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl From<HttpRequestData> for HttpRequestBuilder {
    fn from(request: HttpRequestData) -> Self {
        Self {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body: request.body,
        }
    }
}
