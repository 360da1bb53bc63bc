use std::fmt;

/// A cookie as received in a `Set-Cookie` header.
///
/// Only the attributes the client needs are kept; unknown attributes are
/// ignored while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// `Domain` attribute
    pub domain: Option<String>,
    /// `Path` attribute
    pub path: Option<String>,
    /// `Max-Age` attribute, in seconds
    pub max_age: Option<i64>,
    /// `Secure` flag
    pub secure: bool,
    /// `HttpOnly` flag
    pub http_only: bool,
}

impl Cookie {
    /// Creates a cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    /// Parses a `Set-Cookie` header value.
    ///
    /// Returns `None` when the leading `name=value` pair is missing or the
    /// name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use chain_pipeline::client::Cookie;
    ///
    /// let cookie = Cookie::parse_set_cookie("sid=42; Path=/; HttpOnly").unwrap();
    /// assert_eq!(cookie.name, "sid");
    /// assert_eq!(cookie.value, "42");
    /// assert_eq!(cookie.path.as_deref(), Some("/"));
    /// assert!(cookie.http_only);
    ///
    /// assert!(Cookie::parse_set_cookie("garbage").is_none());
    /// ```
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        for attribute in parts {
            let (key, value) = match attribute.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (attribute.trim(), None),
            };

            match (key.to_ascii_lowercase().as_str(), value) {
                ("domain", Some(domain)) => {
                    cookie.domain = Some(domain.trim_start_matches('.').to_lowercase())
                }
                ("path", Some(path)) => cookie.path = Some(path.to_string()),
                ("max-age", Some(age)) => cookie.max_age = age.parse().ok(),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => {}
            }
        }

        Some(cookie)
    }

    /// Returns true if `Max-Age` asks the client to drop the cookie now.
    pub fn is_expired(&self) -> bool {
        self.max_age.is_some_and(|age| age <= 0)
    }

    /// Renders the `name=value` pair sent back in a `Cookie` header.
    pub fn render_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Renders the cookie as a `Set-Cookie` header value.
    pub fn render_set_cookie(&self) -> String {
        let mut rendered = self.render_pair();
        if let Some(domain) = &self.domain {
            rendered.push_str("; Domain=");
            rendered.push_str(domain);
        }
        if let Some(path) = &self.path {
            rendered.push_str("; Path=");
            rendered.push_str(path);
        }
        if let Some(max_age) = self.max_age {
            rendered.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.secure {
            rendered.push_str("; Secure");
        }
        if self.http_only {
            rendered.push_str("; HttpOnly");
        }
        rendered
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_set_cookie())
    }
}

/// Renders cookies as a single `Cookie` header value: `a=1; b=2`.
pub(crate) fn render_cookie_header<'a>(cookies: impl IntoIterator<Item = &'a Cookie>) -> String {
    cookies
        .into_iter()
        .map(Cookie::render_pair)
        .collect::<Vec<_>>()
        .join("; ")
}
