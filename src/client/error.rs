use std::fmt;

use thiserror::Error;

use super::request::HttpRequestData;
use crate::error::ConfigError;

/// Errors surfaced by [`HttpClient`](super::HttpClient) and its send pipeline.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The send pipeline was misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The redirect feature gave up.
    #[error(transparent)]
    Redirect(#[from] RedirectError),

    /// A URL could not be parsed or resolved.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// A header value could not be encoded.
    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),

    /// The same feature was installed twice on one client.
    #[error("feature {0} is already installed")]
    FeatureAlreadyInstalled(&'static str),

    /// The engine failed to produce a response.
    #[error("engine failure: {0}")]
    Engine(String),
}

/// Why a redirect chain was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectErrorKind {
    /// A redirect status arrived without a `Location` header.
    MissingLocation,
    /// The configured number of jumps ran out.
    LimitExceeded {
        /// The configured limit
        max_jumps: usize,
    },
}

impl fmt::Display for RedirectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLocation => write!(f, "redirect location is missing"),
            Self::LimitExceeded { max_jumps } => {
                write!(f, "redirect limit {} exceeded", max_jumps)
            }
        }
    }
}

/// A redirect failure together with the last request it concerned.
#[derive(Debug, Clone)]
pub struct RedirectError {
    kind: RedirectErrorKind,
    request: HttpRequestData,
}

impl RedirectError {
    /// Creates a new redirect error.
    pub fn new(kind: RedirectErrorKind, request: HttpRequestData) -> Self {
        Self { kind, request }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> RedirectErrorKind {
        self.kind
    }

    /// Returns the last request involved in the redirect chain.
    pub fn request(&self) -> &HttpRequestData {
        &self.request
    }
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.kind, self.request.method, self.request.url)
    }
}

impl std::error::Error for RedirectError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_error_names_request() {
        let request = HttpRequestData::get("http://a.test/loop").unwrap();
        let err = RedirectError::new(RedirectErrorKind::LimitExceeded { max_jumps: 3 }, request);

        assert_eq!(
            err.to_string(),
            "redirect limit 3 exceeded (GET http://a.test/loop)"
        );
        assert_eq!(err.kind(), RedirectErrorKind::LimitExceeded { max_jumps: 3 });
    }

    #[test]
    fn client_error_is_transparent_over_redirects() {
        let request = HttpRequestData::get("http://a.test/").unwrap();
        let err: ClientError =
            RedirectError::new(RedirectErrorKind::MissingLocation, request).into();

        assert_eq!(err.to_string(), "redirect location is missing (GET http://a.test/)");
    }
}
