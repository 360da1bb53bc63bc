//! Redirect following.
//!
//! Installed on the `Validation` phase, so every hop passes back through the
//! `State` phase (cookies included) before reaching the engine.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::LOCATION;

use super::error::{ClientError, RedirectError, RedirectErrorKind};
use super::feature::HttpClientFeature;
use super::request::{HttpRequestBuilder, HttpRequestData};
use super::send::{HttpSendChain, SendNext, SendResult};
use super::HttpClient;
use crate::logging::PhaseLog;

/// Configuration for [`HttpRedirect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpRedirectConfig {
    /// Maximum number of requests sent for one call, the first included.
    pub max_jumps: usize,
}

impl HttpRedirectConfig {
    /// Sets the maximum number of requests sent for one call.
    pub fn max_jumps(mut self, max_jumps: usize) -> Self {
        self.max_jumps = max_jumps;
        self
    }
}

impl Default for HttpRedirectConfig {
    fn default() -> Self {
        Self { max_jumps: 20 }
    }
}

/// Follows `301`, `302`, `307` and `308` responses.
///
/// Each hop re-sends the original request with only its URL replaced by the
/// `Location` target. The call fails with a [`RedirectError`] if a redirect
/// has no location, or if `max_jumps` requests all came back as redirects.
#[derive(Debug, Clone, Copy)]
pub struct HttpRedirect {
    max_jumps: usize,
}

impl HttpRedirect {
    /// Creates the feature directly from a jump limit.
    pub fn new(max_jumps: usize) -> Self {
        Self { max_jumps }
    }

    /// Returns the configured jump limit.
    pub fn max_jumps(&self) -> usize {
        self.max_jumps
    }
}

#[async_trait]
impl HttpClientFeature for HttpRedirect {
    type Config = HttpRedirectConfig;
    const NAME: &'static str = "HttpRedirect";

    async fn prepare(config: HttpRedirectConfig) -> Result<Self, ClientError> {
        Ok(Self::new(config.max_jumps))
    }

    fn install(feature: Arc<Self>, client: &HttpClient) -> Result<(), ClientError> {
        let max_jumps = feature.max_jumps;
        client
            .send_pipeline()
            .intercept(HttpSendChain::validation(), move |next, request| {
                follow_redirects(max_jumps, next, request)
            })?;
        Ok(())
    }
}

async fn follow_redirects(max_jumps: usize, next: SendNext, original: HttpRequestData) -> SendResult {
    let log = PhaseLog::new(HttpSendChain::validation(), HttpRedirect::NAME);
    let mut request = original.clone();

    for jump in 1..=max_jumps {
        let call = next.run(request).await?;
        if !call.response.is_redirect() {
            return Ok(call);
        }

        let Some(location) = call.response.header(LOCATION) else {
            log.warn(format_args!(
                "{} from {} has no location",
                call.response.status, call.request.url
            ));
            return Err(RedirectError::new(RedirectErrorKind::MissingLocation, call.request).into());
        };

        request = HttpRequestBuilder::take_from(&original)
            .url(call.request.url.clone())
            .follow_location(location)?
            .build();
        log.debug(format_args!(
            "jump {}/{}: {} -> {}",
            jump, max_jumps, call.request.url, request.url
        ));
    }

    log.warn(format_args!("redirect limit {} exceeded", max_jumps));
    Err(RedirectError::new(RedirectErrorKind::LimitExceeded { max_jumps }, request).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_allows_twenty_jumps() {
        assert_eq!(HttpRedirectConfig::default().max_jumps, 20);
        assert_eq!(HttpRedirectConfig::default().max_jumps(3).max_jumps, 3);
    }

    #[test]
    fn prepare_applies_config() {
        let feature =
            futures::executor::block_on(HttpRedirect::prepare(HttpRedirectConfig::default().max_jumps(5)))
                .unwrap();
        assert_eq!(feature.max_jumps(), 5);
    }
}
