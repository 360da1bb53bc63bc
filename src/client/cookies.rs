//! Cookie management for the send pipeline.
//!
//! [`HttpCookies`] runs in the `State` phase. Before each attempt it attaches
//! the cookies stored for the target host; after the attempt it stores every
//! `Set-Cookie` the response carried. The caller's request is never edited:
//! a copy with the extra header goes downstream instead.

mod cookie;
mod storage;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::header::{HeaderValue, COOKIE};

pub use cookie::Cookie;
pub use storage::{AcceptAllCookiesStorage, CookiesStorage};

use cookie::render_cookie_header;

use super::error::ClientError;
use super::feature::HttpClientFeature;
use super::request::{HttpRequestBuilder, HttpRequestData};
use super::send::{HttpSendChain, SendNext, SendResult};
use super::HttpClient;
use crate::logging::PhaseLog;

/// Configuration for [`HttpCookies`].
///
/// # Examples
///
/// ```
/// use chain_pipeline::client::{Cookie, HttpCookiesConfig};
///
/// let config = HttpCookiesConfig::default()
///     .default_cookie("example.com", Cookie::new("locale", "en"));
/// assert_eq!(config.defaults().len(), 1);
/// ```
pub struct HttpCookiesConfig {
    storage: Arc<dyn CookiesStorage>,
    defaults: Vec<(String, Cookie)>,
}

impl HttpCookiesConfig {
    /// Uses `storage` instead of a fresh [`AcceptAllCookiesStorage`].
    pub fn storage(mut self, storage: Arc<dyn CookiesStorage>) -> Self {
        self.storage = storage;
        self
    }

    /// Adds a cookie written to the storage when the feature is prepared.
    pub fn default_cookie(mut self, host: impl Into<String>, cookie: Cookie) -> Self {
        self.defaults.push((host.into().to_lowercase(), cookie));
        self
    }

    /// Returns the configured default cookies.
    pub fn defaults(&self) -> &[(String, Cookie)] {
        &self.defaults
    }
}

impl Default for HttpCookiesConfig {
    fn default() -> Self {
        Self {
            storage: Arc::new(AcceptAllCookiesStorage::new()),
            defaults: Vec::new(),
        }
    }
}

impl std::fmt::Debug for HttpCookiesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCookiesConfig")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Sends stored cookies and records received ones.
pub struct HttpCookies {
    storage: Arc<dyn CookiesStorage>,
}

impl HttpCookies {
    /// Creates the feature over `storage`.
    pub fn new(storage: Arc<dyn CookiesStorage>) -> Self {
        Self { storage }
    }

    /// Returns every cookie stored for `host`.
    pub async fn get(&self, host: &str) -> BTreeMap<String, Cookie> {
        self.storage.get(&host.to_lowercase()).await
    }

    /// Returns the cookie called `name` for `host`.
    pub async fn get_one(&self, host: &str, name: &str) -> Option<Cookie> {
        self.storage.get_one(&host.to_lowercase(), name).await
    }

    /// Calls `f` with every cookie stored for `host`, ordered by name.
    pub async fn for_each(&self, host: &str, mut f: impl FnMut(&Cookie)) {
        for cookie in self.get(host).await.values() {
            f(cookie);
        }
    }

    /// Returns the backing storage.
    pub fn storage(&self) -> &Arc<dyn CookiesStorage> {
        &self.storage
    }
}

impl std::fmt::Debug for HttpCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCookies").finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpClientFeature for HttpCookies {
    type Config = HttpCookiesConfig;
    const NAME: &'static str = "HttpCookies";

    async fn prepare(config: HttpCookiesConfig) -> Result<Self, ClientError> {
        for (host, cookie) in config.defaults {
            config.storage.add_cookie(&host, cookie).await;
        }
        Ok(Self::new(config.storage))
    }

    fn install(feature: Arc<Self>, client: &HttpClient) -> Result<(), ClientError> {
        client
            .send_pipeline()
            .intercept(HttpSendChain::state(), move |next, request| {
                exchange_cookies(Arc::clone(&feature), next, request)
            })?;
        Ok(())
    }
}

async fn exchange_cookies(
    feature: Arc<HttpCookies>,
    next: SendNext,
    request: HttpRequestData,
) -> SendResult {
    let log = PhaseLog::new(HttpSendChain::state(), HttpCookies::NAME);
    let host = request.host();

    let stored = feature.storage.get(&host).await;
    let request = if stored.is_empty() {
        request
    } else {
        // Pairs the caller set go first; everything leaves as one header.
        let mut pairs: Vec<&str> = request
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        let rendered = render_cookie_header(stored.values());
        pairs.push(&rendered);
        let header = HeaderValue::from_str(&pairs.join("; "))?;

        log.debug(format_args!("attaching {} cookies for {}", stored.len(), host));
        HttpRequestBuilder::take_from(&request)
            .set_header(COOKIE, header)
            .build()
    };

    let call = next.run(request).await?;

    for cookie in call.response.set_cookies() {
        log.debug(format_args!("storing cookie {} for {}", cookie.name, host));
        feature.storage.add_cookie(&host, cookie).await;
    }

    Ok(call)
}
