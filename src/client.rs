//! A small HTTP client built on a phased send pipeline.
//!
//! This module is the worked example of [`ChainPipeline`](crate::ChainPipeline):
//! - [`HttpSendChain`]: `Validation` then `State`, ending in an engine
//! - [`HttpRedirect`]: follows redirects from the `Validation` phase
//! - [`HttpCookies`]: attaches and records cookies from the `State` phase
//! - [`HttpClient`]: owns the engine, the send chain and installed features
//!
//! Features never reference each other. Their relative order comes only from
//! the phases they register on, so installing cookies before or after
//! redirects yields the same behaviour: every redirect hop passes through the
//! cookie interceptor.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chain_pipeline::client::{
//!     HttpClient, HttpCookies, HttpCookiesConfig, HttpRedirect, HttpRedirectConfig,
//!     HttpRequestData, HttpResponse, MockEngine,
//! };
//! use http::header::{HeaderValue, LOCATION, SET_COOKIE};
//! use http::StatusCode;
//!
//! # futures::executor::block_on(async {
//! let engine = Arc::new(MockEngine::new(|request| {
//!     Ok(match request.url.path() {
//!         "/login" => HttpResponse::new(StatusCode::FOUND)
//!             .with_header(LOCATION, HeaderValue::from_static("/home"))
//!             .with_header(SET_COOKIE, HeaderValue::from_static("sid=1")),
//!         _ => HttpResponse::new(StatusCode::OK),
//!     })
//! }));
//!
//! let mut client = HttpClient::new(engine.clone()).unwrap();
//! client.install::<HttpCookies>(HttpCookiesConfig::default()).await.unwrap();
//! client.install::<HttpRedirect>(HttpRedirectConfig::default()).await.unwrap();
//!
//! let call = client
//!     .execute(HttpRequestData::get("https://a.test/login").unwrap())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(call.request.url.path(), "/home");
//! assert_eq!(call.request.headers["cookie"], "sid=1");
//! assert_eq!(client.cookies("a.test").await.len(), 1);
//! # });
//! ```

mod cookies;
mod engine;
mod error;
mod feature;
mod redirect;
mod request;
mod response;
mod send;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use cookies::{AcceptAllCookiesStorage, Cookie, CookiesStorage, HttpCookies, HttpCookiesConfig};
pub use engine::{HttpClientEngine, MockEngine};
pub use error::{ClientError, RedirectError, RedirectErrorKind};
pub use feature::{FeatureRegistry, HttpClientFeature};
pub use redirect::{HttpRedirect, HttpRedirectConfig};
pub use request::{HttpRequestBuilder, HttpRequestData};
pub use response::{is_redirect, HttpClientCall, HttpResponse};
pub use send::{HttpSendChain, SendNext, SendResult};

/// An HTTP client: an engine, the send chain in front of it, and the features
/// installed on that chain.
///
/// Features are installed during setup through `&mut self`; once traffic
/// starts the client is shared immutably, typically behind an [`Arc`].
pub struct HttpClient {
    send_pipeline: HttpSendChain,
    features: FeatureRegistry,
}

impl HttpClient {
    /// Creates a client with no features over `engine`.
    pub fn new(engine: Arc<dyn HttpClientEngine>) -> Result<Self, ClientError> {
        Ok(Self {
            send_pipeline: HttpSendChain::new(engine)?,
            features: FeatureRegistry::new(),
        })
    }

    /// Prepares feature `F` from `config` and installs it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FeatureAlreadyInstalled`] if `F` is already
    /// installed, or whatever `F` fails with while preparing or installing.
    pub async fn install<F: HttpClientFeature>(
        &mut self,
        config: F::Config,
    ) -> Result<Arc<F>, ClientError> {
        if self.features.contains::<F>() {
            return Err(ClientError::FeatureAlreadyInstalled(F::NAME));
        }

        let feature = Arc::new(F::prepare(config).await?);
        F::install(Arc::clone(&feature), self)?;
        self.features.insert(Arc::clone(&feature));

        tracing::info!(feature = F::NAME, "client feature installed");
        Ok(feature)
    }

    /// Returns the installed feature of type `F`.
    pub fn feature<F: HttpClientFeature>(&self) -> Option<Arc<F>> {
        self.features.get::<F>()
    }

    /// Returns the installed features.
    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// Returns the send pipeline features register on.
    pub fn send_pipeline(&self) -> &HttpSendChain {
        &self.send_pipeline
    }

    /// Sends `request` through the send pipeline.
    pub async fn execute(&self, request: HttpRequestData) -> SendResult {
        self.send_pipeline.execute(request).await
    }

    /// Returns the cookies stored for `host`, or none without [`HttpCookies`].
    pub async fn cookies(&self, host: &str) -> BTreeMap<String, Cookie> {
        match self.feature::<HttpCookies>() {
            Some(cookies) => cookies.get(host).await,
            None => BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("send_pipeline", &self.send_pipeline)
            .field("features", &self.features)
            .finish()
    }
}
