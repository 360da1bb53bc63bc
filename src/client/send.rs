use std::future::Future;
use std::sync::{Arc, LazyLock};

use super::engine::HttpClientEngine;
use super::error::ClientError;
use super::request::HttpRequestData;
use super::response::HttpClientCall;
use crate::error::ConfigError;
use crate::phase::Phase;
use crate::pipeline::{ChainPipeline, Next};

/// What the send pipeline produces for one request.
pub type SendResult = Result<HttpClientCall, ClientError>;

/// Continuation type seen by send pipeline interceptors.
pub type SendNext = Next<HttpRequestData, SendResult>;

static VALIDATION: LazyLock<Phase> = LazyLock::new(|| Phase::new("Validation"));
static STATE: LazyLock<Phase> = LazyLock::new(|| Phase::new("State"));

/// The chain every outgoing request passes through on its way to the engine.
///
/// Phases, in order:
/// - [`validation`](Self::validation): checks on the finished exchange, such
///   as redirect following
/// - [`state`](Self::state): per-host state attached to each attempt, such as
///   cookies
pub struct HttpSendChain {
    chain: ChainPipeline<HttpRequestData, SendResult>,
}

impl HttpSendChain {
    /// The outer phase.
    pub fn validation() -> &'static Phase {
        &VALIDATION
    }

    /// The inner phase, closest to the engine.
    pub fn state() -> &'static Phase {
        &STATE
    }

    /// Builds a send chain ending in `engine`.
    pub fn new(engine: Arc<dyn HttpClientEngine>) -> Result<Self, ConfigError> {
        let chain = ChainPipeline::new(
            [Self::validation().clone(), Self::state().clone()],
            move |request: HttpRequestData| {
                let engine = Arc::clone(&engine);
                async move { engine.execute(request).await }
            },
        )?;

        Ok(Self { chain })
    }

    /// Registers an interceptor on one of this chain's phases.
    pub fn intercept<F, Fut>(&self, phase: &Phase, interceptor: F) -> Result<(), ConfigError>
    where
        F: Fn(SendNext, HttpRequestData) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SendResult> + Send + 'static,
    {
        self.chain.intercept(phase, interceptor)
    }

    /// Sends `request` through every phase.
    pub async fn execute(&self, request: HttpRequestData) -> SendResult {
        self.chain.execute(request).await
    }

    /// Returns the underlying chain.
    pub fn pipeline(&self) -> &ChainPipeline<HttpRequestData, SendResult> {
        &self.chain
    }
}

impl std::fmt::Debug for HttpSendChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpSendChain").field(&self.chain).finish()
    }
}
