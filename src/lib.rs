//! Phased, re-entrant interceptor chains for asynchronous transformations.
//!
//! This crate composes independent features around an async `In -> Out`
//! function without any feature knowing about the others:
//! - **Phases**: named ordering buckets, fixed when the chain is built
//! - **Interceptors**: code that runs before and after the rest of the chain,
//!   and decides whether to run it zero, one, or many times
//! - **Terminal function**: the base computation at the end of the last phase
//!
//! # Core Types
//!
//! - [`Phase`] / [`PhaseSet`]: phase identities and their declared order
//! - [`ChainPipeline`]: the chain itself (`new`, `intercept`, `execute`)
//! - [`Next`]: the continuation an interceptor runs to reach downstream code
//! - [`ConfigError`]: setup errors (empty phase list, unknown phase)
//! - [`PhaseLog`]: structured logging scoped to a phase
//!
//! The [`client`] module wires a two-phase HTTP send chain with redirect and
//! cookie features on top of the core.
//!
//! # Examples
//!
//! ```
//! use chain_pipeline::{ChainPipeline, Phase};
//!
//! # futures::executor::block_on(async {
//! let phase = Phase::new("Retry");
//! let chain = ChainPipeline::new([phase.clone()], |attempt: u32| async move {
//!     if attempt < 3 { Err(attempt) } else { Ok(attempt) }
//! })
//! .unwrap();
//!
//! // Re-runs the rest of the chain until it succeeds, at most five times.
//! chain
//!     .intercept(&phase, |next, mut attempt| async move {
//!         loop {
//!             match next.run(attempt).await {
//!                 Err(failed) if failed < 5 => attempt = failed + 1,
//!                 other => return other,
//!             }
//!         }
//!     })
//!     .unwrap();
//!
//! assert_eq!(chain.execute(0).await, Ok(3));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
mod error;
mod logging;
mod phase;
mod pipeline;

pub use error::ConfigError;
pub use logging::PhaseLog;
pub use phase::{Phase, PhaseSet};
pub use pipeline::{ChainPipeline, Next};
