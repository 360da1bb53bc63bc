//! The phased interceptor chain.
//!
//! A [`ChainPipeline`] holds one composed function per phase. Registering an
//! interceptor on a phase swaps that phase's function for a wrapper around a
//! snapshot of the previous one, so interceptors within a phase nest in
//! reverse registration order while phases run in declared order:
//!
//! ```text
//! execute(input)
//!   │
//!   ├─ phase[0]: I_n( … I_1( forward ) … )
//!   │                          │
//!   ├─ phase[1]: J_m( … J_1( forward ) … )
//!   │                          │
//!   └─ phase[k]: K_p( … K_1( terminal ) … )
//! ```
//!
//! Each phase slot is an [`ArcSwap`], so concurrent `execute` calls read a
//! whole function or its replacement, never a partially built one.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::ConfigError;
use crate::phase::{Phase, PhaseSet};

type InterceptorFn<In, Out> = dyn Fn(Next<In, Out>, In) -> BoxFuture<'static, Out> + Send + Sync;

/// One composed phase function: `In -> Future<Out>`.
struct Handler<In, Out> {
    call: Box<dyn Fn(In) -> BoxFuture<'static, Out> + Send + Sync>,
}

impl<In, Out> Handler<In, Out> {
    fn new(call: impl Fn(In) -> BoxFuture<'static, Out> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            call: Box::new(call),
        })
    }
}

/// The continuation handed to an interceptor.
///
/// Running it executes everything downstream of the interceptor: the
/// interceptors registered before it on the same phase, then all later
/// phases, then the terminal function. It may be run any number of times,
/// including zero.
///
/// A `Next` is a snapshot taken when its interceptor was registered; it is
/// cheap to clone and can be moved into spawned futures.
pub struct Next<In, Out> {
    handler: Arc<Handler<In, Out>>,
}

impl<In, Out> Next<In, Out> {
    /// Runs the downstream chain with `input`.
    pub fn run(&self, input: In) -> BoxFuture<'static, Out> {
        (self.handler.call)(input)
    }
}

impl<In, Out> Clone for Next<In, Out> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<In, Out> fmt::Debug for Next<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

struct PhaseSlot<In, Out> {
    phase: Phase,
    current: ArcSwap<Handler<In, Out>>,
    interceptors: AtomicUsize,
}

impl<In, Out> PhaseSlot<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    fn new(phase: Phase, base: Arc<Handler<In, Out>>) -> Self {
        Self {
            phase,
            current: ArcSwap::new(base),
            interceptors: AtomicUsize::new(0),
        }
    }

    /// Forwards to whatever function `downstream` holds at call time.
    fn forwarder(downstream: Arc<Self>) -> Arc<Handler<In, Out>> {
        Handler::new(move |input| (downstream.current.load().call)(input))
    }
}

/// An asynchronous, phased interceptor chain from `In` to `Out`.
///
/// Failures are part of `Out`: a chain over `Result<T, E>` passes every error
/// raised by the terminal function or by an interceptor straight back to the
/// caller of [`execute`](Self::execute).
///
/// # Examples
///
/// ```
/// use chain_pipeline::{ChainPipeline, Phase};
///
/// # futures::executor::block_on(async {
/// let outer = Phase::new("Outer");
/// let inner = Phase::new("Inner");
///
/// let chain = ChainPipeline::new([outer.clone(), inner.clone()], |input: u32| async move {
///     input * 10
/// })
/// .unwrap();
///
/// // Runs first: sees the raw input, adjusts it on the way in.
/// chain
///     .intercept(&outer, |next, input| async move { next.run(input + 1).await })
///     .unwrap();
///
/// // Runs second: adjusts the output on the way out.
/// chain
///     .intercept(&inner, |next, input| async move { next.run(input).await + 5 })
///     .unwrap();
///
/// assert_eq!(chain.execute(1).await, 25);
/// # });
/// ```
pub struct ChainPipeline<In, Out> {
    phases: PhaseSet,
    slots: Vec<Arc<PhaseSlot<In, Out>>>,
}

impl<In, Out> ChainPipeline<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Builds a chain over `phases` ending in `terminal`.
    ///
    /// The last phase starts out as the terminal function; every earlier
    /// phase starts out forwarding to the next phase's current function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPhases`] if no phase is given and
    /// [`ConfigError::DuplicatePhase`] if a phase is listed twice.
    pub fn new<F, Fut>(
        phases: impl IntoIterator<Item = Phase>,
        terminal: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
    {
        Self::with_phase_set(PhaseSet::new(phases)?, terminal)
    }

    /// Builds a chain over an already validated [`PhaseSet`].
    pub fn with_phase_set<F, Fut>(phases: PhaseSet, terminal: F) -> Result<Self, ConfigError>
    where
        F: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
    {
        if phases.is_empty() {
            return Err(ConfigError::EmptyPhases);
        }

        let terminal = Handler::new(move |input| terminal(input).boxed());

        let mut slots: Vec<Arc<PhaseSlot<In, Out>>> = Vec::with_capacity(phases.len());
        for phase in phases.iter().rev() {
            let base = match slots.last() {
                Some(downstream) => PhaseSlot::forwarder(Arc::clone(downstream)),
                None => Arc::clone(&terminal),
            };
            slots.push(Arc::new(PhaseSlot::new(phase.clone(), base)));
        }
        slots.reverse();

        let order: Vec<&str> = phases.iter().map(Phase::name).collect();
        tracing::debug!(phases = %order.join(" -> "), "chain pipeline constructed");

        Ok(Self { phases, slots })
    }

    /// Registers `interceptor` on `phase`.
    ///
    /// The interceptor wraps the phase's function as it is at the moment of
    /// this call, so later registrations on the same phase run before
    /// earlier ones on the way in and after them on the way out. Executions
    /// already in flight keep the functions they loaded.
    ///
    /// Registering the same interceptor twice applies it twice.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PhaseNotRegistered`] if `phase` is not one of
    /// this chain's phases. Phases are compared by identity, so a different
    /// phase with the same name is rejected.
    pub fn intercept<F, Fut>(&self, phase: &Phase, interceptor: F) -> Result<(), ConfigError>
    where
        F: Fn(Next<In, Out>, In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
    {
        let slot = self.slot(phase)?;

        let interceptor: Arc<InterceptorFn<In, Out>> =
            Arc::new(move |next: Next<In, Out>, input: In| interceptor(next, input).boxed());

        // Retried on contention; every attempt wraps the freshest parent.
        slot.current.rcu(|parent| {
            let next = Next {
                handler: Arc::clone(parent),
            };
            let interceptor = Arc::clone(&interceptor);
            Handler::new(move |input| interceptor(next.clone(), input))
        });

        let depth = slot.interceptors.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(phase = %phase, depth, "interceptor registered");

        Ok(())
    }

    /// Runs `input` through every phase and the terminal function.
    ///
    /// Whatever the terminal function or an interceptor produces is returned
    /// as is; the chain adds no error of its own.
    pub async fn execute(&self, input: In) -> Out {
        let entry = &self.slots[0];
        tracing::trace!(phase = %entry.phase, "executing chain");
        let head = entry.current.load_full();
        (head.call)(input).await
    }

    /// Returns the phases of this chain in declared order.
    pub fn phases(&self) -> &PhaseSet {
        &self.phases
    }

    /// Returns how many interceptors have been registered on `phase`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PhaseNotRegistered`] for unknown phases.
    pub fn interceptor_count(&self, phase: &Phase) -> Result<usize, ConfigError> {
        Ok(self.slot(phase)?.interceptors.load(Ordering::Acquire))
    }

    fn slot(&self, phase: &Phase) -> Result<&PhaseSlot<In, Out>, ConfigError> {
        self.phases
            .position(phase)
            .map(|index| self.slots[index].as_ref())
            .ok_or_else(|| ConfigError::PhaseNotRegistered {
                phase: phase.name().to_string(),
            })
    }
}

impl<In, Out> fmt::Debug for ChainPipeline<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for slot in &self.slots {
            list.entry(&format_args!(
                "{} ({} interceptors)",
                slot.phase,
                slot.interceptors.load(Ordering::Acquire)
            ));
        }
        list.finish()
    }
}
