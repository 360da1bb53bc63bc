use std::fmt;

use crate::phase::Phase;

/// A logging handle for code running inside one phase of a chain.
///
/// Every message carries `phase` and `feature` fields so interleaved
/// executions stay attributable in structured output.
///
/// ```no_run
/// # use chain_pipeline::{Phase, PhaseLog};
/// let phase = Phase::new("Validation");
/// let log = PhaseLog::new(&phase, "HttpRedirect");
/// log.debug(format_args!("following redirect to {}", "/next"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PhaseLog<'a> {
    phase: &'a Phase,
    feature: &'static str,
}

impl<'a> PhaseLog<'a> {
    /// Creates a logger for `feature` running in `phase`.
    pub fn new(phase: &'a Phase, feature: &'static str) -> Self {
        Self { phase, feature }
    }

    /// Returns the phase this logger reports for.
    pub fn phase(&self) -> &Phase {
        self.phase
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(phase = %self.phase, feature = self.feature, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(phase = %self.phase, feature = self.feature, "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_log_exposes_phase() {
        let phase = Phase::new("State");
        let log = PhaseLog::new(&phase, "HttpCookies");

        assert_eq!(log.phase(), &phase);
        log.debug(format_args!("no subscriber installed, message is dropped"));
    }
}
