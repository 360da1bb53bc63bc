use thiserror::Error;

/// Errors raised while assembling a chain or registering interceptors.
///
/// These are setup errors: they surface from [`ChainPipeline::new`] and
/// [`ChainPipeline::intercept`], never from `execute`.
///
/// [`ChainPipeline::new`]: crate::ChainPipeline::new
/// [`ChainPipeline::intercept`]: crate::ChainPipeline::intercept
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The chain was declared with no phases.
    #[error("execute chain shouldn't be empty")]
    EmptyPhases,

    /// The same phase was declared more than once.
    #[error("phase {phase} was declared more than once")]
    DuplicatePhase {
        /// Display name of the repeated phase
        phase: String,
    },

    /// An interceptor targeted a phase this chain does not know about.
    #[error("phase {phase} was not registered for this chain")]
    PhaseNotRegistered {
        /// Display name of the unknown phase
        phase: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_phase() {
        let err = ConfigError::PhaseNotRegistered {
            phase: "State".to_string(),
        };
        assert_eq!(err.to_string(), "phase State was not registered for this chain");

        let err = ConfigError::DuplicatePhase {
            phase: "Validation".to_string(),
        };
        assert!(err.to_string().contains("Validation"));
    }

    #[test]
    fn empty_phases_message() {
        assert_eq!(
            ConfigError::EmptyPhases.to_string(),
            "execute chain shouldn't be empty"
        );
    }
}
