//! Phase identities and the ordered phase set a chain is built from.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ConfigError;

static NEXT_PHASE_ID: AtomicU64 = AtomicU64::new(0);

/// A named ordering bucket for interceptors.
///
/// Phases compare by identity, not by name: two phases created with the same
/// name are distinct, while clones of one phase are equal to each other.
///
/// # Examples
///
/// ```
/// use chain_pipeline::Phase;
///
/// let a = Phase::new("State");
/// let b = Phase::new("State");
///
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_eq!(a.name(), b.name());
/// ```
#[derive(Clone)]
pub struct Phase {
    id: u64,
    name: Arc<str>,
}

impl Phase {
    /// Creates a new phase with a fresh identity.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_PHASE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Returns the display name of this phase.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Phase {}

impl std::hash::Hash for Phase {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase({}#{})", self.name, self.id)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An ordered, non-empty set of distinct phases.
///
/// The order is fixed at construction and cannot change afterwards.
///
/// # Examples
///
/// ```
/// use chain_pipeline::{Phase, PhaseSet};
///
/// let validation = Phase::new("Validation");
/// let state = Phase::new("State");
///
/// let set = PhaseSet::new([validation.clone(), state.clone()]).unwrap();
/// assert_eq!(set.position(&state), Some(1));
/// assert!(set.contains(&validation));
/// ```
#[derive(Debug, Clone)]
pub struct PhaseSet {
    phases: Vec<Phase>,
}

impl PhaseSet {
    /// Builds a phase set from an ordered list of phases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPhases`] if `phases` is empty and
    /// [`ConfigError::DuplicatePhase`] if the same phase appears twice.
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> Result<Self, ConfigError> {
        let mut ordered: Vec<Phase> = Vec::new();
        for phase in phases {
            if ordered.contains(&phase) {
                return Err(ConfigError::DuplicatePhase {
                    phase: phase.name().to_string(),
                });
            }
            ordered.push(phase);
        }

        if ordered.is_empty() {
            return Err(ConfigError::EmptyPhases);
        }

        Ok(Self { phases: ordered })
    }

    /// Returns the index of `phase` in this set, compared by identity.
    pub fn position(&self, phase: &Phase) -> Option<usize> {
        self.phases.iter().position(|p| p == phase)
    }

    /// Returns true if `phase` is a member of this set.
    pub fn contains(&self, phase: &Phase) -> bool {
        self.position(phase).is_some()
    }

    /// Returns the number of phases.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false; a phase set cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Iterates the phases in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, Phase> {
        self.phases.iter()
    }

    /// Returns the phases in declared order.
    pub fn as_slice(&self) -> &[Phase] {
        &self.phases
    }
}

impl<'a> IntoIterator for &'a PhaseSet {
    type Item = &'a Phase;
    type IntoIter = std::slice::Iter<'a, Phase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_compare_by_identity() {
        let first = Phase::new("1");
        let other = Phase::new("1");

        assert_ne!(first, other);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn phase_display_is_name() {
        let phase = Phase::new("Validation");
        assert_eq!(phase.to_string(), "Validation");
        assert!(format!("{:?}", phase).starts_with("Phase(Validation#"));
    }

    #[test]
    fn empty_phase_set_is_rejected() {
        let result = PhaseSet::new(Vec::new());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyPhases);
    }

    #[test]
    fn duplicate_phase_is_rejected() {
        let phase = Phase::new("State");
        let result = PhaseSet::new([phase.clone(), Phase::new("Other"), phase]);

        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicatePhase {
                phase: "State".to_string()
            }
        );
    }

    #[test]
    fn same_name_phases_are_both_kept() {
        let set = PhaseSet::new([Phase::new("x"), Phase::new("x")]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn position_follows_declared_order() {
        let phases: Vec<Phase> = (0..4).map(|i| Phase::new(i.to_string())).collect();
        let set = PhaseSet::new(phases.clone()).unwrap();

        for (index, phase) in phases.iter().enumerate() {
            assert_eq!(set.position(phase), Some(index));
        }
        assert_eq!(set.position(&Phase::new("0")), None);

        let names: Vec<&str> = set.iter().map(Phase::name).collect();
        assert_eq!(names, vec!["0", "1", "2", "3"]);
    }
}
