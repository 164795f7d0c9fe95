//! Error taxonomy for the computation engine
//!
//! Structural integrity failures (duplicates, unknown references, cycles)
//! abort the current request and propagate as `EngineError`. Numeric edge
//! cases recover locally to `0.0` and are collected as [`NumericWarning`]s
//! so one malformed variable never blocks a whole recompute.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::VariableId;

/// A dependency cycle, in discovery order, excluding the closing repeat.
///
/// Displays as `a -> b -> c -> a` so callers see the full chain rather than
/// a generic "cycle detected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle(pub Vec<VariableId>);

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(id.as_str())?;
        }
        if let Some(first) = self.0.first() {
            write!(f, " -> {first}")?;
        }
        Ok(())
    }
}

impl Cycle {
    #[must_use]
    pub fn contains(&self, id: &VariableId) -> bool {
        self.0.contains(id)
    }
}

/// Structural failures that abort the current request.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum EngineError {
    #[error("variable '{0}' already exists")]
    DuplicateId(VariableId),

    #[error("variable '{0}' not found")]
    NotFound(VariableId),

    #[error("cyclic dependency: {0}")]
    CyclicDependency(Cycle),

    #[error("variable '{variable}' depends on unknown variable '{missing}'")]
    DanglingDependency {
        variable: VariableId,
        missing: VariableId,
    },
}

/// Non-fatal numeric degeneracies recorded during evaluation.
///
/// The affected variable resolves to `0.0` and the recompute continues;
/// the warning surfaces through `ValidationResult.warnings`.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum NumericWarning {
    #[error("variable '{variable}' divides by zero; value defaulted to 0")]
    DivisionByZero { variable: VariableId },

    #[error("variable '{variable}' produced a non-finite value; defaulted to 0")]
    NonFinite { variable: VariableId },

    #[error("variable '{variable}' references '{missing}' outside its resolved dependencies; defaulted to 0")]
    UnresolvedReference {
        variable: VariableId,
        missing: VariableId,
    },
}

impl NumericWarning {
    /// The variable the warning is attached to.
    #[must_use]
    pub fn variable(&self) -> &VariableId {
        match self {
            Self::DivisionByZero { variable }
            | Self::NonFinite { variable }
            | Self::UnresolvedReference { variable, .. } => variable,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_names_full_chain() {
        let cycle = Cycle(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(cycle.to_string(), "a -> b -> c -> a");
        let err = EngineError::CyclicDependency(cycle);
        let msg = err.to_string();
        assert!(msg.contains('a') && msg.contains('b') && msg.contains('c'));
    }

    #[test]
    fn test_dangling_names_both_sides() {
        let err = EngineError::DanglingDependency {
            variable: "profit".into(),
            missing: "missing_id".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("profit"));
        assert!(msg.contains("missing_id"));
    }
}
