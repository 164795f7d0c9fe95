//! Unique identifiers for engine entities
//!
//! Variables are addressed by caller-chosen string ids (`"court_revenue"`,
//! `"rent"`). The newtype keeps them from being confused with names,
//! descriptions, or formula text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a financial variable.
///
/// Ids are immutable once a variable is created; updates address the
/// variable through its id and may only change the value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableId(pub String);

impl VariableId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariableId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for VariableId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
