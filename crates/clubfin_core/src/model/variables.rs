//! The financial variable model
//!
//! A variable is a named numeric quantity with an optional formula and a
//! declared dependency list. Variables with no formula hold whatever value
//! the caller last set; formula-bearing variables are rewritten on every
//! recompute from their resolved dependencies.

use serde::{Deserialize, Serialize};

use super::ids::VariableId;
use crate::formula::Formula;

/// Classification bucket used for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Revenue,
    Cost,
    Metric,
    Projection,
}

/// Unit attached to a variable's value.
///
/// Units drive business validation: currency amounts on revenue/cost
/// variables and day counts must be non-negative; percentages may be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Currency,
    Percentage,
    Number,
    Days,
}

/// A named, dependency-linked financial quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialVariable {
    pub id: VariableId,
    pub name: String,
    /// Evaluated over the declared dependencies on every recompute.
    /// `None` means the variable is a plain input holding its stored value.
    pub formula: Option<Formula>,
    pub value: f64,
    /// Ids this variable's formula may reference. Must name existing
    /// variables; the relation over all variables must stay acyclic.
    pub dependencies: Vec<VariableId>,
    pub category: Category,
    pub unit: Unit,
    pub description: String,
}

impl FinancialVariable {
    /// Create a plain input variable with no formula.
    #[must_use]
    pub fn input(
        id: impl Into<VariableId>,
        name: impl Into<String>,
        value: f64,
        category: Category,
        unit: Unit,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: None,
            value,
            dependencies: Vec::new(),
            category,
            unit,
            description: String::new(),
        }
    }

    /// Create a derived variable computed from `dependencies` via `formula`.
    #[must_use]
    pub fn derived(
        id: impl Into<VariableId>,
        name: impl Into<String>,
        formula: Formula,
        dependencies: Vec<VariableId>,
        category: Category,
        unit: Unit,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: Some(formula),
            value: 0.0,
            dependencies,
            category,
            unit,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
