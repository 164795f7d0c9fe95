//! The canonical variable store
//!
//! Exclusively owned by the computation context; callers only ever see
//! snapshots. Insertion order is preserved and is the deterministic
//! tie-break for dependency resolution.

use rustc_hash::FxHashMap;

use crate::error::{EngineError, Result};
use crate::model::{FinancialVariable, VariableId};

/// Insertion-ordered set of financial variables, unique by id.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    variables: Vec<FinancialVariable>,
    index: FxHashMap<VariableId, usize>,
}

impl VariableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from variables in order. Fails on the first duplicate id.
    pub fn from_variables(
        variables: impl IntoIterator<Item = FinancialVariable>,
    ) -> Result<Self> {
        let mut store = Self::new();
        for variable in variables {
            store.add(variable)?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Add a new variable. The id must not already exist; ids are immutable
    /// once created.
    pub fn add(&mut self, variable: FinancialVariable) -> Result<()> {
        if self.index.contains_key(&variable.id) {
            return Err(EngineError::DuplicateId(variable.id));
        }
        self.index.insert(variable.id.clone(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    /// Set the stored value of an existing variable. Never auto-creates.
    pub fn update(&mut self, id: &VariableId, value: f64) -> Result<()> {
        match self.index.get(id) {
            Some(&i) => {
                self.variables[i].value = value;
                Ok(())
            }
            None => Err(EngineError::NotFound(id.clone())),
        }
    }

    #[must_use]
    pub fn get(&self, id: &VariableId) -> Option<&FinancialVariable> {
        self.index.get(id).map(|&i| &self.variables[i])
    }

    #[must_use]
    pub fn contains(&self, id: &VariableId) -> bool {
        self.index.contains_key(id)
    }

    /// Variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FinancialVariable> {
        self.variables.iter()
    }

    /// Point-in-time copy in insertion order. Callers iterating a snapshot
    /// never observe later mutation of the store.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FinancialVariable> {
        self.variables.clone()
    }

    /// Current value of a variable, if present.
    #[must_use]
    pub fn value(&self, id: &VariableId) -> Option<f64> {
        self.get(id).map(|v| v.value)
    }

    /// Overwrite a resolved value during recompute. Internal: the public
    /// mutation path is [`VariableStore::update`].
    pub(crate) fn set_resolved_value(&mut self, id: &VariableId, value: f64) {
        if let Some(&i) = self.index.get(id) {
            self.variables[i].value = value;
        }
    }
}
