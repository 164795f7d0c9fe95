//! Closed formula representation and its interpreter
//!
//! Formulas are a small tagged AST (constants, variable references, the four
//! arithmetic operators, negation) instead of free-form strings. That keeps
//! evaluation free of arbitrary code execution and lets validation check the
//! referenced ids against a variable's declared dependency list statically.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::NumericWarning;
use crate::model::VariableId;

/// Arithmetic operator in a [`Formula`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A pure expression over dependency values and literal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Constant(f64),
    Variable(VariableId),
    Binary {
        op: BinaryOp,
        lhs: Box<Formula>,
        rhs: Box<Formula>,
    },
    Negate(Box<Formula>),
}

impl Formula {
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    #[must_use]
    pub fn var(id: impl Into<VariableId>) -> Self {
        Self::Variable(id.into())
    }

    #[must_use]
    pub fn add(self, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Add, self, rhs)
    }

    #[must_use]
    pub fn sub(self, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Sub, self, rhs)
    }

    #[must_use]
    pub fn mul(self, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Mul, self, rhs)
    }

    #[must_use]
    pub fn div(self, rhs: Formula) -> Self {
        Self::binary(BinaryOp::Div, self, rhs)
    }

    #[must_use]
    pub fn neg(self) -> Self {
        Self::Negate(Box::new(self))
    }

    fn binary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Collect every variable id the formula references.
    ///
    /// Validation compares this set against the owning variable's declared
    /// `dependencies`; an undeclared reference is a declaration error, not a
    /// runtime error.
    pub fn collect_referenced_ids(&self, out: &mut Vec<VariableId>) {
        match self {
            Self::Constant(_) => {}
            Self::Variable(id) => {
                if !out.contains(id) {
                    out.push(id.clone());
                }
            }
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_referenced_ids(out);
                rhs.collect_referenced_ids(out);
            }
            Self::Negate(inner) => inner.collect_referenced_ids(out),
        }
    }

    #[must_use]
    pub fn referenced_ids(&self) -> Vec<VariableId> {
        let mut out = Vec::new();
        self.collect_referenced_ids(&mut out);
        out
    }

    /// Evaluate against resolved dependency values.
    ///
    /// Division by zero and non-finite intermediates resolve to `0.0` and
    /// push a [`NumericWarning`] for `owner`; a reference missing from
    /// `values` does the same. Evaluation itself never fails.
    pub fn evaluate(
        &self,
        owner: &VariableId,
        values: &FxHashMap<VariableId, f64>,
        warnings: &mut Vec<NumericWarning>,
    ) -> f64 {
        let raw = self.eval_inner(owner, values, warnings);
        if raw.is_finite() {
            raw
        } else {
            warnings.push(NumericWarning::NonFinite {
                variable: owner.clone(),
            });
            0.0
        }
    }

    fn eval_inner(
        &self,
        owner: &VariableId,
        values: &FxHashMap<VariableId, f64>,
        warnings: &mut Vec<NumericWarning>,
    ) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Variable(id) => match values.get(id) {
                Some(v) => *v,
                None => {
                    warnings.push(NumericWarning::UnresolvedReference {
                        variable: owner.clone(),
                        missing: id.clone(),
                    });
                    0.0
                }
            },
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.eval_inner(owner, values, warnings);
                let r = rhs.eval_inner(owner, values, warnings);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => {
                        if r == 0.0 {
                            warnings.push(NumericWarning::DivisionByZero {
                                variable: owner.clone(),
                            });
                            0.0
                        } else {
                            l / r
                        }
                    }
                }
            }
            Self::Negate(inner) => -inner.eval_inner(owner, values, warnings),
        }
    }
}
