//! Structural and business validation
//!
//! A linter-style pass over a variable snapshot: every rule runs, every
//! violation is collected, and the caller gets one exhaustive report.
//! Nothing here throws; a failed check is data.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Cycle, EngineError};
use crate::model::{Category, FinancialVariable, Unit, ValidationResult, VariableId};

/// Validate a variable snapshot.
///
/// Errors: duplicate ids, dangling dependency references, dependency
/// cycles, formula references outside the declared dependency list, and
/// negative values where the unit implies non-negativity. Advisories that
/// do not invalidate the set (missing revenue/cost categories) are
/// reported as warnings.
#[must_use]
pub fn validate(variables: &[FinancialVariable]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut seen: FxHashSet<&VariableId> = FxHashSet::default();
    for variable in variables {
        if !seen.insert(&variable.id) {
            errors.push(EngineError::DuplicateId(variable.id.clone()).to_string());
        }
    }

    let known: FxHashSet<&VariableId> = variables.iter().map(|v| &v.id).collect();
    for variable in variables {
        for dep in &variable.dependencies {
            if !known.contains(dep) {
                errors.push(
                    EngineError::DanglingDependency {
                        variable: variable.id.clone(),
                        missing: dep.clone(),
                    }
                    .to_string(),
                );
            }
        }
    }

    for cycle in find_cycles(variables) {
        errors.push(EngineError::CyclicDependency(cycle).to_string());
    }

    for variable in variables {
        if let Some(formula) = &variable.formula {
            for referenced in formula.referenced_ids() {
                if !variable.dependencies.contains(&referenced) {
                    errors.push(format!(
                        "variable '{}' formula references '{referenced}' which is not a declared dependency",
                        variable.id
                    ));
                }
            }
        }
    }

    for variable in variables {
        let must_be_non_negative = matches!(variable.unit, Unit::Days)
            || (matches!(variable.unit, Unit::Currency)
                && matches!(variable.category, Category::Revenue | Category::Cost));
        if must_be_non_negative && variable.value < 0.0 {
            errors.push(format!(
                "variable '{}' has negative value {} for unit that requires non-negative amounts",
                variable.id, variable.value
            ));
        }
    }

    if !variables.is_empty() {
        if !variables.iter().any(|v| v.category == Category::Revenue) {
            warnings.push("no revenue variables defined".to_owned());
        }
        if !variables.iter().any(|v| v.category == Category::Cost) {
            warnings.push("no cost variables defined".to_owned());
        }
    }

    ValidationResult::new(errors, warnings)
}

/// Three-color DFS over the declared dependency edges, collecting every
/// cycle found. Missing dependencies are skipped here; the dangling check
/// reports those.
fn find_cycles(variables: &[FinancialVariable]) -> Vec<Cycle> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    let by_id: FxHashMap<&VariableId, &FinancialVariable> =
        variables.iter().map(|v| (&v.id, v)).collect();
    let mut marks: FxHashMap<VariableId, Mark> = FxHashMap::default();
    let mut cycles = Vec::new();

    fn visit(
        id: &VariableId,
        by_id: &FxHashMap<&VariableId, &FinancialVariable>,
        marks: &mut FxHashMap<VariableId, Mark>,
        path: &mut Vec<VariableId>,
        cycles: &mut Vec<Cycle>,
    ) {
        marks.insert(id.clone(), Mark::Visiting);
        path.push(id.clone());

        if let Some(variable) = by_id.get(id) {
            for dep in &variable.dependencies {
                match marks.get(dep) {
                    Some(Mark::Done) => {}
                    Some(Mark::Visiting) => {
                        let start = path.iter().position(|p| p == dep).unwrap_or(0);
                        cycles.push(Cycle(path[start..].to_vec()));
                    }
                    None => {
                        if by_id.contains_key(dep) {
                            visit(dep, by_id, marks, path, cycles);
                        }
                    }
                }
            }
        }

        path.pop();
        marks.insert(id.clone(), Mark::Done);
    }

    let mut path = Vec::new();
    for variable in variables {
        if !marks.contains_key(&variable.id) {
            visit(&variable.id, &by_id, &mut marks, &mut path, &mut cycles);
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;

    fn input(id: &str, value: f64, category: Category, unit: Unit) -> FinancialVariable {
        FinancialVariable::input(id, id, value, category, unit)
    }

    #[test]
    fn test_missing_dependency_yields_exactly_one_error() {
        let mut variable = input("orphan", 10.0, Category::Revenue, Unit::Currency);
        variable.dependencies.push("missing_id".into());

        let result = validate(&[variable]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("missing_id"));
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let mut dangling = input("a", 5.0, Category::Revenue, Unit::Currency);
        dangling.dependencies.push("nowhere".into());
        let negative = input("b", -3.0, Category::Cost, Unit::Currency);

        let result = validate(&[dangling, negative]);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_cycle_error_names_the_chain() {
        let mk = |id: &str, dep: &str| {
            FinancialVariable::derived(
                id,
                id,
                Formula::var(dep),
                vec![dep.into()],
                Category::Metric,
                Unit::Number,
            )
        };
        let result = validate(&[mk("a", "b"), mk("b", "c"), mk("c", "a")]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        for id in ["a", "b", "c"] {
            assert!(result.errors[0].contains(id));
        }
    }

    #[test]
    fn test_undeclared_formula_reference_is_a_declaration_error() {
        let mut variable = FinancialVariable::derived(
            "sneaky",
            "Sneaky",
            Formula::var("declared").add(Formula::var("undeclared")),
            vec!["declared".into()],
            Category::Metric,
            Unit::Number,
        );
        variable.value = 0.0;
        let declared = input("declared", 1.0, Category::Revenue, Unit::Currency);
        let undeclared = input("undeclared", 1.0, Category::Cost, Unit::Currency);

        let result = validate(&[declared, undeclared, variable]);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("undeclared")));
    }

    #[test]
    fn test_missing_categories_warn_but_stay_valid() {
        let result = validate(&[input("rev", 100.0, Category::Revenue, Unit::Currency)]);
        assert!(result.is_valid);
        assert_eq!(result.warnings, vec!["no cost variables defined".to_owned()]);
    }

    #[test]
    fn test_percentage_variables_may_be_negative() {
        let result = validate(&[input("delta", -0.15, Category::Metric, Unit::Percentage)]);
        assert!(result.is_valid);
    }

    #[test]
    fn test_empty_set_is_valid() {
        let result = validate(&[]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }
}
