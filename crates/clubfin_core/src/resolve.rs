//! Dependency resolution
//!
//! Depth-first topological sort with three-color marking. A variable is
//! `Visiting` while its dependency subtree is on the stack; meeting a
//! `Visiting` variable again means the dependency relation loops, and the
//! error names the full chain. Variables with no ordering constraint keep
//! insertion order, so resolution is deterministic for a given store.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Cycle, EngineError, Result};
use crate::model::VariableId;
use crate::store::VariableStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Linear evaluation order: every variable appears after all of its
/// dependencies.
pub fn evaluation_order(store: &VariableStore) -> Result<Vec<VariableId>> {
    let mut marks: FxHashMap<VariableId, Mark> = FxHashMap::default();
    let mut order = Vec::with_capacity(store.len());
    let mut path = Vec::new();

    for variable in store.iter() {
        if !marks.contains_key(&variable.id) {
            visit(&variable.id, store, &mut marks, &mut order, &mut path)?;
        }
    }
    Ok(order)
}

fn visit(
    id: &VariableId,
    store: &VariableStore,
    marks: &mut FxHashMap<VariableId, Mark>,
    order: &mut Vec<VariableId>,
    path: &mut Vec<VariableId>,
) -> Result<()> {
    marks.insert(id.clone(), Mark::Visiting);
    path.push(id.clone());

    let variable = store
        .get(id)
        .ok_or_else(|| EngineError::NotFound(id.clone()))?;
    for dep in &variable.dependencies {
        if !store.contains(dep) {
            return Err(EngineError::DanglingDependency {
                variable: id.clone(),
                missing: dep.clone(),
            });
        }
        match marks.get(dep) {
            Some(Mark::Done) => {}
            Some(Mark::Visiting) => {
                // The chain from the first occurrence of `dep` back to here
                // is the cycle.
                let start = path.iter().position(|p| p == dep).unwrap_or(0);
                return Err(EngineError::CyclicDependency(Cycle(path[start..].to_vec())));
            }
            None => visit(dep, store, marks, order, path)?,
        }
    }

    path.pop();
    marks.insert(id.clone(), Mark::Done);
    order.push(id.clone());
    Ok(())
}

/// Every variable whose resolution path includes `target`, the target
/// itself included.
///
/// Sensitivity analysis recomputes only this set, so the cost of a sweep is
/// proportional to the affected subgraph rather than the whole store.
#[must_use]
pub fn transitive_dependents(store: &VariableStore, target: &VariableId) -> FxHashSet<VariableId> {
    let mut dependents_of: FxHashMap<&VariableId, Vec<&VariableId>> = FxHashMap::default();
    for variable in store.iter() {
        for dep in &variable.dependencies {
            dependents_of.entry(dep).or_default().push(&variable.id);
        }
    }

    let mut affected = FxHashSet::default();
    let mut queue = vec![target];
    while let Some(id) = queue.pop() {
        if affected.insert(id.clone()) {
            if let Some(children) = dependents_of.get(id) {
                queue.extend(children.iter().copied());
            }
        }
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::model::{Category, FinancialVariable, Unit};

    fn input(id: &str) -> FinancialVariable {
        FinancialVariable::input(id, id, 1.0, Category::Revenue, Unit::Currency)
    }

    fn derived(id: &str, deps: &[&str]) -> FinancialVariable {
        let formula = deps
            .iter()
            .map(|d| Formula::var(*d))
            .reduce(Formula::add)
            .unwrap_or(Formula::constant(0.0));
        FinancialVariable::derived(
            id,
            id,
            formula,
            deps.iter().map(|d| (*d).into()).collect(),
            Category::Metric,
            Unit::Number,
        )
    }

    #[test]
    fn test_dependencies_come_first() {
        let store = VariableStore::from_variables([
            derived("total", &["a", "b"]),
            input("a"),
            input("b"),
        ])
        .unwrap();
        let order = evaluation_order(&store).unwrap();
        let pos = |id: &str| order.iter().position(|v| v.as_str() == id).unwrap();
        assert!(pos("a") < pos("total"));
        assert!(pos("b") < pos("total"));
    }

    #[test]
    fn test_unconstrained_variables_keep_insertion_order() {
        let store =
            VariableStore::from_variables([input("z"), input("m"), input("a")]).unwrap();
        let order = evaluation_order(&store).unwrap();
        let ids: Vec<_> = order.iter().map(VariableId::as_str).collect();
        assert_eq!(ids, ["z", "m", "a"]);
    }

    #[test]
    fn test_cycle_names_every_member() {
        let store = VariableStore::from_variables([
            derived("a", &["b"]),
            derived("b", &["c"]),
            derived("c", &["a"]),
        ])
        .unwrap();
        let err = evaluation_order(&store).unwrap_err();
        match err {
            EngineError::CyclicDependency(cycle) => {
                for id in ["a", "b", "c"] {
                    assert!(cycle.contains(&id.into()), "cycle should contain {id}");
                }
                assert_eq!(cycle.to_string(), "a -> b -> c -> a");
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let store = VariableStore::from_variables([derived("a", &["a"])]).unwrap();
        let err = evaluation_order(&store).unwrap_err();
        assert!(matches!(err, EngineError::CyclicDependency(_)));
    }

    #[test]
    fn test_dangling_dependency_is_reported() {
        let store = VariableStore::from_variables([derived("a", &["missing_id"])]).unwrap();
        let err = evaluation_order(&store).unwrap_err();
        assert_eq!(
            err,
            EngineError::DanglingDependency {
                variable: "a".into(),
                missing: "missing_id".into(),
            }
        );
    }

    #[test]
    fn test_transitive_dependents_stops_at_unrelated() {
        let store = VariableStore::from_variables([
            input("a"),
            derived("b", &["a"]),
            derived("c", &["b"]),
            input("x"),
            derived("y", &["x"]),
        ])
        .unwrap();
        let affected = transitive_dependents(&store, &"a".into());
        assert!(affected.contains(&"a".into()));
        assert!(affected.contains(&"b".into()));
        assert!(affected.contains(&"c".into()));
        assert!(!affected.contains(&"x".into()));
        assert!(!affected.contains(&"y".into()));
    }
}
