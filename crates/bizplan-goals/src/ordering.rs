//! Ordering driver: one sort over every record, roots and non-roots alike.

use bizplan_types::Result;

use crate::record::GoalRecord;
use crate::registry::GoalRegistry;
use crate::resolver::{HierarchyResolver, SortKey};

/// A record in presentation order together with the key that placed it.
#[derive(Debug, Clone, Copy)]
pub struct OrderedGoal<'a> {
    pub record: &'a GoalRecord,
    pub key: SortKey,
    pub is_root: bool,
}

/// Order every record of `registry` for presentation.
///
/// Keys are computed for all records before anything is returned, so a
/// single structural error (invalid type, missing or ambiguous parent,
/// cyclic alignment) yields no sequence at all.
pub fn order_goals<'a>(registry: &'a GoalRegistry, theme_tag: &str) -> Result<Vec<OrderedGoal<'a>>> {
    let resolver = HierarchyResolver::new(registry, theme_tag);

    let mut ordered = registry
        .records()
        .iter()
        .map(|record| -> Result<OrderedGoal<'a>> {
            Ok(OrderedGoal {
                record,
                key: resolver.key_for(record)?,
                is_root: resolver.is_root(record),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ordered.sort_by_key(|g| g.key);
    tracing::debug!(goals = ordered.len(), "Goals ordered");
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;
    use crate::record::tests::{headers, row};
    use crate::table::GoalTable;

    fn registry(rows: Vec<Vec<String>>) -> GoalRegistry {
        GoalRegistry::from_table(&GoalTable::new(headers(), rows), &PlanConfig::default())
            .unwrap()
            .registry
    }

    fn titles(reg: &GoalRegistry) -> Vec<String> {
        order_goals(reg, "Theme")
            .unwrap()
            .iter()
            .map(|g| g.record.title.clone())
            .collect()
    }

    #[test]
    fn theme_objective_action() {
        let reg = registry(vec![
            row("1", "Theme", "Theme", "", "Objective"),
            row("2", "Objective", "", "(weight: 100%, Id: 1)", "Objective"),
            row("3", "Action", "", "(weight: 100%, Id: 2)", "Action"),
        ]);
        assert_eq!(titles(&reg), vec!["Theme", "Objective", "Action"]);
    }

    #[test]
    fn outcome_lands_between_objective_and_action() {
        let reg = registry(vec![
            row("1", "Theme", "Theme", "", "Objective"),
            row("2", "Objective", "", "(weight: 100%, Id: 1)", "Objective"),
            row("3", "Action", "", "(weight: 100%, Id: 2)", "Action"),
            row("4", "Outcome", "", "(weight: 100%, Id: 2)", "Outcome"),
        ]);
        assert_eq!(titles(&reg), vec!["Theme", "Objective", "Outcome", "Action"]);
    }

    #[test]
    fn theme_outcome_follows_theme_directly() {
        let reg = registry(vec![
            row("1", "Theme", "Theme", "", "Objective"),
            row("2", "Objective", "", "(weight: 100%, Id: 1)", "Objective"),
            row("3", "Theme outcome", "", "(weight: 100%, Id: 1)", "Outcome"),
        ]);
        assert_eq!(titles(&reg), vec!["Theme", "Theme outcome", "Objective"]);
    }

    #[test]
    fn roots_mark_is_root() {
        let reg = registry(vec![
            row("1", "Theme", "Theme", "", "Objective"),
            row("2", "Objective", "", "(weight: 100%, Id: 1)", "Objective"),
        ]);
        let ordered = order_goals(&reg, "Theme").unwrap();
        assert!(ordered[0].is_root);
        assert!(!ordered[1].is_root);
    }

    #[test]
    fn structural_error_produces_no_sequence() {
        let reg = registry(vec![
            row("1", "Theme", "Theme", "", "Objective"),
            row("2", "Bad", "", "(weight: 100%, Id: 1)", "InvalidType"),
        ]);
        assert!(order_goals(&reg, "Theme").is_err());
    }

    #[test]
    fn empty_registry_orders_to_empty() {
        let reg = GoalRegistry::default();
        assert!(order_goals(&reg, "Theme").unwrap().is_empty());
    }
}
