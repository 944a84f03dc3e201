//! The goal registry: every loaded record in row order plus an id index used
//! for parent lookups.
//!
//! A registry is built once per run and is read-only afterwards. It is passed
//! explicitly to everything that resolves alignment references.

use std::collections::HashMap;

use bizplan_types::{BizPlanError, Result};
use serde::Serialize;

use crate::config::PlanConfig;
use crate::record::{ColumnMap, GoalRecord};
use crate::table::GoalTable;

#[derive(Debug, Clone, Default)]
pub struct GoalRegistry {
    records: Vec<GoalRecord>,
    /// Maps a parsed id to its index in `records`.
    by_id: HashMap<String, usize>,
    duplicates: Vec<String>,
}

/// A data row excluded from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Sheet row number (header is row 1).
    pub row: usize,
    pub reason: String,
}

/// Result of loading a table: the registry plus the rows that were skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub registry: GoalRegistry,
    pub skipped: Vec<SkippedRow>,
}

impl GoalRegistry {
    /// Index records that are already in row order.
    ///
    /// Records with an empty id stay in the sequence but cannot be
    /// referenced. When two records share an id the later one owns the index
    /// entry.
    pub fn from_records(records: Vec<GoalRecord>) -> Self {
        let mut by_id = HashMap::new();
        let mut duplicates = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let id = record.id();
            if id.is_empty() {
                continue;
            }
            if by_id.insert(id.to_string(), idx).is_some() {
                tracing::warn!(id, row = record.row_number, title = %record.title, "Duplicate goal id, later row wins");
                duplicates.push(id.to_string());
            }
        }

        Self {
            records,
            by_id,
            duplicates,
        }
    }

    /// Build a registry from a table. A malformed row is logged, reported in
    /// the [`LoadReport`], and skipped. A required header missing from the
    /// table makes every row malformed, so the registry comes back empty.
    pub fn from_table(table: &GoalTable, config: &PlanConfig) -> Result<LoadReport> {
        let columns = ColumnMap::bind(&table.headers, &config.columns);

        let mut records = Vec::with_capacity(table.rows.len());
        let mut skipped = Vec::new();
        for (idx, row) in table.rows.iter().enumerate() {
            let parsed = match &columns {
                Ok(columns) => GoalRecord::from_row(row, columns, idx),
                Err(e) => Err(BizPlanError::MalformedRow {
                    row: idx + 2,
                    message: e.to_string(),
                }),
            };
            match parsed {
                Ok(record) => records.push(record),
                Err(e) if e.is_row_level() => {
                    tracing::warn!(row = idx + 2, error = %e, "Skipping malformed row");
                    skipped.push(SkippedRow {
                        row: idx + 2,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(loaded = records.len(), skipped = skipped.len(), "Goal registry built");
        Ok(LoadReport {
            registry: Self::from_records(records),
            skipped,
        })
    }

    pub fn get(&self, id: &str) -> Option<&GoalRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    /// All records in original row order.
    pub fn records(&self) -> &[GoalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids claimed by more than one record, once per extra occurrence.
    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicates
    }

    /// Parent records referenced by `record`'s alignment field, in
    /// encounter order. References to unknown ids are dropped.
    pub fn parents_of(&self, record: &GoalRecord) -> Vec<&GoalRecord> {
        record
            .alignment_refs()
            .iter()
            .filter_map(|r| self.get(&r.parent_id))
            .collect()
    }
}

/// First parent tagged as a root Theme.
pub fn theme_parent<'a>(parents: &[&'a GoalRecord], theme_tag: &str) -> Option<&'a GoalRecord> {
    parents.iter().copied().find(|p| p.is_theme(theme_tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::{headers, row};

    fn table(rows: Vec<Vec<String>>) -> GoalTable {
        GoalTable::new(headers(), rows)
    }

    #[test]
    fn builds_index_and_sequence() {
        let report = GoalRegistry::from_table(
            &table(vec![
                row("1", "Theme 1", "Theme", "", "Objective"),
                row("2", "Objective 1", "", "(weight: 100%, Id: 1)", "Objective"),
            ]),
            &PlanConfig::default(),
        )
        .unwrap();

        let registry = report.registry;
        assert!(report.skipped.is_empty());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("1").unwrap().title, "Theme 1");
        assert_eq!(registry.get("2").unwrap().row_number, 1);
        assert!(registry.get("3").is_none());
    }

    #[test]
    fn malformed_row_is_skipped_not_fatal() {
        let report = GoalRegistry::from_table(
            &table(vec![
                row("1", "Theme 1", "Theme", "", "Objective"),
                vec!["\"x\" \"9\"".to_string()],
                row("2", "Objective 1", "", "(weight: 100%, Id: 1)", "Objective"),
            ]),
            &PlanConfig::default(),
        )
        .unwrap();

        assert_eq!(report.registry.len(), 2);
        assert!(report.registry.get("9").is_none());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row, 3);
        // row numbers keep the original data-row positions
        assert_eq!(report.registry.get("2").unwrap().row_number, 2);
    }

    #[test]
    fn missing_header_skips_every_row() {
        let mut hdrs = headers();
        hdrs.pop();
        let rows: Vec<_> = [
            row("1", "Theme 1", "Theme", "", "Objective"),
            row("2", "Objective 1", "", "(weight: 100%, Id: 1)", "Objective"),
            row("3", "Action 1", "", "(weight: 100%, Id: 2)", "Action"),
        ]
        .into_iter()
        .map(|mut cells| {
            cells.pop();
            cells
        })
        .collect();

        let report = GoalRegistry::from_table(&GoalTable::new(hdrs, rows), &PlanConfig::default()).unwrap();
        assert!(report.registry.is_empty());
        let skipped_rows: Vec<_> = report.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped_rows, vec![2, 3, 4]);
        assert_eq!(
            report.skipped[0].reason,
            "Error processing row 2: Required column 'Status' is missing from the table header"
        );
    }

    #[test]
    fn missing_header_on_empty_table_loads_nothing() {
        let mut hdrs = headers();
        hdrs.retain(|h| h != "Tag");
        let report = GoalRegistry::from_table(&GoalTable::new(hdrs, vec![]), &PlanConfig::default()).unwrap();
        assert!(report.registry.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn duplicate_id_later_row_wins() {
        let report = GoalRegistry::from_table(
            &table(vec![
                row("1", "First", "", "", "Objective"),
                row("1", "Second", "", "", "Objective"),
            ]),
            &PlanConfig::default(),
        )
        .unwrap();

        let registry = report.registry;
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("1").unwrap().title, "Second");
        assert_eq!(registry.duplicate_ids(), ["1".to_string()]);
    }

    #[test]
    fn empty_id_is_kept_but_not_indexed() {
        let mut cells = row("1", "Unlinked", "", "", "Objective");
        cells[0] = "no quotes here".into();
        let report = GoalRegistry::from_table(&table(vec![cells]), &PlanConfig::default()).unwrap();
        assert_eq!(report.registry.len(), 1);
        assert!(report.registry.get("").is_none());
    }

    #[test]
    fn parents_resolve_in_order_and_drop_dangling() {
        let report = GoalRegistry::from_table(
            &table(vec![
                row("1", "Theme 1", "Theme", "", "Objective"),
                row("2", "Objective 1", "", "", "Objective"),
                row(
                    "3",
                    "Outcome",
                    "",
                    "(weight: 50%, Id: 2)(weight: 25%, Id: 99)(weight: 25%, Id: 1)",
                    "Outcome",
                ),
            ]),
            &PlanConfig::default(),
        )
        .unwrap();

        let registry = report.registry;
        let outcome = registry.get("3").unwrap();
        let parents = registry.parents_of(outcome);
        let titles: Vec<_> = parents.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Objective 1", "Theme 1"]);

        let theme = theme_parent(&parents, "Theme").unwrap();
        assert_eq!(theme.title, "Theme 1");
    }

    #[test]
    fn theme_parent_none_when_untagged() {
        let report = GoalRegistry::from_table(
            &table(vec![
                row("1", "Objective 1", "Other", "", "Objective"),
                row("2", "Action", "", "(weight: 100%, Id: 1)", "Action"),
            ]),
            &PlanConfig::default(),
        )
        .unwrap();
        let registry = report.registry;
        let parents = registry.parents_of(registry.get("2").unwrap());
        assert_eq!(parents.len(), 1);
        assert!(theme_parent(&parents, "Theme").is_none());
    }
}
