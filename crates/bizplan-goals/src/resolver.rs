//! Hierarchy resolution: the sort key that places every goal next to its
//! ancestors.
//!
//! Presentation order within one root Theme is
//!
//! ```text
//! Theme, [Outcome,] Objective, [Outcome,] Action
//! ```
//!
//! Outcomes attached directly to a Theme come before the Theme's Objectives,
//! and Outcomes attached to an Objective come before that Objective's
//! Actions. All records of one root precede the next root's records; ties are
//! broken by original row order.

use std::collections::HashSet;

use bizplan_types::{BizPlanError, ObjectType, Priority, Result};
use serde::Serialize;

use crate::record::GoalRecord;
use crate::registry::{theme_parent, GoalRegistry};

/// Total-order key, compared field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SortKey {
    pub root_rank: usize,
    pub root_branch: usize,
    pub objective_rank: usize,
    pub objective_branch: usize,
    pub leaf_rank: usize,
}

impl SortKey {
    /// Key of a record that sorts by its own position among the roots.
    pub fn root(row_number: usize) -> Self {
        SortKey {
            root_rank: row_number,
            root_branch: Priority::First.rank(),
            objective_rank: Priority::First.rank(),
            objective_branch: Priority::First.rank(),
            leaf_rank: Priority::First.rank(),
        }
    }

    /// Key of a direct child of a Theme.
    fn theme_child(theme: &GoalRecord, branch: Priority, child: &GoalRecord) -> Self {
        SortKey {
            root_rank: theme.row_number,
            root_branch: branch.rank(),
            objective_rank: child.row_number,
            objective_branch: Priority::First.rank(),
            leaf_rank: Priority::First.rank(),
        }
    }

    /// Key of a leaf under a parent with key `self`: keeps the parent's first
    /// three components.
    fn leaf(self, branch: Priority, child: &GoalRecord) -> Self {
        SortKey {
            objective_branch: branch.rank(),
            leaf_rank: child.row_number,
            ..self
        }
    }

    pub fn as_tuple(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.root_rank,
            self.root_branch,
            self.objective_rank,
            self.objective_branch,
            self.leaf_rank,
        )
    }
}

/// Computes sort keys against a registry.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    registry: &'a GoalRegistry,
    theme_tag: &'a str,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(registry: &'a GoalRegistry, theme_tag: &'a str) -> Self {
        Self { registry, theme_tag }
    }

    pub fn is_root(&self, record: &GoalRecord) -> bool {
        record.is_theme(self.theme_tag)
    }

    /// Key for any record: roots get [`SortKey::root`], everything else goes
    /// through [`sort_key`](Self::sort_key).
    pub fn key_for(&self, record: &GoalRecord) -> Result<SortKey> {
        if self.is_root(record) {
            Ok(SortKey::root(record.row_number))
        } else {
            self.sort_key(record)
        }
    }

    /// Key for a non-root record.
    ///
    /// Fails when the object type is unknown, when an Action (or an Outcome
    /// not attached to a Theme) has zero or several resolved parents, or when
    /// the alignment chain loops back on itself.
    pub fn sort_key(&self, record: &GoalRecord) -> Result<SortKey> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        self.resolve(record, &mut chain, &mut visited)
    }

    fn resolve<'r>(
        &self,
        record: &'r GoalRecord,
        chain: &mut Vec<&'r GoalRecord>,
        visited: &mut HashSet<usize>,
    ) -> Result<SortKey>
    where
        'a: 'r,
    {
        let object_type = record.object_type()?;

        if !visited.insert(record.row_number) {
            let mut titles: Vec<String> = chain.iter().map(|r| r.title.clone()).collect();
            titles.push(record.title.clone());
            return Err(BizPlanError::CyclicAlignment { chain: titles });
        }
        chain.push(record);

        let parents = self.registry.parents_of(record);
        let key = match object_type {
            ObjectType::Objective => match theme_parent(&parents, self.theme_tag) {
                Some(theme) => SortKey::theme_child(theme, Priority::Second, record),
                None => SortKey::root(record.row_number),
            },
            ObjectType::Outcome => match theme_parent(&parents, self.theme_tag) {
                Some(theme) => SortKey::theme_child(theme, Priority::First, record),
                None => {
                    let parent = single_parent(&parents, object_type, record)?;
                    self.parent_key(parent, chain, visited)?
                        .leaf(Priority::First, record)
                }
            },
            ObjectType::Action => {
                let parent = single_parent(&parents, object_type, record)?;
                self.parent_key(parent, chain, visited)?
                    .leaf(Priority::Second, record)
            }
        };

        chain.pop();
        visited.remove(&record.row_number);
        tracing::trace!(title = %record.title, key = ?key.as_tuple(), "Sort key resolved");
        Ok(key)
    }

    fn parent_key<'r>(
        &self,
        parent: &'r GoalRecord,
        chain: &mut Vec<&'r GoalRecord>,
        visited: &mut HashSet<usize>,
    ) -> Result<SortKey>
    where
        'a: 'r,
    {
        if self.is_root(parent) {
            Ok(SortKey::root(parent.row_number))
        } else {
            self.resolve(parent, chain, visited)
        }
    }
}

fn single_parent<'p>(
    parents: &[&'p GoalRecord],
    object_type: ObjectType,
    record: &GoalRecord,
) -> Result<&'p GoalRecord> {
    match parents {
        [parent] => Ok(parent),
        [] => Err(BizPlanError::MissingParent {
            object_type,
            title: record.title.clone(),
        }),
        _ => Err(BizPlanError::AmbiguousParent {
            object_type,
            title: record.title.clone(),
            count: parents.len(),
        }),
    }
}
