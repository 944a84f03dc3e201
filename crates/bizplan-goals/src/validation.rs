//! Goal table validation: lint rules and diagnostics.
//!
//! Provides 6 built-in rules that check the identifier, alignment and
//! hierarchy structure of a loaded [`GoalRegistry`]. Call [`validate`] for
//! advisory diagnostics or [`validate_or_raise`] to fail on any
//! `Error`-severity issue.

use std::collections::HashSet;

use bizplan_types::{BizPlanError, ObjectType};

use crate::record::GoalRecord;
use crate::registry::{theme_parent, GoalRegistry};
use crate::resolver::HierarchyResolver;

// ---------------------------------------------------------------------------
// Diagnostic types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub goal_id: Option<String>,
    /// Zero-based data row of the offending record.
    pub row: Option<usize>,
    pub fix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// LintRule trait
// ---------------------------------------------------------------------------

pub trait LintRule: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, registry: &GoalRegistry, theme_tag: &str) -> Vec<Diagnostic>;
}

fn diagnostic(
    rule: &str,
    severity: Severity,
    record: &GoalRecord,
    message: String,
    fix: impl Into<String>,
) -> Diagnostic {
    Diagnostic {
        rule: rule.into(),
        severity,
        message,
        goal_id: Some(record.id().to_string()).filter(|id| !id.is_empty()),
        row: Some(record.row_number),
        fix: Some(fix.into()),
    }
}

fn non_roots<'a>(
    registry: &'a GoalRegistry,
    theme_tag: &'a str,
) -> impl Iterator<Item = &'a GoalRecord> + 'a {
    registry.records().iter().filter(move |r| !r.is_theme(theme_tag))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

struct MalformedIdentifierRule;
impl LintRule for MalformedIdentifierRule {
    fn name(&self) -> &str { "malformed_identifier" }
    fn apply(&self, registry: &GoalRegistry, _theme_tag: &str) -> Vec<Diagnostic> {
        registry
            .records()
            .iter()
            .filter(|r| r.okr.is_empty())
            .map(|r| {
                diagnostic(
                    self.name(),
                    Severity::Warning,
                    r,
                    format!(
                        "Goal '{}' has id '{}' which is not of the form \"<link>\" \"<id>\"; it cannot be referenced",
                        r.title, r.internal_id
                    ),
                    "Re-export the table so the Id column carries both link and id",
                )
            })
            .collect()
    }
}

struct DuplicateIdRule;
impl LintRule for DuplicateIdRule {
    fn name(&self) -> &str { "duplicate_id" }
    fn apply(&self, registry: &GoalRegistry, _theme_tag: &str) -> Vec<Diagnostic> {
        let duplicated: HashSet<&str> = registry.duplicate_ids().iter().map(String::as_str).collect();
        registry
            .records()
            .iter()
            .filter(|r| duplicated.contains(r.id()))
            .map(|r| {
                diagnostic(
                    self.name(),
                    Severity::Warning,
                    r,
                    format!("Goal id '{}' is used by more than one row; references resolve to the last one", r.id()),
                    "Give every goal a distinct id",
                )
            })
            .collect()
    }
}

struct DanglingAlignmentRule;
impl LintRule for DanglingAlignmentRule {
    fn name(&self) -> &str { "dangling_alignment" }
    fn apply(&self, registry: &GoalRegistry, _theme_tag: &str) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for record in registry.records() {
            for reference in record.alignment_refs() {
                if registry.get(&reference.parent_id).is_none() {
                    diags.push(diagnostic(
                        self.name(),
                        Severity::Warning,
                        record,
                        format!(
                            "Goal '{}' aligns to id {} which is not in the table; the reference is ignored",
                            record.title, reference.parent_id
                        ),
                        format!("Add goal {} to the export or remove the alignment", reference.parent_id),
                    ));
                }
            }
        }
        diags
    }
}

struct ObjectTypeRule;
impl LintRule for ObjectTypeRule {
    fn name(&self) -> &str { "object_type" }
    fn apply(&self, registry: &GoalRegistry, theme_tag: &str) -> Vec<Diagnostic> {
        non_roots(registry, theme_tag)
            .filter_map(|r| r.object_type().err().map(|e| (r, e)))
            .map(|(r, e)| {
                diagnostic(
                    self.name(),
                    Severity::Error,
                    r,
                    e.to_string(),
                    "Set Object Type to Objective, Outcome or Action",
                )
            })
            .collect()
    }
}

struct ParentResolutionRule;
impl LintRule for ParentResolutionRule {
    fn name(&self) -> &str { "parent_resolution" }
    fn apply(&self, registry: &GoalRegistry, theme_tag: &str) -> Vec<Diagnostic> {
        let resolver = HierarchyResolver::new(registry, theme_tag);
        non_roots(registry, theme_tag)
            // type errors are reported by ObjectTypeRule
            .filter(|r| r.object_type().is_ok())
            .filter_map(|r| match resolver.sort_key(r) {
                Ok(_) => None,
                Err(e) => {
                    let fix = match e {
                        BizPlanError::MissingParent { .. } => "Align the goal to exactly one existing parent",
                        BizPlanError::AmbiguousParent { .. } => "Keep a single parent reference in the alignment",
                        BizPlanError::CyclicAlignment { .. } => "Break the alignment loop",
                        _ => "Fix the goal's parent chain",
                    };
                    Some(diagnostic(self.name(), Severity::Error, r, e.to_string(), fix))
                }
            })
            .collect()
    }
}

struct OrphanObjectiveRule;
impl LintRule for OrphanObjectiveRule {
    fn name(&self) -> &str { "orphan_objective" }
    fn apply(&self, registry: &GoalRegistry, theme_tag: &str) -> Vec<Diagnostic> {
        non_roots(registry, theme_tag)
            .filter(|r| matches!(r.object_type(), Ok(ObjectType::Objective)))
            .filter(|r| theme_parent(&registry.parents_of(r), theme_tag).is_none())
            .map(|r| {
                diagnostic(
                    self.name(),
                    Severity::Info,
                    r,
                    format!("Objective '{}' is not aligned to a {theme_tag}; it starts its own section", r.title),
                    format!("Align the objective to a goal tagged '{theme_tag}'"),
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all built-in lint rules and return collected diagnostics.
pub fn validate(registry: &GoalRegistry, theme_tag: &str) -> Vec<Diagnostic> {
    let rules: Vec<Box<dyn LintRule>> = vec![
        Box::new(MalformedIdentifierRule),
        Box::new(DuplicateIdRule),
        Box::new(DanglingAlignmentRule),
        Box::new(ObjectTypeRule),
        Box::new(ParentResolutionRule),
        Box::new(OrphanObjectiveRule),
    ];

    let mut diagnostics = Vec::new();
    for rule in &rules {
        diagnostics.extend(rule.apply(registry, theme_tag));
    }
    diagnostics
}

/// Run all lint rules; return `Err` if any `Error`-severity diagnostic found.
pub fn validate_or_raise(registry: &GoalRegistry, theme_tag: &str) -> bizplan_types::Result<Vec<Diagnostic>> {
    let diagnostics = validate(registry, theme_tag);
    let errors: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    if !errors.is_empty() {
        let messages: Vec<_> = errors.iter().map(|d| d.message.clone()).collect();
        return Err(BizPlanError::ValidationError(messages.join("; ")));
    }
    Ok(diagnostics)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
