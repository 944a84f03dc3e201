//! Goal table loading, hierarchy resolution, ordering, and lint rules.
//!
//! This crate turns an exported goal table into a deterministic presentation
//! order: row parsing, the id registry, alignment parsing, sort-key
//! resolution, the slide outline model, and the 6 built-in lint rules.

pub mod alignment;
pub mod config;
pub mod identifier;
pub mod ordering;
pub mod presentation;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod table;
pub mod validation;

pub use alignment::{clean_alignment, parse_alignment, AlignmentLabels, AlignmentRef};
pub use config::{ColumnNames, ImageConfig, LayoutConfig, PlanConfig, SlideLayout};
pub use identifier::OkrId;
pub use ordering::{order_goals, OrderedGoal};
pub use presentation::{
    render_deck, DeckOutline, DeckRenderer, GoalKind, OutlineRenderer, ParentLabel, SlideDetails,
    SlideEntry, TextRenderer,
};
pub use record::{ColumnMap, GoalRecord};
pub use registry::{theme_parent, GoalRegistry, LoadReport, SkippedRow};
pub use resolver::{HierarchyResolver, SortKey};
pub use table::GoalTable;
pub use validation::{validate, validate_or_raise, Diagnostic, LintRule, Severity};
