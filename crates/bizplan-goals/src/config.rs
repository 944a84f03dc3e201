//! Run configuration: theme tag, column header names, slide layouts and
//! type images.
//!
//! Every field has a default matching the goal-tracking export, so an empty
//! JSON object (or no config file at all) is a valid configuration.

use std::path::Path;

use bizplan_types::Result;
use serde::{Deserialize, Serialize};

/// Top-level configuration for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Tag value marking a root Theme record.
    #[serde(default = "default_theme_tag")]
    pub theme_tag: String,
    #[serde(default)]
    pub columns: ColumnNames,
    #[serde(default)]
    pub layouts: LayoutConfig,
    #[serde(default)]
    pub images: ImageConfig,
}

fn default_theme_tag() -> String {
    "Theme".to_string()
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            theme_tag: default_theme_tag(),
            columns: ColumnNames::default(),
            layouts: LayoutConfig::default(),
            images: ImageConfig::default(),
        }
    }
}

impl PlanConfig {
    /// Read a configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}

/// Header names of the columns a goal record is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub title: String,
    pub tag: String,
    pub owner: String,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub alignment: String,
    pub metric_name: String,
    pub target: String,
    pub object_type: String,
    pub status: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "Id".into(),
            title: "Title".into(),
            tag: "Tag".into(),
            owner: "Owner".into(),
            period: "Period".into(),
            start_date: "Start Date".into(),
            end_date: "End Date".into(),
            description: "Description".into(),
            alignment: "Aligned To (weight, Objective ID)".into(),
            metric_name: "Metric Name".into(),
            target: "Target".into(),
            object_type: "Object Type".into(),
            status: "Status".into(),
        }
    }
}

/// A slide master and one of its layouts, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideLayout {
    pub master: usize,
    pub layout: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Layout for Theme header slides.
    pub theme: SlideLayout,
    /// Layout for Objective, Outcome and Action slides.
    pub okr: SlideLayout,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            theme: SlideLayout { master: 0, layout: 3 },
            okr: SlideLayout { master: 2, layout: 11 },
        }
    }
}

/// Image shown on each slide, per object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub objective: String,
    pub outcome: String,
    pub action: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            objective: "objective.png".into(),
            outcome: "outcome.png".into(),
            action: "initiative.png".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: PlanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlanConfig::default());
        assert_eq!(config.theme_tag, "Theme");
        assert_eq!(config.columns.alignment, "Aligned To (weight, Objective ID)");
        assert_eq!(config.layouts.okr, SlideLayout { master: 2, layout: 11 });
        assert_eq!(config.images.action, "initiative.png");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: PlanConfig = serde_json::from_str(
            r#"{
                "theme_tag": "Pillar",
                "columns": { "alignment": "Aligned To" },
                "layouts": { "theme": { "master": 1, "layout": 0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.theme_tag, "Pillar");
        assert_eq!(config.columns.alignment, "Aligned To");
        assert_eq!(config.columns.id, "Id");
        assert_eq!(config.layouts.theme, SlideLayout { master: 1, layout: 0 });
        assert_eq!(config.layouts.okr, SlideLayout { master: 2, layout: 11 });
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bizplan.config.json");
        std::fs::write(&path, r#"{ "images": { "outcome": "kr.png" } }"#).unwrap();

        let config = PlanConfig::load(&path).unwrap();
        assert_eq!(config.images.outcome, "kr.png");
        assert_eq!(config.images.objective, "objective.png");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlanConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, bizplan_types::BizPlanError::Io(_)));
    }
}
