//! Presentation model handed to deck renderers.
//!
//! Each ordered goal becomes one [`SlideEntry`] carrying everything a
//! renderer needs: the goal's kind, its parsed identifier (the link is used
//! as the image hyperlink), the layout and image to use, and the cleaned
//! alignment text with its parent labels. Renderers consume the entries one
//! at a time through [`DeckRenderer`].

use std::io::Write;
use std::path::Path;

use bizplan_types::{ObjectType, Result};
use serde::{Deserialize, Serialize};

use crate::alignment::{clean_alignment, AlignmentLabels};
use crate::config::{PlanConfig, SlideLayout};
use crate::identifier::OkrId;
use crate::ordering::OrderedGoal;

/// Classification of a slide's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalKind {
    Theme,
    Objective,
    Outcome,
    Action,
}

impl From<ObjectType> for GoalKind {
    fn from(t: ObjectType) -> Self {
        match t {
            ObjectType::Objective => GoalKind::Objective,
            ObjectType::Outcome => GoalKind::Outcome,
            ObjectType::Action => GoalKind::Action,
        }
    }
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Theme => "Theme",
            GoalKind::Objective => "Objective",
            GoalKind::Outcome => "Outcome",
            GoalKind::Action => "Action",
        }
    }
}

/// Detail block shown on Objective, Outcome and Action slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDetails {
    pub object_type: String,
    pub metric_name: String,
    pub target: String,
    pub owner: String,
    pub schedule: String,
    pub status: String,
}

/// A labelled line naming a slide's parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLabel {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEntry {
    /// 1-based slide number.
    pub position: usize,
    pub kind: GoalKind,
    pub title: String,
    pub okr: OkrId,
    pub layout: SlideLayout,
    pub image: Option<String>,
    pub details: Option<SlideDetails>,
    pub description: Option<String>,
    /// Alignment text with structured references removed.
    pub alignment: String,
    pub parents: Vec<ParentLabel>,
}

impl SlideEntry {
    pub fn from_goal(position: usize, goal: &OrderedGoal<'_>, config: &PlanConfig) -> Result<Self> {
        let record = goal.record;
        let alignment = clean_alignment(&record.alignment);

        if goal.is_root {
            return Ok(SlideEntry {
                position,
                kind: GoalKind::Theme,
                title: record.title.clone(),
                okr: record.okr.clone(),
                layout: config.layouts.theme,
                image: None,
                details: None,
                description: None,
                alignment,
                parents: Vec::new(),
            });
        }

        let object_type = record.object_type()?;
        let (image, parents) = match object_type {
            ObjectType::Objective => {
                let labels = AlignmentLabels::split(&alignment);
                let mut parents = Vec::new();
                if let Some(text) = labels.plan_theme {
                    parents.push(ParentLabel {
                        label: "Parent plan theme".into(),
                        text,
                    });
                }
                if let Some(text) = labels.mwb {
                    parents.push(ParentLabel {
                        label: "Parent MWB alignment".into(),
                        text,
                    });
                }
                (&config.images.objective, parents)
            }
            ObjectType::Outcome | ObjectType::Action => {
                let image = if object_type == ObjectType::Action {
                    &config.images.action
                } else {
                    &config.images.outcome
                };
                let parents = vec![ParentLabel {
                    label: "Parent objective".into(),
                    text: alignment.clone(),
                }];
                (image, parents)
            }
        };

        Ok(SlideEntry {
            position,
            kind: GoalKind::from(object_type),
            title: record.title.clone(),
            okr: record.okr.clone(),
            layout: config.layouts.okr,
            image: Some(image.clone()),
            details: Some(SlideDetails {
                object_type: record.object_type.clone(),
                metric_name: record.metric_name.clone(),
                target: record.target.clone(),
                owner: record.owner.clone(),
                schedule: record.schedule.clone(),
                status: record.status.clone(),
            }),
            description: Some(record.description.clone()),
            alignment,
            parents,
        })
    }
}

/// Consumer of ordered slides.
pub trait DeckRenderer {
    fn begin(&mut self, _slide_count: usize) -> Result<()> {
        Ok(())
    }

    fn render_slide(&mut self, slide: &SlideEntry) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Build slide entries for `ordered` and feed them to `renderer` in order.
/// Returns the number of slides rendered.
pub fn render_deck(
    ordered: &[OrderedGoal<'_>],
    config: &PlanConfig,
    renderer: &mut dyn DeckRenderer,
) -> Result<usize> {
    let slides = ordered
        .iter()
        .enumerate()
        .map(|(idx, goal)| SlideEntry::from_goal(idx + 1, goal, config))
        .collect::<Result<Vec<_>>>()?;

    renderer.begin(slides.len())?;
    for slide in &slides {
        renderer.render_slide(slide)?;
    }
    renderer.finish()?;
    Ok(slides.len())
}

// ---------------------------------------------------------------------------
// OutlineRenderer: JSON deck outline
// ---------------------------------------------------------------------------

/// Serializable deck outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOutline {
    /// RFC 3339 timestamp of when the outline was produced.
    pub generated_at: String,
    pub slides: Vec<SlideEntry>,
}

impl DeckOutline {
    /// Serialize this outline to JSON and write it to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), slides = self.slides.len(), "Deck outline saved");
        Ok(())
    }

    /// Read an outline from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Collects slides into a [`DeckOutline`].
#[derive(Debug, Default)]
pub struct OutlineRenderer {
    slides: Vec<SlideEntry>,
}

impl OutlineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_outline(self) -> DeckOutline {
        DeckOutline {
            generated_at: chrono::Utc::now().to_rfc3339(),
            slides: self.slides,
        }
    }
}

impl DeckRenderer for OutlineRenderer {
    fn begin(&mut self, slide_count: usize) -> Result<()> {
        self.slides.reserve(slide_count);
        Ok(())
    }

    fn render_slide(&mut self, slide: &SlideEntry) -> Result<()> {
        self.slides.push(slide.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TextRenderer: one line per slide
// ---------------------------------------------------------------------------

/// Writes one line per slide; non-root slides are indented under their Theme.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DeckRenderer for TextRenderer<W> {
    fn render_slide(&mut self, slide: &SlideEntry) -> Result<()> {
        let indent = match slide.kind {
            GoalKind::Theme => "",
            GoalKind::Objective | GoalKind::Outcome => "  ",
            GoalKind::Action => "    ",
        };
        writeln!(
            self.out,
            "{:>3}. {indent}[{}] {}",
            slide.position,
            slide.kind.as_str(),
            slide.title
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
