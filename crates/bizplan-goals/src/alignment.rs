//! Alignment field parsing.
//!
//! The alignment column mixes a human-readable label with zero or more
//! structured references of the form `(weight: <number>%, Id: <integer>)`.
//! Only the structured references take part in ordering; the label is kept
//! for display after the references are stripped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(weight: (\d+(?:\.\d+)?)%, Id: (\d+)\)").expect("alignment regex is valid")
});

/// Prefix marking the MWB part of an Objective's alignment label.
const MWB_PREFIX: &str = "MWB:";

/// One structured `(weight, Id)` reference to a parent goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRef {
    /// Weight in percent, as written in the export.
    pub weight: f64,
    pub parent_id: String,
}

/// Extract every structured reference, left to right. Text that does not
/// match the pattern is ignored, so a plain label yields an empty vector.
pub fn parse_alignment(text: &str) -> Vec<AlignmentRef> {
    REFERENCE
        .captures_iter(text)
        .filter_map(|caps| {
            let weight = caps.get(1)?.as_str().parse().ok()?;
            let parent_id = caps.get(2)?.as_str().to_string();
            Some(AlignmentRef { weight, parent_id })
        })
        .collect()
}

/// Remove every structured reference, leaving the display label.
pub fn clean_alignment(text: &str) -> String {
    REFERENCE.replace_all(text, "").into_owned()
}

/// Display labels carried by an Objective's cleaned alignment text.
///
/// The label is a `" / "`-separated list; the segment starting with `MWB:`
/// is the MWB alignment and any other segment is the parent plan theme.
/// When several segments compete for a slot the last one wins, even if it is
/// empty. Segments are kept verbatim and an empty winner means no label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentLabels {
    pub plan_theme: Option<String>,
    pub mwb: Option<String>,
}

impl AlignmentLabels {
    pub fn split(cleaned: &str) -> Self {
        let mut plan_theme = "";
        let mut mwb = "";
        for part in cleaned.split(" / ") {
            if part.starts_with(MWB_PREFIX) {
                mwb = part;
            } else {
                plan_theme = part;
            }
        }

        let label = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        AlignmentLabels {
            plan_theme: label(plan_theme),
            mwb: label(mwb),
        }
    }
}
