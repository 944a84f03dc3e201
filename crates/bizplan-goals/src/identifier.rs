//! Composite identifier parsing.
//!
//! The export stores each goal's id as two quoted tokens, `"<link>" "<id>"`:
//! a deep link back into the goal-tracking tool and the numeric id that
//! alignment references point at.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.*?)""#).expect("quoted token regex is valid"));

/// Parsed form of the composite `Id` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkrId {
    /// External link, used only by the renderer.
    pub link: String,
    /// Registry key.
    pub id: String,
}

impl OkrId {
    /// Parse a composite id string. Anything other than exactly two quoted
    /// tokens yields an empty link and id.
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = QUOTED
            .captures_iter(raw)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();

        match tokens.as_slice() {
            [link, id] => OkrId {
                link: (*link).to_string(),
                id: (*id).to_string(),
            },
            _ => OkrId::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}
