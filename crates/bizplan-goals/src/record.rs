//! Goal records and the header-to-field column binding.

use bizplan_types::{BizPlanError, ObjectType, Result};
use serde::Serialize;

use crate::alignment::{parse_alignment, AlignmentRef};
use crate::config::ColumnNames;
use crate::identifier::OkrId;

/// Column positions for every field of a [`GoalRecord`], resolved once per
/// run from the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    id: usize,
    title: usize,
    tag: usize,
    owner: usize,
    period: usize,
    start_date: usize,
    end_date: usize,
    description: usize,
    alignment: usize,
    metric_name: usize,
    target: usize,
    object_type: usize,
    status: usize,
}

impl ColumnMap {
    /// Bind header names to positions. Fails on the first required header
    /// missing from `headers`.
    pub fn bind(headers: &[String], names: &ColumnNames) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| BizPlanError::MissingColumn(name.to_string()))
        };

        Ok(ColumnMap {
            id: find(&names.id)?,
            title: find(&names.title)?,
            tag: find(&names.tag)?,
            owner: find(&names.owner)?,
            period: find(&names.period)?,
            start_date: find(&names.start_date)?,
            end_date: find(&names.end_date)?,
            description: find(&names.description)?,
            alignment: find(&names.alignment)?,
            metric_name: find(&names.metric_name)?,
            target: find(&names.target)?,
            object_type: find(&names.object_type)?,
            status: find(&names.status)?,
        })
    }

    /// Smallest row width that covers every bound column.
    pub fn required_width(&self) -> usize {
        [
            self.id,
            self.title,
            self.tag,
            self.owner,
            self.period,
            self.start_date,
            self.end_date,
            self.description,
            self.alignment,
            self.metric_name,
            self.target,
            self.object_type,
            self.status,
        ]
        .into_iter()
        .max()
        .map_or(0, |max| max + 1)
    }
}

/// One input row of the goal table.
///
/// Display fields are opaque strings; only `okr`, `tag`, `alignment`,
/// `object_type` and `row_number` take part in ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRecord {
    /// Raw composite `Id` field.
    pub internal_id: String,
    /// `internal_id` parsed into link and registry key.
    pub okr: OkrId,
    pub title: String,
    pub tag: String,
    pub owner: String,
    pub schedule: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub alignment: String,
    pub metric_name: String,
    pub target: String,
    /// Raw object type; validated when the record is ordered.
    pub object_type: String,
    pub status: String,
    /// Zero-based position among the data rows.
    pub row_number: usize,
}

impl GoalRecord {
    /// Build a record from one data row. `row_number` is the zero-based data
    /// row index; errors report the sheet row (header is row 1).
    pub fn from_row(row: &[String], columns: &ColumnMap, row_number: usize) -> Result<Self> {
        let width = columns.required_width();
        if row.len() < width {
            return Err(BizPlanError::MalformedRow {
                row: row_number + 2,
                message: format!("expected at least {width} columns, found {}", row.len()),
            });
        }

        let cell = |idx: usize| row[idx].clone();
        let internal_id = cell(columns.id);
        let okr = OkrId::parse(&internal_id);

        Ok(GoalRecord {
            internal_id,
            okr,
            title: cell(columns.title),
            tag: cell(columns.tag),
            owner: cell(columns.owner),
            schedule: cell(columns.period),
            start_date: cell(columns.start_date),
            end_date: cell(columns.end_date),
            description: cell(columns.description),
            alignment: cell(columns.alignment),
            metric_name: cell(columns.metric_name),
            target: cell(columns.target),
            object_type: cell(columns.object_type),
            status: cell(columns.status),
            row_number,
        })
    }

    /// Registry key.
    pub fn id(&self) -> &str {
        &self.okr.id
    }

    pub fn is_theme(&self, theme_tag: &str) -> bool {
        self.tag == theme_tag
    }

    /// Validated object type.
    pub fn object_type(&self) -> Result<ObjectType> {
        self.object_type
            .parse()
            .map_err(|value| BizPlanError::InvalidObjectType {
                title: self.title.clone(),
                value,
            })
    }

    /// Structured parent references from the alignment field.
    pub fn alignment_refs(&self) -> Vec<AlignmentRef> {
        parse_alignment(&self.alignment)
    }
}
