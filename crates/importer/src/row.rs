use chrono::NaiveDate;
use scoring::models::{AthleteName, Gender, ParsedResult, RaceTime, grade_level};
use serde::{Deserialize, Serialize};

use crate::mapping::{Field, HeaderIndex};

/// One source cell, typed at the ingestion boundary.
///
/// CSV cells are always `Text` or `Missing`; JSON sources may also carry
/// `Integer`. Nothing past the row resolver sees untyped data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Missing,
}

impl FieldValue {
    /// A cell the reader has already unquoted: trimmed, blank is `Missing`.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Raw text that may still carry one pair of surrounding quotes.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(trimmed);
        Self::from_cell(unquoted)
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Missing,
            Value::String(text) => Self::from_text(text),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Self::Integer(integer),
                None => Self::from_text(&number.to_string()),
            },
            Value::Bool(flag) => Self::Text(flag.to_string()),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Integer(integer) => Some(integer.to_string()),
            Self::Missing => None,
        }
    }

    /// Best-effort integer read; anything unparsable is `None`, never zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(integer) => Some(*integer),
            Self::Text(text) => text.parse().ok(),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Why a row did not become a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    MissingName,
    MissingSchool,
    InvalidTime,
    /// The reader could not split the record into cells.
    Unreadable,
}

/// Per-import context that is not part of the rows themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Used to derive grades from a graduation-year column.
    pub race_date: Option<NaiveDate>,
}

/// Turns typed cells into a `ParsedResult`. Shared by every source format.
pub struct RowResolver<'a> {
    index: &'a HeaderIndex,
    options: &'a ImportOptions,
}

impl<'a> RowResolver<'a> {
    pub fn new(index: &'a HeaderIndex, options: &'a ImportOptions) -> Self {
        Self { index, options }
    }

    pub fn resolve(&self, cells: &[FieldValue]) -> Result<ParsedResult, RowRejection> {
        let name = self.resolve_name(cells).ok_or(RowRejection::MissingName)?;
        let school_name = self
            .text(cells, Field::School)
            .ok_or(RowRejection::MissingSchool)?;
        let time = self
            .text(cells, Field::Time)
            .and_then(|text| RaceTime::parse(&text))
            .ok_or(RowRejection::InvalidTime)?;

        let gender = self
            .text(cells, Field::Gender)
            .map(|label| Gender::from_label(&label))
            .unwrap_or(Gender::Unknown);

        let place = self
            .integer(cells, Field::Place)
            .and_then(|place| u32::try_from(place).ok());

        Ok(ParsedResult {
            first_name: name.first_name,
            last_name: name.last_name,
            school_name,
            time,
            place,
            gender,
            grade: self.resolve_grade(cells),
            athlete_id: self.text(cells, Field::AthleteId),
            bib: self.text(cells, Field::Bib),
            race_category: self.text(cells, Field::Race),
        })
    }

    fn resolve_name(&self, cells: &[FieldValue]) -> Option<AthleteName> {
        if let Some(name) = self
            .text(cells, Field::FullName)
            .and_then(|full_name| AthleteName::from_full_name(&full_name))
        {
            return Some(name);
        }

        let first_name = self.text(cells, Field::FirstName)?;
        let last_name = self.text(cells, Field::LastName).unwrap_or_default();
        Some(AthleteName::new(first_name, last_name))
    }

    fn resolve_grade(&self, cells: &[FieldValue]) -> Option<i32> {
        if let Some(grade) = self
            .integer(cells, Field::Grade)
            .and_then(|grade| i32::try_from(grade).ok())
        {
            return Some(grade);
        }

        let race_date = self.options.race_date?;
        let graduation_year = i32::try_from(self.integer(cells, Field::GraduationYear)?).ok()?;
        grade_level(graduation_year, race_date)
    }

    fn cell<'c>(&self, cells: &'c [FieldValue], field: Field) -> Option<&'c FieldValue> {
        self.index
            .column(field)
            .and_then(|column| cells.get(column))
            .filter(|value| !value.is_missing())
    }

    fn text(&self, cells: &[FieldValue], field: Field) -> Option<String> {
        self.cell(cells, field).and_then(FieldValue::as_text)
    }

    fn integer(&self, cells: &[FieldValue], field: Field) -> Option<i64> {
        self.cell(cells, field).and_then(FieldValue::as_integer)
    }
}
