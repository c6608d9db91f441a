use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical result fields a source column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    FirstName,
    LastName,
    School,
    Time,
    Gender,
    Place,
    Grade,
    GraduationYear,
    AthleteId,
    Bib,
    Race,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::School => "school",
            Self::Time => "time",
            Self::Gender => "gender",
            Self::Place => "place",
            Self::Grade => "grade",
            Self::GraduationYear => "graduation_year",
            Self::AthleteId => "athlete_id",
            Self::Bib => "bib",
            Self::Race => "race",
        }
    }

    pub fn all() -> &'static [Field] {
        &[
            Self::FullName,
            Self::FirstName,
            Self::LastName,
            Self::School,
            Self::Time,
            Self::Gender,
            Self::Place,
            Self::Grade,
            Self::GraduationYear,
            Self::AthleteId,
            Self::Bib,
            Self::Race,
        ]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which source header holds each logical field. Supplied by the caller,
/// never inferred from the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bib: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
}

impl FieldMapping {
    pub fn header_for(&self, field: Field) -> Option<&str> {
        let header = match field {
            Field::FullName => &self.full_name,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::School => &self.school,
            Field::Time => &self.time,
            Field::Gender => &self.gender,
            Field::Place => &self.place,
            Field::Grade => &self.grade,
            Field::GraduationYear => &self.graduation_year,
            Field::AthleteId => &self.athlete_id,
            Field::Bib => &self.bib,
            Field::Race => &self.race,
        };
        header.as_deref().filter(|h| !h.trim().is_empty())
    }

    pub fn mapped_fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::all()
            .iter()
            .filter_map(|field| self.header_for(*field).map(|header| (*field, header)))
    }
}

/// Column position of every mapped field found in a header row.
///
/// Built per import from the mapping and the header row; header text is
/// compared trimmed and case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<Field, usize>,
    unresolved: Vec<(Field, String)>,
}

impl HeaderIndex {
    pub fn build<S: AsRef<str>>(mapping: &FieldMapping, headers: &[S]) -> Self {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, header)| (normalize_header(header.as_ref()), idx))
            .collect();

        let mut index = Self::default();
        for (field, header) in mapping.mapped_fields() {
            match positions.get(&normalize_header(header)) {
                Some(column) => {
                    index.columns.insert(field, *column);
                }
                None => index.unresolved.push((field, header.to_string())),
            }
        }
        index
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Mapped fields whose header is not in the source.
    pub fn unresolved(&self) -> &[(Field, String)] {
        &self.unresolved
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .trim_matches('"')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping {
            full_name: Some("Athlete".to_string()),
            school: Some("School".to_string()),
            time: Some("Time".to_string()),
            place: Some("Place".to_string()),
            bib: Some("Bib #".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_lookup_is_trimmed_and_case_insensitive() {
        let headers = ["\u{feff}PLACE", " athlete ", "School", "time"];
        let index = HeaderIndex::build(&mapping(), &headers);

        assert_eq!(index.column(Field::Place), Some(0));
        assert_eq!(index.column(Field::FullName), Some(1));
        assert_eq!(index.column(Field::School), Some(2));
        assert_eq!(index.column(Field::Time), Some(3));
        assert!(!index.has(Field::Gender));
    }

    #[test]
    fn test_missing_mapped_header_is_unresolved() {
        let headers = ["Place", "Athlete", "School", "Time"];
        let index = HeaderIndex::build(&mapping(), &headers);
        assert_eq!(index.unresolved(), &[(Field::Bib, "Bib #".to_string())]);
    }

    #[test]
    fn test_duplicate_header_uses_first_column() {
        let headers = ["Time", "Athlete", "School", "Time"];
        let index = HeaderIndex::build(&mapping(), &headers);
        assert_eq!(index.column(Field::Time), Some(0));
    }

    #[test]
    fn test_blank_mapping_entries_are_ignored() {
        let mut mapping = mapping();
        mapping.gender = Some("  ".to_string());
        assert!(mapping.header_for(Field::Gender).is_none());
        assert_eq!(mapping.mapped_fields().count(), 5);
    }

    #[test]
    fn test_mapping_from_json() {
        let mapping: FieldMapping = serde_json::from_str(
            r#"{"full_name": "Athlete", "school": "School", "time": "Time", "race": "Race"}"#,
        )
        .unwrap();
        assert_eq!(mapping.header_for(Field::Race), Some("Race"));

        let unknown = serde_json::from_str::<FieldMapping>(r#"{"nickname": "Nick"}"#);
        assert!(unknown.is_err());
    }
}
