use scoring::models::{Gender, ParsedResult};
use serde::Serialize;
use std::collections::HashMap;

pub const UNKNOWN_RACE: &str = "Unknown Race";

/// Recognised race levels, ordered by how races are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceCategory {
    Varsity,
    JuniorVarsity,
    Reserves,
    Frosh,
    Other,
}

impl RaceCategory {
    /// Classifies free-form category text. Junior varsity is checked first
    /// since its label also contains "varsity".
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        let is_jv = lower.contains("junior varsity")
            || lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == "jv");

        if is_jv {
            Self::JuniorVarsity
        } else if lower.contains("varsity") {
            Self::Varsity
        } else if lower.contains("reserve") {
            Self::Reserves
        } else if lower.contains("frosh") {
            Self::Frosh
        } else {
            Self::Other
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Varsity => 1,
            Self::JuniorVarsity => 2,
            Self::Reserves => 3,
            Self::Frosh => 4,
            Self::Other => 99,
        }
    }

    pub fn canonical_name(&self) -> Option<&'static str> {
        match self {
            Self::Varsity => Some("Varsity"),
            Self::JuniorVarsity => Some("JV"),
            Self::Reserves => Some("Reserves"),
            Self::Frosh => Some("Frosh"),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceGroup {
    /// Category text as first seen in the source.
    pub category: String,
    pub kind: RaceCategory,
    pub name: String,
    pub gender: Gender,
    pub results: Vec<ParsedResult>,
}

impl RaceGroup {
    pub fn results_count(&self) -> usize {
        self.results.len()
    }
}

/// Splits a flat result list into races keyed by category and gender.
///
/// Category keys compare trimmed and case-insensitively. Results keep their
/// input order inside a group; groups are ordered by category rank, then
/// boys before girls, then first appearance.
pub fn group_races(results: &[ParsedResult]) -> Vec<RaceGroup> {
    let mut index: HashMap<(String, Gender), usize> = HashMap::new();
    let mut groups: Vec<RaceGroup> = Vec::new();

    for result in results {
        let category = result
            .race_category
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(UNKNOWN_RACE);
        let key = (category.to_lowercase(), result.gender);

        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(new_group(category, result.gender));
            groups.len() - 1
        });
        groups[slot].results.push(result.clone());
    }

    groups.sort_by_key(|group| (group.kind.rank(), group.gender.sort_order()));
    groups
}

fn new_group(category: &str, gender: Gender) -> RaceGroup {
    let kind = RaceCategory::classify(category);
    let name = match (kind.canonical_name(), gender.team_label()) {
        (Some(level), Some(label)) => format!("{} {}", level, label),
        (Some(level), None) => level.to_string(),
        (None, _) => category.to_string(),
    };

    RaceGroup {
        category: category.to_string(),
        kind,
        name,
        gender,
        results: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring::models::RaceTime;

    fn result(name: &str, category: Option<&str>, gender: Gender) -> ParsedResult {
        ParsedResult {
            first_name: name.to_string(),
            last_name: String::new(),
            school_name: "Westmont".to_string(),
            time: RaceTime::parse("18:00").unwrap(),
            place: None,
            gender,
            grade: None,
            athlete_id: None,
            bib: None,
            race_category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(RaceCategory::classify("Varsity"), RaceCategory::Varsity);
        assert_eq!(RaceCategory::classify("Boys Junior Varsity 3 Mile"), RaceCategory::JuniorVarsity);
        assert_eq!(RaceCategory::classify("JV-B"), RaceCategory::JuniorVarsity);
        assert_eq!(RaceCategory::classify("Reserves"), RaceCategory::Reserves);
        assert_eq!(RaceCategory::classify("Frosh/Soph"), RaceCategory::Frosh);
        assert_eq!(RaceCategory::classify("Open 5K"), RaceCategory::Other);
        // "jv" only counts as a whole word
        assert_eq!(RaceCategory::classify("Ajvar Invitational"), RaceCategory::Other);
    }

    #[test]
    fn test_groups_are_ranked_then_boys_first() {
        let results = vec![
            result("a", Some("Open 5K"), Gender::Female),
            result("b", Some("JV"), Gender::Female),
            result("c", Some("Varsity"), Gender::Female),
            result("d", Some("varsity "), Gender::Male),
            result("e", None, Gender::Male),
            result("f", Some("JV"), Gender::Male),
            result("g", Some("Varsity"), Gender::Female),
        ];

        let groups = group_races(&results);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Varsity Boys", "Varsity Girls", "JV Boys", "JV Girls", "Unknown Race", "Open 5K"]
        );

        assert_eq!(groups[0].category, "varsity");
        assert_eq!(groups[1].results_count(), 2);
        assert_eq!(groups[1].results[0].first_name, "c");
        assert_eq!(groups[1].results[1].first_name, "g");
    }

    #[test]
    fn test_unknown_gender_keeps_bare_level() {
        let results = vec![
            result("a", Some("Reserves"), Gender::Unknown),
            result("b", Some("Reserves"), Gender::Male),
        ];
        let groups = group_races(&results);
        assert_eq!(groups[0].name, "Reserves Boys");
        assert_eq!(groups[1].name, "Reserves");
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let results: Vec<ParsedResult> = (0..40)
            .map(|i| {
                let category = ["Varsity", "JV", "Frosh", "Open"][i % 4];
                let gender = if i % 3 == 0 { Gender::Female } else { Gender::Male };
                result(&i.to_string(), Some(category), gender)
            })
            .collect();

        let summarize = |groups: Vec<RaceGroup>| {
            groups
                .into_iter()
                .map(|g| (g.name, g.results.into_iter().map(|r| r.first_name).collect::<Vec<_>>()))
                .collect::<Vec<_>>()
        };

        assert_eq!(summarize(group_races(&results)), summarize(group_races(&results)));
    }
}
