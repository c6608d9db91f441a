use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Case-insensitive match on the labels result exports use.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "m" | "male" | "boys" | "boy" => Self::Male,
            "f" | "female" | "girls" | "girl" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Word used in race names ("Varsity Boys").
    pub fn team_label(&self) -> Option<&'static str> {
        match self {
            Self::Male => Some("Boys"),
            Self::Female => Some("Girls"),
            Self::Unknown => None,
        }
    }

    /// Boys sort before girls, unknown last.
    pub fn sort_order(&self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
            Self::Unknown => 2,
        }
    }
}
