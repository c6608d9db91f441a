use serde::{Deserialize, Serialize};

/// A competitor's name split into first and last parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteName {
    pub first_name: String,
    pub last_name: String,
}

impl AthleteName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Splits a single "full name" cell.
    ///
    /// The final whitespace-delimited token becomes the last name and every
    /// token before it the first name, so multi-word given names survive.
    /// A single token is treated as a first name with an empty last name.
    ///
    /// ```
    /// use scoring::models::AthleteName;
    ///
    /// let name = AthleteName::from_full_name("Edgar Gomez Tapia").unwrap();
    /// assert_eq!(name.first_name, "Edgar Gomez");
    /// assert_eq!(name.last_name, "Tapia");
    /// ```
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let tokens: Vec<&str> = full_name.split_whitespace().collect();
        match tokens.split_last() {
            None => None,
            Some((only, [])) => Some(Self::new(*only, "")),
            Some((last, rest)) => Some(Self::new(rest.join(" "), *last)),
        }
    }

    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Convenience wrapper returning `(first, last)`.
pub fn split_full_name(full_name: &str) -> (String, String) {
    AthleteName::from_full_name(full_name)
        .map(|name| (name.first_name, name.last_name))
        .unwrap_or_default()
}
