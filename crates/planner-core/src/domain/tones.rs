use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Tone presets offered by the editor. Custom labels are also accepted.
pub const PRESET_TONES: [&str; 7] = [
    "Educator",
    "Influencer",
    "Did You Know?",
    "Humorous",
    "Inspirational",
    "News Reporter",
    "Technical Explainer",
];

/// Ordered set of tone labels.
///
/// Labels are trimmed on the way in and never duplicated. Insertion order is
/// kept for stable display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tones(Vec<String>);

impl Tones {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        let label = label.trim();
        self.0.iter().any(|t| t == label)
    }

    /// Adds a label. Returns false if it was already present.
    pub fn add(&mut self, label: &str) -> Result<bool, DomainError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::validation("tone cannot be empty"));
        }
        if self.contains(label) {
            return Ok(false);
        }
        self.0.push(label.to_string());
        Ok(true)
    }

    /// Removes a label. Returns false if it was not present.
    pub fn remove(&mut self, label: &str) -> bool {
        let label = label.trim();
        let before = self.0.len();
        self.0.retain(|t| t != label);
        self.0.len() != before
    }

    /// Adds the label if absent, removes it otherwise. Returns whether it is
    /// present afterwards.
    pub fn toggle(&mut self, label: &str) -> Result<bool, DomainError> {
        if self.remove(label) {
            return Ok(false);
        }
        self.add(label)
    }
}

impl From<Vec<String>> for Tones {
    fn from(labels: Vec<String>) -> Self {
        let mut tones = Tones::default();
        for label in labels {
            // Blank labels in stored data are dropped.
            let _ = tones.add(&label);
        }
        tones
    }
}

impl From<Tones> for Vec<String> {
    fn from(tones: Tones) -> Self {
        tones.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_dedupes() {
        let mut tones = Tones::default();
        assert!(tones.add("  Humorous ").unwrap());
        assert!(!tones.add("Humorous").unwrap());
        assert_eq!(tones.as_slice(), ["Humorous".to_string()]);
    }

    #[test]
    fn test_blank_label_rejected() {
        let mut tones = Tones::default();
        assert!(tones.add("   ").is_err());
        assert!(tones.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut tones = Tones::default();
        assert!(tones.toggle("Educator").unwrap());
        assert!(tones.contains("Educator"));
        assert!(!tones.toggle("Educator").unwrap());
        assert!(!tones.contains("Educator"));
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let tones: Tones =
            serde_json::from_str(r#"["Educator", "Humorous", "Educator", ""]"#).unwrap();
        let labels: Vec<&str> = tones.iter().collect();
        assert_eq!(labels, vec!["Educator", "Humorous"]);
    }
}
