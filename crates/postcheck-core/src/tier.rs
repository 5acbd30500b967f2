//! The three-level safety classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Safety tier assigned to a post.
///
/// Serialized in lowercase (`"safe"`, `"warning"`, `"danger"`). Upper-case
/// and capitalized spellings are accepted when deserializing, since models
/// that ignore the schema often echo the rubric's headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyTier {
    /// Nothing objectionable.
    #[default]
    #[serde(alias = "SAFE", alias = "Safe")]
    Safe,
    /// Mildly inappropriate; worth a second look before posting.
    #[serde(alias = "WARNING", alias = "Warning")]
    Warning,
    /// Harmful, illegal, or exposes personal information.
    #[serde(alias = "DANGER", alias = "Danger")]
    Danger,
}

impl SafetyTier {
    /// All tiers from least to most severe.
    pub const ALL: [SafetyTier; 3] = [SafetyTier::Safe, SafetyTier::Warning, SafetyTier::Danger];

    /// Wire name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Whether the tier ends the branching workflow without correction.
    pub fn is_safe(self) -> bool {
        self == Self::Safe
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            other => Err(format!("unknown safety tier: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_safe() {
        assert_eq!(SafetyTier::default(), SafetyTier::Safe);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&SafetyTier::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }

    #[test]
    fn accepts_uppercase_aliases() {
        let tier: SafetyTier = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(tier, SafetyTier::Warning);
        let tier: SafetyTier = serde_json::from_str("\"Danger\"").unwrap();
        assert_eq!(tier, SafetyTier::Danger);
    }

    #[test]
    fn rejects_unknown_tier() {
        assert!(serde_json::from_str::<SafetyTier>("\"caution\"").is_err());
        assert!("caution".parse::<SafetyTier>().is_err());
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(" Safe ".parse::<SafetyTier>().unwrap(), SafetyTier::Safe);
        assert_eq!("DANGER".parse::<SafetyTier>().unwrap(), SafetyTier::Danger);
    }

    #[test]
    fn only_safe_is_safe() {
        let safe: Vec<_> = SafetyTier::ALL.iter().filter(|t| t.is_safe()).collect();
        assert_eq!(safe, vec![&SafetyTier::Safe]);
    }
}
