//! Heuristic strength score.
//!
//! Points are awarded for length thresholds, character variety and a low
//! repetition ratio. This is not an entropy estimate; the weights are kept
//! as they are so that labels already stored in the vault stay comparable.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// Scores are shown out of this, although the highest reachable score is 9.
pub const MAX_DISPLAY_SCORE: u8 = 10;

const LENGTH_THRESHOLDS: [usize; 4] = [8, 12, 16, 20];
const UNIQUE_RATIO_BONUS: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthLabel {
    #[serde(rename = "Very Weak", alias = "Very Weak 🚨")]
    VeryWeak,
    #[serde(alias = "Weak ⚠️")]
    Weak,
    #[serde(alias = "Good 🛡️")]
    Good,
    #[serde(alias = "Strong 🔐")]
    Strong,
    #[serde(rename = "Very Strong", alias = "Very Strong 🔒")]
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            8.. => StrengthLabel::VeryStrong,
            6..=7 => StrengthLabel::Strong,
            4..=5 => StrengthLabel::Good,
            2..=3 => StrengthLabel::Weak,
            _ => StrengthLabel::VeryWeak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Good => "Good",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strength {
    pub score: u8,
    pub label: StrengthLabel,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Score: {}/{})",
            self.label, self.score, MAX_DISPLAY_SCORE
        )
    }
}

pub fn score_strength(password: &str) -> Strength {
    let length = password.chars().count();
    if length == 0 {
        return Strength {
            score: 0,
            label: StrengthLabel::VeryWeak,
        };
    }

    let mut score = LENGTH_THRESHOLDS.iter().filter(|t| length >= **t).count() as u8;

    let variety = [
        password.chars().any(char::is_uppercase),
        password.chars().any(char::is_lowercase),
        password.chars().any(char::is_numeric),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    score += variety.iter().filter(|present| **present).count() as u8;

    let unique = password.chars().collect::<HashSet<_>>().len();
    if unique as f64 / length as f64 > UNIQUE_RATIO_BONUS {
        score += 1;
    }

    Strength {
        score,
        label: StrengthLabel::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_password_is_very_weak() {
        let strength = score_strength("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.label, StrengthLabel::VeryWeak);
    }

    #[test]
    fn short_single_class_password() {
        // no length points, one class, all unique
        let strength = score_strength("abc");
        assert_eq!(strength.score, 2);
        assert_eq!(strength.label, StrengthLabel::Weak);
    }

    #[test]
    fn repeated_characters_miss_the_bonus() {
        // length 8, lowercase only, 1/8 unique
        assert_eq!(score_strength("aaaaaaaa").score, 2);
    }

    #[test]
    fn mixed_twelve_characters_is_strong() {
        // 2 length points, 4 classes, 12/12 unique
        let strength = score_strength("Abcdefgh1!Xy");
        assert_eq!(strength.score, 7);
        assert_eq!(strength.label, StrengthLabel::Strong);
    }

    #[test]
    fn long_varied_password_is_very_strong() {
        let strength = score_strength("Q7#mZp2&vK9!tR4@wX8$");
        assert_eq!(strength.score, 9);
        assert_eq!(strength.label, StrengthLabel::VeryStrong);
        assert_eq!(strength.to_string(), "Very Strong (Score: 9/10)");
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(StrengthLabel::from_score(0), StrengthLabel::VeryWeak);
        assert_eq!(StrengthLabel::from_score(1), StrengthLabel::VeryWeak);
        assert_eq!(StrengthLabel::from_score(2), StrengthLabel::Weak);
        assert_eq!(StrengthLabel::from_score(4), StrengthLabel::Good);
        assert_eq!(StrengthLabel::from_score(6), StrengthLabel::Strong);
        assert_eq!(StrengthLabel::from_score(8), StrengthLabel::VeryStrong);
    }

    #[test]
    fn legacy_labels_with_emoji_deserialize() {
        let label: StrengthLabel = serde_json::from_str("\"Very Strong 🔒\"").unwrap();
        assert_eq!(label, StrengthLabel::VeryStrong);

        let label: StrengthLabel = serde_json::from_str("\"Good 🛡️\"").unwrap();
        assert_eq!(label, StrengthLabel::Good);

        let json = serde_json::to_string(&StrengthLabel::VeryWeak).unwrap();
        assert_eq!(json, "\"Very Weak\"");
    }

    proptest! {
        #[test]
        fn score_never_exceeds_nine(password in "\\PC{0,40}") {
            let strength = score_strength(&password);
            prop_assert!(strength.score <= 9);
            prop_assert_eq!(strength.label, StrengthLabel::from_score(strength.score));
        }
    }
}
