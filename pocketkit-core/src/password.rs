//! Password engine: policy, character set assembly, sampling and strength scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod charset;
pub mod generator;
pub mod strength;

pub use charset::{AMBIGUOUS_CHARS, Charset, SIMILAR_CHARS, build_charset};
pub use generator::{Generated, MAX_ATTEMPTS, generate, generate_secure};
pub use strength::{MAX_DISPLAY_SCORE, Strength, StrengthLabel, score_strength};

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 32;
pub const DEFAULT_LENGTH: usize = 16;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharClass {
    Upper,
    Lower,
    Digit,
    Symbol,
}

impl CharClass {
    pub const fn all() -> &'static [CharClass] {
        &[
            CharClass::Upper,
            CharClass::Lower,
            CharClass::Digit,
            CharClass::Symbol,
        ]
    }

    pub fn alphabet(&self) -> &'static str {
        match self {
            CharClass::Upper => UPPERCASE,
            CharClass::Lower => LOWERCASE,
            CharClass::Digit => DIGITS,
            CharClass::Symbol => SYMBOLS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharClass::Upper => "uppercase",
            CharClass::Lower => "lowercase",
            CharClass::Digit => "digits",
            CharClass::Symbol => "symbols",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints for a single generation request.
///
/// Also used as the `[password]` section of the config file, so every field
/// falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    /// Extra characters the user never wants to see.
    pub exclude: String,
    /// Drop `il1Lo0O`.
    pub exclude_similar: bool,
    /// Drop brackets, quotes and punctuation that are easy to mistype.
    pub exclude_ambiguous: bool,
    pub require_all_classes: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude: String::new(),
            exclude_similar: true,
            exclude_ambiguous: false,
            require_all_classes: true,
        }
    }
}

impl PasswordPolicy {
    pub fn is_enabled(&self, class: CharClass) -> bool {
        match class {
            CharClass::Upper => self.uppercase,
            CharClass::Lower => self.lowercase,
            CharClass::Digit => self.digits,
            CharClass::Symbol => self.symbols,
        }
    }

    pub fn set_enabled(&mut self, class: CharClass, enabled: bool) {
        match class {
            CharClass::Upper => self.uppercase = enabled,
            CharClass::Lower => self.lowercase = enabled,
            CharClass::Digit => self.digits = enabled,
            CharClass::Symbol => self.symbols = enabled,
        }
    }

    pub fn enabled_classes(&self) -> Vec<CharClass> {
        CharClass::all()
            .iter()
            .copied()
            .filter(|class| self.is_enabled(*class))
            .collect()
    }

    /// Policy with exactly `classes` enabled and every other setting at its default.
    pub fn with_classes(length: usize, classes: &[CharClass]) -> Self {
        let mut policy = Self {
            length,
            ..Self::default()
        };
        for class in CharClass::all() {
            policy.set_enabled(*class, classes.contains(class));
        }
        policy
    }
}
