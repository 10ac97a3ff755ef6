use std::collections::BTreeSet;

use super::{CharClass, PasswordPolicy};
use crate::error::InputError;

/// Characters that are easy to confuse with one another.
pub const SIMILAR_CHARS: &str = "il1Lo0O";

/// Brackets, quotes and punctuation that are awkward to type or read back.
pub const AMBIGUOUS_CHARS: &str = "{}[]()/\\'\"`~,;:.<>";

/// Filtered alphabets for the enabled classes, plus their union.
///
/// Classes whose alphabet filters down to nothing are dropped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    groups: Vec<(CharClass, Vec<char>)>,
    all: Vec<char>,
}

impl Charset {
    /// Every eligible character. Class alphabets are disjoint, so there are no duplicates.
    pub fn chars(&self) -> &[char] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.all.contains(&c)
    }

    pub fn groups(&self) -> impl Iterator<Item = (CharClass, &[char])> {
        self.groups
            .iter()
            .map(|(class, chars)| (*class, chars.as_slice()))
    }

    /// Classes that survived filtering.
    pub fn classes(&self) -> Vec<CharClass> {
        self.groups.iter().map(|(class, _)| *class).collect()
    }

    /// True when `password` has at least one character from every surviving class.
    pub fn covers_all_classes(&self, password: &str) -> bool {
        self.groups
            .iter()
            .all(|(_, chars)| password.chars().any(|c| chars.contains(&c)))
    }
}

/// Explicit exclusions plus the similar/ambiguous sets the policy switches on.
pub fn excluded_chars(policy: &PasswordPolicy) -> BTreeSet<char> {
    let mut excluded: BTreeSet<char> = policy.exclude.chars().collect();

    if policy.exclude_similar {
        excluded.extend(SIMILAR_CHARS.chars());
    }
    if policy.exclude_ambiguous {
        excluded.extend(AMBIGUOUS_CHARS.chars());
    }

    excluded
}

pub fn build_charset(policy: &PasswordPolicy) -> Result<Charset, InputError> {
    let classes = policy.enabled_classes();
    if classes.is_empty() {
        return Err(InputError::NoClassSelected);
    }

    let excluded = excluded_chars(policy);

    let groups: Vec<(CharClass, Vec<char>)> = classes
        .into_iter()
        .map(|class| {
            let chars = class
                .alphabet()
                .chars()
                .filter(|c| !excluded.contains(c))
                .collect::<Vec<_>>();
            (class, chars)
        })
        .filter(|(_, chars)| !chars.is_empty())
        .collect();

    if groups.is_empty() {
        return Err(InputError::EmptyCharset);
    }

    let all = groups
        .iter()
        .flat_map(|(_, chars)| chars.iter().copied())
        .collect();

    Ok(Charset { groups, all })
}
