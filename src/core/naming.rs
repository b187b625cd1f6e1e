//! Base-name extraction for grouping similarly named objects.
//!
//! Hosts disambiguate duplicate names with a numeric suffix (`Cube.001`,
//! `Rock_04`, `Tree-2`). The base name is the name with one such suffix
//! removed, provided something is left in front of the separator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters that may introduce a numeric suffix.
pub const SUFFIX_SEPARATORS: [char; 3] = ['.', '_', '-'];

/// Strip one trailing `<separator><digits>` suffix from `name`.
///
/// Returns `None` for an empty name. A name that is only a suffix (`.001`)
/// is its own base name.
pub fn base_name(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }

    let without_digits = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == name.len() {
        return Some(name);
    }

    match without_digits.char_indices().next_back() {
        Some((sep_at, sep)) if SUFFIX_SEPARATORS.contains(&sep) && sep_at > 0 => {
            Some(&name[..sep_at])
        }
        _ => Some(name),
    }
}

/// Normalized base name used as a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    /// Derive the key for `name`; lowercased unless `case_sensitive`.
    pub fn from_name(name: &str, case_sensitive: bool) -> Option<Self> {
        base_name(name).map(|base| {
            if case_sensitive {
                Self(base.to_string())
            } else {
                Self(base.to_lowercase())
            }
        })
    }

    /// Key text as compared
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_host_suffixes() {
        assert_eq!(base_name("Cube.001"), Some("Cube"));
        assert_eq!(base_name("Cube_04"), Some("Cube"));
        assert_eq!(base_name("Cube-7"), Some("Cube"));
        assert_eq!(base_name("Cube"), Some("Cube"));
    }

    #[test]
    fn test_only_last_suffix_is_stripped() {
        assert_eq!(base_name("Cube.001.002"), Some("Cube.001"));
        assert_eq!(base_name("A_1_2"), Some("A_1"));
    }

    #[test]
    fn test_digits_without_separator_are_kept() {
        assert_eq!(base_name("Cube2"), Some("Cube2"));
        assert_eq!(base_name("Rock.a1"), Some("Rock.a1"));
        assert_eq!(base_name("Cube."), Some("Cube."));
    }

    #[test]
    fn test_bare_suffix_is_its_own_base() {
        assert_eq!(base_name(".001"), Some(".001"));
        assert_eq!(base_name("_1"), Some("_1"));
        assert_eq!(base_name("42"), Some("42"));
    }

    #[test]
    fn test_empty_name_has_no_base() {
        assert_eq!(base_name(""), None);
        assert_eq!(NameKey::from_name("", false), None);
    }

    #[test]
    fn test_name_key_case_handling() {
        let insensitive = NameKey::from_name("Cube.001", false).unwrap();
        let sensitive = NameKey::from_name("Cube.001", true).unwrap();
        assert_eq!(insensitive.as_str(), "cube");
        assert_eq!(sensitive.as_str(), "Cube");
        assert_eq!(
            NameKey::from_name("CUBE_3", false),
            NameKey::from_name("cube.9", false)
        );
    }

    #[test]
    fn test_non_ascii_names() {
        assert_eq!(base_name("Würfel.002"), Some("Würfel"));
        assert_eq!(base_name("立方体_1"), Some("立方体"));
    }

    proptest! {
        #[test]
        fn prop_suffix_round_trip(
            base in "[A-Za-z][A-Za-z ]{0,12}",
            sep in prop::sample::select(vec!['.', '_', '-']),
            digits in "[0-9]{1,4}",
        ) {
            let name = format!("{base}{sep}{digits}");
            prop_assert_eq!(base_name(&name), Some(base.as_str()));
        }

        #[test]
        fn prop_base_is_prefix(name in "\\PC{1,24}") {
            let base = base_name(&name).unwrap();
            prop_assert!(name.starts_with(base));
            prop_assert!(!base.is_empty());
        }
    }
}
