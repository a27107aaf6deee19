use std::{
    collections::{BTreeMap, HashMap},
    sync::LazyLock,
};

use regex::Regex;

/// Canonical column holding the criterion number.
pub const AC_NUMBER: &str = "AC #";
/// Canonical column holding the scenario name.
pub const SCENARIO: &str = "Scenario";
/// Canonical column holding free-text acceptance criteria.
pub const ACCEPTANCE_CRITERIA: &str = "Acceptance Criteria";

const BUILT_IN: &[(&str, &str)] = &[
    ("scenario", SCENARIO),
    ("given", "Given"),
    ("precondition", "Given"),
    ("when", "When"),
    ("action", "When"),
    ("then", "Then"),
    ("expected", "Expected"),
    ("expected result", "Expected"),
    ("result", "Expected"),
    ("acceptance criteria", ACCEPTANCE_CRITERIA),
    ("criteria", ACCEPTANCE_CRITERIA),
    ("ac", ACCEPTANCE_CRITERIA),
    ("#", AC_NUMBER),
    ("no", AC_NUMBER),
    ("id", AC_NUMBER),
    ("sr no", AC_NUMBER),
    ("s no", AC_NUMBER),
    ("sno", AC_NUMBER),
    ("srno", AC_NUMBER),
    ("ac #", AC_NUMBER),
    ("ac no", AC_NUMBER),
    ("ac number", AC_NUMBER),
];

static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w#]+").expect("noise pattern is valid"));

static DEFAULT_ALIASES: LazyLock<HeaderAliases> = LazyLock::new(HeaderAliases::built_in);

/// Lowercases header text and reduces punctuation and whitespace runs to a
/// single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NOISE
        .replace_all(&lowered, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonicalizes a header using the built-in alias table.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    DEFAULT_ALIASES.canonicalize(raw)
}

/// A lookup table from normalized header text to canonical column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAliases {
    aliases: HashMap<String, String>,
}

impl Default for HeaderAliases {
    fn default() -> Self {
        DEFAULT_ALIASES.clone()
    }
}

impl HeaderAliases {
    fn built_in() -> Self {
        Self {
            aliases: BUILT_IN
                .iter()
                .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
                .collect(),
        }
    }

    /// The built-in aliases extended with the given entries.
    ///
    /// Entry keys are normalized before insertion; entries replace built-in
    /// aliases with the same normalized key. Blank keys are ignored.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut aliases = Self::default();
        for (alias, canonical) in overrides {
            let key = normalize(alias);
            if key.is_empty() {
                tracing::debug!("Ignoring blank header alias for '{canonical}'");
                continue;
            }
            aliases.aliases.insert(key, canonical.trim().to_string());
        }
        aliases
    }

    /// Maps a raw header cell to its canonical column name.
    ///
    /// Unrecognised headers are returned trimmed but otherwise verbatim;
    /// blank input yields an empty string.
    #[must_use]
    pub fn canonicalize(&self, raw: &str) -> String {
        let raw = raw.trim();
        self.aliases
            .get(&normalize(raw))
            .map_or_else(|| raw.to_string(), Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn normalize_strips_noise() {
        assert_eq!(normalize("  Sr. No  "), "sr no");
        assert_eq!(normalize("AC\t#"), "ac #");
        assert_eq!(normalize("Expected\n  Result:"), "expected result");
        assert_eq!(normalize("S/No"), "s no");
        assert_eq!(normalize("   "), "");
    }

    #[test_case("Sr. No", AC_NUMBER; "serial number")]
    #[test_case("S.No", AC_NUMBER; "abbreviated serial number")]
    #[test_case("#", AC_NUMBER; "hash")]
    #[test_case("Expected Result", "Expected"; "expected result")]
    #[test_case("Pre-condition", "Pre-condition"; "hyphenated precondition is not an alias")]
    #[test_case("Precondition", "Given"; "precondition")]
    #[test_case("criteria", ACCEPTANCE_CRITERIA; "lowercase criteria")]
    #[test_case("SCENARIO", SCENARIO; "uppercase scenario")]
    fn known_aliases_are_canonicalized(raw: &str, expected: &str) {
        assert_eq!(canonicalize(raw), expected);
    }

    #[test]
    fn unknown_headers_pass_through_trimmed() {
        assert_eq!(canonicalize("  Owner Team "), "Owner Team");
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   "), "");
    }

    #[test]
    fn canonicalization_ignores_case_and_noise() {
        let variants = ["Sr No", "sr. no", "SR-NO", "  sr   no  ", "Sr_No"];
        for variant in variants {
            let expected = if variant.contains('_') {
                // '_' is a word character, so it is kept
                "Sr_No"
            } else {
                AC_NUMBER
            };
            assert_eq!(canonicalize(variant), expected, "{variant:?}");
        }
    }

    #[test]
    fn canonicalization_is_idempotent() {
        for raw in ["Sr. No", "Expected result", "Acceptance  Criteria", "Notes", "AC#", ""] {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "{raw:?}");
        }
    }

    #[test]
    fn overrides_extend_built_in_table() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Test Step".to_string(), "Scenario".to_string());
        overrides.insert("result".to_string(), "Outcome".to_string());
        overrides.insert("  ".to_string(), "Ignored".to_string());

        let aliases = HeaderAliases::with_overrides(&overrides);
        assert_eq!(aliases.canonicalize("test-step"), SCENARIO);
        assert_eq!(aliases.canonicalize("Result"), "Outcome");
        assert_eq!(aliases.canonicalize("Given"), "Given");
        assert_eq!(aliases.canonicalize(""), "");
    }
}
