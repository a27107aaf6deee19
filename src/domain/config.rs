use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

/// Configuration for backlog extraction.
///
/// This struct extends the built-in header aliases and table keywords for
/// documents whose authors use their own column naming.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Extra header aliases, keyed by header text.
    ///
    /// Keys are normalized the same way observed headers are, so
    /// `"Test Step"` and `"test-step"` are the same key. Entries override
    /// built-in aliases with the same key.
    ///
    /// For example, `"test step" = "Scenario"`.
    header_aliases: BTreeMap<String, String>,

    /// Extra keywords that mark a table as an acceptance criteria table.
    ///
    /// These are added to the built-in set and matched case-insensitively
    /// against the first two rows of every table.
    table_keywords: Vec<String>,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration at the given path, falling back to the
    /// defaults if it is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the extra header aliases.
    #[must_use]
    pub const fn header_aliases(&self) -> &BTreeMap<String, String> {
        &self.header_aliases
    }

    /// Returns the extra table keywords.
    #[must_use]
    pub fn table_keywords(&self) -> &[String] {
        &self.table_keywords
    }

    /// Adds a header alias.
    ///
    /// Returns the previous canonical name for the alias, if any.
    pub fn add_header_alias(
        &mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Option<String> {
        self.header_aliases.insert(alias.into(), canonical.into())
    }

    /// Adds a table keyword.
    ///
    /// Keywords are normalized to lowercase. Returns `true` if the keyword was
    /// added, `false` if it already existed.
    pub fn add_table_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || self.table_keywords.contains(&keyword) {
            false
        } else {
            self.table_keywords.push(keyword);
            true
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        header_aliases: BTreeMap<String, String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        table_keywords: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                header_aliases,
                table_keywords,
            } => {
                let mut config = Self {
                    header_aliases,
                    table_keywords: Vec::with_capacity(table_keywords.len()),
                };
                for keyword in &table_keywords {
                    config.add_table_keyword(keyword);
                }
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            header_aliases: config.header_aliases,
            table_keywords: config.table_keywords,
        }
    }
}
