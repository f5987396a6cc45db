//! Query-time options.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GlaiveError, Result};
use crate::index::config::IndexConfig;

/// Default cap on the number of results.
pub const DEFAULT_LIMIT: usize = 30;

/// Default teaser length in words.
pub const DEFAULT_TEASER_WORD_COUNT: usize = 30;

/// Boost factor of a prefix-expanded clause relative to an exact one, before
/// scaling by how much of the expanded token the query token covers.
pub const EXPANSION_PENALTY: f64 = 0.15;

/// How per-token matches combine into a result set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombineWith {
    /// A document must match at least one query token.
    #[default]
    Or,
    /// A document must match every query token.
    And,
}

impl CombineWith {
    /// The upper-case name used in index files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CombineWith::Or => "OR",
            CombineWith::And => "AND",
        }
    }
}

impl fmt::Display for CombineWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombineWith {
    type Err = GlaiveError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("or") {
            Ok(CombineWith::Or)
        } else if s.eq_ignore_ascii_case("and") {
            Ok(CombineWith::And)
        } else {
            Err(GlaiveError::invalid_argument(format!(
                "unknown boolean mode `{s}` (expected OR or AND)"
            )))
        }
    }
}

/// Options controlling a search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// How token matches combine.
    #[serde(rename = "bool")]
    pub combine_with: CombineWith,

    /// Also match indexed tokens that start with a query token.
    pub expand: bool,

    /// Per-field boosts. Fields without an entry get boost 1.
    pub boosts: BTreeMap<String, f64>,

    /// Restrict matching to these fields. `None` searches every field.
    pub fields: Option<Vec<String>>,

    /// Maximum number of results.
    pub limit: usize,

    /// Teaser length in words.
    pub teaser_word_count: usize,

    /// Scale each contribution by `1 / sqrt(field length)`.
    pub field_length_norm: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::from_config(&IndexConfig::default())
    }
}

impl SearchOptions {
    /// Options using the field boosts of `config`.
    pub fn from_config(config: &IndexConfig) -> Self {
        SearchOptions {
            combine_with: CombineWith::Or,
            expand: true,
            boosts: config
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.boost))
                .collect(),
            fields: None,
            limit: DEFAULT_LIMIT,
            teaser_word_count: DEFAULT_TEASER_WORD_COUNT,
            field_length_norm: false,
        }
    }

    /// Set how token matches combine.
    pub fn with_combine_with(mut self, combine_with: CombineWith) -> Self {
        self.combine_with = combine_with;
        self
    }

    /// Enable or disable prefix expansion.
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Set the boost of one field.
    pub fn with_boost<S: Into<String>>(mut self, field: S, boost: f64) -> Self {
        self.boosts.insert(field.into(), boost);
        self
    }

    /// Restrict matching to `fields`.
    pub fn with_fields<S: Into<String>>(mut self, fields: Vec<S>) -> Self {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Set the result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the teaser length in words.
    pub fn with_teaser_word_count(mut self, count: usize) -> Self {
        self.teaser_word_count = count;
        self
    }

    /// Enable or disable field-length normalization.
    pub fn with_field_length_norm(mut self, enabled: bool) -> Self {
        self.field_length_norm = enabled;
        self
    }

    /// Boost of `field`.
    pub fn boost(&self, field: &str) -> f64 {
        self.boosts.get(field).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::config::FieldConfig;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.combine_with, CombineWith::Or);
        assert!(options.expand);
        assert_eq!(options.boost("title"), 2.0);
        assert_eq!(options.boost("body"), 1.0);
        assert_eq!(options.boost("unknown"), 1.0);
        assert_eq!(options.fields, None);
        assert_eq!(options.limit, 30);
        assert_eq!(options.teaser_word_count, 30);
        assert!(!options.field_length_norm);
    }

    #[test]
    fn test_from_config() {
        let config = IndexConfig::with_fields(vec![
            FieldConfig::new("name").with_boost(3.0),
            FieldConfig::new("text"),
        ]);
        let options = SearchOptions::from_config(&config);
        assert_eq!(options.boosts.len(), 2);
        assert_eq!(options.boost("name"), 3.0);
        assert_eq!(options.boost("title"), 1.0);
    }

    #[test]
    fn test_combine_with_parsing() {
        assert_eq!("OR".parse::<CombineWith>().unwrap(), CombineWith::Or);
        assert_eq!("and".parse::<CombineWith>().unwrap(), CombineWith::And);
        assert!("xor".parse::<CombineWith>().is_err());
        assert_eq!(CombineWith::And.to_string(), "AND");
    }

    #[test]
    fn test_serde() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"bool": "AND", "expand": false, "limit": 5}"#).unwrap();
        assert_eq!(options.combine_with, CombineWith::And);
        assert!(!options.expand);
        assert_eq!(options.limit, 5);
        assert_eq!(options.teaser_word_count, 30);
    }
}
