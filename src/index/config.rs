//! Build configuration for an index.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::pipeline::{DEFAULT_PIPELINE, Pipeline};
use crate::error::{GlaiveError, Result};
use crate::index::document::DocId;

/// Index format version written into every index file.
pub const INDEX_VERSION: &str = "0.9.5";

/// Default language tag.
pub const DEFAULT_LANG: &str = "English";

/// Default name of the reference field.
pub const DEFAULT_REF: &str = "id";

/// Default largest accepted document id. `doc_urls` holds one slot per id
/// up to the largest one used.
pub const DEFAULT_MAX_DOC_ID: DocId = 1 << 20;

/// An indexed field and its default query-time boost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name.
    pub name: String,

    /// Default boost recorded in the index file's search options.
    #[serde(default = "default_boost")]
    pub boost: f64,
}

fn default_boost() -> f64 {
    1.0
}

impl FieldConfig {
    /// Create a field with boost 1.
    pub fn new<S: Into<String>>(name: S) -> Self {
        FieldConfig {
            name: name.into(),
            boost: 1.0,
        }
    }

    /// Set the boost.
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    /// Parse `name` or `name:boost`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, boost) = match spec.split_once(':') {
            Some((name, boost)) => {
                let boost = boost.trim().parse::<f64>().map_err(|_| {
                    GlaiveError::invalid_argument(format!("invalid boost in field `{spec}`"))
                })?;
                (name.trim(), boost)
            }
            None => (spec.trim(), 1.0),
        };
        if name.is_empty() {
            return Err(GlaiveError::invalid_argument(format!(
                "empty field name in `{spec}`"
            )));
        }
        Ok(FieldConfig::new(name).with_boost(boost))
    }
}

/// Configuration for building an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Indexed fields, in index order.
    pub fields: Vec<FieldConfig>,

    /// Name of the reference field stored with each document.
    #[serde(rename = "ref")]
    pub ref_field: String,

    /// Pipeline stage names, applied in order after splitting.
    pub pipeline: Vec<String>,

    /// Language tag recorded in the index.
    pub lang: String,

    /// Whether raw field text is kept in the document store.
    pub save: bool,

    /// Index each field's tokens together with the tokens of every field
    /// before it in `fields`, as some static-site generators do. Field
    /// lengths are unaffected.
    pub carry_field_tokens: bool,

    /// Largest document id the builder accepts.
    pub max_doc_id: DocId,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            fields: vec![
                FieldConfig::new("title").with_boost(2.0),
                FieldConfig::new("body"),
                FieldConfig::new("breadcrumbs"),
            ],
            ref_field: DEFAULT_REF.to_string(),
            pipeline: DEFAULT_PIPELINE.iter().map(|s| s.to_string()).collect(),
            lang: DEFAULT_LANG.to_string(),
            save: true,
            carry_field_tokens: false,
            max_doc_id: DEFAULT_MAX_DOC_ID,
        }
    }
}

impl IndexConfig {
    /// Create a configuration indexing `fields`, with all other settings at
    /// their defaults.
    pub fn with_fields(fields: Vec<FieldConfig>) -> Self {
        IndexConfig {
            fields,
            ..Default::default()
        }
    }

    /// Set the reference field name.
    pub fn with_ref<S: Into<String>>(mut self, ref_field: S) -> Self {
        self.ref_field = ref_field.into();
        self
    }

    /// Set the pipeline stage names.
    pub fn with_pipeline<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.pipeline = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the language tag.
    pub fn with_lang<S: Into<String>>(mut self, lang: S) -> Self {
        self.lang = lang.into();
        self
    }

    /// Enable or disable storing raw field text.
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Enable or disable carrying earlier fields' tokens into later fields.
    pub fn with_carry_field_tokens(mut self, carry: bool) -> Self {
        self.carry_field_tokens = carry;
        self
    }

    /// Set the largest accepted document id.
    pub fn with_max_doc_id(mut self, max_doc_id: DocId) -> Self {
        self.max_doc_id = max_doc_id;
        self
    }

    /// Names of the indexed fields, in index order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Check the configuration before any indexing work is done.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(GlaiveError::config("at least one field must be indexed"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(GlaiveError::config("field names must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(GlaiveError::config(format!(
                    "field `{}` is listed more than once",
                    field.name
                )));
            }
            if !field.boost.is_finite() || field.boost < 0.0 {
                return Err(GlaiveError::config(format!(
                    "field `{}` has invalid boost {}",
                    field.name, field.boost
                )));
            }
        }

        if self.ref_field.is_empty() {
            return Err(GlaiveError::config("the ref field name must not be empty"));
        }
        if seen.contains(self.ref_field.as_str()) {
            return Err(GlaiveError::config(format!(
                "ref field `{}` must not also be an indexed field",
                self.ref_field
            )));
        }

        for name in &self.pipeline {
            if !Pipeline::is_registered(name) {
                return Err(GlaiveError::config(format!(
                    "unknown pipeline function `{name}`"
                )));
            }
        }

        Ok(())
    }

    /// Build the pipeline named by this configuration.
    pub fn build_pipeline(&self) -> Result<Pipeline> {
        Pipeline::from_names(&self.pipeline)
    }
}
