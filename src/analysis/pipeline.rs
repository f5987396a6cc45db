//! The token pipeline shared by indexing and querying.
//!
//! A [`Pipeline`] is a tokenizer followed by an ordered list of named token
//! filters. The split stage (the tokenizer, which also lowercases) is
//! implicit and always runs first. The named stages are the ones recorded in
//! an index file's `pipeline` list, so an index can always rebuild the exact
//! pipeline it was built with.
//!
//! # Examples
//!
//! ```
//! use glaive::analysis::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::english();
//! assert_eq!(pipeline.names(), vec!["trimmer", "stopWordFilter", "stemmer"]);
//! assert_eq!(
//!     pipeline.terms("Zap is built for polyglot teams."),
//!     vec!["zap", "built", "polyglot", "team"]
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::stem::{STEMMER, StemFilter};
use crate::analysis::token_filter::stop::{STOP_WORD_FILTER, StopFilter};
use crate::analysis::token_filter::trim::{TRIMMER, TrimFilter};
use crate::analysis::tokenizer::{SeparatorTokenizer, Tokenizer};
use crate::error::{GlaiveError, Result};

/// Names of the stages every index built by this crate records, in order.
pub const DEFAULT_PIPELINE: &[&str] = &[TRIMMER, STOP_WORD_FILTER, STEMMER];

/// A tokenizer combined with an ordered chain of named filters.
#[derive(Clone)]
pub struct Pipeline {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl Pipeline {
    /// Create a pipeline with only the split stage.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Pipeline {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// The `trimmer → stopWordFilter → stemmer` English pipeline.
    pub fn english() -> Self {
        Pipeline::new(Arc::new(SeparatorTokenizer::default()))
            .add_filter(Arc::new(TrimFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(StemFilter::new()))
    }

    /// Build a pipeline from recorded stage names.
    ///
    /// Fails with a configuration error on a name this crate does not know,
    /// since silently skipping a stage would change index output.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut pipeline = Pipeline::new(Arc::new(SeparatorTokenizer::new()?));
        for name in names {
            pipeline = pipeline.add_filter(Self::registered_filter(name.as_ref())?);
        }
        Ok(pipeline)
    }

    /// Whether `name` is a recognized stage name.
    pub fn is_registered(name: &str) -> bool {
        DEFAULT_PIPELINE.contains(&name)
    }

    fn registered_filter(name: &str) -> Result<Arc<dyn Filter>> {
        match name {
            TRIMMER => Ok(Arc::new(TrimFilter::new())),
            STOP_WORD_FILTER => Ok(Arc::new(StopFilter::new())),
            STEMMER => Ok(Arc::new(StemFilter::new())),
            other => Err(GlaiveError::config(format!(
                "unknown pipeline function `{other}` (expected one of {})",
                DEFAULT_PIPELINE.join(", ")
            ))),
        }
    }

    /// Append a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Names of the filter stages, in application order.
    pub fn names(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.name().to_string()).collect()
    }

    /// Get the tokenizer used by this pipeline.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Run `text` through every stage. Lazy; never fails.
    pub fn tokenize(&self, text: &str) -> TokenStream {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Collect just the normalized token texts.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).map(|t| t.text).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.names())
            .finish()
    }
}
