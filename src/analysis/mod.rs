//! Text analysis: tokenization, token filters, and the shared pipeline.

pub mod pipeline;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use pipeline::{DEFAULT_PIPELINE, Pipeline};
pub use token::{Token, TokenStream};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
