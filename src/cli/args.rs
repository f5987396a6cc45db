//! Command line argument parsing for the Glaive CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::index::config::DEFAULT_MAX_DOC_ID;
use crate::index::document::DocId;

/// Glaive - build and query static-site search indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "glaive")]
#[command(about = "Build and query static-site full-text search indexes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GlaiveArgs {
    /// Verbosity level (repeat for more: -v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GlaiveArgs {
    /// Get the effective verbosity level (0 quiet, 1 normal, 2 info, 3+ debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index file from documents
    Build(BuildArgs),

    /// Search an index file
    Search(SearchArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Validate an index file
    Validate(ValidateArgs),
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Document file (JSON array or JSONL), one record per page section
    #[arg(value_name = "DOCUMENTS")]
    pub documents: PathBuf,

    /// Output file; `.js` writes the script-wrapped form
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Indexed fields with optional boosts, e.g. `title:2,body,breadcrumbs`
    #[arg(long, value_delimiter = ',', default_value = "title:2,body,breadcrumbs")]
    pub fields: Vec<String>,

    /// Name of the reference field
    #[arg(long = "ref", default_value = "id")]
    pub ref_field: String,

    /// Do not store raw field text (disables teasers)
    #[arg(long)]
    pub no_save: bool,

    /// Index each field together with the tokens of the fields before it
    #[arg(long)]
    pub carry_field_tokens: bool,

    /// Largest document id accepted from the input
    #[arg(long, value_name = "ID", default_value_t = DEFAULT_MAX_DOC_ID)]
    pub max_doc_id: DocId,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Index file (JSON or `.js`)
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// How query tokens combine (default: from the index file)
    #[arg(long = "bool", value_name = "MODE")]
    pub combine_with: Option<BoolMode>,

    /// Disable prefix expansion
    #[arg(long)]
    pub no_expand: bool,

    /// Field to search in (repeatable; default: all fields)
    #[arg(long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Field boost override, e.g. `title=3` (repeatable)
    #[arg(long = "boost", value_name = "FIELD=BOOST")]
    pub boosts: Vec<String>,

    /// Maximum number of results (default: from the index file)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Teaser length in words (default: from the index file)
    #[arg(long)]
    pub teaser_words: Option<usize>,

    /// Scale scores by inverse square root of field length
    #[arg(long)]
    pub field_length_norm: bool,
}

/// Boolean combination mode on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolMode {
    /// Match any query token
    Or,
    /// Match every query token
    And,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Index file (JSON or `.js`)
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,
}

/// Arguments for index validation
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Index file (JSON or `.js`)
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = GlaiveArgs::parse_from(["glaive", "stats", "index.json"]);
        assert_eq!(args.verbosity(), 1);

        let args = GlaiveArgs::parse_from(["glaive", "-vv", "stats", "index.json"]);
        assert_eq!(args.verbosity(), 3);

        let args = GlaiveArgs::parse_from(["glaive", "-v", "-q", "stats", "index.json"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_build_args() {
        let args = GlaiveArgs::parse_from([
            "glaive",
            "build",
            "docs.jsonl",
            "-o",
            "searchindex.js",
            "--fields",
            "title:3,body",
            "--no-save",
        ]);
        match args.command {
            Command::Build(build) => {
                assert_eq!(build.fields, vec!["title:3", "body"]);
                assert_eq!(build.ref_field, "id");
                assert!(build.no_save);
                assert!(!build.carry_field_tokens);
                assert_eq!(build.max_doc_id, DEFAULT_MAX_DOC_ID);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_search_args() {
        let args = GlaiveArgs::parse_from([
            "glaive",
            "-f",
            "json",
            "search",
            "searchindex.js",
            "fast builds",
            "--bool",
            "and",
            "--field",
            "body",
            "--boost",
            "title=3",
            "--limit",
            "5",
        ]);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Search(search) => {
                assert_eq!(search.query, "fast builds");
                assert_eq!(search.combine_with, Some(BoolMode::And));
                assert_eq!(search.fields, vec!["body"]);
                assert_eq!(search.boosts, vec!["title=3"]);
                assert_eq!(search.limit, Some(5));
                assert!(!search.no_expand);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
