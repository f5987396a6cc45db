//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{GlaiveArgs, OutputFormat};
use crate::error::Result;
use crate::index::IndexStats;
use crate::search::SearchHit;

/// Result structure for index builds.
#[derive(Debug, Serialize)]
pub struct BuildResult {
    pub output: String,
    pub documents: usize,
    pub url_slots: usize,
    pub duplicate_ids: Vec<u32>,
    pub duration_ms: u64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub total_hits: usize,
    pub hits: Vec<SearchHit>,
    pub duration_ms: u64,
}

/// Result structure for validation.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub path: String,
    pub valid: bool,
    pub documents: usize,
    pub fields: Vec<String>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Write the result for a person reading a terminal.
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl HumanOutput for BuildResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Indexed {} documents into {}", self.documents, self.output)?;
        if self.url_slots != self.documents {
            writeln!(out, "Url slots: {}", self.url_slots)?;
        }
        if !self.duplicate_ids.is_empty() {
            let ids: Vec<String> = self.duplicate_ids.iter().map(u32::to_string).collect();
            writeln!(out, "Duplicate ids: {}", ids.join(", "))?;
        }
        writeln!(out, "Build time: {}ms", self.duration_ms)
    }
}

impl HumanOutput for SearchResults {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Search Results:")?;
        writeln!(out, "═══════════════")?;

        for (i, hit) in self.hits.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "Result {}: {} (Score: {:.3})", i + 1, hit.url, hit.score)?;
            writeln!(out, "─────────────")?;
            let terms: Vec<String> = hit
                .matched_terms
                .iter()
                .map(|(term, fields)| {
                    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                    format!("{term} ({})", fields.join(", "))
                })
                .collect();
            writeln!(out, "Matched: {}", terms.join("; "))?;
            if let Some(teaser) = &hit.teaser {
                writeln!(out, "{teaser}")?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Total hits: {}", self.total_hits)?;
        writeln!(out, "Search time: {}ms", self.duration_ms)
    }
}

impl HumanOutput for IndexStats {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Index Statistics:")?;
        writeln!(out, "════════════════")?;
        writeln!(out, "Total documents: {}", self.doc_count)?;
        writeln!(out, "Url slots: {}", self.url_slots)?;
        writeln!(out, "Pipeline: {}", self.pipeline.join(" → "))?;
        writeln!(out, "Version: {}", self.version)?;

        writeln!(out)?;
        writeln!(out, "Field Statistics:")?;
        writeln!(out, "────────────────")?;
        for field in &self.fields {
            writeln!(out)?;
            writeln!(out, "Field: {}", field.name)?;
            writeln!(out, "  Unique tokens: {}", field.unique_tokens)?;
            writeln!(out, "  Total tokens: {}", field.total_tokens)?;
            writeln!(out, "  Average length: {:.1}", field.average_length)?;
        }
        Ok(())
    }
}

impl HumanOutput for ValidationResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{}: ok ({} documents; fields: {})",
            self.path,
            self.documents,
            self.fields.join(", ")
        )
    }
}

/// Output a result in the format selected on the command line.
pub fn output_result<T>(result: &T, args: &GlaiveArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(result, args, &mut out)
}

/// Write a result to `out` in the selected format.
pub fn write_result<T>(result: &T, args: &GlaiveArgs, out: &mut dyn Write) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => result.write_human(out)?,
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
