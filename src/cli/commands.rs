//! Command implementations for the Glaive CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{GlaiveError, Result};
use crate::index::{Document, FieldConfig, IndexBuilder, IndexConfig, SearchIndexFile};
use crate::search::{CombineWith, SearchOptions, engine};

/// Execute a CLI command.
pub fn execute_command(args: GlaiveArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_index(build_args, &args),
        Command::Search(search_args) => search_index(search_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
        Command::Validate(validate_args) => validate_index(validate_args, &args),
    }
}

/// Build an index file from a document file.
fn build_index(args: &BuildArgs, cli_args: &GlaiveArgs) -> Result<()> {
    let start_time = Instant::now();

    let fields = args
        .fields
        .iter()
        .map(|spec| FieldConfig::parse(spec))
        .collect::<Result<Vec<_>>>()?;
    let config = IndexConfig::with_fields(fields)
        .with_ref(args.ref_field.as_str())
        .with_save(!args.no_save)
        .with_carry_field_tokens(args.carry_field_tokens)
        .with_max_doc_id(args.max_doc_id);
    let options = SearchOptions::from_config(&config);

    let documents = read_documents(&args.documents)?;
    info!(
        "Read {} documents from {}",
        documents.len(),
        args.documents.display()
    );

    let mut builder = IndexBuilder::new(config)?;
    builder.extend(documents)?;
    let output = builder.finish()?;

    let file = SearchIndexFile::new(output.index, options);
    file.save(&args.output)?;

    output_result(
        &BuildResult {
            output: args.output.display().to_string(),
            documents: file.index.doc_count(),
            url_slots: file.index.doc_urls().len(),
            duplicate_ids: output.warnings.iter().map(|w| w.id).collect(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Search an index file.
fn search_index(args: &SearchArgs, cli_args: &GlaiveArgs) -> Result<()> {
    let (index, defaults) = SearchIndexFile::load(&args.index)?.into_parts();
    let options = search_options(args, defaults)?;
    debug!("Search options: {options:?}");

    let start_time = Instant::now();
    let hits = engine::search(&index, &args.query, &options);
    let duration_ms = start_time.elapsed().as_millis() as u64;

    output_result(
        &SearchResults {
            query: args.query.clone(),
            total_hits: hits.len(),
            hits,
            duration_ms,
        },
        cli_args,
    )
}

/// Apply command line overrides to the options stored in the index file.
pub fn search_options(args: &SearchArgs, defaults: SearchOptions) -> Result<SearchOptions> {
    let mut options = defaults;

    if let Some(mode) = args.combine_with {
        options.combine_with = match mode {
            BoolMode::Or => CombineWith::Or,
            BoolMode::And => CombineWith::And,
        };
    }
    if args.no_expand {
        options.expand = false;
    }
    if !args.fields.is_empty() {
        options.fields = Some(args.fields.clone());
    }
    for spec in &args.boosts {
        let (field, boost) = parse_boost(spec)?;
        options.boosts.insert(field, boost);
    }
    if let Some(limit) = args.limit {
        options.limit = limit;
    }
    if let Some(words) = args.teaser_words {
        options.teaser_word_count = words;
    }
    if args.field_length_norm {
        options.field_length_norm = true;
    }

    Ok(options)
}

/// Parse `field=boost`.
fn parse_boost(spec: &str) -> Result<(String, f64)> {
    let (field, boost) = spec.split_once('=').ok_or_else(|| {
        GlaiveError::invalid_argument(format!("expected FIELD=BOOST, got `{spec}`"))
    })?;
    let boost: f64 = boost
        .trim()
        .parse()
        .map_err(|_| GlaiveError::invalid_argument(format!("invalid boost in `{spec}`")))?;
    if field.trim().is_empty() || !boost.is_finite() || boost < 0.0 {
        return Err(GlaiveError::invalid_argument(format!(
            "invalid boost `{spec}`"
        )));
    }
    Ok((field.trim().to_string(), boost))
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &GlaiveArgs) -> Result<()> {
    let file = SearchIndexFile::load(&args.index)?;
    output_result(&file.index.stats(), cli_args)
}

/// Validate an index file.
fn validate_index(args: &ValidateArgs, cli_args: &GlaiveArgs) -> Result<()> {
    let file = SearchIndexFile::load(&args.index)?;
    output_result(
        &ValidationResult {
            path: args.index.display().to_string(),
            valid: true,
            documents: file.index.doc_count(),
            fields: file.index.fields().to_vec(),
        },
        cli_args,
    )
}

/// Read documents from a JSON array or JSONL file.
pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let text = fs::read_to_string(path)?;
    parse_documents(&text)
}

/// Parse documents from a JSON array or from one JSON object per line.
pub fn parse_documents(text: &str) -> Result<Vec<Document>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|e| {
            GlaiveError::invalid_argument(format!("invalid document array: {e}"))
        });
    }

    let mut documents = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let document = serde_json::from_str::<Document>(line).map_err(|e| {
            GlaiveError::invalid_argument(format!(
                "invalid document on line {}: {e}",
                line_num + 1
            ))
        })?;
        documents.push(document);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_documents_jsonl_and_array() {
        let jsonl = r#"
{"url": "a.html", "title": "A", "body": "alpha"}

{"id": 5, "url": "b.html", "title": "B"}
"#;
        let docs = parse_documents(jsonl).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, None);
        assert_eq!(docs[1].id, Some(5));

        let array = r#"[{"url": "a.html", "title": "A"}, {"url": "b.html"}]"#;
        assert_eq!(parse_documents(array).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_documents_reports_line() {
        let err = parse_documents("{\"url\": \"a.html\"}\n{not json}\n").unwrap_err();
        assert!(matches!(err, GlaiveError::InvalidArgument(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_search_option_overrides() {
        let args = GlaiveArgs::parse_from([
            "glaive",
            "search",
            "index.js",
            "query",
            "--bool",
            "and",
            "--no-expand",
            "--boost",
            "body=4",
            "--teaser-words",
            "10",
        ]);
        let Command::Search(search) = args.command else {
            panic!("expected search");
        };

        let options = search_options(&search, SearchOptions::default()).unwrap();
        assert_eq!(options.combine_with, CombineWith::And);
        assert!(!options.expand);
        assert_eq!(options.boost("body"), 4.0);
        assert_eq!(options.boost("title"), 2.0);
        assert_eq!(options.teaser_word_count, 10);
        assert_eq!(options.limit, 30);
    }

    #[test]
    fn test_parse_boost() {
        assert_eq!(parse_boost("title=3").unwrap(), ("title".to_string(), 3.0));
        assert!(parse_boost("title").is_err());
        assert!(parse_boost("title=-1").is_err());
        assert!(parse_boost("=2").is_err());
    }
}
