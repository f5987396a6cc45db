//! Integration tests for the command line commands.

use std::fs;

use clap::Parser;
use glaive::cli::{GlaiveArgs, execute_command};
use glaive::error::{GlaiveError, Result};
use glaive::index::SearchIndexFile;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<()> {
    let mut argv = vec!["glaive", "-q"];
    argv.extend_from_slice(args);
    execute_command(GlaiveArgs::parse_from(argv))
}

#[test]
fn test_build_then_query() -> Result<()> {
    let dir = TempDir::new()?;
    let docs = dir.path().join("docs.jsonl");
    fs::write(
        &docs,
        concat!(
            r#"{"url": "intro.html#goals", "title": "Goals", "body": "Fast builds for monorepos."}"#,
            "\n",
            r#"{"url": "intro.html#rules", "title": "Rules", "body": "Rules are written in JavaScript."}"#,
            "\n",
        ),
    )?;
    let index = dir.path().join("searchindex.js");
    let docs_arg = docs.to_string_lossy().into_owned();
    let index_arg = index.to_string_lossy().into_owned();

    run(&["build", &docs_arg, "-o", &index_arg])?;

    let text = fs::read_to_string(&index)?;
    assert!(text.starts_with("Object.assign(window.search, {"));
    assert!(text.ends_with("});"));
    let file = SearchIndexFile::load(&index)?;
    assert_eq!(file.index.doc_count(), 2);
    assert_eq!(file.index.doc_url(1), Some("intro.html#rules"));

    run(&["stats", &index_arg])?;
    run(&["validate", &index_arg])?;
    run(&["-f", "json", "search", &index_arg, "monorepos", "--bool", "and"])?;

    Ok(())
}

#[test]
fn test_validate_rejects_broken_file() -> Result<()> {
    let dir = TempDir::new()?;
    let index = dir.path().join("searchindex.json");
    fs::write(&index, r#"{"doc_urls": [], "index": {}}"#)?;
    let index_arg = index.to_string_lossy().into_owned();

    match run(&["validate", &index_arg]) {
        Err(GlaiveError::MalformedIndex { key, .. }) => assert_eq!(key, "index.fields"),
        other => panic!("expected a malformed index error, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_build_rejects_bad_field_spec() -> Result<()> {
    let dir = TempDir::new()?;
    let docs = dir.path().join("docs.json");
    fs::write(&docs, "[]")?;
    let docs_arg = docs.to_string_lossy().into_owned();
    let out_arg = dir.path().join("out.json").to_string_lossy().into_owned();

    let result = run(&["build", &docs_arg, "-o", &out_arg, "--fields", "title:abc"]);
    assert!(matches!(result, Err(GlaiveError::InvalidArgument(_))));

    Ok(())
}

#[test]
fn test_build_rejects_sparse_id() -> Result<()> {
    let dir = TempDir::new()?;
    let docs = dir.path().join("docs.jsonl");
    fs::write(&docs, r#"{"id": 4000000000, "url": "far.html", "body": "far away"}"#)?;
    let docs_arg = docs.to_string_lossy().into_owned();
    let out = dir.path().join("out.json");
    let out_arg = out.to_string_lossy().into_owned();

    let result = run(&["build", &docs_arg, "-o", &out_arg]);
    assert!(matches!(result, Err(GlaiveError::InvalidArgument(_))));
    assert!(!out.exists());

    fs::write(&docs, r#"{"id": 7, "url": "near.html", "body": "near"}"#)?;
    run(&["build", &docs_arg, "-o", &out_arg, "--max-doc-id", "7"])?;
    assert_eq!(SearchIndexFile::load(&out)?.index.doc_urls().len(), 8);

    Ok(())
}
