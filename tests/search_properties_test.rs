//! Integration tests for build/search behavior.

use glaive::error::{GlaiveError, Result};
use glaive::index::{Document, IndexBuilder, IndexConfig, SearchIndexFile, build};
use glaive::search::{CombineWith, IndexHandle, SearchOptions, search};
use serde_json::{Value, json};

fn page(url: &str, title: &str, body: &str) -> Document {
    Document::builder()
        .url(url)
        .title(title)
        .body(body)
        .breadcrumbs(format!("Guide » {title}"))
        .build()
}

fn sample_docs() -> Vec<Document> {
    vec![
        page(
            "intro.html#goals",
            "Goals",
            "Fast, correct builds for polyglot monorepos.",
        ),
        page(
            "intro.html#philosophy",
            "Philosophy",
            "Working with monorepos should be easy. Building them should be fast.",
        ),
        page(
            "guide/cache.html",
            "Caching",
            "Build outputs are cached locally and remotely.",
        ),
        page("guide/rules.html", "Rules", "Rules are written in JavaScript."),
    ]
}

#[test]
fn test_persisted_index_searches_like_the_original() -> Result<()> {
    let config = IndexConfig::default();
    let options = SearchOptions::from_config(&config);
    let index = build(sample_docs(), config)?.index;
    let file = SearchIndexFile::new(index.clone(), options.clone());

    let reloaded: SearchIndexFile = file.to_javascript()?.parse()?;
    assert_eq!(reloaded, file);

    for query in ["monorepos", "build", "cache rules", "fast easy", "java"] {
        assert_eq!(
            search(&index, query, &options),
            search(&reloaded.index, query, &reloaded.options),
            "query {query:?}"
        );
    }

    Ok(())
}

#[test]
fn test_build_is_deterministic() -> Result<()> {
    let first = build(sample_docs(), IndexConfig::default())?.index;
    let second = build(sample_docs(), IndexConfig::default())?.index;

    let options = SearchOptions::default();
    let first = SearchIndexFile::new(first, options.clone()).to_json()?;
    let second = SearchIndexFile::new(second, options).to_json()?;
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_inflections_match_each_other() -> Result<()> {
    let index = build(sample_docs(), IndexConfig::default())?.index;
    let options = SearchOptions::default();

    let building = search(&index, "building", &options);
    let build = search(&index, "build", &options);
    let builds = search(&index, "BUILDS", &options);

    assert!(!build.is_empty());
    assert_eq!(building, build);
    assert_eq!(builds, build);

    Ok(())
}

#[test]
fn test_scores_are_ordered() -> Result<()> {
    let index = build(sample_docs(), IndexConfig::default())?.index;

    let hits = search(&index, "monorepos fast build", &SearchOptions::default());
    assert!(hits.len() >= 3);
    for pair in hits.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].doc_id < pair[1].doc_id)
        );
    }

    Ok(())
}

#[test]
fn test_and_requires_every_token() -> Result<()> {
    let docs = vec![
        page("a.html", "A", "fast and easy"),
        page("b.html", "B", "fast"),
    ];
    let index = build(docs, IndexConfig::default())?.index;

    let or = SearchOptions::default();
    let hits = search(&index, "fast easy", &or);
    let urls: Vec<&str> = hits.iter().map(|hit| hit.url.as_str()).collect();
    assert_eq!(urls, vec!["a.html", "b.html"]);

    let and = SearchOptions::default().with_combine_with(CombineWith::And);
    let hits = search(&index, "fast easy", &and);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "a.html");

    // Repeated query tokens count once.
    let hits = search(&index, "fast fast", &and);
    assert_eq!(hits.len(), 2);

    Ok(())
}

#[test]
fn test_queries_without_tokens() -> Result<()> {
    let index = build(sample_docs(), IndexConfig::default())?.index;
    let options = SearchOptions::default();

    assert!(search(&index, "", &options).is_empty());
    assert!(search(&index, "   ", &options).is_empty());
    assert!(search(&index, "the a an", &options).is_empty());
    assert!(search(&index, "zzzz", &options).is_empty());

    Ok(())
}

#[test]
fn test_prefix_expansion() -> Result<()> {
    let index = build(sample_docs(), IndexConfig::default())?.index;

    let hits = search(&index, "mono", &SearchOptions::default());
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|hit| hit.matched_terms.contains_key("monorepo")));

    let exact = SearchOptions::default().with_expand(false);
    assert!(search(&index, "mono", &exact).is_empty());
    assert_eq!(search(&index, "monorepos", &exact).len(), 2);

    // An exact match outranks a document reached only through expansion.
    let docs = vec![
        page("a.html", "A", "javascript"),
        page("b.html", "B", "java"),
    ];
    let index = build(docs, IndexConfig::default())?.index;
    let hits = search(&index, "java", &SearchOptions::default());
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].url, "b.html");

    Ok(())
}

#[test]
fn test_limit_and_tie_order() -> Result<()> {
    let docs: Vec<Document> = (0..50)
        .map(|i| page(&format!("page{i}.html"), "Same", "alpha beta"))
        .collect();
    let index = build(docs, IndexConfig::default())?.index;

    let hits = search(&index, "alpha", &SearchOptions::default());
    assert_eq!(hits.len(), 30);
    let ids: Vec<u32> = hits.iter().map(|hit| hit.doc_id).collect();
    assert_eq!(ids, (0..30).collect::<Vec<u32>>());

    let hits = search(&index, "alpha", &SearchOptions::default().with_limit(100));
    assert_eq!(hits.len(), 50);

    assert!(search(&index, "alpha", &SearchOptions::default().with_limit(0)).is_empty());

    Ok(())
}

#[test]
fn test_field_restriction_and_boosts() -> Result<()> {
    let docs = vec![
        page("a.html", "Overview", "caching explained"),
        page("b.html", "Caching", "overview"),
    ];
    let index = build(docs, IndexConfig::default())?.index;

    let hits = search(&index, "caching", &SearchOptions::default());
    assert_eq!(hits[0].url, "b.html");

    let body_only = SearchOptions::default().with_fields(vec!["body"]);
    let hits = search(&index, "caching", &body_only);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "a.html");

    let body_heavy = SearchOptions::default().with_boost("body", 10.0);
    let hits = search(&index, "caching", &body_heavy);
    assert_eq!(hits[0].url, "a.html");

    let unknown = SearchOptions::default().with_fields(vec!["tags"]);
    assert!(search(&index, "caching", &unknown).is_empty());

    Ok(())
}

#[test]
fn test_teasers() -> Result<()> {
    let index = build(sample_docs(), IndexConfig::default())?.index;

    let hits = search(&index, "javascript", &SearchOptions::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].teaser.as_deref(), Some("Rules are written in JavaScript."));

    let unsaved = build(sample_docs(), IndexConfig::default().with_save(false))?.index;
    let hits = search(&unsaved, "javascript", &SearchOptions::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].teaser, None);

    Ok(())
}

#[test]
fn test_duplicate_ids_warn_and_keep_the_last() -> Result<()> {
    let mut builder = IndexBuilder::new(IndexConfig::default())?;
    assert!(builder
        .add_document(page("old.html", "Old", "alpha").with_id(3))?
        .is_none());
    let warning = builder
        .add_document(page("new.html", "New", "beta").with_id(3))?
        .expect("duplicate id should warn");
    assert_eq!(warning.id, 3);
    assert_eq!(warning.previous_url, "old.html");
    assert_eq!(warning.url, "new.html");

    let output = builder.finish()?;
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.index.doc_urls().len(), 4);
    assert_eq!(output.index.doc_url(3), Some("new.html"));
    assert_eq!(output.index.doc_url(0), Some(""));

    Ok(())
}

#[test]
fn test_huge_words_are_skipped_everywhere() -> Result<()> {
    let blob = "x".repeat(20_000);
    let docs = vec![
        page("blob.html", "Minified", &format!("zap {blob}")),
        page("plain.html", "Plain", "xxl builds"),
    ];
    let config = IndexConfig::default();
    let options = SearchOptions::from_config(&config);
    let file = SearchIndexFile::new(build(docs, config)?.index, options.clone());

    let reloaded: SearchIndexFile = file.to_javascript()?.parse()?;
    assert_eq!(reloaded, file);

    let hits = search(&reloaded.index, "xx", &options);
    let urls: Vec<&str> = hits.iter().map(|hit| hit.url.as_str()).collect();
    assert_eq!(urls, vec!["plain.html"]);
    assert!(search(&reloaded.index, &blob, &options).is_empty());
    assert_eq!(search(&reloaded.index, "zap", &options)[0].url, "blob.html");

    Ok(())
}

fn malformed_key<F>(file: &SearchIndexFile, edit: F) -> String
where
    F: FnOnce(&mut Value),
{
    let mut value = file.to_value();
    edit(&mut value);
    match SearchIndexFile::from_value(&value) {
        Err(GlaiveError::MalformedIndex { key, .. }) => key,
        other => panic!("expected a malformed index error, got {other:?}"),
    }
}

#[test]
fn test_malformed_files_name_the_key() -> Result<()> {
    let file = SearchIndexFile::new(
        build(sample_docs(), IndexConfig::default())?.index,
        SearchOptions::default(),
    );

    let key = malformed_key(&file, |v| {
        v["index"].as_object_mut().unwrap().remove("pipeline");
    });
    assert_eq!(key, "index.pipeline");

    let key = malformed_key(&file, |v| v["index"]["pipeline"][1] = json!("shout"));
    assert_eq!(key, "index.pipeline[1]");

    let key = malformed_key(&file, |v| v["doc_urls"] = json!("nope"));
    assert_eq!(key, "doc_urls");

    let key = malformed_key(&file, |v| v["search_options"]["bool"] = json!("XOR"));
    assert_eq!(key, "search_options.bool");

    assert!("not json".parse::<SearchIndexFile>().is_err());
    assert!("Object.assign(window.search, {".parse::<SearchIndexFile>().is_err());

    Ok(())
}

#[test]
fn test_handle_swaps_index() -> Result<()> {
    let handle = IndexHandle::new(build(sample_docs(), IndexConfig::default())?.index);
    let options = SearchOptions::default();
    assert_eq!(handle.search("javascript", &options).len(), 1);

    let before = handle.current();
    handle.replace(build(vec![page("x.html", "X", "nothing here")], IndexConfig::default())?.index);

    assert!(handle.search("javascript", &options).is_empty());
    assert_eq!(search(&before, "javascript", &options).len(), 1);

    Ok(())
}
