//! Reading and writing index files.
//!
//! The on-disk layout is the one static documentation sites load into
//! their search widget: a JSON document with `doc_urls`, `index`,
//! `results_options` and `search_options`, optionally wrapped as
//! `Object.assign(window.search, {...});` so it can be served as a script.
//! Object keys are always written in sorted order, so output is stable.
//!
//! Loading validates the structure and reports the first problem with the
//! dotted path of the offending key, e.g. `index.index.body.root.a.df`.
//! Tries deeper than [`MAX_TOKEN_CHARS`] are rejected; files nested beyond
//! serde_json's recursion limit fail to parse.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::analysis::pipeline::Pipeline;
use crate::analysis::tokenizer::MAX_TOKEN_CHARS;
use crate::error::{GlaiveError, Result};
use crate::index::document::DocId;
use crate::index::index::{DocumentStore, Index, IndexParts, StoredDocument};
use crate::index::trie::{PostingsTrie, ROOT};
use crate::search::options::{CombineWith, SearchOptions};

/// Opening of the JavaScript wrapper.
pub const JAVASCRIPT_PREFIX: &str = "Object.assign(window.search, ";

/// Closing of the JavaScript wrapper.
pub const JAVASCRIPT_SUFFIX: &str = ");";

/// Output encoding of an index file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// Bare JSON.
    Json,
    /// JSON wrapped in `Object.assign(window.search, …);`.
    JavaScript,
}

impl FileFormat {
    /// Pick the format from a file extension: `.js` is JavaScript, anything
    /// else JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("js") => FileFormat::JavaScript,
            _ => FileFormat::Json,
        }
    }
}

/// An index together with the default search options shipped alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchIndexFile {
    /// The index.
    pub index: Index,
    /// Options the generator intends queries to run with.
    pub options: SearchOptions,
}

impl SearchIndexFile {
    /// Bundle an index with its default search options.
    pub fn new(index: Index, options: SearchOptions) -> Self {
        SearchIndexFile { index, options }
    }

    /// Split into the index and the options.
    pub fn into_parts(self) -> (Index, SearchOptions) {
        (self.index, self.options)
    }

    /// Render as a JSON value with sorted keys.
    pub fn to_value(&self) -> Value {
        let index = &self.index;
        let store = index.document_store();

        let doc_info: Map<String, Value> = store
            .doc_info()
            .iter()
            .map(|(id, info)| (id.to_string(), json!(info)))
            .collect();
        let docs: Map<String, Value> = store
            .docs()
            .iter()
            .map(|(id, doc)| (id.to_string(), json!(doc)))
            .collect();
        let tries: Map<String, Value> = index
            .tries()
            .map(|(field, trie)| (field.to_string(), json!({ "root": trie_value(trie) })))
            .collect();

        let boosts: Map<String, Value> = index
            .fields()
            .iter()
            .map(|field| {
                let boost = self.options.boost(field);
                (field.clone(), json!({ "boost": number_value(boost) }))
            })
            .collect();

        json!({
            "doc_urls": index.doc_urls(),
            "index": {
                "documentStore": {
                    "docInfo": doc_info,
                    "docs": docs,
                    "length": store.len(),
                    "save": store.save(),
                },
                "fields": index.fields(),
                "index": tries,
                "lang": index.lang(),
                "pipeline": index.pipeline_names(),
                "ref": index.ref_field(),
                "version": index.version(),
            },
            "results_options": {
                "limit_results": self.options.limit,
                "teaser_word_count": self.options.teaser_word_count,
            },
            "search_options": {
                "bool": self.options.combine_with.as_str(),
                "expand": self.options.expand,
                "fields": boosts,
            },
        })
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value())?)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Compact JSON inside the `Object.assign(window.search, …);` wrapper.
    pub fn to_javascript(&self) -> Result<String> {
        Ok(format!("{JAVASCRIPT_PREFIX}{}{JAVASCRIPT_SUFFIX}", self.to_json()?))
    }

    /// Encode in `format`.
    pub fn encode(&self, format: FileFormat) -> Result<String> {
        match format {
            FileFormat::Json => self.to_json(),
            FileFormat::JavaScript => self.to_javascript(),
        }
    }

    /// Write to `path`, choosing the format from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path);
        fs::write(path, self.encode(format)?)?;
        info!(
            "Saved index with {} documents to {} ({format:?})",
            self.index.doc_count(),
            path.display()
        );
        Ok(())
    }

    /// Read and validate an index file in either format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let file: SearchIndexFile = text.parse()?;
        info!(
            "Loaded index with {} documents from {}",
            file.index.doc_count(),
            path.display()
        );
        Ok(file)
    }

    /// Validate a parsed JSON value and build the index from it.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = as_object(value, "$")?;

        let doc_urls = parse_doc_urls(required(root, "", "doc_urls")?)?;
        let index_value = as_object(required(root, "", "index")?, "index")?;

        let fields = parse_string_list(required(index_value, "index", "fields")?, "index.fields")?;
        let pipeline =
            parse_string_list(required(index_value, "index", "pipeline")?, "index.pipeline")?;
        for (i, name) in pipeline.iter().enumerate() {
            if !Pipeline::is_registered(name) {
                return Err(GlaiveError::malformed(
                    format!("index.pipeline[{i}]"),
                    format!("unknown pipeline function `{name}`"),
                ));
            }
        }

        let lang = parse_string(required(index_value, "index", "lang")?, "index.lang")?;
        let ref_field = parse_string(required(index_value, "index", "ref")?, "index.ref")?;
        let version = parse_string(required(index_value, "index", "version")?, "index.version")?;

        let tries_value = as_object(required(index_value, "index", "index")?, "index.index")?;
        for name in tries_value.keys() {
            if !fields.contains(name) {
                return Err(GlaiveError::malformed(
                    format!("index.index.{name}"),
                    "trie for a field not listed in `index.fields`",
                ));
            }
        }
        let mut tries = Vec::with_capacity(fields.len());
        for field in &fields {
            let path = format!("index.index.{field}");
            let field_value = as_object(required(tries_value, "index.index", field)?, &path)?;
            let root_node = required(field_value, &path, "root")?;
            tries.push(parse_trie(root_node, &format!("{path}.root"), doc_urls.len())?);
        }

        let store_value = required(index_value, "index", "documentStore")?;
        let document_store = parse_document_store(store_value, doc_urls.len())?;

        let options = parse_options(root)?;
        debug!(
            "Parsed index: {} documents, {} fields, {} url slots",
            document_store.len(),
            fields.len(),
            doc_urls.len()
        );

        let index = Index::from_parts(IndexParts {
            doc_urls,
            document_store,
            fields,
            tries,
            pipeline,
            lang,
            ref_field,
            version,
        })?;

        Ok(SearchIndexFile { index, options })
    }
}

impl FromStr for SearchIndexFile {
    type Err = GlaiveError;

    /// Parse either bare JSON or the JavaScript-wrapped form.
    fn from_str(text: &str) -> Result<Self> {
        let json = strip_javascript(text);
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let value = Value::deserialize(&mut deserializer)?;
        deserializer.end()?;
        SearchIndexFile::from_value(&value)
    }
}

/// Strip the `Object.assign(window.search, …);` wrapper, if present.
pub fn strip_javascript(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(JAVASCRIPT_PREFIX.trim_end()) else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')').unwrap_or(rest).trim()
}

/// Nested `{df, docs, <char>: child}` objects, built children first.
fn trie_value(trie: &PostingsTrie) -> Value {
    let mut order = Vec::with_capacity(trie.node_count());
    let mut pending = vec![ROOT];
    while let Some(id) = pending.pop() {
        order.push(id);
        if let Some(node) = trie.node(id) {
            pending.extend(node.children().values().copied());
        }
    }

    let mut built: Vec<Option<Value>> = vec![None; trie.node_count()];
    for &id in order.iter().rev() {
        let Some(node) = trie.node(id) else {
            continue;
        };
        let docs: Map<String, Value> = node
            .docs()
            .iter()
            .map(|(doc_id, tf)| (doc_id.to_string(), json!({ "tf": tf })))
            .collect();
        let mut map = Map::new();
        map.insert("df".to_string(), json!(node.df()));
        map.insert("docs".to_string(), Value::Object(docs));
        for (ch, &child) in node.children() {
            let child = built[child].take().unwrap_or_default();
            map.insert(ch.to_string(), child);
        }
        built[id] = Some(Value::Object(map));
    }
    built[ROOT].take().unwrap_or_else(|| json!({ "df": 0, "docs": {} }))
}

/// Whole numbers are written without a fractional part (`"boost": 2`).
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn required<'a>(map: &'a Map<String, Value>, path: &str, key: &str) -> Result<&'a Value> {
    map.get(key)
        .ok_or_else(|| GlaiveError::malformed(join(path, key), "missing"))
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GlaiveError::malformed(path, "expected an object"))
}

fn parse_string(value: &Value, path: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GlaiveError::malformed(path, "expected a string"))
}

fn parse_string_list(value: &Value, path: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| GlaiveError::malformed(path, "expected an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_string(item, &format!("{path}[{i}]")))
        .collect()
}

fn parse_count(value: &Value, path: &str) -> Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| GlaiveError::malformed(path, "expected a non-negative integer"))
}

fn parse_doc_urls(value: &Value) -> Result<Vec<String>> {
    let urls = parse_string_list(value, "doc_urls")?;
    if urls.len() > DocId::MAX as usize {
        return Err(GlaiveError::malformed("doc_urls", "too many entries"));
    }
    Ok(urls)
}

fn parse_doc_id(key: &str, path: &str, url_slots: usize) -> Result<DocId> {
    let id: DocId = key
        .parse()
        .map_err(|_| GlaiveError::malformed(path, "document id is not a number"))?;
    if id as usize >= url_slots {
        return Err(GlaiveError::malformed(
            path,
            format!("document id {id} has no entry in `doc_urls` ({url_slots} entries)"),
        ));
    }
    Ok(id)
}

fn parse_trie(root: &Value, path: &str, url_slots: usize) -> Result<PostingsTrie> {
    let mut trie = PostingsTrie::new();
    // (node, its path, its token, token length in characters)
    let mut pending = vec![(root, path.to_string(), String::new(), 0)];

    while let Some((value, path, token, depth)) = pending.pop() {
        let node = as_object(value, &path)?;

        let df_path = join(&path, "df");
        let df = parse_count(required(node, &path, "df")?, &df_path)?;
        let docs_path = join(&path, "docs");
        let docs = as_object(required(node, &path, "docs")?, &docs_path)?;
        if df != docs.len() {
            return Err(GlaiveError::malformed(
                df_path,
                format!("df is {df} but {} documents are listed", docs.len()),
            ));
        }
        if depth == 0 && df > 0 {
            return Err(GlaiveError::malformed(df_path, "the root node cannot hold postings"));
        }

        let mut postings = BTreeMap::new();
        for (key, posting) in docs {
            let posting_path = join(&docs_path, key);
            let doc_id = parse_doc_id(key, &posting_path, url_slots)?;
            let posting = as_object(posting, &posting_path)?;
            let tf_path = join(&posting_path, "tf");
            let tf = required(posting, &posting_path, "tf")?
                .as_f64()
                .ok_or_else(|| GlaiveError::malformed(&tf_path, "expected a number"))?;
            if !tf.is_finite() || tf <= 0.0 {
                return Err(GlaiveError::malformed(tf_path, "tf must be positive and finite"));
            }
            postings.insert(doc_id, tf);
        }
        if !postings.is_empty() {
            trie.insert_postings(&token, postings);
        }

        let mut children = Vec::new();
        for (key, child) in node {
            if key == "df" || key == "docs" {
                continue;
            }
            let child_path = join(&path, key);
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(GlaiveError::malformed(
                        child_path,
                        "child keys must be single characters",
                    ));
                }
            };
            if depth == MAX_TOKEN_CHARS {
                return Err(GlaiveError::malformed(
                    child_path,
                    format!("tokens are limited to {MAX_TOKEN_CHARS} characters"),
                ));
            }
            let mut child_token = token.clone();
            child_token.push(ch);
            children.push((child, child_path, child_token, depth + 1));
        }
        pending.extend(children.into_iter().rev());
    }

    Ok(trie)
}

fn parse_document_store(value: &Value, url_slots: usize) -> Result<DocumentStore> {
    const PATH: &str = "index.documentStore";
    let store = as_object(value, PATH)?;

    let info_path = join(PATH, "docInfo");
    let mut doc_info = BTreeMap::new();
    for (key, info) in as_object(required(store, PATH, "docInfo")?, &info_path)? {
        let path = join(&info_path, key);
        let id = parse_doc_id(key, &path, url_slots)?;
        let mut lengths = BTreeMap::new();
        for (field, length) in as_object(info, &path)? {
            lengths.insert(field.clone(), parse_count(length, &join(&path, field))?);
        }
        doc_info.insert(id, lengths);
    }

    let docs_path = join(PATH, "docs");
    let mut docs = BTreeMap::new();
    for (key, doc) in as_object(required(store, PATH, "docs")?, &docs_path)? {
        let path = join(&docs_path, key);
        let id = parse_doc_id(key, &path, url_slots)?;
        if !doc_info.contains_key(&id) {
            return Err(GlaiveError::malformed(path, "stored document has no docInfo entry"));
        }
        let stored = match doc {
            Value::Null => None,
            Value::Object(fields) => {
                let mut stored = StoredDocument::new();
                for (field, text) in fields {
                    stored.insert(field.clone(), parse_string(text, &join(&path, field))?);
                }
                Some(stored)
            }
            _ => return Err(GlaiveError::malformed(path, "expected an object or null")),
        };
        docs.insert(id, stored);
    }

    let length_path = join(PATH, "length");
    let length = parse_count(required(store, PATH, "length")?, &length_path)?;
    if length != doc_info.len() {
        return Err(GlaiveError::malformed(
            length_path,
            format!("length is {length} but docInfo has {} entries", doc_info.len()),
        ));
    }

    let save = match store.get("save") {
        None => true,
        Some(value) => value
            .as_bool()
            .ok_or_else(|| GlaiveError::malformed(join(PATH, "save"), "expected a boolean"))?,
    };

    Ok(DocumentStore {
        doc_info,
        docs,
        save,
    })
}

fn parse_options(root: &Map<String, Value>) -> Result<SearchOptions> {
    let mut options = SearchOptions::default();

    if let Some(results) = root.get("results_options") {
        let results = as_object(results, "results_options")?;
        if let Some(limit) = results.get("limit_results") {
            options.limit = parse_count(limit, "results_options.limit_results")?;
        }
        if let Some(count) = results.get("teaser_word_count") {
            options.teaser_word_count = parse_count(count, "results_options.teaser_word_count")?;
        }
    }

    if let Some(search) = root.get("search_options") {
        let search = as_object(search, "search_options")?;
        if let Some(mode) = search.get("bool") {
            let mode = parse_string(mode, "search_options.bool")?;
            options.combine_with = mode.parse::<CombineWith>().map_err(|_| {
                GlaiveError::malformed("search_options.bool", "expected `OR` or `AND`")
            })?;
        }
        if let Some(expand) = search.get("expand") {
            options.expand = expand.as_bool().ok_or_else(|| {
                GlaiveError::malformed("search_options.expand", "expected a boolean")
            })?;
        }
        if let Some(fields) = search.get("fields") {
            let fields = as_object(fields, "search_options.fields")?;
            options.boosts.clear();
            for (name, config) in fields {
                let path = format!("search_options.fields.{name}");
                let config = as_object(config, &path)?;
                let boost_path = join(&path, "boost");
                let boost = match config.get("boost") {
                    None => 1.0,
                    Some(boost) => boost
                        .as_f64()
                        .filter(|b| b.is_finite() && *b >= 0.0)
                        .ok_or_else(|| {
                            GlaiveError::malformed(&boost_path, "expected a non-negative number")
                        })?,
                };
                options.boosts.insert(name.clone(), boost);
            }
        }
    }

    Ok(options)
}
