//! Documents fed to the index builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric document identifier; also the position of the document's url in
/// `doc_urls`.
pub type DocId = u32;

/// A page section to be indexed: an optional caller-assigned id, the url the
/// search widget links to, and the raw text of each field.
///
/// Serialized form is flat, e.g.
/// `{"id": 3, "url": "goals.html", "title": "Goals", "body": "…"}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Caller-assigned id. Documents without one get the next dense id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocId>,

    /// Target url, stored in `doc_urls[id]`.
    #[serde(default)]
    pub url: String,

    /// Field name to raw text.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Document {
    /// Create an empty document pointing at `url`.
    pub fn new<S: Into<String>>(url: S) -> Self {
        Document {
            id: None,
            url: url.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Set the document id.
    pub fn with_id(mut self, id: DocId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the text of a field.
    pub fn with_field<S: Into<String>, T: Into<String>>(mut self, name: S, text: T) -> Self {
        self.fields.insert(name.into(), text.into());
        self
    }

    /// Raw text of a field, or `""` when the document has none.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder::default()
    }

    /// Set the document id.
    pub fn id(mut self, id: DocId) -> Self {
        self.document.id = Some(id);
        self
    }

    /// Set the target url.
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.document.url = url.into();
        self
    }

    /// Set the `title` field.
    pub fn title<S: Into<String>>(self, text: S) -> Self {
        self.add_text("title", text)
    }

    /// Set the `body` field.
    pub fn body<S: Into<String>>(self, text: S) -> Self {
        self.add_text("body", text)
    }

    /// Set the `breadcrumbs` field.
    pub fn breadcrumbs<S: Into<String>>(self, text: S) -> Self {
        self.add_text("breadcrumbs", text)
    }

    /// Set an arbitrary text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, text: T) -> Self {
        self.document.fields.insert(name.into(), text.into());
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
