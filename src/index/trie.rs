//! Per-field postings trie.
//!
//! Tokens are stored character by character in an arena of nodes addressed
//! by index, so the whole structure is a flat `Vec` that is cheap to share
//! across threads and has no parent pointers. A node that terminates a token
//! carries the token's postings (`doc id -> tf`) and its document frequency;
//! interior nodes have `df = 0` and no postings.
//!
//! Tokens longer than [`MAX_TOKEN_CHARS`] are never stored, and every walk
//! over the trie keeps its own stack, so depth never costs call frames.

use std::collections::BTreeMap;

use crate::analysis::tokenizer::MAX_TOKEN_CHARS;
use crate::index::document::DocId;

/// Index of a node inside a [`PostingsTrie`].
pub type NodeId = usize;

/// Id of the root node of every trie.
pub const ROOT: NodeId = 0;

/// A single node of the trie.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrieNode {
    children: BTreeMap<char, NodeId>,
    docs: BTreeMap<DocId, f64>,
}

impl TrieNode {
    /// Number of documents containing the token ending at this node.
    pub fn df(&self) -> usize {
        self.docs.len()
    }

    /// Postings of the token ending at this node.
    pub fn docs(&self) -> &BTreeMap<DocId, f64> {
        &self.docs
    }

    /// Child nodes keyed by character, in character order.
    pub fn children(&self) -> &BTreeMap<char, NodeId> {
        &self.children
    }

    /// Term frequency weight of `doc_id`, if it has one here.
    pub fn tf(&self, doc_id: DocId) -> Option<f64> {
        self.docs.get(&doc_id).copied()
    }
}

/// Character-keyed prefix tree mapping tokens to their postings.
#[derive(Clone, Debug)]
pub struct PostingsTrie {
    nodes: Vec<TrieNode>,
}

impl PostingsTrie {
    /// Create an empty trie holding just the root node.
    pub fn new() -> Self {
        PostingsTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    /// The root node.
    pub fn root(&self) -> &TrieNode {
        &self.nodes[ROOT]
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id)
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Record `tf` for `doc_id` under `token`, replacing any previous weight
    /// for that document. Empty and overlong tokens are ignored.
    pub fn insert(&mut self, token: &str, doc_id: DocId, tf: f64) {
        if !storable(token) {
            return;
        }
        let node = self.walk_or_create(token);
        self.nodes[node].docs.insert(doc_id, tf);
    }

    /// Replace the postings of `token` wholesale.
    pub fn insert_postings(&mut self, token: &str, docs: BTreeMap<DocId, f64>) {
        if !storable(token) {
            return;
        }
        let node = self.walk_or_create(token);
        self.nodes[node].docs = docs;
    }

    fn walk_or_create(&mut self, token: &str) -> NodeId {
        let mut current = ROOT;
        for ch in token.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }
        current
    }

    fn find(&self, token: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for ch in token.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }

    /// The node that terminates `token`, if the path exists.
    ///
    /// The node may be interior (`df == 0`) when `token` is only a prefix.
    pub fn get(&self, token: &str) -> Option<&TrieNode> {
        self.find(token).map(|id| &self.nodes[id])
    }

    /// Postings for `token`, or `None` if no document contains it.
    pub fn postings(&self, token: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.get(token)
            .map(|node| &node.docs)
            .filter(|docs| !docs.is_empty())
    }

    /// Document frequency of `token` (0 when absent).
    pub fn df(&self, token: &str) -> usize {
        self.get(token).map_or(0, TrieNode::df)
    }

    /// Whether any document contains exactly `token`.
    pub fn contains(&self, token: &str) -> bool {
        self.df(token) > 0
    }

    /// Every token with postings that starts with `prefix`, the prefix itself
    /// included when it is a token, in lexicographic character order.
    pub fn expand(&self, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(start) = self.find(prefix) {
            self.walk(start, prefix.to_string(), |token, _| out.push(token.to_string()));
        }
        out
    }

    /// Every token with postings, in lexicographic character order.
    pub fn tokens(&self) -> Vec<String> {
        self.expand("")
    }

    /// Number of distinct tokens with postings.
    pub fn token_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.docs.is_empty()).count()
    }

    /// Visit every token with postings, in lexicographic character order.
    pub fn for_each_token<F>(&self, f: F)
    where
        F: FnMut(&str, &TrieNode),
    {
        self.walk(ROOT, String::new(), f);
    }

    /// Pre-order walk below `start`, whose token is `buffer`.
    fn walk<F>(&self, start: NodeId, mut buffer: String, mut f: F)
    where
        F: FnMut(&str, &TrieNode),
    {
        // (node, buffer length before its character, its character)
        let mut pending = vec![(start, buffer.len(), None)];
        while let Some((id, len, ch)) = pending.pop() {
            buffer.truncate(len);
            if let Some(ch) = ch {
                buffer.push(ch);
            }
            let node = &self.nodes[id];
            if !node.docs.is_empty() {
                f(&buffer, node);
            }
            let len = buffer.len();
            for (&ch, &child) in node.children.iter().rev() {
                pending.push((child, len, Some(ch)));
            }
        }
    }
}

fn storable(token: &str) -> bool {
    !token.is_empty()
        && (token.len() <= MAX_TOKEN_CHARS || token.chars().count() <= MAX_TOKEN_CHARS)
}

/// Two tries are equal when they hold the same tokens with the same
/// postings, regardless of node layout.
impl PartialEq for PostingsTrie {
    fn eq(&self, other: &Self) -> bool {
        let mut left = Vec::new();
        self.for_each_token(|token, node| left.push((token.to_string(), node.docs.clone())));
        let mut right = Vec::new();
        other.for_each_token(|token, node| right.push((token.to_string(), node.docs.clone())));
        left == right
    }
}

impl Default for PostingsTrie {
    fn default() -> Self {
        Self::new()
    }
}
