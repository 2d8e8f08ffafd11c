//! Types for suffix tree construction
//!
//! The immutable tree produced by a build, plus the configuration and
//! statistics types shared by the builder and the CLI.

use crate::text::{DocId, TextSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Compressed edge label: `length` characters of the full text from `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    start: usize,
    length: usize,
}

impl Edge {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Position one past the last character of the label
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// The label as a slice of the text it was built from
    pub fn label<'t>(&self, text: &'t [char]) -> &'t [char] {
        &text[self.start..self.end()]
    }

    pub fn label_string(&self, text: &[char]) -> String {
        self.label(text).iter().collect()
    }

    pub fn first_char(&self, text: &[char]) -> char {
        text[self.start]
    }
}

/// Node of the immutable suffix tree
///
/// Leaves carry the start of their suffix in the full text. Internal nodes
/// map edges to children; children are shared, never mutated, and can be
/// read from any number of threads.
#[derive(Clone, Default)]
pub struct Node {
    leaf_start: Option<usize>,
    children: BTreeMap<Edge, Arc<Node>>,
}

impl Node {
    pub fn leaf(start: usize) -> Self {
        Self {
            leaf_start: Some(start),
            children: BTreeMap::new(),
        }
    }

    pub fn internal(children: BTreeMap<Edge, Arc<Node>>) -> Self {
        Self {
            leaf_start: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf_start.is_some()
    }

    /// Start of the suffix this leaf represents (`None` for internal nodes)
    pub fn leaf_start(&self) -> Option<usize> {
        self.leaf_start
    }

    pub fn children(&self) -> &BTreeMap<Edge, Arc<Node>> {
        &self.children
    }

    /// Child whose edge label starts with `first`
    pub fn child(&self, first: char, text: &[char]) -> Option<(&Edge, &Arc<Node>)> {
        self.children
            .iter()
            .find(|(edge, _)| edge.first_char(text) == first)
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                count += 1;
            }
            stack.extend(node.children.values().map(Arc::as_ref));
        }
        count
    }

    /// Number of nodes below (and including) this node
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values().map(Arc::as_ref));
        }
        count
    }
}

// Comparison, hashing and dropping walk the tree with an explicit stack:
// a text such as "aaaa...a" yields a chain of internal nodes as deep as
// the text is long.

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((left, right)) = stack.pop() {
            if left.leaf_start != right.leaf_start || left.children.len() != right.children.len() {
                return false;
            }
            for ((le, ln), (re, rn)) in left.children.iter().zip(right.children.iter()) {
                if le != re {
                    return false;
                }
                if !Arc::ptr_eq(ln, rn) {
                    stack.push((ln, rn));
                }
            }
        }
        true
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.leaf_start.hash(state);
            node.children.len().hash(state);
            for (edge, child) in &node.children {
                edge.hash(state);
                stack.push(child);
            }
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Node>> = std::mem::take(&mut self.children)
            .into_values()
            .collect();
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child) {
                pending.extend(std::mem::take(&mut node.children).into_values());
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("leaf_start", &self.leaf_start)
            .field("children", &self.children.len())
            .finish()
    }
}

/// A materialized tree together with the text its edges index into
#[derive(Debug, Clone)]
pub struct SuffixTree {
    text: Arc<TextSet>,
    root: Arc<Node>,
}

impl SuffixTree {
    pub fn new(text: Arc<TextSet>, root: Arc<Node>) -> Self {
        Self { text, root }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn text(&self) -> &TextSet {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        self.text.chars()
    }

    /// Iterate over all leaves, depth-first
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![(self.root.as_ref(), 0)],
        }
    }

    /// Every suffix stored in the tree, located in its document
    pub fn suffixes(&self) -> impl Iterator<Item = SuffixEntry> + '_ {
        self.leaves().map(move |leaf| {
            let (doc, offset) = self.text.locate(leaf.start);
            SuffixEntry {
                doc,
                offset,
                start: leaf.start,
                suffix: self.chars()[leaf.start..leaf.start + leaf.depth].to_vec(),
            }
        })
    }
}

/// A leaf reached by [`SuffixTree::leaves`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafRef {
    /// Start of the suffix in the full text
    pub start: usize,
    /// Length of the root-to-leaf path label
    pub depth: usize,
}

/// Iterator over the leaves of a tree (explicit stack, no recursion)
pub struct Leaves<'t> {
    stack: Vec<(&'t Node, usize)>,
}

impl Iterator for Leaves<'_> {
    type Item = LeafRef;

    fn next(&mut self) -> Option<LeafRef> {
        while let Some((node, depth)) = self.stack.pop() {
            if let Some(start) = node.leaf_start() {
                return Some(LeafRef { start, depth });
            }
            for (edge, child) in node.children().iter().rev() {
                self.stack.push((child, depth + edge.length()));
            }
        }
        None
    }
}

/// Suffix listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixEntry {
    pub doc: DocId,
    pub offset: usize,
    pub start: usize,
    pub suffix: Vec<char>,
}

/// Configuration for suffix tree building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Maintain suffix links (default: true). When false, the next active
    /// point is always re-derived by walking down from the root.
    pub suffix_links: bool,
    /// Maximum document length in characters accepted by the builder
    /// (default: 64Mi)
    pub max_text_len: usize,
    /// Lowercase documents added through the builder (default: false)
    pub case_insensitive: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            suffix_links: true,
            max_text_len: 64 * 1024 * 1024,
            case_insensitive: false,
        }
    }
}

/// Counters collected while constructing a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Number of phases (one per character)
    pub phases: u64,
    /// Rule 1: every open leaf extended at once by advancing the open end
    pub rule1_extensions: u64,
    /// Rule 2: new leaf hung directly below a node
    pub rule2_leaves: u64,
    /// Rule 2: edge split plus new leaf
    pub rule2_splits: u64,
    /// Rule 3: suffix already present, phase ended early
    pub rule3_stops: u64,
    /// Active point moved down over a fully matched edge
    pub canonicalization_steps: u64,
    /// Active node moved along a suffix link
    pub suffix_link_follows: u64,
    /// Active point rebuilt by walking down from the root
    pub root_rederivations: u64,
}

impl BuildStats {
    /// Total extension rule applications
    pub fn rule_applications(&self) -> u64 {
        self.rule1_extensions + self.rule2_leaves + self.rule2_splits + self.rule3_stops
    }

    /// Number of leaves created during construction
    pub fn leaves(&self) -> u64 {
        self.rule2_leaves + self.rule2_splits
    }
}
