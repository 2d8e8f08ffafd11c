//! Suffix tree builder
//!
//! Builds a generalized suffix tree from a collection of documents by:
//! 1. Concatenating all documents, each closed by its own terminator
//! 2. Running Ukkonen's algorithm over the concatenation (one phase per
//!    character, extensions until the remainder is used up or Rule 3 stops
//!    the phase)
//! 3. Materializing the working tree into an immutable tree, cutting edges
//!    at document boundaries

use super::materialize::materialize;
use super::state::{ConstructionState, StateResult};
use super::types::*;
use super::working::WorkingTree;
use crate::text::{DocId, TERMINATOR_BASE, TerminatorText, TextError, TextSet, free_terminator};
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Build a generalized suffix tree and return its root
pub fn build_tree(texts: &[TerminatorText]) -> Result<Arc<Node>> {
    let built = build_tree_with(texts, &BuildConfig::default())?;
    Ok(Arc::clone(built.tree.root()))
}

/// Build a generalized suffix tree with an explicit configuration
pub fn build_tree_with(texts: &[TerminatorText], config: &BuildConfig) -> Result<BuiltSuffixTree> {
    let text = Arc::new(TextSet::new(texts).context("Invalid input texts")?);
    let (working, stats) = construct(text.chars(), config)?;
    let root = materialize(&working, &text);

    Ok(BuiltSuffixTree {
        tree: SuffixTree::new(text, root),
        stats,
        config: config.clone(),
        excluded_count: 0,
    })
}

/// Run every phase of Ukkonen's algorithm over `text`
pub fn construct(text: &[char], config: &BuildConfig) -> Result<(WorkingTree, BuildStats)> {
    let mut state = ConstructionState::new(text, config.suffix_links);
    while state.is_there_a_next_phase() {
        state
            .start_next_phase()
            .and_then(|_| run_phase(&mut state))
            .with_context(|| {
                format!(
                    "suffix tree construction aborted at phase {}",
                    state.current_phase().unwrap_or(0)
                )
            })?;
    }
    Ok(state.finish())
}

/// Extensions of one phase
///
/// Ends when every pending suffix has been inserted, or early on Rule 3:
/// the remaining suffixes are then implicit and carried into the next
/// phase.
fn run_phase(state: &mut ConstructionState<'_>) -> StateResult<()> {
    let phase = state.current_phase()?;
    while state.remaining_extensions_in_current_phase()? > 0 {
        let selector = match state.active_edge() {
            Some(edge) if state.active_length() > 0 => edge,
            _ => phase,
        };
        state.initialize_active_edge_and_char_offset(selector)?;

        if state.active_point_follows_current_char()? {
            state.increment_active_length()?;
            break;
        }

        if state.active_length() == 0 {
            state.add_leaf_at_active_node()?;
        } else {
            state.split_active_edge()?;
        }
        state.decrement_remainder()?;
        state.advance_after_extension()?;
    }
    Ok(())
}

/// Document waiting for `build`
enum PendingText {
    /// Content whose terminator is picked at build time
    Content(Vec<char>),
    /// Text that came with its own terminator
    Closed(TerminatorText),
}

/// Builder for constructing a suffix tree from documents
///
/// Terminators for documents added with [`add_document`](Self::add_document)
/// are chosen in `build`, once every document is known: each one is the
/// next private-use character that occurs in no document at all.
pub struct SuffixTreeBuilder {
    config: BuildConfig,
    pending: Vec<PendingText>,
    /// Count of excluded documents
    excluded_count: u32,
}

impl SuffixTreeBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            excluded_count: 0,
        }
    }

    /// Create a builder with default configuration
    pub fn with_defaults() -> Self {
        Self::new(BuildConfig::default())
    }

    /// Add a document; its terminator is assigned by `build`
    ///
    /// Returns `Ok(None)` if the document was skipped for being longer than
    /// `max_text_len`.
    pub fn add_document(&mut self, content: &str) -> Result<Option<DocId>> {
        if content.chars().count() > self.config.max_text_len {
            self.excluded_count += 1;
            return Ok(None);
        }

        let chars = if self.config.case_insensitive {
            content.to_lowercase().chars().collect()
        } else {
            content.chars().collect()
        };
        self.pending.push(PendingText::Content(chars));
        Ok(Some(self.last_doc_id()))
    }

    /// Add a text that already carries its terminator
    pub fn add_text(&mut self, text: TerminatorText) -> DocId {
        self.pending.push(PendingText::Closed(text));
        self.last_doc_id()
    }

    /// Total characters accumulated, terminators included
    pub fn text_size(&self) -> usize {
        self.pending
            .iter()
            .map(|text| match text {
                PendingText::Content(chars) => chars.len() + 1,
                PendingText::Closed(text) => text.len(),
            })
            .sum()
    }

    /// Get the number of documents added
    pub fn doc_count(&self) -> usize {
        self.pending.len()
    }

    /// Build the tree from accumulated documents
    pub fn build(self) -> Result<BuiltSuffixTree> {
        let texts = close_texts(self.pending).context("Failed to assign terminators")?;
        let mut built = build_tree_with(&texts, &self.config)?;
        built.excluded_count = self.excluded_count;
        Ok(built)
    }

    fn last_doc_id(&self) -> DocId {
        (self.pending.len() - 1) as DocId
    }
}

/// Give every open document a terminator found in no document
fn close_texts(pending: Vec<PendingText>) -> Result<Vec<TerminatorText>, TextError> {
    let mut used: FxHashSet<char> = FxHashSet::default();
    for text in &pending {
        match text {
            PendingText::Content(chars) => used.extend(chars.iter().copied()),
            PendingText::Closed(text) => used.extend(text.as_chars().iter().copied()),
        }
    }

    let mut next = TERMINATOR_BASE;
    pending
        .into_iter()
        .map(|text| match text {
            PendingText::Content(chars) => {
                let terminator = free_terminator(&used, next)?;
                used.insert(terminator);
                next = terminator as u32 + 1;
                TerminatorText::from_chars(chars, terminator)
            }
            PendingText::Closed(text) => Ok(text),
        })
        .collect()
}

/// Result of building a suffix tree
#[derive(Debug, Clone)]
pub struct BuiltSuffixTree {
    pub tree: SuffixTree,
    pub stats: BuildStats,
    /// Configuration used for building
    pub config: BuildConfig,
    /// Number of documents excluded from the tree
    pub excluded_count: u32,
}

impl BuiltSuffixTree {
    pub fn root(&self) -> &Arc<Node> {
        self.tree.root()
    }
}
