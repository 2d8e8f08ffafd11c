//! Construction state for Ukkonen's algorithm
//!
//! [`ConstructionState`] owns the working tree and the cursor that survives
//! across phases and extensions:
//!
//! - phase: index of the character being added
//! - remainder: suffixes of the current phase not inserted yet
//! - active point: (active node, active edge, active length), where the
//!   active edge is a text index whose character selects the child edge
//!
//! Every accessor that only makes sense inside a phase or an extension
//! checks its precondition and returns [`InvalidState`] instead of acting
//! on a stale cursor.

use super::types::BuildStats;
use super::working::{NodeId, WorkingEdge, WorkingTree};
use std::fmt;

/// Contract violation detected by the construction state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidState {
    /// No phase has been started yet
    NoActivePhase,
    /// All phases have already been run
    PhasesExhausted,
    /// The active edge was not initialized for the current extension
    ActiveEdgeNotInitialized,
    /// The active edge does not exist below the active node
    MissingEdge { node: NodeId, selector: char },
    /// Canonicalization tried to walk into a leaf
    NotAnInternalNode(NodeId),
    /// The operation needs a different active length
    UnexpectedActiveLength(usize),
    /// All extensions of the current phase are already done
    NoPendingExtension,
}

impl fmt::Display for InvalidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidState::NoActivePhase => write!(f, "no phase is active"),
            InvalidState::PhasesExhausted => write!(f, "every phase has already run"),
            InvalidState::ActiveEdgeNotInitialized => {
                write!(f, "active edge not initialized for this extension")
            }
            InvalidState::MissingEdge { node, selector } => write!(
                f,
                "node {} has no edge starting with {:?}",
                node.index(),
                selector
            ),
            InvalidState::NotAnInternalNode(node) => {
                write!(f, "node {} is a leaf, cannot descend", node.index())
            }
            InvalidState::UnexpectedActiveLength(length) => {
                write!(f, "unexpected active length {}", length)
            }
            InvalidState::NoPendingExtension => {
                write!(f, "no extension left in the current phase")
            }
        }
    }
}

impl std::error::Error for InvalidState {}

pub type StateResult<T> = Result<T, InvalidState>;

pub struct ConstructionState<'t> {
    text: &'t [char],
    tree: WorkingTree,
    phase: Option<usize>,
    remainder: usize,
    active_node: NodeId,
    active_edge: Option<usize>,
    active_length: usize,
    /// Set by `initialize_active_edge_and_char_offset`, cleared when an
    /// extension or phase ends
    edge_initialized: bool,
    /// Internal node created earlier in this phase, still waiting for its
    /// suffix link
    pending_link: Option<NodeId>,
    suffix_links: bool,
    stats: BuildStats,
}

impl<'t> ConstructionState<'t> {
    pub fn new(text: &'t [char], suffix_links: bool) -> Self {
        let tree = WorkingTree::new();
        let root = tree.root();
        Self {
            text,
            tree,
            phase: None,
            remainder: 0,
            active_node: root,
            active_edge: None,
            active_length: 0,
            edge_initialized: false,
            pending_link: None,
            suffix_links,
            stats: BuildStats::default(),
        }
    }

    pub fn text(&self) -> &'t [char] {
        self.text
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &WorkingTree {
        &self.tree
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Hand over the finished tree
    pub fn finish(self) -> (WorkingTree, BuildStats) {
        (self.tree, self.stats)
    }

    pub fn is_there_a_next_phase(&self) -> bool {
        self.next_phase() < self.text.len()
    }

    /// Begin the next phase
    ///
    /// Moving the open end extends every leaf by the new character (Rule 1).
    pub fn start_next_phase(&mut self) -> StateResult<()> {
        if !self.is_there_a_next_phase() {
            return Err(InvalidState::PhasesExhausted);
        }
        let phase = self.next_phase();
        self.phase = Some(phase);
        self.tree.set_open_end(phase);
        self.remainder += 1;
        self.pending_link = None;
        self.edge_initialized = false;
        self.stats.phases += 1;
        self.stats.rule1_extensions += 1;
        Ok(())
    }

    pub fn current_phase(&self) -> StateResult<usize> {
        self.phase.ok_or(InvalidState::NoActivePhase)
    }

    /// Character added by the current phase
    pub fn current_char(&self) -> StateResult<char> {
        Ok(self.text[self.current_phase()?])
    }

    pub fn remaining_extensions_in_current_phase(&self) -> StateResult<usize> {
        self.current_phase()?;
        Ok(self.remainder)
    }

    pub fn active_node(&self) -> NodeId {
        self.active_node
    }

    pub fn active_edge(&self) -> Option<usize> {
        self.active_edge
    }

    pub fn active_length(&self) -> usize {
        self.active_length
    }

    /// Whether the character after the active point equals the current one
    ///
    /// True means Rule 3 (the suffix is already in the tree); false means
    /// Rule 2 (a leaf has to be added).
    pub fn active_point_follows_current_char(&self) -> StateResult<bool> {
        let c = self.current_char()?;
        if !self.edge_initialized {
            return Err(InvalidState::ActiveEdgeNotInitialized);
        }
        if self.active_length == 0 {
            return Ok(self.tree.edge(self.active_node, c).is_some());
        }
        let edge = self.selected_edge()?;
        Ok(self.text[edge.start + self.active_length] == c)
    }

    /// Select the active edge for a new extension and canonicalize
    ///
    /// While the active length covers the whole selected edge, the active
    /// point moves down to the edge's target. With active length zero the
    /// selector only names the character to look up next, so a missing edge
    /// is not an error there.
    pub fn initialize_active_edge_and_char_offset(&mut self, edge: usize) -> StateResult<()> {
        self.current_phase()?;
        let mut selector = edge;
        while self.active_length > 0 {
            let first = self.text[selector];
            let (len, target) = match self.tree.edge(self.active_node, first) {
                Some(next) => (next.len(), next.target),
                None => {
                    return Err(InvalidState::MissingEdge {
                        node: self.active_node,
                        selector: first,
                    });
                }
            };
            if self.active_length < len {
                break;
            }
            if self.tree.node(target).is_leaf() {
                return Err(InvalidState::NotAnInternalNode(target));
            }
            self.active_node = target;
            self.active_length -= len;
            selector += len;
            self.stats.canonicalization_steps += 1;
        }
        self.active_edge = Some(selector);
        self.edge_initialized = true;
        Ok(())
    }

    /// Rule 3: move the active point one character further
    pub fn increment_active_length(&mut self) -> StateResult<()> {
        self.current_phase()?;
        if !self.edge_initialized {
            return Err(InvalidState::ActiveEdgeNotInitialized);
        }
        self.link_pending_to(self.active_node);
        self.active_length += 1;
        self.edge_initialized = false;
        self.stats.rule3_stops += 1;
        Ok(())
    }

    /// Rule 2 without split: new leaf directly below the active node
    pub fn add_leaf_at_active_node(&mut self) -> StateResult<NodeId> {
        let phase = self.current_phase()?;
        if !self.edge_initialized {
            return Err(InvalidState::ActiveEdgeNotInitialized);
        }
        if self.active_length != 0 {
            return Err(InvalidState::UnexpectedActiveLength(self.active_length));
        }
        let suffix = self.extension_start()?;
        let leaf = self
            .tree
            .add_leaf(self.active_node, self.text[phase], phase, suffix);
        self.link_pending_to(self.active_node);
        self.stats.rule2_leaves += 1;
        Ok(leaf)
    }

    /// Rule 2 with split: break the active edge at the active length and hang
    /// a new leaf off the new internal node
    pub fn split_active_edge(&mut self) -> StateResult<NodeId> {
        let phase = self.current_phase()?;
        if !self.edge_initialized {
            return Err(InvalidState::ActiveEdgeNotInitialized);
        }
        if self.active_length == 0 {
            return Err(InvalidState::UnexpectedActiveLength(0));
        }
        let first = self.text[self.active_edge.ok_or(InvalidState::ActiveEdgeNotInitialized)?];
        let suffix = self.extension_start()?;
        let middle = self
            .tree
            .split_edge(self.active_node, first, self.active_length, self.text)
            .ok_or(InvalidState::MissingEdge {
                node: self.active_node,
                selector: first,
            })?;
        self.tree.add_leaf(middle, self.text[phase], phase, suffix);
        self.link_pending_to(middle);
        self.pending_link = Some(middle);
        self.stats.rule2_splits += 1;
        Ok(middle)
    }

    /// One extension of the current phase is done
    pub fn decrement_remainder(&mut self) -> StateResult<()> {
        self.current_phase()?;
        if self.remainder == 0 {
            return Err(InvalidState::NoPendingExtension);
        }
        self.remainder -= 1;
        self.edge_initialized = false;
        Ok(())
    }

    pub fn reset_active_length_and_set_active_node_to_root(&mut self) {
        self.active_node = self.tree.root();
        self.active_length = 0;
    }

    pub fn set_active_edge(&mut self, edge: usize) {
        self.active_edge = Some(edge);
    }

    /// Move the active point to the next shorter suffix after a Rule 2
    /// extension
    ///
    /// At the root the active edge shifts one character right. Below the
    /// root the suffix link is followed when there is one; otherwise the
    /// point is rebuilt from the root and canonicalized on the next
    /// initialization.
    pub fn advance_after_extension(&mut self) -> StateResult<()> {
        let phase = self.current_phase()?;
        if self.remainder == 0 {
            return Ok(());
        }
        let next_start = phase + 1 - self.remainder;
        let root = self.tree.root();

        if self.active_node == root {
            if self.active_length > 0 {
                self.active_length -= 1;
                self.set_active_edge(next_start);
            }
            return Ok(());
        }

        match self.tree.node(self.active_node).suffix_link {
            Some(link) if self.suffix_links => {
                self.active_node = link;
                self.stats.suffix_link_follows += 1;
            }
            _ => {
                self.reset_active_length_and_set_active_node_to_root();
                self.active_length = self.remainder - 1;
                self.set_active_edge(next_start);
                self.stats.root_rederivations += 1;
            }
        }
        Ok(())
    }

    fn next_phase(&self) -> usize {
        self.phase.map_or(0, |phase| phase + 1)
    }

    /// Start of the suffix inserted by the current extension
    fn extension_start(&self) -> StateResult<usize> {
        let phase = self.current_phase()?;
        if self.remainder == 0 {
            return Err(InvalidState::NoPendingExtension);
        }
        Ok(phase + 1 - self.remainder)
    }

    fn selected_edge(&self) -> StateResult<&WorkingEdge> {
        let selector = self.active_edge.ok_or(InvalidState::ActiveEdgeNotInitialized)?;
        let first = self.text[selector];
        self.tree
            .edge(self.active_node, first)
            .ok_or(InvalidState::MissingEdge {
                node: self.active_node,
                selector: first,
            })
    }

    fn link_pending_to(&mut self, target: NodeId) {
        if let Some(pending) = self.pending_link.take() {
            if pending != target {
                self.tree.node_mut(pending).suffix_link = Some(target);
            }
        }
    }
}
