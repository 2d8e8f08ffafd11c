//! Mutable tree used while Ukkonen's algorithm runs
//!
//! Nodes live in an arena and are addressed by [`NodeId`], so splitting an
//! edge never has to juggle owning pointers. Every leaf edge ends at the
//! same shared open-end cell: advancing that cell once per phase extends
//! all leaves at the same time.

use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::rc::Rc;

/// Index of a node in the working arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The root is always the first node of the arena
pub const ROOT: NodeId = NodeId(0);

/// End position of a working edge (inclusive)
#[derive(Debug, Clone)]
pub enum EdgeEnd {
    /// Edge ending at an internal node
    Frozen(usize),
    /// Leaf edge, shares the open end of the whole tree
    Open(Rc<Cell<usize>>),
}

impl EdgeEnd {
    pub fn get(&self) -> usize {
        match self {
            EdgeEnd::Frozen(end) => *end,
            EdgeEnd::Open(cell) => cell.get(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkingEdge {
    pub start: usize,
    pub end: EdgeEnd,
    pub target: NodeId,
}

impl WorkingEdge {
    /// Inclusive end of the label
    pub fn end(&self) -> usize {
        self.end.get()
    }

    pub fn len(&self) -> usize {
        self.end() + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct WorkingNode {
    /// Start of the represented suffix, set for leaves only
    pub leaf_start: Option<usize>,
    /// Child edges keyed by the first character of their label
    pub children: FxHashMap<char, WorkingEdge>,
    pub suffix_link: Option<NodeId>,
}

impl WorkingNode {
    pub fn is_leaf(&self) -> bool {
        self.leaf_start.is_some()
    }
}

/// Arena of working nodes plus the shared open end
#[derive(Debug)]
pub struct WorkingTree {
    nodes: Vec<WorkingNode>,
    open_end: Rc<Cell<usize>>,
}

impl Default for WorkingTree {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::len_without_is_empty)]
impl WorkingTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![WorkingNode::default()],
            open_end: Rc::new(Cell::new(0)),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &WorkingNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut WorkingNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn open_end(&self) -> usize {
        self.open_end.get()
    }

    /// Move the open end; every leaf edge grows with it
    pub fn set_open_end(&self, end: usize) {
        self.open_end.set(end);
    }

    /// Child edge of `node` starting with `first`
    pub fn edge(&self, node: NodeId, first: char) -> Option<&WorkingEdge> {
        self.nodes[node.0].children.get(&first)
    }

    /// Hang a new leaf below `parent`, labelled from `start` to the open end
    pub fn add_leaf(&mut self, parent: NodeId, first: char, start: usize, suffix: usize) -> NodeId {
        let leaf = self.push(WorkingNode {
            leaf_start: Some(suffix),
            ..WorkingNode::default()
        });
        let edge = WorkingEdge {
            start,
            end: EdgeEnd::Open(Rc::clone(&self.open_end)),
            target: leaf,
        };
        self.nodes[parent.0].children.insert(first, edge);
        leaf
    }

    /// Split the edge of `parent` keyed by `first` after `offset` characters
    ///
    /// The upper part ends at a new internal node, which takes over the rest
    /// of the old edge (and the subtree below it). Returns the new node, or
    /// `None` if there is no such edge or `offset` is not strictly inside it.
    pub fn split_edge(
        &mut self,
        parent: NodeId,
        first: char,
        offset: usize,
        text: &[char],
    ) -> Option<NodeId> {
        let old = self.edge(parent, first)?.clone();
        if offset == 0 || offset >= old.len() {
            return None;
        }

        let middle = self.push(WorkingNode::default());
        let lower_start = old.start + offset;
        self.nodes[middle.0].children.insert(
            text[lower_start],
            WorkingEdge {
                start: lower_start,
                end: old.end,
                target: old.target,
            },
        );
        self.nodes[parent.0].children.insert(
            first,
            WorkingEdge {
                start: old.start,
                end: EdgeEnd::Frozen(lower_start - 1),
                target: middle,
            },
        );
        Some(middle)
    }

    fn push(&mut self, node: WorkingNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}
