//! Working tree → immutable tree
//!
//! Post-order construction driven by an explicit stack, so trees as deep as
//! the text is long are fine. Edges crossing a terminator are cut right
//! after it and whatever hangs below is dropped: no path of a generalized
//! tree runs from one document into the next.

use super::types::{Edge, Node};
use super::working::{NodeId, WorkingTree};
use crate::text::TextSet;
use std::collections::BTreeMap;
use std::sync::Arc;

type Children = BTreeMap<Edge, Arc<Node>>;

enum Frame {
    /// First visit: `edge` is the incoming label (none for the root),
    /// `depth` the string depth of the node's parent
    Enter {
        node: NodeId,
        edge: Option<Edge>,
        depth: usize,
    },
    /// Second visit: every child has been emitted into the top map
    Exit { edge: Option<Edge> },
}

/// Build the immutable tree rooted at the working tree's root
pub fn materialize(tree: &WorkingTree, text: &TextSet) -> Arc<Node> {
    let mut stack = vec![Frame::Enter {
        node: tree.root(),
        edge: None,
        depth: 0,
    }];
    // In-progress child maps of the internal nodes on the current path
    let mut maps: Vec<Children> = Vec::new();
    let mut root = None;

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter { node, edge, depth } => {
                let working = tree.node(node);

                if let Some(start) = working.leaf_start {
                    emit(&mut maps, &mut root, edge, Node::leaf(start));
                    continue;
                }

                // Internal node whose label runs over a terminator: cut it
                // and turn it into the leaf of the suffix it starts
                if let Some(label) = edge {
                    if let Some(cut) = trim(label, text) {
                        let leaf = Node::leaf(label.start() - depth);
                        emit(&mut maps, &mut root, Some(cut), leaf);
                        continue;
                    }
                }

                maps.push(Children::new());
                stack.push(Frame::Exit { edge });

                let child_depth = depth + edge.map_or(0, |e| e.length());
                let mut children: Vec<_> = working.children.iter().collect();
                children.sort_unstable_by_key(|(first, _)| **first);
                for (_, child) in children.into_iter().rev() {
                    let label = Edge::new(child.start, child.len());
                    let child_edge = if tree.node(child.target).is_leaf() {
                        trim(label, text).unwrap_or(label)
                    } else {
                        label
                    };
                    stack.push(Frame::Enter {
                        node: child.target,
                        edge: Some(child_edge),
                        depth: child_depth,
                    });
                }
            }
            Frame::Exit { edge } => {
                let children = maps.pop().unwrap_or_default();
                emit(&mut maps, &mut root, edge, Node::internal(children));
            }
        }
    }

    Arc::new(root.unwrap_or_default())
}

fn emit(maps: &mut [Children], root: &mut Option<Node>, edge: Option<Edge>, node: Node) {
    match (edge, maps.last_mut()) {
        (Some(edge), Some(parent)) => {
            parent.insert(edge, Arc::new(node));
        }
        _ => *root = Some(node),
    }
}

/// The part of `label` up to and including the first terminator, if the
/// label continues past it
fn trim(label: Edge, text: &TextSet) -> Option<Edge> {
    if label.length() == 0 {
        return None;
    }
    let terminator = text.segment_end(label.start());
    let last = label.end() - 1;
    (terminator < last).then(|| Edge::new(label.start(), terminator + 1 - label.start()))
}
