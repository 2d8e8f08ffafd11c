//! Generalized suffix tree construction
//!
//! Ukkonen's algorithm builds the tree online, one character per phase,
//! in amortized linear time. The mutable structure it works on is then
//! turned into an immutable, path-compressed tree.
//!
//! ## Architecture
//!
//! - `working`: arena-backed mutable tree with a shared open end for leaves
//! - `state`: phase/extension state machine and the active point
//! - `builder`: drives the phases and applies the extension rules
//! - `materialize`: stack-based conversion into the immutable tree
//! - `types`: immutable nodes and edges, configuration and build stats
//!
//! ## Example
//!
//! ```
//! use gst::text::TerminatorText;
//! use gst::tree::build_tree;
//!
//! let texts = vec![
//!     TerminatorText::new("xyz", '$').unwrap(),
//!     TerminatorText::new("abc", '%').unwrap(),
//! ];
//! let root = build_tree(&texts).unwrap();
//! assert_eq!(root.leaf_count(), 8);
//! ```

pub mod builder;
pub mod materialize;
pub mod state;
pub mod types;
pub mod working;

#[cfg(test)]
mod proptests;

// Re-exports for convenience
pub use builder::{BuiltSuffixTree, SuffixTreeBuilder, build_tree, build_tree_with};
pub use state::{ConstructionState, InvalidState};
pub use types::{BuildConfig, BuildStats, Edge, LeafRef, Node, SuffixEntry, SuffixTree};
