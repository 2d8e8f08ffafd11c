//! # GST - Generalized Suffix Trees
//!
//! GST builds generalized suffix trees over one or more documents with
//! Ukkonen's online algorithm, then freezes them into immutable,
//! path-compressed trees that can be shared across threads.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`text`] - Terminator-terminated texts and their concatenation
//! - [`tree`] - Construction (state machine, extension rules) and materialization
//! - [`output`] - Tree dumps, suffix listings and build reports
//! - [`utils`] - Configuration loading and progress display
//!
//! ## Quick Start
//!
//! ```
//! use gst::tree::SuffixTreeBuilder;
//!
//! let mut builder = SuffixTreeBuilder::with_defaults();
//! builder.add_document("abcab").unwrap();
//! builder.add_document("bcabx").unwrap();
//! let built = builder.build().unwrap();
//!
//! for entry in built.tree.suffixes() {
//!     println!("{}:{}", entry.doc, entry.offset);
//! }
//! assert_eq!(built.root().leaf_count(), 12);
//! ```
//!
//! ## Performance
//!
//! Construction is amortized linear in the total text length: leaf edges
//! share one open end, so Rule 1 costs O(1) per phase, and suffix links let
//! each extension resume without walking down from the root. Edge labels
//! are (start, length) pairs into the text, keeping the tree O(n) in size.

pub mod output;
pub mod text;
pub mod tree;
pub mod utils;

pub use tree::build_tree;
