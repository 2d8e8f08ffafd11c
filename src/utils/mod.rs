//! Utility functions shared by the library and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Build configuration loading (XDG-compliant data dir)
//! - [`progress`] - Spinner shown while building, no-op without `progress`

pub mod app_data;
pub mod progress;

pub use app_data::*;
pub use progress::build_spinner;
