//! Vox Post Core
//!
//! Shared types, traits, and error handling for the Vox Post audio pipeline.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ProcessingJob`, `NoiseFilterMode`, `OutputExtension`
//! - **Filter Graphs**: `FilterGraph`, a typed builder that is serialized to
//!   ffmpeg's textual filter syntax only at the process boundary
//! - **Core Traits**: `ToolRunner`, the capability used to measure and transform files
//! - **Error Handling**: `ToolError` and its `Result` alias
//!
//! # Example
//!
//! ```rust
//! use vox_core::types::{FilterGraph, NoiseFilterMode};
//!
//! let graph = NoiseFilterMode::BandpassGate.filter_graph("cb.rnnn");
//! assert_eq!(graph.to_string(), "highpass=200,lowpass=3000,afftdn");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ToolError};
pub use traits::{ToolOutput, ToolRunner};
pub use types::{
    FilterArg, FilterGraph, NamedFilter, NoiseFilterMode, OutputExtension, ProcessingJob,
};
