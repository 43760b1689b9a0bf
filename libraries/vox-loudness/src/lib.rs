//! Level measurement and gain calculation for Vox Post
//!
//! This crate provides:
//! - Parsing of ffmpeg `volumedetect` reports into [`LoudnessMetrics`]
//! - Running the measurement through a [`vox_core::ToolRunner`]
//! - The gain correction toward a target max level
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────────┐     ┌────────────────┐
//! │ Audio File  │ ──► │ ToolRunner   │ ──► │ LoudnessMetrics │ ──► │ GainAdjustment │
//! └─────────────┘     │ (measure)    │     └─────────────────┘     └────────────────┘
//!                     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vox_loudness::{compute_adjustment, parse_volume_report};
//!
//! let metrics = parse_volume_report("max_volume: -20.0 dB\nmean_volume: -31.5 dB");
//! let adjustment = compute_adjustment(&metrics, -3.0).unwrap();
//! assert_eq!(adjustment.db(), 17.0);
//! ```

#![forbid(unsafe_code)]

mod analyzer;
mod error;
mod gain;

pub use analyzer::{analyze, parse_volume_report, LoudnessMetrics};
pub use error::{LoudnessError, Result};
pub use gain::{compute_adjustment, GainAdjustment};
