#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine behind the moderation dashboard's analytics view.
//!
//! Each stage is a pure function over one snapshot of incident and user
//! records, evaluated at an explicit [`AnalysisContext`]. [`build_report`]
//! runs every stage and assembles an
//! [`AnalyticsReport`](safesignal_analytics_models::AnalyticsReport).

pub mod breakdown;
pub mod category_trend;
pub mod context;
pub mod distribution;
pub mod funnel;
pub mod heatmap;
pub mod hotspots;
pub mod kpi;
pub mod numeric;
pub mod period;
pub mod report;
pub mod reporters;
pub mod snapshot;
pub mod trend;

pub use context::AnalysisContext;
pub use report::build_report;
pub use safesignal_analytics_models::Period;
pub use snapshot::Snapshot;

use thiserror::Error;

/// Errors that can occur while loading or analyzing a snapshot.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A snapshot file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot document is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A reference instant could not be parsed.
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },
}
