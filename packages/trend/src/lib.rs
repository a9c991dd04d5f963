#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trend and hotspot engine for prepared microplastics sample tables.
//!
//! The two public entry points, [`predict`] and [`detect_hotspots`], never
//! return an error: internal failures are turned into
//! [`Outcome::Fallback`](microplastics_trend_models::Outcome::Fallback)
//! values carrying a well-formed stand-in result and the failure reason.
//! The remaining modules derive report inputs ([`summarize`]) and alert
//! decisions ([`alerts`]) from the same tables.

pub mod alerts;
pub mod features;
pub mod hotspots;
pub mod predictor;
pub mod recommendations;
pub mod regression;
pub mod summary;
pub mod validate;

mod stats;

use thiserror::Error;

pub use alerts::{check_thresholds, trend_alert};
pub use hotspots::detect_hotspots;
pub use predictor::{PredictionRequest, predict};
pub use recommendations::recommendations;
pub use summary::summarize;
pub use validate::validate_prediction;

/// Errors raised inside the engine before they are converted to fallbacks.
#[derive(Debug, Error)]
pub enum TrendError {
    /// There were no samples to work with.
    #[error("No samples available")]
    EmptyDataset,

    /// The regression could not be fitted.
    #[error("Degenerate fit: {message}")]
    DegenerateFit {
        /// Description of what went wrong.
        message: String,
    },

    /// A computation produced a non-finite value or divided by zero.
    #[error("Arithmetic error: {message}")]
    Arithmetic {
        /// Description of what went wrong.
        message: String,
    },

    /// A caller-supplied parameter is out of range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },
}
