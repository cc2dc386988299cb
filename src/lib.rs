//! # kalman-filter-rs - Linear Kalman Filter
//!
//! A discrete-time linear Kalman filter built on [nalgebra](https://nalgebra.org).
//!
//! The filter keeps a Gaussian belief (mean `x`, covariance `P`) about a hidden
//! state and refines it with two steps:
//!
//! - `predict` propagates the belief through the linear dynamics `F` and grows
//!   it by the process noise `Q`
//! - `update` corrects the belief with a measurement `z` observed through `H`
//!   with noise `R`
//!
//! ## Features
//!
//! - Dynamically sized state and measurement dimensions
//! - Shape-checked setters for every model matrix
//! - Explicit rejection of singular innovation covariances
//! - Ready-made constant-velocity models
//! - serde-loadable filter configuration
//! - Optional Python bindings (`python` feature)
//!
//! ## Example
//!
//! ```rust
//! use kalman_filter_rs::KalmanFilter;
//! use nalgebra::{DMatrix, DVector};
//!
//! // Position + velocity, observe position only
//! let mut kf = KalmanFilter::new(2, 1).unwrap();
//! kf.set_state_transition(&DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 1.0])).unwrap();
//! kf.set_measurement_matrix(&DMatrix::from_row_slice(1, 2, &[1.0, 0.0])).unwrap();
//!
//! for z in [1.0, 2.0, 3.0] {
//!     kf.predict();
//!     kf.update(&DVector::from_vec(vec![z])).unwrap();
//! }
//!
//! assert!(kf.get_state()[0] > 2.0);
//! ```

// Public modules
pub mod filter;
pub mod config;
pub mod utils;

// Optional modules
#[cfg(feature = "python")]
pub mod python;

// Re-exports for convenience
pub use filter::{constant_velocity, KalmanFilter};
pub use config::FilterConfig;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while building or running a Kalman filter
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("Invalid dimension: state_dim={state_dim}, measurement_dim={measurement_dim} (both must be positive)")]
        InvalidDimension {
            state_dim: usize,
            measurement_dim: usize,
        },

        #[error("Dimension mismatch for {operand}: expected {expected:?}, got {got:?}")]
        DimensionMismatch {
            operand: &'static str,
            expected: (usize, usize),
            got: (usize, usize),
        },

        #[error("Innovation covariance is singular; measurement update rejected")]
        SingularInnovationCovariance,

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),
    }

    /// Result type for filter operations
    pub type Result<T> = std::result::Result<T, Error>;
}
