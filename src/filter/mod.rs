//! Kalman filter engine.
//!
//! This module provides:
//! - `KalmanFilter` - Linear Kalman filter with configurable F, Q, H, R
//! - `constant_velocity` - Builder for the common position/velocity model

mod kalman;
mod models;

pub use kalman::{KalmanFilter, SINGULAR_RCOND};
pub use models::constant_velocity;
