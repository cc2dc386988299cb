//! Ready-made linear models.

use nalgebra::DMatrix;

use super::kalman::KalmanFilter;
use crate::{Error, Result};

/// Build a constant-velocity filter for `n_dims` spatial dimensions.
///
/// State layout is `[positions..., velocities...]` (so `dim_x = 2 * n_dims`)
/// and only positions are measured (`dim_z = n_dims`):
///
/// ```text
/// F = [I, dt*I]     H = [I, 0]
///     [0,    I]
/// ```
///
/// # Arguments
/// * `n_dims` - Number of spatial dimensions
/// * `dt` - Time step between predictions
/// * `process_noise` - Variance on the diagonal of Q
/// * `measurement_noise` - Variance on the diagonal of R
pub fn constant_velocity(
    n_dims: usize,
    dt: f64,
    process_noise: f64,
    measurement_noise: f64,
) -> Result<KalmanFilter> {
    for (name, value) in [
        ("dt", dt),
        ("process_noise", process_noise),
        ("measurement_noise", measurement_noise),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{} must be finite and non-negative, got {}",
                name, value
            )));
        }
    }

    let dim_z = n_dims;
    let dim_x = dim_z * 2; // position + velocity
    let mut kf = KalmanFilter::new(dim_x, dim_z)?;

    // [I, dt*I]
    // [0,    I]
    let mut f = DMatrix::identity(dim_x, dim_x);
    for i in 0..dim_z {
        f[(i, dim_z + i)] = dt;
    }
    kf.set_state_transition(&f)?;

    // Observe only position
    // (the default H already is [I, 0] since dim_z < dim_x)

    kf.set_process_noise(&(DMatrix::<f64>::identity(dim_x, dim_x) * process_noise))?;
    kf.set_measurement_noise(&(DMatrix::<f64>::identity(dim_z, dim_z) * measurement_noise))?;

    Ok(kf)
}
