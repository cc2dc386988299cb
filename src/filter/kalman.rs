//! Linear Kalman filter.
//!
//! Holds the state estimate and its covariance together with the four model
//! matrices (F, Q, H, R), and runs the predict/update recursion over them.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::{Error, Result};

/// Standard discrete-time linear Kalman filter.
///
/// Dimensions are fixed at construction. Every setter checks the shape of
/// what it is given against them, so `predict` and `update` never see
/// inconsistent matrices.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    /// State dimension (n)
    dim_x: usize,
    /// Measurement dimension (m)
    dim_z: usize,
    /// State estimate (n)
    x: DVector<f64>,
    /// Error covariance (n x n)
    p: DMatrix<f64>,
    /// State transition matrix (n x n)
    f: DMatrix<f64>,
    /// Process noise covariance (n x n)
    q: DMatrix<f64>,
    /// Measurement matrix (m x n)
    h: DMatrix<f64>,
    /// Measurement noise covariance (m x m)
    r: DMatrix<f64>,
    // Products of the last successful update
    y: DVector<f64>,
    s: DMatrix<f64>,
    k: DMatrix<f64>,
}

impl KalmanFilter {
    /// Create a new Kalman filter.
    ///
    /// The state starts at zero with identity covariance. F, Q and R start as
    /// identity and H maps the first `min(dim_z, dim_x)` state components
    /// straight through.
    ///
    /// # Arguments
    /// * `dim_x` - State dimension
    /// * `dim_z` - Measurement dimension
    ///
    /// # Errors
    /// [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(dim_x: usize, dim_z: usize) -> Result<Self> {
        if dim_x == 0 || dim_z == 0 {
            debug!(dim_x, dim_z, "rejecting filter with empty dimension");
            return Err(Error::InvalidDimension {
                state_dim: dim_x,
                measurement_dim: dim_z,
            });
        }

        // Identity in the overlapping block, zeros elsewhere
        let mut h = DMatrix::zeros(dim_z, dim_x);
        for i in 0..dim_z.min(dim_x) {
            h[(i, i)] = 1.0;
        }

        Ok(Self {
            dim_x,
            dim_z,
            x: DVector::zeros(dim_x),
            p: DMatrix::identity(dim_x, dim_x),
            f: DMatrix::identity(dim_x, dim_x),
            q: DMatrix::identity(dim_x, dim_x),
            h,
            r: DMatrix::identity(dim_z, dim_z),
            y: DVector::zeros(dim_z),
            s: DMatrix::zeros(dim_z, dim_z),
            k: DMatrix::zeros(dim_x, dim_z),
        })
    }

    /// Predict the next state.
    pub fn predict(&mut self) {
        trace!(dim_x = self.dim_x, "predict");

        // x = F @ x
        self.x = &self.f * &self.x;

        // P = F @ P @ F.T + Q
        self.p = &self.f * &self.p * self.f.transpose() + &self.q;
    }

    /// Update the state with a measurement.
    ///
    /// On error nothing is modified: the estimate, covariance and the
    /// diagnostics from the previous update are all kept.
    ///
    /// # Arguments
    /// * `z` - Measurement vector of length `dim_z`
    ///
    /// # Errors
    /// * [`Error::DimensionMismatch`] if `z` has the wrong length
    /// * [`Error::SingularInnovationCovariance`] if `S = H P H^T + R` is
    ///   numerically singular: its smallest singular value is at most
    ///   [`SINGULAR_RCOND`] times its largest (or S is zero or non-finite)
    pub fn update(&mut self, z: &DVector<f64>) -> Result<()> {
        trace!(dim_z = self.dim_z, "update");
        check_shape("measurement", (self.dim_z, 1), (z.len(), 1))?;

        let ht = self.h.transpose();

        // y = z - H @ x (innovation)
        let y = z - &self.h * &self.x;

        // S = H @ P @ H.T + R (innovation covariance)
        let s = &self.h * &self.p * &ht + &self.r;

        // S^-1, refusing rank-deficient S and anything that would leak
        // NaN/inf into the state
        let si = Some(&s)
            .filter(|s| has_full_rank(s))
            .and_then(|s| s.clone().try_inverse())
            .filter(|si| si.iter().all(|v| v.is_finite()))
            .ok_or_else(|| {
                debug!(?s, "innovation covariance is singular, rejecting update");
                Error::SingularInnovationCovariance
            })?;

        // K = P @ H.T @ S^-1 (Kalman gain)
        let k = &self.p * &ht * si;

        // x = x + K @ y
        self.x += &k * &y;

        // P = (I - K @ H) @ P
        let i = DMatrix::<f64>::identity(self.dim_x, self.dim_x);
        self.p = (i - &k * &self.h) * &self.p;

        self.y = y;
        self.s = s;
        self.k = k;
        Ok(())
    }

    /// Replace the state transition matrix F (`dim_x x dim_x`).
    pub fn set_state_transition(&mut self, f: &DMatrix<f64>) -> Result<()> {
        check_shape("state transition", (self.dim_x, self.dim_x), f.shape())?;
        self.f.copy_from(f);
        Ok(())
    }

    /// Replace the process noise covariance Q (`dim_x x dim_x`).
    pub fn set_process_noise(&mut self, q: &DMatrix<f64>) -> Result<()> {
        check_shape("process noise", (self.dim_x, self.dim_x), q.shape())?;
        self.q.copy_from(q);
        Ok(())
    }

    /// Replace the measurement matrix H (`dim_z x dim_x`).
    pub fn set_measurement_matrix(&mut self, h: &DMatrix<f64>) -> Result<()> {
        check_shape("measurement matrix", (self.dim_z, self.dim_x), h.shape())?;
        self.h.copy_from(h);
        Ok(())
    }

    /// Replace the measurement noise covariance R (`dim_z x dim_z`).
    pub fn set_measurement_noise(&mut self, r: &DMatrix<f64>) -> Result<()> {
        check_shape("measurement noise", (self.dim_z, self.dim_z), r.shape())?;
        self.r.copy_from(r);
        Ok(())
    }

    /// Overwrite the state estimate, e.g. to seed it from a first detection.
    pub fn set_state(&mut self, x: &DVector<f64>) -> Result<()> {
        check_shape("state", (self.dim_x, 1), (x.len(), 1))?;
        self.x.copy_from(x);
        Ok(())
    }

    /// Overwrite the error covariance.
    pub fn set_covariance(&mut self, p: &DMatrix<f64>) -> Result<()> {
        check_shape("covariance", (self.dim_x, self.dim_x), p.shape())?;
        self.p.copy_from(p);
        Ok(())
    }

    /// Get a copy of the current state estimate.
    pub fn get_state(&self) -> DVector<f64> {
        self.x.clone()
    }

    /// Get a copy of the current error covariance.
    pub fn get_covariance(&self) -> DMatrix<f64> {
        self.p.clone()
    }

    /// Get the state dimension.
    #[inline(always)]
    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    /// Get the measurement dimension.
    #[inline(always)]
    pub fn dim_z(&self) -> usize {
        self.dim_z
    }

    /// State transition matrix F.
    #[inline(always)]
    pub fn state_transition(&self) -> &DMatrix<f64> {
        &self.f
    }

    /// Process noise covariance Q.
    #[inline(always)]
    pub fn process_noise(&self) -> &DMatrix<f64> {
        &self.q
    }

    /// Measurement matrix H.
    #[inline(always)]
    pub fn measurement_matrix(&self) -> &DMatrix<f64> {
        &self.h
    }

    /// Measurement noise covariance R.
    #[inline(always)]
    pub fn measurement_noise(&self) -> &DMatrix<f64> {
        &self.r
    }

    /// Innovation `y` from the last successful update (zeros before any).
    pub fn innovation(&self) -> &DVector<f64> {
        &self.y
    }

    /// Innovation covariance `S` from the last successful update.
    pub fn innovation_covariance(&self) -> &DMatrix<f64> {
        &self.s
    }

    /// Kalman gain `K` from the last successful update.
    pub fn kalman_gain(&self) -> &DMatrix<f64> {
        &self.k
    }
}

/// Relative singular-value cutoff below which `S` counts as singular.
///
/// `S` is rejected when `sigma_min <= SINGULAR_RCOND * sigma_max`, i.e. its
/// condition number is `1e12` or worse. Rounding in `H P H^T` leaves an exactly
/// rank-deficient `S` with `sigma_min` around `1e-16 * sigma_max`, far below this.
pub const SINGULAR_RCOND: f64 = 1e-12;

fn has_full_rank(s: &DMatrix<f64>) -> bool {
    if !s.iter().all(|v| v.is_finite()) {
        return false;
    }
    let Some(svd) = s.clone().try_svd(false, false, f64::EPSILON, 1000) else {
        return false;
    };
    let tol = SINGULAR_RCOND * svd.singular_values.max();
    svd.rank(tol) == s.nrows()
}

fn check_shape(operand: &'static str, expected: (usize, usize), got: (usize, usize)) -> Result<()> {
    if expected == got {
        return Ok(());
    }
    debug!(operand, ?expected, ?got, "shape mismatch");
    Err(Error::DimensionMismatch {
        operand,
        expected,
        got,
    })
}
