//! Serializable filter configuration.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::filter::KalmanFilter;
use crate::utils::{dmatrix_from_rows, dmatrix_to_rows};
use crate::Result;

/// Description of a Kalman filter that can be loaded from JSON, TOML, etc.
///
/// Matrices are row-major nested arrays. Anything left out keeps the
/// defaults of [`KalmanFilter::new`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// State dimension (n).
    pub state_dim: usize,

    /// Measurement dimension (m).
    pub measurement_dim: usize,

    /// State transition matrix F (n x n).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_transition: Option<Vec<Vec<f64>>>,

    /// Process noise covariance Q (n x n).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_noise: Option<Vec<Vec<f64>>>,

    /// Measurement matrix H (m x n).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_matrix: Option<Vec<Vec<f64>>>,

    /// Measurement noise covariance R (m x m).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_noise: Option<Vec<Vec<f64>>>,

    /// Initial state estimate x (n).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<Vec<f64>>,

    /// Initial error covariance P (n x n).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_covariance: Option<Vec<Vec<f64>>>,
}

impl FilterConfig {
    /// Create a configuration with all matrices at their defaults.
    pub fn new(state_dim: usize, measurement_dim: usize) -> Self {
        Self {
            state_dim,
            measurement_dim,
            ..Default::default()
        }
    }

    /// Capture the current model and estimate of a filter.
    pub fn from_filter(kf: &KalmanFilter) -> Self {
        Self {
            state_dim: kf.dim_x(),
            measurement_dim: kf.dim_z(),
            state_transition: Some(dmatrix_to_rows(kf.state_transition())),
            process_noise: Some(dmatrix_to_rows(kf.process_noise())),
            measurement_matrix: Some(dmatrix_to_rows(kf.measurement_matrix())),
            measurement_noise: Some(dmatrix_to_rows(kf.measurement_noise())),
            initial_state: Some(kf.get_state().iter().copied().collect()),
            initial_covariance: Some(dmatrix_to_rows(&kf.get_covariance())),
        }
    }

    /// Build the filter.
    ///
    /// Every matrix goes through the filter's own setters, so a wrong shape
    /// surfaces as [`crate::Error::DimensionMismatch`] and a ragged nested
    /// array as [`crate::Error::InvalidConfig`].
    pub fn build(&self) -> Result<KalmanFilter> {
        let mut kf = KalmanFilter::new(self.state_dim, self.measurement_dim)?;

        if let Some(rows) = &self.state_transition {
            kf.set_state_transition(&dmatrix_from_rows(rows)?)?;
        }
        if let Some(rows) = &self.process_noise {
            kf.set_process_noise(&dmatrix_from_rows(rows)?)?;
        }
        if let Some(rows) = &self.measurement_matrix {
            kf.set_measurement_matrix(&dmatrix_from_rows(rows)?)?;
        }
        if let Some(rows) = &self.measurement_noise {
            kf.set_measurement_noise(&dmatrix_from_rows(rows)?)?;
        }
        if let Some(x) = &self.initial_state {
            kf.set_state(&DVector::from_column_slice(x))?;
        }
        if let Some(rows) = &self.initial_covariance {
            kf.set_covariance(&dmatrix_from_rows(rows)?)?;
        }

        Ok(kf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use nalgebra::DMatrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_config_defaults_match_new() {
        let kf = FilterConfig::new(4, 2).build().unwrap();
        let reference = KalmanFilter::new(4, 2).unwrap();

        assert_eq!(kf.state_transition(), reference.state_transition());
        assert_eq!(kf.measurement_matrix(), reference.measurement_matrix());
        assert_eq!(kf.get_covariance(), reference.get_covariance());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "state_dim": 2,
            "measurement_dim": 1,
            "state_transition": [[1.0, 1.0], [0.0, 1.0]],
            "measurement_matrix": [[1.0, 0.0]],
            "process_noise": [[0.01, 0.0], [0.0, 0.01]],
            "measurement_noise": [[1.0]],
            "initial_state": [5.0, -1.0]
        }"#;

        let config: FilterConfig = serde_json::from_str(json).unwrap();
        assert!(config.initial_covariance.is_none());

        let kf = config.build().unwrap();
        assert_eq!(
            kf.state_transition(),
            &DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 1.0])
        );
        assert_eq!(kf.measurement_matrix(), &DMatrix::from_row_slice(1, 2, &[1.0, 0.0]));
        assert_relative_eq!(kf.process_noise()[(1, 1)], 0.01, epsilon = 1e-15);
        assert_eq!(kf.get_state(), DVector::from_vec(vec![5.0, -1.0]));
        assert_eq!(kf.get_covariance(), DMatrix::<f64>::identity(2, 2));
    }

    #[test]
    fn test_config_wrong_shape() {
        let mut config = FilterConfig::new(2, 1);
        config.measurement_matrix = Some(vec![vec![1.0], vec![0.0]]);

        assert!(matches!(
            config.build(),
            Err(Error::DimensionMismatch { operand: "measurement matrix", expected: (1, 2), got: (2, 1) })
        ));
    }

    #[test]
    fn test_config_ragged_rows() {
        let mut config = FilterConfig::new(2, 2);
        config.process_noise = Some(vec![vec![1.0, 0.0], vec![1.0]]);

        assert!(matches!(config.build(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_zero_dimension() {
        assert!(matches!(
            FilterConfig::new(0, 1).build(),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_config_snapshot_restores_filter() {
        let mut kf = crate::constant_velocity(2, 0.5, 0.1, 2.0).unwrap();
        kf.predict();
        kf.update(&DVector::from_vec(vec![1.0, 2.0])).unwrap();

        let json = serde_json::to_string(&FilterConfig::from_filter(&kf)).unwrap();
        let restored = serde_json::from_str::<FilterConfig>(&json).unwrap().build().unwrap();

        for (a, b) in restored.get_state().iter().zip(kf.get_state().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        for (a, b) in restored.get_covariance().iter().zip(kf.get_covariance().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_eq!(restored.state_transition(), kf.state_transition());
        assert_eq!(restored.measurement_noise(), kf.measurement_noise());
    }
}
