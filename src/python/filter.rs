//! Python wrapper for KalmanFilter.

use nalgebra::{DMatrix, DVector};
use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{constant_velocity, Error, KalmanFilter};

/// Discrete-time linear Kalman filter.
///
/// All arrays are copied in and out; nothing returned aliases the filter's
/// internal buffers.
///
/// Example:
///     >>> import numpy as np
///     >>> from kalman_filter import KalmanFilter
///     >>>
///     >>> kf = KalmanFilter(2, 1)
///     >>> kf.set_state_transition(np.array([[1.0, 1.0], [0.0, 1.0]]))
///     >>> kf.set_measurement_matrix(np.array([[1.0, 0.0]]))
///     >>> for z in [1.0, 2.0, 3.0]:
///     ...     kf.predict()
///     ...     kf.update(np.array([z]))
///     >>> kf.get_state()
#[pyclass(name = "KalmanFilter")]
#[derive(Clone)]
pub struct PyKalmanFilter {
    pub(crate) inner: KalmanFilter,
}

#[pymethods]
impl PyKalmanFilter {
    /// Create a new KalmanFilter.
    ///
    /// Args:
    ///     state_dim: State dimension n (must be positive).
    ///     measurement_dim: Measurement dimension m (must be positive).
    ///
    /// Raises:
    ///     ValueError: If either dimension is not positive.
    #[new]
    fn new(state_dim: i64, measurement_dim: i64) -> PyResult<Self> {
        let (dim_x, dim_z) = match (usize::try_from(state_dim), usize::try_from(measurement_dim)) {
            (Ok(dim_x), Ok(dim_z)) => (dim_x, dim_z),
            _ => {
                return Err(PyValueError::new_err(format!(
                    "Invalid dimension: state_dim={}, measurement_dim={} (both must be positive)",
                    state_dim, measurement_dim
                )))
            }
        };

        let inner = KalmanFilter::new(dim_x, dim_z).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Build a constant-velocity filter for `n_dims` spatial dimensions.
    ///
    /// The state is [positions..., velocities...] and only positions are
    /// measured.
    ///
    /// Raises:
    ///     ValueError: If n_dims is not positive or a noise/dt value is
    ///         negative or non-finite.
    #[staticmethod]
    #[pyo3(signature = (n_dims, dt, process_noise=0.1, measurement_noise=1.0))]
    fn constant_velocity(
        n_dims: i64,
        dt: f64,
        process_noise: f64,
        measurement_noise: f64,
    ) -> PyResult<Self> {
        let n_dims = usize::try_from(n_dims).map_err(|_| {
            PyValueError::new_err(format!(
                "Invalid dimension: n_dims={} (must be positive)",
                n_dims
            ))
        })?;
        let inner = constant_velocity(n_dims, dt, process_noise, measurement_noise)
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Advance the estimate one step: x = F x, P = F P F^T + Q.
    fn predict(&mut self) {
        self.inner.predict();
    }

    /// Correct the estimate with a measurement of shape (m,).
    ///
    /// Raises:
    ///     ValueError: On a wrong-length measurement or a singular
    ///         innovation covariance. The filter is left unchanged.
    fn update(&mut self, z: PyReadonlyArray1<'_, f64>) -> PyResult<()> {
        self.inner.update(&numpy_to_dvector(&z)).map_err(to_py_err)
    }

    /// Replace the state transition matrix F, shape (n, n).
    fn set_state_transition(&mut self, f: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.inner
            .set_state_transition(&numpy_to_dmatrix(&f))
            .map_err(to_py_err)
    }

    /// Replace the process noise covariance Q, shape (n, n).
    fn set_process_noise(&mut self, q: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.inner
            .set_process_noise(&numpy_to_dmatrix(&q))
            .map_err(to_py_err)
    }

    /// Replace the measurement matrix H, shape (m, n).
    fn set_measurement_matrix(&mut self, h: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.inner
            .set_measurement_matrix(&numpy_to_dmatrix(&h))
            .map_err(to_py_err)
    }

    /// Replace the measurement noise covariance R, shape (m, m).
    fn set_measurement_noise(&mut self, r: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.inner
            .set_measurement_noise(&numpy_to_dmatrix(&r))
            .map_err(to_py_err)
    }

    /// Overwrite the state estimate, shape (n,).
    fn set_state(&mut self, x: PyReadonlyArray1<'_, f64>) -> PyResult<()> {
        self.inner.set_state(&numpy_to_dvector(&x)).map_err(to_py_err)
    }

    /// Overwrite the error covariance, shape (n, n).
    fn set_covariance(&mut self, p: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.inner
            .set_covariance(&numpy_to_dmatrix(&p))
            .map_err(to_py_err)
    }

    /// Copy of the state estimate as a numpy array of shape (n,).
    fn get_state<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        dvector_to_numpy(py, &self.inner.get_state())
    }

    /// Copy of the error covariance as a numpy array of shape (n, n).
    fn get_covariance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        dmatrix_to_numpy(py, &self.inner.get_covariance())
    }

    /// State dimension n.
    #[getter]
    fn dim_x(&self) -> usize {
        self.inner.dim_x()
    }

    /// Measurement dimension m.
    #[getter]
    fn dim_z(&self) -> usize {
        self.inner.dim_z()
    }

    fn __repr__(&self) -> String {
        format!(
            "KalmanFilter(state_dim={}, measurement_dim={})",
            self.inner.dim_x(),
            self.inner.dim_z()
        )
    }
}

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Helper to convert a numpy array to DMatrix (numpy is row-major)
fn numpy_to_dmatrix(arr: &PyReadonlyArray2<'_, f64>) -> DMatrix<f64> {
    let arr = arr.as_array();
    DMatrix::from_fn(arr.nrows(), arr.ncols(), |i, j| arr[[i, j]])
}

/// Helper to convert a 1D numpy array to DVector
fn numpy_to_dvector(arr: &PyReadonlyArray1<'_, f64>) -> DVector<f64> {
    let arr = arr.as_array();
    DVector::from_iterator(arr.len(), arr.iter().copied())
}

/// Helper to convert DMatrix to numpy array
fn dmatrix_to_numpy<'py>(py: Python<'py>, matrix: &DMatrix<f64>) -> Bound<'py, PyArray2<f64>> {
    Array2::from_shape_fn((matrix.nrows(), matrix.ncols()), |(i, j)| matrix[(i, j)])
        .into_pyarray_bound(py)
}

/// Helper to convert DVector to 1D numpy array
fn dvector_to_numpy<'py>(py: Python<'py>, vector: &DVector<f64>) -> Bound<'py, PyArray1<f64>> {
    Array1::from_iter(vector.iter().copied()).into_pyarray_bound(py)
}
