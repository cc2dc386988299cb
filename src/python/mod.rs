//! Python bindings for kalman-filter-rs using PyO3.
//!
//! Exposes the same surface as the `kalman_filter` extension module:
//! a `KalmanFilter` class taking and returning numpy arrays.

use pyo3::prelude::*;

mod filter;

pub use filter::PyKalmanFilter;

/// Python module `kalman_filter`.
#[pymodule]
fn kalman_filter(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKalmanFilter>()?;

    // Version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
