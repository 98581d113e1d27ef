//! Python argument conversion helpers (feature `python-bindings`).
//!
//! These functions turn loosely typed Python inputs (NumPy arrays, pandas
//! Series, plain sequences, keyword options) into the validated Rust types of
//! the `fractional` stack. Errors from the Rust side surface as `ValueError`
//! through the `From<FOError> for PyErr` conversion.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, ArrayView2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use crate::fractional::core::{
    memory::MemoryWindow,
    options::{LyapunovOptions, RenormMethod},
};

/// Owned copy of a 1-D float64 input; `name` labels the error message.
///
/// Accepted inputs, tried in order:
/// - a 1-D float64 `numpy.ndarray` (any strides);
/// - an object with `to_numpy()` such as a `pandas.Series`;
/// - a plain sequence of floats.
#[cfg(feature = "python-bindings")]
pub fn extract_vector(raw: &Bound<'_, PyAny>, name: &str) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<'_, f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if raw.hasattr("to_numpy")? {
        let converted = raw.call_method0("to_numpy")?;
        if let Ok(arr) = converted.extract::<PyReadonlyArray1<'_, f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    raw.extract::<Vec<f64>>().map(Array1::from).map_err(|_| {
        PyTypeError::new_err(format!("{name}: expected a 1-D float64 array, Series, or sequence"))
    })
}

/// Build run options from keyword arguments.
///
/// `memory_steps = None` keeps the full history; `householder` selects QR
/// renormalization instead of modified Gram–Schmidt.
#[cfg(feature = "python-bindings")]
pub fn build_options(
    h: f64, h_norm: f64, t_end: f64, memory_steps: Option<usize>, householder: bool,
) -> PyResult<LyapunovOptions> {
    let memory = match memory_steps {
        Some(steps) => MemoryWindow::Truncated { steps },
        None => MemoryWindow::Full,
    };
    let renorm = if householder { RenormMethod::Householder } else { RenormMethod::GramSchmidt };
    Ok(LyapunovOptions::new(h, h_norm, t_end)?.with_memory(memory)?.with_renorm(renorm))
}

/// Row-major `Vec<Vec<f64>>` copy of a matrix view.
#[cfg(feature = "python-bindings")]
pub fn rows_to_vecs(m: ArrayView2<'_, f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}
