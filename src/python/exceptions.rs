//! Python exception types for dpvcal
//!
//! Maps Rust error types to appropriate Python exceptions.

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;

use crate::calibration::FitError;

create_exception!(dpvcal, DpvcalException, PyException, "Base exception for all dpvcal errors.");
create_exception!(dpvcal, DpvcalFormatError, DpvcalException, "Malformed configuration or input.");
create_exception!(dpvcal, DpvcalFitError, DpvcalException, "Calibration line could not be fitted.");

/// Convert FitError to Python exception
impl From<FitError> for PyErr {
    fn from(err: FitError) -> Self {
        DpvcalFitError::new_err(err.to_string())
    }
}
