//! Python bindings for dpvcal
//!
//! Lets a Python front end (notebook, dashboard) hand its uploaded tables to the
//! analysis core and get plain dicts and lists back.
//!
//! # Example
//!
//! ```python
//! import dpvcal
//!
//! samples = {
//!     "10_mu_M": {
//!         "Potential applied (V)": [...],
//!         "WE(1).δ.Current (A)": [...],
//!     },
//! }
//! result = dpvcal.analyze(samples)
//! for row in result["rows"]:
//!     print(row["file"], row["primary_current"])
//! print(result["calibrations"][0]["equation"])
//! ```

pub(crate) mod exceptions;

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyString};

use crate::calibration::fit_linear;
use crate::ingest::IngestError;
use crate::label::ConcentrationLabel;
use crate::peaks::{PeakFinder, PeakFinderConfig};
use crate::pipeline::{AnalysisPipeline, Batch, PipelineConfig};
use crate::report::BatchReport;
use crate::table::{Column, DataTable};

/// Initialize the dpvcal Python module
#[pymodule]
fn dpvcal(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Initialize logging bridge to Python's logging module
    pyo3_log::init();

    m.add("DpvcalException", py.get_type_bound::<exceptions::DpvcalException>())?;
    m.add("DpvcalFormatError", py.get_type_bound::<exceptions::DpvcalFormatError>())?;
    m.add("DpvcalFitError", py.get_type_bound::<exceptions::DpvcalFitError>())?;

    m.add_function(wrap_pyfunction!(parse_label, m)?)?;
    m.add_function(wrap_pyfunction!(find_peaks, m)?)?;
    m.add_function(wrap_pyfunction!(linear_fit, m)?)?;
    m.add_function(wrap_pyfunction!(analyze, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

/// Decode a sample identifier into (label, concentration in μM or None)
#[pyfunction]
fn parse_label(identifier: &str) -> (String, Option<f64>) {
    let label = ConcentrationLabel::parse(identifier);
    (label.label, label.micromolar)
}

/// Indices of the peaks of a current trace, in sweep order
#[pyfunction]
#[pyo3(signature = (currents, min_height=None, min_prominence=None, min_distance=None))]
fn find_peaks(
    currents: Vec<f64>,
    min_height: Option<f64>,
    min_prominence: Option<f64>,
    min_distance: Option<usize>,
) -> Vec<usize> {
    let config = PeakFinderConfig {
        min_height,
        min_prominence,
        min_distance,
    };
    PeakFinder::new(config).find_indices(&currents)
}

/// Least-squares fit; returns (slope, intercept, r)
#[pyfunction]
fn linear_fit(x: Vec<f64>, y: Vec<f64>) -> PyResult<(f64, f64, f64)> {
    let points: Vec<(f64, f64)> = x.into_iter().zip(y).collect();
    let fit = fit_linear(&points)?;
    Ok((fit.slope, fit.intercept, fit.r))
}

/// Convert one column; numbers stay numeric, anything else is kept as text
fn extract_column(name: String, values: &Bound<'_, PyAny>) -> PyResult<Column> {
    if values.is_instance_of::<PyString>() {
        return Err(exceptions::DpvcalFormatError::new_err(format!(
            "column '{}' is a string, not a sequence",
            name
        )));
    }
    if let Ok(numbers) = values.extract::<Vec<f64>>() {
        return Ok(Column::numeric(name, numbers));
    }

    let mut cells = Vec::new();
    for item in values.iter()? {
        cells.push(item?.str()?.to_cow()?.into_owned());
    }
    Ok(Column::text(name, cells))
}

/// Build the table of one sample from its column dict
fn extract_table(columns: &Bound<'_, PyAny>) -> PyResult<DataTable> {
    let columns = columns.downcast::<PyDict>()?;
    let mut table = DataTable::new();
    for (name, values) in columns.iter() {
        let name = name.str()?.to_cow()?.into_owned();
        table.push(extract_column(name, &values)?);
    }
    Ok(table)
}

/// Analyze a batch of tables.
///
/// `samples` maps identifiers to column dicts; iteration order of the dict is kept.
/// A sample whose columns cannot be read is reported in `skipped` and the rest of the
/// batch is still analyzed.
/// `config` is an optional TOML string with `[columns]`, `[peaks]` and `[channels]`
/// sections.
#[pyfunction]
#[pyo3(signature = (samples, config=None))]
fn analyze<'py>(
    py: Python<'py>,
    samples: &Bound<'py, PyDict>,
    config: Option<&str>,
) -> PyResult<Bound<'py, PyDict>> {
    let config: PipelineConfig = match config {
        Some(text) => toml::from_str(text)
            .map_err(|e| exceptions::DpvcalFormatError::new_err(e.to_string()))?,
        None => PipelineConfig::default(),
    };

    let mut batch = Batch::new();
    for (key, value) in samples.iter() {
        let identifier = key.str()?.to_cow()?.into_owned();
        match extract_table(&value) {
            Ok(table) => batch.push(identifier, table),
            Err(err) => batch.push_failed(identifier, IngestError::InvalidData(err.to_string())),
        }
    }

    let pipeline = AnalysisPipeline::new(config);
    let result = py.allow_threads(|| pipeline.run(batch));
    let document = BatchReport::new(&result, &pipeline.config().channels).document();

    let rows = PyList::empty_bound(py);
    for row in &document.rows {
        let dict = PyDict::new_bound(py);
        dict.set_item("file", &row.file)?;
        dict.set_item("label", &row.label)?;
        dict.set_item("primary_potential", row.primary_potential)?;
        dict.set_item("secondary_potential", row.secondary_potential)?;
        dict.set_item("primary_current", row.primary_current)?;
        dict.set_item("secondary_current", row.secondary_current)?;
        dict.set_item("concentration_um", row.concentration_um)?;
        dict.set_item("peaks_detected", row.peaks_detected)?;
        rows.append(dict)?;
    }

    let calibrations = PyList::empty_bound(py);
    for entry in &document.calibrations {
        let dict = PyDict::new_bound(py);
        dict.set_item("label", &entry.label)?;
        dict.set_item("slope", entry.fit.map(|f| f.slope))?;
        dict.set_item("intercept", entry.fit.map(|f| f.intercept))?;
        dict.set_item("r", entry.fit.map(|f| f.r))?;
        dict.set_item("r_squared", entry.r_squared)?;
        dict.set_item("equation", entry.equation.as_deref())?;
        calibrations.append(dict)?;
    }

    let skipped = PyList::empty_bound(py);
    for skip in &document.skipped {
        skipped.append((skip.identifier.as_str(), skip.reason.to_string()))?;
    }

    let out = PyDict::new_bound(py);
    out.set_item("rows", rows)?;
    out.set_item("calibrations", calibrations)?;
    out.set_item("skipped", skipped)?;
    Ok(out)
}
