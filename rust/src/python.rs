//! PyO3 bindings, built with the `python` feature.

use std::collections::HashMap;

use chrono::NaiveTime;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::MatchingConfig;
use crate::grid::TimeGrid;
use crate::matcher;
use crate::models::{CellState, MatchResult};
use crate::parser;
use crate::report;

/// Matching configuration (Python wrapper).
#[pyclass(name = "MatchingConfig")]
#[derive(Clone, Debug)]
pub struct PyMatchingConfig {
    #[pyo3(get, set)]
    pub min_quota: u32,
    #[pyo3(get, set)]
    pub max_quota: u32,
    #[pyo3(get, set)]
    pub occupancy: usize,
    #[pyo3(get, set)]
    pub edge_priority: f64,
    #[pyo3(get, set)]
    pub interior_priority: f64,
    #[pyo3(get, set)]
    pub edge_exclusive: bool,
    #[pyo3(get, set)]
    pub verbosity: u8,
}

#[pymethods]
impl PyMatchingConfig {
    #[new]
    #[pyo3(signature = (
        min_quota=10,
        max_quota=13,
        occupancy=1,
        edge_priority=300.0,
        interior_priority=100.0,
        edge_exclusive=true,
        verbosity=0
    ))]
    fn new(
        min_quota: u32,
        max_quota: u32,
        occupancy: usize,
        edge_priority: f64,
        interior_priority: f64,
        edge_exclusive: bool,
        verbosity: u8,
    ) -> Self {
        Self {
            min_quota,
            max_quota,
            occupancy,
            edge_priority,
            interior_priority,
            edge_exclusive,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchingConfig(min_quota={}, max_quota={}, occupancy={})",
            self.min_quota, self.max_quota, self.occupancy
        )
    }
}

impl From<&PyMatchingConfig> for MatchingConfig {
    fn from(py: &PyMatchingConfig) -> Self {
        Self {
            min_quota: py.min_quota,
            max_quota: py.max_quota,
            occupancy: py.occupancy,
            edge_priority: py.edge_priority,
            interior_priority: py.interior_priority,
            edge_exclusive: py.edge_exclusive,
            verbosity: py.verbosity,
            ..MatchingConfig::default()
        }
    }
}

/// Result of a matching run (Python wrapper).
#[pyclass(name = "MatchResult")]
#[derive(Clone, Debug)]
pub struct PyMatchResult {
    #[pyo3(get)]
    pub board: Vec<Vec<Vec<String>>>,
    #[pyo3(get)]
    pub work_totals: HashMap<String, u32>,
    #[pyo3(get)]
    pub under_quota: Vec<String>,
    #[pyo3(get)]
    pub iterations: usize,
    #[pyo3(get)]
    pub assignments: usize,
    report: String,
}

#[pymethods]
impl PyMatchResult {
    /// Rendered text report.
    fn report(&self) -> String {
        self.report.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchResult(assignments={}, iterations={}, under_quota={})",
            self.assignments,
            self.iterations,
            self.under_quota.len()
        )
    }
}

impl PyMatchResult {
    fn new(result: MatchResult, grid: &TimeGrid, min_quota: u32) -> Self {
        let report = report::render_report(&result, grid, min_quota);
        Self {
            work_totals: result.totals_map(),
            board: result.board,
            under_quota: result.under_quota,
            iterations: result.iterations,
            assignments: result.assignments,
            report,
        }
    }
}

/// Parse availability text into (id, class flags) pairs.
#[pyfunction]
fn parse_availability(text: &str) -> PyResult<Vec<(String, Vec<bool>)>> {
    let grid = TimeGrid::default_week();
    let records = parser::parse_availability(text, &grid)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(records
        .into_iter()
        .map(|r| {
            let busy = r.cells.iter().map(|&c| c == CellState::Class).collect();
            (r.id, busy)
        })
        .collect())
}

/// Slot intervals of the default day layout.
#[pyfunction]
fn slot_times() -> Vec<(NaiveTime, NaiveTime)> {
    TimeGrid::default_week()
        .intervals()
        .iter()
        .map(|iv| (iv.start, iv.end))
        .collect()
}

/// Parse availability text and run the matcher.
#[pyfunction]
#[pyo3(signature = (text, config=None))]
fn run_matching(text: &str, config: Option<PyMatchingConfig>) -> PyResult<PyMatchResult> {
    let config: MatchingConfig = config
        .as_ref()
        .map(MatchingConfig::from)
        .unwrap_or_default();
    let grid = TimeGrid::default_week();
    let records = parser::parse_availability(text, &grid)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let min_quota = config.min_quota;
    let result = matcher::run_matching(records, grid.clone(), config)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyMatchResult::new(result, &grid, min_quota))
}

/// The shift_match.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMatchingConfig>()?;
    m.add_class::<PyMatchResult>()?;

    m.add_function(wrap_pyfunction!(parse_availability, m)?)?;
    m.add_function(wrap_pyfunction!(slot_times, m)?)?;
    m.add_function(wrap_pyfunction!(run_matching, m)?)?;

    Ok(())
}
