//! Report generation port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DcaError;
use std::path::{Path, PathBuf};

/// Port for writing backtest reports.
pub trait ReportPort {
    /// Writes the report under `output_dir`, returning the files created.
    fn write(&self, result: &BacktestResult, output_dir: &Path) -> Result<Vec<PathBuf>, DcaError>;
}
