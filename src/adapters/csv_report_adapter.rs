//! CSV report adapter: `summary.csv` plus an `equity.csv` with one value
//! column per strategy, ready for charting.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::DcaError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvReportAdapter;

fn report_err(path: &Path, e: impl std::fmt::Display) -> DcaError {
    DcaError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl CsvReportAdapter {
    fn write_summary(result: &BacktestResult, path: &Path) -> Result<(), DcaError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
        for row in &result.summary.rows {
            wtr.serialize(row).map_err(|e| report_err(path, e))?;
        }
        wtr.flush().map_err(|e| report_err(path, e))?;
        Ok(())
    }

    fn write_equity(result: &BacktestResult, path: &Path) -> Result<(), DcaError> {
        let portfolios = result.portfolios();
        let with_sentiment = result.sentiment.is_some();
        let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;

        let mut header = vec!["date".to_string(), "close".to_string()];
        if with_sentiment {
            header.push("sentiment".to_string());
        }
        header.extend(portfolios.iter().map(|(kind, _)| kind.label().to_string()));
        wtr.write_record(&header).map_err(|e| report_err(path, e))?;

        for (i, record) in result.series.records.iter().enumerate() {
            let mut row = vec![record.date.to_string(), format!("{:.2}", record.close)];
            if with_sentiment {
                row.push(
                    record
                        .sentiment
                        .map(|s| format!("{:.4}", s))
                        .unwrap_or_default(),
                );
            }
            for (_, portfolio) in &portfolios {
                let value = portfolio
                    .equity_curve
                    .get(i)
                    .map(|p| format!("{:.2}", p.equity))
                    .unwrap_or_default();
                row.push(value);
            }
            wtr.write_record(&row).map_err(|e| report_err(path, e))?;
        }
        wtr.flush().map_err(|e| report_err(path, e))?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_dir: &Path) -> Result<Vec<PathBuf>, DcaError> {
        fs::create_dir_all(output_dir).map_err(|e| report_err(output_dir, e))?;

        let summary_path = output_dir.join("summary.csv");
        Self::write_summary(result, &summary_path)?;
        let equity_path = output_dir.join("equity.csv");
        Self::write_equity(result, &equity_path)?;

        tracing::info!(dir = %output_dir.display(), "report written");
        Ok(vec![summary_path, equity_path])
    }
}
