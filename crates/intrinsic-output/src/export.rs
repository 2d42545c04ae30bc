//! Export of valuation data.
//!
//! CSV and JSON export of the discount schedule and of whole valuation
//! summaries. Everything is written to a caller-supplied [`std::io::Write`];
//! this module never opens files itself.

use crate::summary::ValuationSummary;
use chrono::NaiveDate;
use intrinsic_data::FiscalPeriod;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Exported bytes were not UTF-8.
    #[error("Invalid UTF-8 in export: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One row of the discount schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    /// Fiscal year.
    pub fiscal_year: i32,

    /// Fiscal period end date.
    pub fiscal_date: NaiveDate,

    /// Reporting currency.
    pub reported_currency: String,

    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,

    /// Capital expenditures.
    pub capital_expenditures: Option<f64>,

    /// Free cash flow.
    pub free_cash_flow: Option<f64>,

    /// Whole years from the discounting base year.
    pub years_in_future: Option<i32>,

    /// Discounted free cash flow.
    pub present_value_of_fcf: Option<f64>,
}

impl From<&FiscalPeriod> for ScheduleRecord {
    fn from(period: &FiscalPeriod) -> Self {
        Self {
            fiscal_year: period.fiscal_year,
            fiscal_date: period.fiscal_date,
            reported_currency: period.reported_currency.clone(),
            operating_cash_flow: period.operating_cash_flow(),
            capital_expenditures: period.capital_expenditures(),
            free_cash_flow: period.free_cash_flow,
            years_in_future: period.years_in_future,
            present_value_of_fcf: period.present_value_of_fcf,
        }
    }
}

/// Schedule rows of a set of periods, in the given order.
pub fn schedule_records(periods: &[FiscalPeriod]) -> Vec<ScheduleRecord> {
    periods.iter().map(ScheduleRecord::from).collect()
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Write data to `writer` in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn export_to_writer<W: Write>(
        &self,
        writer: W,
        format: ExportFormat,
    ) -> Result<(), ExportError>;

    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.export_to_writer(&mut buffer, format)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn write_json<T: Serialize + ?Sized, W: Write>(
    value: &T,
    writer: W,
    format: ExportFormat,
) -> Result<(), ExportError> {
    if format == ExportFormat::PrettyJson {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}

fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a ScheduleRecord>,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

impl Exporter for [ScheduleRecord] {
    fn export_to_writer<W: Write>(
        &self,
        writer: W,
        format: ExportFormat,
    ) -> Result<(), ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self, writer),
            ExportFormat::Json | ExportFormat::PrettyJson => write_json(self, writer, format),
        }
    }
}

impl Exporter for Vec<ScheduleRecord> {
    fn export_to_writer<W: Write>(
        &self,
        writer: W,
        format: ExportFormat,
    ) -> Result<(), ExportError> {
        self.as_slice().export_to_writer(writer, format)
    }
}

/// CSV carries the discount schedule only; JSON carries the whole summary.
impl Exporter for ValuationSummary {
    fn export_to_writer<W: Write>(
        &self,
        writer: W,
        format: ExportFormat,
    ) -> Result<(), ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&schedule_records(&self.result.schedule), writer),
            ExportFormat::Json | ExportFormat::PrettyJson => write_json(self, writer, format),
        }
    }
}
