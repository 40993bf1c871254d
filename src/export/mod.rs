//! Report exports: PDF summary and CSV history.

use thiserror::Error;

pub mod csv;
pub mod pdf;

pub use csv::reports_csv;
pub use pdf::generate_report_pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}
