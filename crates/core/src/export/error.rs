//! Export error types.

use thiserror::Error;

/// Errors that can occur while exporting a ledger.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The output sink failed.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered bytes were not UTF-8.
    #[error("Export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl ExportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Csv(_) => "CSV_EXPORT_FAILED",
            Self::Io(_) => "EXPORT_IO_ERROR",
            Self::Encoding(_) => "EXPORT_ENCODING_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        500
    }
}

impl From<ExportError> for institute_shared::AppError {
    fn from(err: ExportError) -> Self {
        Self::Internal(err.to_string())
    }
}
