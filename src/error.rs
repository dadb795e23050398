//! Error types for phylog2pcap.

use thiserror::Error;

/// Main error type for phylog2pcap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing an input log
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error interpreting a row as a radio transmission
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading PHY transaction logs.
#[derive(Error, Debug)]
pub enum InputError {
    /// Input file could not be opened
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Underlying CSV reader failure
    #[error("{source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    /// Header row does not name a required column
    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    /// A required field could not be parsed
    #[error("{source_name}: line {line}: invalid {field}: {value:?}")]
    InvalidField {
        source_name: String,
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Errors raised while turning rows into capture records.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Center frequency outside both supported channel ranges
    #[error("center frequency {freq} MHz at t={start_time}us is outside [1, 81) and [2401, 2481)")]
    Frequency { freq: f64, start_time: u64 },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
