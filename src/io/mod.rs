//! Input abstractions.
//!
//! This module provides the row-level view of PHY transaction logs:
//! - `RowSource` trait for sequential, non-restartable row reading
//! - `CsvRowSource` for comma-separated logs with a header row
//! - `open_input` for files, standard input and gzipped logs

mod decompress;
mod source;

pub use decompress::{is_gzip_extension, open_input, Compression, STDIN_PATH};
pub use source::{column, CsvRowSource, LogRow, RowSource};
