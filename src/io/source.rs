//! Row source abstractions and the CSV implementation.
//!
//! A row source yields one [`LogRow`] per call until it is exhausted. Rows are
//! matched to columns by header name, so column order in the input does not
//! matter and extra columns are ignored.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, InputError};

/// Column names every input log must provide.
pub mod column {
    pub const START_TIME: &str = "start_time";
    pub const CENTER_FREQ: &str = "center_freq";
    pub const PHY_ADDRESS: &str = "phy_address";
    pub const MODULATION: &str = "modulation";
    pub const PACKET_SIZE: &str = "packet_size";
    pub const PACKET: &str = "packet";
    pub const POWER_LEVEL: &str = "power_level";
}

/// One transaction row read from a PHY log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    /// Simulation time of the start of the transmission, in microseconds.
    pub start_time: u64,

    /// Center frequency in MHz.
    pub center_freq: f64,

    /// Access address (the PHY-level address of the transmission).
    pub phy_address: u64,

    /// Simulator modulation code.
    pub modulation: u32,

    /// Declared payload + CRC size in bytes. Zero means nothing was captured.
    pub packet_size: usize,

    /// Hex encoded payload; may be shorter than `packet_size` bytes.
    pub packet: String,

    /// Received or transmitted power in dBm.
    pub power_level: f64,
}

/// Sequential reader of log rows.
///
/// Sources are finite and not restartable. `Ok(None)` marks exhaustion and
/// every later call keeps returning `Ok(None)`.
pub trait RowSource {
    /// Read the next row.
    fn next_row(&mut self) -> Result<Option<LogRow>, Error>;

    /// Human readable name used in diagnostics (usually the file path).
    fn name(&self) -> &str;
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn next_row(&mut self) -> Result<Option<LogRow>, Error> {
        (**self).next_row()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    start_time: usize,
    center_freq: usize,
    phy_address: usize,
    modulation: usize,
    packet_size: usize,
    packet: usize,
    power_level: usize,
}

impl ColumnMap {
    fn from_headers(source_name: &str, headers: &StringRecord) -> Result<Self, InputError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| InputError::MissingColumn {
                    source_name: source_name.to_string(),
                    column,
                })
        };

        Ok(Self {
            start_time: find(column::START_TIME)?,
            center_freq: find(column::CENTER_FREQ)?,
            phy_address: find(column::PHY_ADDRESS)?,
            modulation: find(column::MODULATION)?,
            packet_size: find(column::PACKET_SIZE)?,
            packet: find(column::PACKET)?,
            power_level: find(column::POWER_LEVEL)?,
        })
    }
}

/// Row source backed by comma-separated text with a header row.
pub struct CsvRowSource<R: Read> {
    name: String,
    reader: csv::Reader<R>,
    /// `None` for an input without a header row, which yields no rows.
    columns: Option<ColumnMap>,
    record: StringRecord,
    exhausted: bool,
}

impl<R: Read> CsvRowSource<R> {
    /// Wrap a reader, consuming and validating its header row.
    ///
    /// A completely empty input is accepted and behaves as an exhausted source.
    pub fn new(name: impl Into<String>, reader: R) -> Result<Self, Error> {
        let name = name.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(|error| InputError::Csv {
            source_name: name.clone(),
            error,
        })?;
        let columns = if headers.is_empty() {
            tracing::debug!(source = %name, "input is empty");
            None
        } else {
            Some(ColumnMap::from_headers(&name, headers)?)
        };

        Ok(Self {
            name,
            reader,
            exhausted: columns.is_none(),
            columns,
            record: StringRecord::new(),
        })
    }

    fn parse_record(&self, columns: &ColumnMap) -> Result<LogRow, InputError> {
        let line = self.record.position().map_or(0, |p| p.line());
        let field = |idx: usize| self.record.get(idx).unwrap_or("");
        let invalid = |name: &'static str, value: &str| InputError::InvalidField {
            source_name: self.name.clone(),
            line,
            field: name,
            value: value.to_string(),
        };

        let raw = field(columns.start_time);
        let start_time = parse_u64(raw).ok_or_else(|| invalid(column::START_TIME, raw))?;

        let raw = field(columns.center_freq);
        let center_freq = raw
            .parse::<f64>()
            .map_err(|_| invalid(column::CENTER_FREQ, raw))?;

        let raw = field(columns.phy_address);
        let phy_address = parse_hex_u64(raw).ok_or_else(|| invalid(column::PHY_ADDRESS, raw))?;

        let raw = field(columns.modulation);
        let modulation = parse_u64(raw)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| invalid(column::MODULATION, raw))?;

        let raw = field(columns.packet_size);
        let packet_size = parse_u64(raw)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| invalid(column::PACKET_SIZE, raw))?;

        let raw = field(columns.power_level);
        let power_level = raw
            .parse::<f64>()
            .map_err(|_| invalid(column::POWER_LEVEL, raw))?;

        Ok(LogRow {
            start_time,
            center_freq,
            phy_address,
            modulation,
            packet_size,
            packet: field(columns.packet).to_string(),
            power_level,
        })
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<LogRow>, Error> {
        let Some(columns) = self.columns.filter(|_| !self.exhausted) else {
            return Ok(None);
        };

        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|error| InputError::Csv {
                source_name: self.name.clone(),
                error,
            })?;

        if !more {
            self.exhausted = true;
            return Ok(None);
        }

        Ok(Some(self.parse_record(&columns)?))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse an unsigned integer written in decimal or with a `0x` prefix.
fn parse_u64(s: &str) -> Option<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// Parse a hex value with or without a `0x` prefix.
fn parse_hex_u64(s: &str) -> Option<u64> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "start_time,end_time,center_freq,phy_address,modulation,power_level,packet_size,packet";

    fn source(body: &str) -> CsvRowSource<Cursor<Vec<u8>>> {
        let text = format!("{HEADER}\n{body}");
        CsvRowSource::new("test.csv", Cursor::new(text.into_bytes())).unwrap()
    }

    #[test]
    fn test_reads_rows_by_column_name() {
        let mut src = source("1000,1040,2402.0,0x8E89BED6,16,-20.5,3,AABBCC\n");

        let row = src.next_row().unwrap().unwrap();
        assert_eq!(row.start_time, 1000);
        assert_eq!(row.center_freq, 2402.0);
        assert_eq!(row.phy_address, 0x8E89_BED6);
        assert_eq!(row.modulation, 0x10);
        assert_eq!(row.packet_size, 3);
        assert_eq!(row.packet, "AABBCC");
        assert_eq!(row.power_level, -20.5);

        assert!(src.next_row().unwrap().is_none());
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let text = "packet,packet_size,power_level,modulation,phy_address,center_freq,start_time\n\
                    0102,2,-3,0x20,8e89bed6,2480.0,7\n";
        let mut src = CsvRowSource::new("reordered", text.as_bytes()).unwrap();

        let row = src.next_row().unwrap().unwrap();
        assert_eq!(row.start_time, 7);
        assert_eq!(row.modulation, 0x20);
        assert_eq!(row.packet, "0102");
    }

    #[test]
    fn test_missing_column() {
        let text = "start_time,center_freq\n1,2402\n";
        let err = CsvRowSource::new("short.csv", text.as_bytes()).err().unwrap();
        assert!(matches!(
            err,
            Error::Input(InputError::MissingColumn { column: "phy_address", .. })
        ));
    }

    #[test]
    fn test_invalid_numeric_field() {
        let mut src = source("soon,1040,2402.0,0x8E89BED6,16,-20,3,AABBCC\n");
        let err = src.next_row().unwrap_err();
        match err {
            Error::Input(InputError::InvalidField { field, line, value, .. }) => {
                assert_eq!(field, "start_time");
                assert_eq!(line, 2);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_exhausted() {
        let mut src = source("");
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn test_zero_byte_input_is_exhausted() {
        let mut src = CsvRowSource::new("empty.csv", Cursor::new(Vec::new())).unwrap();
        assert_eq!(src.name(), "empty.csv");
        assert!(src.next_row().unwrap().is_none());
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn test_short_packet_field_is_kept_verbatim() {
        let mut src = source("5,6,2440.0,0x1,16,0,4,AAB\n");
        let row = src.next_row().unwrap().unwrap();
        assert_eq!(row.packet_size, 4);
        assert_eq!(row.packet, "AAB");
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0x30"), Some(0x30));
        assert_eq!(parse_u64("-1"), None);
        assert_eq!(parse_hex_u64("8E89BED6"), Some(0x8E89_BED6));
        assert_eq!(parse_hex_u64("0x00AABBCCDD"), Some(0xAA_BBCC_DD));
        assert_eq!(parse_hex_u64("zz"), None);
    }
}
