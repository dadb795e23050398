//! phylog2pcap - Convert simulated PHY transaction logs to pcap.
//!
//! This library reads the per-device CSV dumps written by a 2.4 GHz radio
//! channel simulator, merges them in time order, reassembles coded PHY
//! transmissions, and writes a `LINKTYPE_BLUETOOTH_LE_LL_WITH_PHDR` capture
//! that Wireshark and friends can open.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//!
//! use phylog2pcap::convert::{convert, ConvertOptions};
//! use phylog2pcap::io::{open_input, CsvRowSource};
//!
//! fn main() -> anyhow::Result<()> {
//!     let sources = vec![
//!         CsvRowSource::new("d_0.csv", open_input("d_0.csv")?)?,
//!         CsvRowSource::new("d_1.csv", open_input("d_1.csv")?)?,
//!     ];
//!     let sink = BufWriter::new(File::create("trace.pcap")?);
//!     let stats = convert(sources, sink, &ConvertOptions::default())?;
//!     println!("wrote {} records", stats.records_written);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod convert;
pub mod error;
pub mod io;
pub mod merge;
pub mod pcap;
pub mod phy;

pub use convert::{convert, ConvertOptions, ConvertStats};
pub use error::{Error, Result};
