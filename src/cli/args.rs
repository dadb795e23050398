//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pcap::DEFAULT_SNAPLEN;

/// Where record timestamps are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Timebase {
    /// Wall-clock time at which the logs were written
    #[default]
    Wallclock,
    /// Raw simulation time, starting at the Unix epoch
    Simulation,
}

/// Convert simulated PHY transaction logs into a Bluetooth LE pcap capture.
#[derive(Parser, Debug)]
#[command(name = "phylog2pcap")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PHY log files to merge (`-` for standard input, `.gz` accepted)
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output capture file (`-` for standard output)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Timestamp base for records
    #[arg(short = 't', long = "timebase", value_enum, default_value_t = Timebase::Wallclock)]
    pub timebase: Timebase,

    /// Maximum bytes stored per record
    #[arg(short = 's', long = "snaplen", default_value_t = DEFAULT_SNAPLEN)]
    pub snaplen: u32,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter implied by the verbosity flag.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
