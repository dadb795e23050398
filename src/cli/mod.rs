//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Choosing the base timestamp for the capture

mod args;
mod timebase;

pub use args::{Args, Timebase};
pub use timebase::base_time_us;
