//! Center frequency to RF channel mapping.
//!
//! The simulator reports frequencies either as an offset from 2400 MHz or as
//! absolute MHz; both map onto the 40 BLE RF channels at 2 MHz spacing.

use std::ops::Range;

use crate::error::ConvertError;

/// Offset representation: MHz above 2400.
pub const OFFSET_RANGE: Range<f64> = 1.0..81.0;

/// Absolute representation in MHz.
pub const ABSOLUTE_RANGE: Range<f64> = 2401.0..2481.0;

/// Map a center frequency to its RF channel index.
pub fn rf_channel(center_freq: f64, start_time: u64) -> Result<u8, ConvertError> {
    let base = if OFFSET_RANGE.contains(&center_freq) {
        OFFSET_RANGE.start
    } else if ABSOLUTE_RANGE.contains(&center_freq) {
        ABSOLUTE_RANGE.start
    } else {
        return Err(ConvertError::Frequency {
            freq: center_freq,
            start_time,
        });
    };

    Ok(((center_freq - base) / 2.0).floor() as u8)
}
