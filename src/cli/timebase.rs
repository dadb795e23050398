//! Base timestamp selection.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::Timebase;
use crate::error::Error;
use crate::io::STDIN_PATH;

/// Absolute time in microseconds that simulation time zero maps to.
///
/// With [`Timebase::Wallclock`] this is the earliest modification time among
/// the inputs (standard input counts as "now"), so the capture lands near the
/// moment the simulation ran. [`Timebase::Simulation`] keeps raw simulation
/// time.
pub fn base_time_us(inputs: &[PathBuf], timebase: Timebase) -> Result<u64, Error> {
    match timebase {
        Timebase::Simulation => Ok(0),
        Timebase::Wallclock => {
            let mut earliest: Option<u64> = None;
            for path in inputs {
                let t = written_at_us(path)?;
                earliest = Some(earliest.map_or(t, |e| e.min(t)));
            }
            Ok(earliest.unwrap_or(0))
        }
    }
}

fn written_at_us(path: &Path) -> Result<u64, Error> {
    let time = if path == Path::new(STDIN_PATH) {
        SystemTime::now()
    } else {
        std::fs::metadata(path)?.modified()?
    };

    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    Ok(u64::try_from(since_epoch.as_micros()).unwrap_or(u64::MAX))
}
