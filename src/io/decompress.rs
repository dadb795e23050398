//! Input opening with transparent gzip decompression.
//!
//! Simulation runs often archive their PHY dumps as `.csv.gz`; those are
//! detected by extension or by magic bytes and decompressed on the fly.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, InputError};

/// Buffer size for reading input logs (64KB).
const BUFFER_SIZE: usize = 65536;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Detected compression of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain text
    None,
    /// Gzip (.gz)
    Gzip,
}

impl Compression {
    /// Detect compression from the first bytes of a stream.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// Open an input log for reading.
///
/// `-` reads standard input. Gzipped files are decompressed transparently.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>, Error> {
    let path = path.as_ref();

    if path == Path::new(STDIN_PATH) {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, io::stdin())));
    }

    let compression = if is_gzip_extension(path) {
        Compression::Gzip
    } else {
        sniff_compression(path)?
    };

    let file = open_file(path)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);

    Ok(match compression {
        Compression::Gzip => Box::new(GzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    })
}

fn open_file(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|_| {
        Error::Input(InputError::FileNotFound {
            path: path.display().to_string(),
        })
    })
}

/// Check the magic bytes of a file.
fn sniff_compression(path: &Path) -> Result<Compression, Error> {
    let mut file = open_file(path)?;
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(Compression::detect(&magic)),
        Err(_) => Ok(Compression::None), // Too short to be gzipped
    }
}

/// Check if a path appears to be a gzip file by extension only.
pub fn is_gzip_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|name| name.to_lowercase().ends_with(".gz"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOG: &[u8] = b"start_time,center_freq\n1,2402\n";

    fn read_all(path: &Path) -> Vec<u8> {
        let mut out = Vec::new();
        open_input(path).unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_detect_gzip_by_extension() {
        assert!(is_gzip_extension("phy.csv.gz"));
        assert!(is_gzip_extension("PHY.CSV.GZ"));
        assert!(!is_gzip_extension("phy.csv"));
        assert!(!is_gzip_extension("-"));
    }

    #[test]
    fn test_detect_gzip_by_magic_bytes() {
        assert_eq!(Compression::detect(&[0x1f, 0x8b, 0x08]), Compression::Gzip);
        assert_eq!(Compression::detect(b"start_time"), Compression::None);
        assert_eq!(Compression::detect(&[]), Compression::None);
    }

    #[test]
    fn test_open_plain_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(LOG).unwrap();
        temp.flush().unwrap();

        assert_eq!(read_all(temp.path()), LOG);
    }

    #[test]
    fn test_open_gzip_without_extension() {
        let temp = NamedTempFile::new().unwrap();
        {
            let file = File::create(temp.path()).unwrap();
            let mut encoder = GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(LOG).unwrap();
            encoder.finish().unwrap();
        }

        assert_eq!(read_all(temp.path()), LOG);
    }

    #[test]
    fn test_missing_file() {
        let err = open_input("/nonexistent/phy.csv").err().unwrap();
        assert!(matches!(
            err,
            Error::Input(InputError::FileNotFound { .. })
        ));
    }
}
