//! phylog2pcap CLI entry point.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use phylog2pcap::cli::{base_time_us, Args};
use phylog2pcap::io::{open_input, CsvRowSource, STDIN_PATH};
use phylog2pcap::{convert, ConvertOptions};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging; stdout may carry the capture itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_filter().into()),
        )
        .with_writer(io::stderr)
        .init();

    let base_time_us = base_time_us(&args.inputs, args.timebase)
        .context("Failed to determine capture base time")?;

    let sources = open_sources(&args.inputs)?;
    let sink = open_output(&args.output)?;

    let options = ConvertOptions {
        snaplen: args.snaplen,
        base_time_us,
    };
    let stats = convert(sources, sink, &options)
        .with_context(|| format!("Failed to convert into {}", args.output.display()))?;

    tracing::info!(
        rows = stats.rows_read,
        records = stats.records_written,
        snapped = stats.records_snapped,
        truncated = stats.truncated_rows,
        coded = stats.coded_reassembled,
        fec1_dropped = stats.fec1_dropped,
        unknown_modulation = stats.unknown_modulation,
        "wrote {}",
        args.output.display()
    );

    Ok(())
}

fn open_sources(inputs: &[PathBuf]) -> Result<Vec<CsvRowSource<Box<dyn Read>>>> {
    let stdin = Path::new(STDIN_PATH);
    if inputs.iter().filter(|p| p.as_path() == stdin).count() > 1 {
        bail!("Standard input can only be given once");
    }

    inputs
        .iter()
        .map(|path| {
            let name = path.display().to_string();
            let reader = open_input(path)
                .with_context(|| format!("Failed to open input: {name}"))?;
            CsvRowSource::new(name.clone(), reader)
                .with_context(|| format!("Failed to read header of {name}"))
        })
        .collect()
}

fn open_output(path: &Path) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = if path == Path::new("-") {
        Box::new(io::stdout().lock())
    } else {
        Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?,
        )
    };
    Ok(BufWriter::new(sink))
}
