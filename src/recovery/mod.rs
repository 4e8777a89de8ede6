//! Recovery of paired reads for a table of bins.
//!
//! For every job table row:
//!
//! 1. the [`RecordSource`] writes the bin's reads, sorted by header, to an
//!    intermediate file in the work directory;
//! 2. the file is paired with [`pairing::scan`](crate::pairing::scan);
//! 3. pairs are staged and appended to the shared [`FastaSink`] only once the
//!    whole row has succeeded.
//!
//! A failed row is reported and leaves the sink as it was.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::types::ScanStats;
use crate::pairing::{scan, PairingConfig, ScanError};
use crate::parsing::fasta::open_fasta;
use crate::parsing::jobs::BinJob;
use crate::source::{RecordSource, SourceError};
use crate::utils::validation::{
    sanitize_file_component, truncate_on_char_boundary, ValidationError, MAX_FILENAME_LENGTH,
};

pub mod sink;

pub use sink::{FastaSink, RowWriter};

#[derive(Error, Debug)]
pub enum RowError {
    #[error("Invalid bin name: {0}")]
    BinName(#[from] ValidationError),

    #[error("Read extraction failed: {0}")]
    Source(#[from] SourceError),

    #[error("Pairing failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Settings shared by every row of a run
#[derive(Debug, Clone)]
pub struct RecoveryOptions {
    pub pairing: PairingConfig,
    /// Directory for intermediate files
    pub work_dir: PathBuf,
    /// Prefix for intermediate file names, usually the output file stem
    pub prefix: String,
    /// Keep each bin's sorted reads after pairing
    pub keep_intermediates: bool,
    /// Stop at the first failed row
    pub fail_fast: bool,
}

/// Outcome of one job table row
#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub bin: String,
    pub stats: ScanStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Bytes of a generated name left for suffixes a record source derives
/// from it, such as `.unsorted`
const DERIVED_NAME_ROOM: usize = 16;

const INTERMEDIATE_SUFFIX: &str = ".tmp.fasta";

/// Intermediate file holding a job's sorted reads:
/// `<prefix>.bin<row>.<bin>.tmp.fasta`
///
/// The prefix and then the bin name are shortened as needed to keep the
/// file name, and names derived from it, within [`MAX_FILENAME_LENGTH`].
///
/// # Errors
///
/// Returns a `ValidationError` if the bin name cannot be used in a file name.
pub fn intermediate_path(
    work_dir: &Path,
    prefix: &str,
    job: &BinJob,
) -> Result<PathBuf, ValidationError> {
    let room = MAX_FILENAME_LENGTH - DERIVED_NAME_ROOM - INTERMEDIATE_SUFFIX.len();
    let prefix = truncate_on_char_boundary(prefix, room / 2);
    let head = format!("{prefix}.bin{}.", job.row);
    let bin = sanitize_file_component(&job.bin, room - head.len())?;
    Ok(work_dir.join(format!("{head}{bin}{INTERMEDIATE_SUFFIX}")))
}

/// Recover one bin's pairs into `sink`.
///
/// # Errors
///
/// Returns a `RowError` if extraction, pairing or writing fails. Nothing
/// reaches the sink in that case.
pub fn process_job(
    source: &dyn RecordSource,
    job: &BinJob,
    options: &RecoveryOptions,
    sink: &mut FastaSink,
) -> Result<ScanStats, RowError> {
    let reads = intermediate_path(&options.work_dir, &options.prefix, job)?;
    source.fetch(job, &reads)?;

    let result = pair_file(&reads, options, sink);

    if !options.keep_intermediates {
        if let Err(e) = std::fs::remove_file(&reads) {
            warn!("Could not remove {}: {e}", reads.display());
        }
    }
    result
}

fn pair_file(
    reads: &Path,
    options: &RecoveryOptions,
    sink: &mut FastaSink,
) -> Result<ScanStats, RowError> {
    let mut staged = RowWriter::new_in(&options.work_dir)?;
    let reader = open_fasta(reads).map_err(ScanError::from)?;
    let stats = scan(reader, &options.pairing, |pair| staged.write_pair(&pair))?;
    staged.commit(sink)?;
    Ok(stats)
}

/// Process every job in order, appending each successful bin to `sink`.
///
/// Failed rows are logged and reported; later rows still run unless
/// `fail_fast` is set.
pub fn recover_bins(
    jobs: &[BinJob],
    source: &dyn RecordSource,
    options: &RecoveryOptions,
    sink: &mut FastaSink,
) -> Vec<RowReport> {
    let mut reports = Vec::with_capacity(jobs.len());

    for job in jobs {
        info!("Recovering reads for bin '{}' (row {})", job.bin, job.row);

        let report = match process_job(source, job, options, sink) {
            Ok(stats) => {
                info!(
                    "Bin '{}': {} reads in, {} pairs kept, {} singletons dropped",
                    job.bin, stats.records, stats.pairs, stats.singletons
                );
                RowReport {
                    row: job.row,
                    bin: job.bin.clone(),
                    stats,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Bin '{}' (row {}) failed: {e}", job.bin, job.row);
                RowReport {
                    row: job.row,
                    bin: job.bin.clone(),
                    stats: ScanStats::default(),
                    error: Some(e.to_string()),
                }
            }
        };

        let failed = !report.succeeded();
        reports.push(report);
        if failed && options.fail_fast {
            break;
        }
    }

    reports
}
