//! Where a bin's reads come from.
//!
//! A [`RecordSource`] turns one job table row into a header-sorted two-line
//! FASTA file on disk. Pairing reads that file; it never sees the tools that
//! produced it.
//!
//! [`AnvioSource`] shells out to `anvi-get-short-reads-from-bam` for
//! extraction and to `seqkit sort` (or an in-process sort) for ordering.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parsing::jobs::BinJob;
use crate::parsing::ParseError;

pub mod anvio;

pub use anvio::{AnvioSource, Sorter};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("'{program}' reported success but did not write {}", .path.display())]
    MissingOutput { program: String, path: PathBuf },

    #[error("Failed to sort extracted reads: {0}")]
    Sort(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces the reads of one bin, sorted by full header
pub trait RecordSource {
    /// Write `job`'s reads to `dest` as header-sorted two-line FASTA.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if extraction or sorting fails. `dest` may
    /// then be missing or incomplete and must not be paired.
    fn fetch(&self, job: &BinJob, dest: &Path) -> Result<(), SourceError>;
}
