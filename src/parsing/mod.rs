//! Parsers for the text inputs of a recovery run.
//!
//! - **Two-line FASTA**: `>` header line followed by exactly one sequence line,
//!   as produced by read extraction followed by a non-wrapping sort
//! - **Job tables**: tab-separated rows naming a bin and where to find its reads
//!
//! ## Example
//!
//! ```rust,no_run
//! use bin_reads::parsing::fasta::open_fasta;
//! use std::path::Path;
//!
//! let reader = open_fasta(Path::new("bin1.sorted.fasta")).unwrap();
//! for record in reader {
//!     let record = record.unwrap();
//!     println!("{}\t{}", record.header, record.sequence.len());
//! }
//! ```

use thiserror::Error;

pub mod fasta;
pub mod jobs;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format on line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },

    #[error("No {0} found in input")]
    Empty(&'static str),
}

/// Shorten a line for inclusion in an error message
pub(crate) fn excerpt(line: &str) -> String {
    const MAX_CHARS: usize = 40;
    if line.chars().count() <= MAX_CHARS {
        line.to_string()
    } else {
        let head: String = line.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}
