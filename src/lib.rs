//! # bin-reads
//!
//! A library for recovering the paired-end reads behind metagenomic bins.
//!
//! Reads extracted for a bin from an alignment include reads whose mate mapped
//! to a different bin, or did not map at all. Downstream assemblers and
//! mappers expect complete pairs, so those singletons have to go.
//!
//! `bin-reads` sorts each bin's reads by name and keeps only the reads whose
//! mate sits right next to them, in a single pass with constant memory.
//!
//! ## Features
//!
//! - **Streaming pairing**: One record of lookback, no matter how large the bin
//! - **Strict input**: Wrapped or misaligned FASTA is an error, never a silent shift
//! - **Grouped fallback**: Basename grouping when mates may not be adjacent
//! - **Missing mates**: Lists which mate of each singleton is absent
//! - **Per-bin rollback**: A failed bin never leaves partial output behind
//!
//! ## Example
//!
//! ```rust
//! use bin_reads::{pair_records, PairingConfig, Record};
//!
//! let records = vec![
//!     Record::new("r1.1", "ACGT"),
//!     Record::new("r1.2", "TGCA"),
//!     Record::new("r2.1", "GGGG"),
//! ];
//!
//! let (pairs, stats) = pair_records(records, &PairingConfig::default()).unwrap();
//!
//! assert_eq!(pairs.len(), 1);
//! assert_eq!(pairs[0].second.header, "r1.2");
//! assert_eq!(stats.singletons, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, read names and pairing metadata
//! - [`pairing`]: Pairing scan, grouping and missing-mate detection
//! - [`parsing`]: Two-line FASTA and job table parsers
//! - [`source`]: Read extraction for a bin
//! - [`recovery`]: Per-bin orchestration and output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod pairing;
pub mod parsing;
pub mod recovery;
pub mod source;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::header::{ContigTag, HeaderFormat, ReadName};
pub use core::record::{MatePair, Record};
pub use core::types::*;
pub use pairing::missing::{find_missing_mates, MissingMate};
pub use pairing::scanner::PairingScanner;
pub use pairing::{pair_records, scan, PairingConfig, ScanError};
