//! Core data types for paired-end read recovery.
//!
//! - [`Record`]: a single read, header plus one-line sequence
//! - [`MatePair`]: the two reads of one fragment
//! - [`ReadName`]: a header parsed into basename, separator and mate indicator
//! - [`ContigTag`]: the trailing contig-database tag carried by extracted reads
//! - [`Mate`], [`PairingStrategy`], [`ScanStats`]: pairing metadata
//!
//! ## Read names
//!
//! | Header | Basename | Separator | Mate |
//! |--------|----------|-----------|------|
//! | `r1.1` | `r1` | `.` | `1` |
//! | `SRR390728.5/2` | `SRR390728.5` | `/` | `2` |
//! | `r1.1\|bin_contigs` | `r1` | `.` | `1` (tag `\|bin_contigs` ignored) |
//!
//! [`Record`]: record::Record
//! [`MatePair`]: record::MatePair
//! [`ReadName`]: header::ReadName
//! [`ContigTag`]: header::ContigTag
//! [`Mate`]: types::Mate
//! [`PairingStrategy`]: types::PairingStrategy
//! [`ScanStats`]: types::ScanStats

pub mod header;
pub mod record;
pub mod types;
