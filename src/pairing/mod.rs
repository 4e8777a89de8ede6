//! Mate pairing over header-sorted read streams.
//!
//! - [`PairingScanner`]: single forward pass with one record of lookback
//! - [`Grouper`]: basename-keyed grouping for streams where mates may not be adjacent
//! - [`find_missing_mates`]: which mate of each unpaired fragment never showed up
//!
//! ## Pairing
//!
//! Reads extracted for a bin include reads whose mate mapped elsewhere (or not
//! at all). After sorting by header, the two mates of a fragment sit next to
//! each other, so a record either matches the basename of the record before
//! it, or the record before it had no partner and is dropped:
//!
//! | Lookback | Incoming basename | Action |
//! |----------|-------------------|--------|
//! | empty | any | hold incoming |
//! | held | same | emit (held, incoming), clear lookback |
//! | held | different | drop held, hold incoming |
//!
//! A record still held at the end of the stream is dropped. Fragments seen
//! three or more times are paired two at a time in arrival order.
//!
//! ## Example
//!
//! ```rust
//! use bin_reads::core::record::Record;
//! use bin_reads::pairing::{pair_records, PairingConfig};
//!
//! let records = vec![
//!     Record::new("r1.1", "ACGT"),
//!     Record::new("r1.2", "TGCA"),
//!     Record::new("r2.1", "CCCC"),
//! ];
//!
//! let (pairs, stats) = pair_records(records, &PairingConfig::default()).unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert_eq!(stats.singletons, 1);
//! ```
//!
//! [`PairingScanner`]: scanner::PairingScanner
//! [`Grouper`]: grouping::Grouper
//! [`find_missing_mates`]: missing::find_missing_mates

use std::convert::Infallible;

use thiserror::Error;

use crate::core::header::{HeaderError, HeaderFormat};
use crate::core::record::{MatePair, Record};
use crate::core::types::{PairingStrategy, ScanStats};
use crate::parsing::ParseError;

pub mod grouping;
pub mod missing;
pub mod scanner;

use grouping::Grouper;
use scanner::PairingScanner;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Record {record}: {source}")]
    Header {
        record: usize,
        #[source]
        source: HeaderError,
    },

    #[error("Record {record}: input is not sorted by header ('{current}' follows '{previous}')")]
    Unsorted {
        record: usize,
        previous: String,
        current: String,
    },

    #[error("Failed to write pair: {0}")]
    Output(#[source] std::io::Error),
}

impl From<Infallible> for ScanError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Configuration for pairing one record stream
#[derive(Debug, Clone)]
pub struct PairingConfig {
    /// Adjacent scan or basename grouping
    pub strategy: PairingStrategy,
    /// How read names are found within headers
    pub header_format: HeaderFormat,
    /// Reject input whose headers are not in ascending order.
    /// Only consulted by the adjacent strategy.
    pub check_order: bool,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self::new(PairingStrategy::default(), HeaderFormat::default())
    }
}

impl PairingConfig {
    #[must_use]
    pub fn new(strategy: PairingStrategy, header_format: HeaderFormat) -> Self {
        Self {
            strategy,
            header_format,
            check_order: true,
        }
    }
}

/// Pair a record stream, handing each complete pair to `emit` as soon as the
/// strategy allows.
///
/// With [`PairingStrategy::Adjacent`] pairs are emitted while reading; with
/// [`PairingStrategy::Grouped`] they are emitted after the whole stream has
/// been read. A pair is passed to `emit` whole or not at all.
///
/// # Errors
///
/// Returns the first `ScanError` from the input, header parsing, the order
/// check, or `emit`. Pairs emitted before the error have already been passed on.
pub fn scan<I, E, F>(
    records: I,
    config: &PairingConfig,
    mut emit: F,
) -> Result<ScanStats, ScanError>
where
    I: IntoIterator<Item = Result<Record, E>>,
    ScanError: From<E>,
    F: FnMut(MatePair) -> std::io::Result<()>,
{
    match config.strategy {
        PairingStrategy::Adjacent => {
            let mut scanner = PairingScanner::new(config.header_format, config.check_order);
            for record in records {
                if let Some(pair) = scanner.push(record?)? {
                    emit(pair).map_err(ScanError::Output)?;
                }
            }
            Ok(scanner.finish())
        }
        PairingStrategy::Grouped => {
            let mut grouper = Grouper::new(config.header_format);
            for record in records {
                grouper.push(record?)?;
            }
            let (pairs, stats) = grouper.finish();
            for pair in pairs {
                emit(pair).map_err(ScanError::Output)?;
            }
            Ok(stats)
        }
    }
}

/// Pair in-memory records and collect the result.
///
/// # Errors
///
/// Returns a `ScanError` for malformed headers or unsorted input.
pub fn pair_records<I>(
    records: I,
    config: &PairingConfig,
) -> Result<(Vec<MatePair>, ScanStats), ScanError>
where
    I: IntoIterator<Item = Record>,
{
    let mut pairs = Vec::new();
    let stats = scan(
        records.into_iter().map(Ok::<_, Infallible>),
        config,
        |pair| {
            pairs.push(pair);
            Ok(())
        },
    )?;
    Ok((pairs, stats))
}
