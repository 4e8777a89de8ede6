use tracing::trace;

use crate::core::header::HeaderFormat;
use crate::core::record::{MatePair, Record};
use crate::core::types::ScanStats;
use crate::pairing::ScanError;

/// A record waiting for its mate. The basename is a prefix of the header,
/// kept as a byte length to avoid copying it.
#[derive(Debug)]
struct Held {
    record: Record,
    basename_len: usize,
}

impl Held {
    fn basename(&self) -> &str {
        &self.record.header[..self.basename_len]
    }
}

#[derive(Debug, Default)]
enum ScanState {
    /// Nothing held: the next record opens a potential pair
    #[default]
    Empty,
    /// One record held, unpaired so far
    Holding(Held),
}

/// Streaming mate pairing over a header-sorted record stream.
///
/// Feed records in order with [`push`](Self::push); each call returns the
/// completed pair, if the record closed one. Call [`finish`](Self::finish)
/// after the last record to account for a trailing unpaired record.
///
/// Memory use is one held record regardless of stream length.
#[derive(Debug)]
pub struct PairingScanner {
    format: HeaderFormat,
    check_order: bool,
    state: ScanState,
    last_header: String,
    stats: ScanStats,
}

impl PairingScanner {
    #[must_use]
    pub fn new(format: HeaderFormat, check_order: bool) -> Self {
        Self {
            format,
            check_order,
            state: ScanState::Empty,
            last_header: String::new(),
            stats: ScanStats::default(),
        }
    }

    /// Consume the next record.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Header` if the record's header has no valid mate
    /// suffix, or `ScanError::Unsorted` if order checking is enabled and the
    /// header sorts before the previous one. Records are numbered from 1.
    pub fn push(&mut self, record: Record) -> Result<Option<MatePair>, ScanError> {
        let index = self.record_index();

        let basename_len = self
            .format
            .parse(&record.header)
            .map_err(|source| ScanError::Header {
                record: index,
                source,
            })?
            .basename
            .len();

        if self.check_order {
            if index > 1 && record.header < self.last_header {
                return Err(ScanError::Unsorted {
                    record: index,
                    previous: self.last_header.clone(),
                    current: record.header,
                });
            }
            self.last_header.clear();
            self.last_header.push_str(&record.header);
        }

        self.stats.records += 1;
        let incoming = Held {
            record,
            basename_len,
        };

        match std::mem::take(&mut self.state) {
            ScanState::Empty => {
                self.state = ScanState::Holding(incoming);
                Ok(None)
            }
            ScanState::Holding(held) if held.basename() == incoming.basename() => {
                self.stats.pairs += 1;
                Ok(Some(MatePair::new(held.record, incoming.record)))
            }
            ScanState::Holding(held) => {
                trace!("Dropping unpaired read {}", held.record.header);
                self.stats.singletons += 1;
                self.state = ScanState::Holding(incoming);
                Ok(None)
            }
        }
    }

    /// End the stream, dropping any record still waiting for a mate, and
    /// return the counters.
    pub fn finish(&mut self) -> ScanStats {
        if let ScanState::Holding(held) = std::mem::take(&mut self.state) {
            trace!("Dropping unpaired read {}", held.record.header);
            self.stats.singletons += 1;
        }
        self.stats
    }

    /// Counters so far
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Whether a record is waiting for its mate
    #[must_use]
    pub fn is_holding(&self) -> bool {
        matches!(self.state, ScanState::Holding(_))
    }

    fn record_index(&self) -> usize {
        usize::try_from(self.stats.records).unwrap_or(usize::MAX) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> PairingScanner {
        PairingScanner::new(HeaderFormat::default(), true)
    }

    #[test]
    fn test_pair_flushes_on_second_mate() {
        let mut scanner = scanner();
        assert!(scanner.push(Record::new("r1.1", "ACGT")).unwrap().is_none());
        assert!(scanner.is_holding());

        let pair = scanner.push(Record::new("r1.2", "TGCA")).unwrap().unwrap();
        assert_eq!(pair.first, Record::new("r1.1", "ACGT"));
        assert_eq!(pair.second, Record::new("r1.2", "TGCA"));
        assert!(!scanner.is_holding());

        let stats = scanner.finish();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.pairs, 1);
        assert_eq!(stats.singletons, 0);
    }

    #[test]
    fn test_mate_order_is_preserved() {
        // '/' sorts before '_', so mate 2 arrives first and stays first
        let mut scanner = scanner();
        scanner.push(Record::new("frag/2", "GG")).unwrap();
        let pair = scanner.push(Record::new("frag_1", "CC")).unwrap().unwrap();
        assert_eq!(pair.first.header, "frag/2");
        assert_eq!(pair.second.header, "frag_1");
    }

    #[test]
    fn test_new_pair_starts_after_flush() {
        // A third read of the same fragment must not pair with the first
        let mut scanner = scanner();
        scanner.push(Record::new("r1.1", "A")).unwrap();
        assert!(scanner.push(Record::new("r1.2", "C")).unwrap().is_some());
        assert!(scanner.push(Record::new("r1.3", "G")).unwrap().is_none());
        let pair = scanner.push(Record::new("r1.4", "T")).unwrap().unwrap();
        assert_eq!(pair.first.header, "r1.3");
        assert_eq!(pair.second.header, "r1.4");
        assert_eq!(scanner.finish().singletons, 0);
    }

    #[test]
    fn test_odd_repeat_leaves_singleton() {
        let mut scanner = scanner();
        scanner.push(Record::new("r1.1", "A")).unwrap();
        scanner.push(Record::new("r1.2", "C")).unwrap();
        scanner.push(Record::new("r1.3", "G")).unwrap();
        let stats = scanner.finish();
        assert_eq!(stats.pairs, 1);
        assert_eq!(stats.singletons, 1);
    }

    #[test]
    fn test_singleton_replaced_by_next_record() {
        let mut scanner = scanner();
        scanner.push(Record::new("a.1", "A")).unwrap();
        assert!(scanner.push(Record::new("b.1", "C")).unwrap().is_none());
        let pair = scanner.push(Record::new("b.2", "G")).unwrap().unwrap();
        assert_eq!(pair.first.header, "b.1");
        assert_eq!(scanner.stats().singletons, 1);
    }

    #[test]
    fn test_duplicate_headers_are_in_order() {
        let mut scanner = scanner();
        scanner.push(Record::new("r1.1", "A")).unwrap();
        assert!(scanner.push(Record::new("r1.1", "A")).unwrap().is_some());
    }

    #[test]
    fn test_order_check_spans_flushed_pairs() {
        let mut scanner = scanner();
        scanner.push(Record::new("b.1", "A")).unwrap();
        scanner.push(Record::new("b.2", "C")).unwrap();
        let err = scanner.push(Record::new("a.1", "G")).unwrap_err();
        assert!(matches!(err, ScanError::Unsorted { record: 3, .. }));
    }
}
