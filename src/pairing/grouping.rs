use std::collections::HashMap;

use crate::core::header::HeaderFormat;
use crate::core::record::{MatePair, Record};
use crate::core::types::ScanStats;
use crate::pairing::ScanError;

/// Basename-keyed pairing that does not depend on mates being adjacent.
///
/// Records are grouped by basename in order of first appearance. Within each
/// group, records pair up two at a time in arrival order; an odd one out is
/// dropped. Holds the whole stream in memory.
#[derive(Debug)]
pub struct Grouper {
    format: HeaderFormat,
    groups: Vec<Vec<Record>>,
    index: HashMap<String, usize>,
    records: u64,
}

impl Grouper {
    #[must_use]
    pub fn new(format: HeaderFormat) -> Self {
        Self {
            format,
            groups: Vec::new(),
            index: HashMap::new(),
            records: 0,
        }
    }

    /// Add a record to its basename's group.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Header` if the header has no valid mate suffix.
    pub fn push(&mut self, record: Record) -> Result<(), ScanError> {
        self.records += 1;
        let basename = self
            .format
            .parse(&record.header)
            .map_err(|source| ScanError::Header {
                record: usize::try_from(self.records).unwrap_or(usize::MAX),
                source,
            })?
            .basename;

        let slot = match self.index.get(basename) {
            Some(&slot) => slot,
            None => {
                self.index.insert(basename.to_string(), self.groups.len());
                self.groups.push(Vec::with_capacity(2));
                self.groups.len() - 1
            }
        };
        self.groups[slot].push(record);
        Ok(())
    }

    /// Pair every group and return the pairs with the counters.
    #[must_use]
    pub fn finish(self) -> (Vec<MatePair>, ScanStats) {
        let mut stats = ScanStats {
            records: self.records,
            ..ScanStats::default()
        };
        let mut pairs = Vec::new();

        for group in self.groups {
            let mut members = group.into_iter();
            loop {
                match (members.next(), members.next()) {
                    (Some(first), Some(second)) => {
                        stats.pairs += 1;
                        pairs.push(MatePair::new(first, second));
                    }
                    (Some(_), None) => stats.singletons += 1,
                    _ => break,
                }
            }
        }

        (pairs, stats)
    }
}
