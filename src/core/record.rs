use serde::{Deserialize, Serialize};

/// One sequencing read: its header (without the `>` marker) and its bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub header: String,
    pub sequence: String,
}

impl Record {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

/// Two records of the same fragment, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatePair {
    pub first: Record,
    pub second: Record,
}

impl MatePair {
    #[must_use]
    pub fn new(first: Record, second: Record) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub fn into_records(self) -> [Record; 2] {
        [self.first, self.second]
    }
}
