use serde::{Deserialize, Serialize};

/// Which read of a paired-end fragment a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mate {
    /// First read, indicator `1`
    One,
    /// Second read, indicator `2`
    Two,
}

impl Mate {
    /// Parse a mate indicator character. Only `1` and `2` are recognized.
    #[must_use]
    pub fn from_indicator(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::One),
            '2' => Some(Self::Two),
            _ => None,
        }
    }

    #[must_use]
    pub fn indicator(self) -> char {
        match self {
            Self::One => '1',
            Self::Two => '2',
        }
    }

    /// The other read of the same fragment
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl std::fmt::Display for Mate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.indicator())
    }
}

/// How mates are brought together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Single forward pass comparing each record with the one before it.
    /// Constant memory; relies on mates being adjacent after sorting.
    #[default]
    Adjacent,
    /// Group records by basename before pairing.
    /// Linear memory; tolerates other reads sorting between two mates.
    Grouped,
}

impl std::fmt::Display for PairingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::Grouped => write!(f, "grouped"),
        }
    }
}

/// Counters collected while pairing one record stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Records consumed from the input
    pub records: u64,
    /// Complete pairs emitted
    pub pairs: u64,
    /// Records dropped because no mate was found next to them
    pub singletons: u64,
}

impl ScanStats {
    /// Records written to the output (two per pair)
    #[must_use]
    pub fn records_out(&self) -> u64 {
        self.pairs * 2
    }

    /// Fold another stream's counters into this one
    pub fn merge(&mut self, other: &ScanStats) {
        self.records += other.records;
        self.pairs += other.pairs;
        self.singletons += other.singletons;
    }
}
