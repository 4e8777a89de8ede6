//! Command-line interface for bin-reads.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Recover paired reads for every bin in a job table
//! - **pair**: Keep only complete pairs from one header-sorted FASTA
//! - **missing**: List the mates absent from a header-sorted FASTA
//!
//! ## Usage
//!
//! ```text
//! # Recover reads for the bins in a table into one FASTA
//! bin-reads run --table bins.tsv --out bins.fasta
//!
//! # Pair an already extracted and sorted file
//! bin-reads pair bin1.sorted.fasta -o bin1.paired.fasta
//!
//! # Sort in memory first, read from a pipe
//! zcat reads.fasta.gz | bin-reads pair - --sort > paired.fasta
//!
//! # Which mates would need to be fetched again
//! bin-reads missing bin1.sorted.fasta --separator /
//! ```

use clap::{Parser, Subcommand};

use crate::core::header::{ContigTag, HeaderFormat};
use crate::utils::validation::validate_delimiter;

pub mod missing;
pub mod pair;
pub mod run;

#[derive(Parser)]
#[command(name = "bin-reads")]
#[command(version)]
#[command(about = "Recover complete read pairs for genome bins")]
#[command(
    long_about = "bin-reads recovers the paired-end reads that mapped to genome bins.\n\nReads are extracted per bin with anvi-get-short-reads-from-bam and sorted by name. Reads whose mate is absent from the bin are dropped, so the output only holds complete pairs, with reads from all bins appended to one FASTA file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recover paired reads for every bin in a job table
    Run(run::RunArgs),

    /// Keep only complete pairs from a header-sorted FASTA file
    Pair(pair::PairArgs),

    /// List mates missing from a header-sorted FASTA file
    Missing(missing::MissingArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// How read names are laid out in headers
#[derive(clap::Args, Debug, Clone)]
pub struct HeaderArgs {
    /// Character expected between the basename and the mate indicator
    /// (any character is accepted when omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub separator: Option<char>,

    /// Character that starts a trailing contig tag, ignored when pairing
    /// and written back unchanged
    #[arg(long, value_parser = parse_delimiter)]
    pub tag_delimiter: Option<char>,
}

impl HeaderArgs {
    #[must_use]
    pub fn header_format(&self) -> HeaderFormat {
        HeaderFormat {
            separator: self.separator,
            contig_tag: self.tag_delimiter.map(ContigTag::new),
        }
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => validate_delimiter(c).map_err(|e| e.to_string()),
        _ => Err(format!("expected a single character, got '{s}'")),
    }
}
