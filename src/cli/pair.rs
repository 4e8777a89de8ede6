use std::convert::Infallible;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::run::parent_dir;
use crate::cli::{HeaderArgs, OutputFormat};
use crate::core::record::{MatePair, Record};
use crate::core::types::{PairingStrategy, ScanStats};
use crate::pairing::{scan, PairingConfig};
use crate::parsing::fasta::{open_fasta, sort_records};
use crate::recovery::{FastaSink, RowWriter};

#[derive(Args)]
pub struct PairArgs {
    /// Two-line FASTA sorted by header (plain or gzipped), or '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output FASTA (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of replacing it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Sort the input by header in memory before pairing
    #[arg(long)]
    pub sort: bool,

    /// How mates are paired
    #[arg(long, value_enum, default_value = "adjacent")]
    pub strategy: PairingStrategy,

    #[command(flatten)]
    pub header: HeaderArgs,

    /// Do not verify that headers are in ascending order
    #[arg(long)]
    pub no_check_order: bool,
}

/// Where `pair` sends its records. File output is staged and only reaches
/// the file once the whole input has paired, so a failed run leaves the file
/// as it was.
enum PairOutput {
    Staged { rows: RowWriter, path: PathBuf },
    Stdout(FastaSink),
}

impl PairOutput {
    fn write_pair(&mut self, pair: &MatePair) -> std::io::Result<()> {
        match self {
            Self::Staged { rows, .. } => rows.write_pair(pair),
            Self::Stdout(sink) => sink.write_pair(pair),
        }
    }
}

/// Execute pair subcommand
///
/// # Errors
///
/// Returns an error if the input is malformed or unsorted, or the output
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PairArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = PairingConfig {
        strategy: args.strategy,
        header_format: args.header.header_format(),
        check_order: !args.no_check_order,
    };

    let reader = open_fasta(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let mut output = match &args.output {
        Some(path) => PairOutput::Staged {
            rows: RowWriter::new_in(&parent_dir(path))
                .with_context(|| format!("Failed to stage output for {}", path.display()))?,
            path: path.clone(),
        },
        None => PairOutput::Stdout(FastaSink::stdout()),
    };
    let mut emit = |pair: MatePair| output.write_pair(&pair);

    let result = if args.sort {
        let mut records = reader
            .collect::<Result<Vec<Record>, _>>()
            .with_context(|| format!("Failed to read {}", args.input.display()))?;
        sort_records(&mut records);
        if verbose {
            eprintln!("Sorted {} records", records.len());
        }
        scan(records.into_iter().map(Ok::<_, Infallible>), &config, &mut emit)
    } else {
        scan(reader, &config, &mut emit)
    };
    let stats = result.with_context(|| format!("Failed to pair {}", args.input.display()))?;

    match output {
        PairOutput::Staged { rows, path } => {
            let mut sink = if args.append {
                FastaSink::append(&path)
            } else {
                FastaSink::create(&path)
            }
            .with_context(|| format!("Failed to open output {}", path.display()))?;
            rows.commit(&mut sink)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        PairOutput::Stdout(mut sink) => sink.flush().context("Failed to write output")?,
    }

    // Records may be on stdout, so the summary goes to stderr
    match format {
        OutputFormat::Text => eprintln!(
            "Read {} records: kept {} pairs, dropped {} singletons",
            stats.records, stats.pairs, stats.singletons
        ),
        OutputFormat::Json => eprintln!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => print_tsv_stats(&stats),
    }

    Ok(())
}

fn print_tsv_stats(stats: &ScanStats) {
    eprintln!("records\tpairs\tsingletons");
    eprintln!("{}\t{}\t{}", stats.records, stats.pairs, stats.singletons);
}
