use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{HeaderArgs, OutputFormat};
use crate::pairing::missing::{find_missing_mates, MissingMate};
use crate::parsing::fasta::open_fasta;

#[derive(Args)]
pub struct MissingArgs {
    /// Two-line FASTA sorted by header (plain or gzipped), or '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub header: HeaderArgs,
}

/// Execute missing subcommand
///
/// # Errors
///
/// Returns an error if the input is malformed or a mate indicator is not 1 or 2.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MissingArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let headers = open_fasta(&args.input)
        .and_then(|reader| {
            reader
                .map(|record| record.map(|r| r.header))
                .collect::<Result<Vec<_>, _>>()
        })
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let missing = find_missing_mates(&headers, &args.header.header_format())
        .with_context(|| format!("Invalid read name in {}", args.input.display()))?;
    info!(
        "{} of {} reads have no mate in {}",
        missing.len(),
        headers.len(),
        args.input.display()
    );

    match format {
        OutputFormat::Text => print_text_missing(&missing)?,
        OutputFormat::Json => print_json_missing(&missing)?,
        OutputFormat::Tsv => print_tsv_missing(&missing)?,
    }

    Ok(())
}

fn print_text_missing(missing: &[MissingMate]) -> anyhow::Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    for m in missing {
        writeln!(out, ">{}", m.name())?;
    }
    out.flush()?;
    Ok(())
}

fn print_json_missing(missing: &[MissingMate]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = missing
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.name(),
                "basename": m.basename,
                "present": m.present.indicator().to_string(),
                "missing": m.missing.indicator().to_string(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_missing(missing: &[MissingMate]) -> anyhow::Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    writeln!(out, "name\tbasename\tpresent\tmissing")?;
    for m in missing {
        writeln!(out, "{}\t{}\t{}\t{}", m.name(), m.basename, m.present, m.missing)?;
    }
    out.flush()?;
    Ok(())
}
