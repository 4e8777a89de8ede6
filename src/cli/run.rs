use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{HeaderArgs, OutputFormat};
use crate::core::types::{PairingStrategy, ScanStats};
use crate::pairing::PairingConfig;
use crate::parsing::jobs::parse_job_table_file;
use crate::recovery::{recover_bins, FastaSink, RecoveryOptions, RowReport};
use crate::source::anvio::{DEFAULT_ANVIO_PROGRAM, DEFAULT_SEQKIT_PROGRAM};
use crate::source::{AnvioSource, Sorter};

#[derive(Args)]
pub struct RunArgs {
    /// Job table (TSV, no header): bin, collection, profile db, contig db, BAM
    #[arg(short, long)]
    pub table: PathBuf,

    /// FASTA file the recovered pairs are appended to
    #[arg(short, long)]
    pub out: PathBuf,

    /// Directory for intermediate files. Intermediates are kept when given,
    /// otherwise a temporary directory next to the output is used and removed
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// How extracted reads are sorted by name
    #[arg(long, value_enum, default_value = "seqkit")]
    pub sorter: Sorter,

    /// How mates are paired
    #[arg(long, value_enum, default_value = "adjacent")]
    pub strategy: PairingStrategy,

    #[command(flatten)]
    pub header: HeaderArgs,

    /// Stop at the first bin that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Truncate the output file instead of appending to it
    #[arg(long)]
    pub overwrite: bool,

    /// Read extraction program
    #[arg(long, default_value = DEFAULT_ANVIO_PROGRAM)]
    pub anvio_program: String,

    /// seqkit executable, used with --sorter seqkit
    #[arg(long, default_value = DEFAULT_SEQKIT_PROGRAM)]
    pub seqkit_program: String,
}

/// Execute run subcommand
///
/// # Errors
///
/// Returns an error if the job table or output cannot be opened, or if any
/// bin failed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let jobs = parse_job_table_file(&args.table)
        .with_context(|| format!("Failed to read job table {}", args.table.display()))?;
    info!("Loaded {} bins from {}", jobs.len(), args.table.display());

    let out_dir = parent_dir(&args.out);
    let prefix = args
        .out
        .file_stem()
        .map_or_else(|| "reads".to_string(), |s| s.to_string_lossy().to_string());

    // Held until the end of the run; dropping it removes the directory
    let mut temp_dir = None;
    let (work_dir, keep_intermediates) = if let Some(dir) = &args.work_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create work directory {}", dir.display()))?;
        (dir.clone(), true)
    } else {
        let dir = tempfile::Builder::new()
            .prefix(".bin-reads-")
            .tempdir_in(&out_dir)
            .with_context(|| {
                format!("Failed to create temporary directory in {}", out_dir.display())
            })?;
        let path = dir.path().to_path_buf();
        temp_dir = Some(dir);
        (path, false)
    };

    if verbose {
        eprintln!("Intermediate files in {}", work_dir.display());
    }

    let mut sink = if args.overwrite {
        FastaSink::create(&args.out)
    } else {
        FastaSink::append(&args.out)
    }
    .with_context(|| format!("Failed to open output {}", args.out.display()))?;

    let source = AnvioSource {
        anvio_program: args.anvio_program.clone(),
        seqkit_program: args.seqkit_program.clone(),
        sorter: args.sorter,
    };
    let options = RecoveryOptions {
        pairing: PairingConfig::new(args.strategy, args.header.header_format()),
        work_dir,
        prefix,
        keep_intermediates,
        fail_fast: args.fail_fast,
    };

    let reports = recover_bins(&jobs, &source, &options, &mut sink);
    drop(temp_dir);

    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    let skipped = jobs.len() - reports.len();

    match format {
        OutputFormat::Text => print_text_summary(&args.out, &reports, skipped),
        OutputFormat::Json => print_json_summary(&args.out, &reports, skipped)?,
        OutputFormat::Tsv => print_tsv_summary(&reports),
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} bins failed", jobs.len());
    }
    Ok(())
}

pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn totals(reports: &[RowReport]) -> ScanStats {
    let mut total = ScanStats::default();
    for report in reports {
        total.merge(&report.stats);
    }
    total
}

fn print_text_summary(out: &Path, reports: &[RowReport], skipped: usize) {
    println!("Recovery Summary");
    println!("{}", "=".repeat(60));

    for report in reports {
        match &report.error {
            None => println!(
                "  [{}] {}: {} pairs kept ({} reads, {} singletons dropped)",
                report.row,
                report.bin,
                report.stats.pairs,
                report.stats.records,
                report.stats.singletons
            ),
            Some(error) => println!("  [{}] {}: FAILED - {error}", report.row, report.bin),
        }
    }

    if skipped > 0 {
        println!("  {skipped} bins not attempted after the first failure");
    }

    let total = totals(reports);
    println!("\nOutput: {}", out.display());
    println!("  Pairs written: {}", total.pairs);
    println!("  Reads written: {}", total.records_out());
    println!("  Singletons dropped: {}", total.singletons);
}

fn print_json_summary(out: &Path, reports: &[RowReport], skipped: usize) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "output": out.display().to_string(),
        "bins": reports,
        "skipped": skipped,
        "total": totals(reports),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(reports: &[RowReport]) {
    println!("row\tbin\tstatus\trecords\tpairs\tsingletons\terror");
    for report in reports {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            report.row,
            report.bin,
            if report.succeeded() { "ok" } else { "failed" },
            report.stats.records,
            report.stats.pairs,
            report.stats.singletons,
            report.error.as_deref().unwrap_or(""),
        );
    }
}
