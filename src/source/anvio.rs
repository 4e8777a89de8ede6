use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::parsing::fasta::sort_fasta_file;
use crate::parsing::jobs::BinJob;
use crate::source::{RecordSource, SourceError};

pub const DEFAULT_ANVIO_PROGRAM: &str = "anvi-get-short-reads-from-bam";
pub const DEFAULT_SEQKIT_PROGRAM: &str = "seqkit";

/// Longest stderr excerpt carried in an error
const MAX_STDERR_CHARS: usize = 2000;

/// How extracted reads are put into header order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Sorter {
    /// `seqkit sort --by-name --line-width 0`
    #[default]
    Seqkit,
    /// Sort in memory, no external tool needed
    Internal,
}

/// Extracts a bin's reads from an Anvi'o profile with
/// `anvi-get-short-reads-from-bam`, then sorts them by header.
#[derive(Debug, Clone)]
pub struct AnvioSource {
    pub anvio_program: String,
    pub seqkit_program: String,
    pub sorter: Sorter,
}

impl Default for AnvioSource {
    fn default() -> Self {
        Self {
            anvio_program: DEFAULT_ANVIO_PROGRAM.to_string(),
            seqkit_program: DEFAULT_SEQKIT_PROGRAM.to_string(),
            sorter: Sorter::default(),
        }
    }
}

impl AnvioSource {
    /// Extraction command for a job, writing unsorted reads to `out`
    #[must_use]
    pub fn extract_command(&self, job: &BinJob, out: &Path) -> Command {
        let mut cmd = Command::new(&self.anvio_program);
        cmd.arg("-p")
            .arg(&job.profile_db)
            .arg("-c")
            .arg(&job.contig_db)
            .arg("-C")
            .arg(&job.collection)
            .arg("-b")
            .arg(&job.bin)
            .arg("-o")
            .arg(out)
            .arg(&job.bam);
        cmd
    }

    /// Sort command reading `input` and writing unwrapped, name-sorted `output`
    #[must_use]
    pub fn sort_command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.seqkit_program);
        cmd.arg("sort")
            .arg("--by-name")
            .arg("--line-width")
            .arg("0")
            .arg("--out-file")
            .arg(output)
            .arg(input);
        cmd
    }

    fn sort(&self, input: &Path, output: &Path) -> Result<(), SourceError> {
        match self.sorter {
            Sorter::Seqkit => run_command(self.sort_command(input, output), output),
            Sorter::Internal => {
                let count = sort_fasta_file(input, output)?;
                debug!("Sorted {count} reads in memory");
                Ok(())
            }
        }
    }
}

impl RecordSource for AnvioSource {
    fn fetch(&self, job: &BinJob, dest: &Path) -> Result<(), SourceError> {
        let unsorted = unsorted_path(dest);

        run_command(self.extract_command(job, &unsorted), &unsorted)?;
        let result = self.sort(&unsorted, dest);

        if let Err(e) = std::fs::remove_file(&unsorted) {
            warn!("Could not remove {}: {e}", unsorted.display());
        }
        result
    }
}

/// `x.tmp.fasta` -> `x.tmp.unsorted.fasta`
fn unsorted_path(dest: &Path) -> PathBuf {
    dest.with_extension("unsorted.fasta")
}

/// Run a command to completion and check that it wrote `expected_output`.
fn run_command(mut cmd: Command, expected_output: &Path) -> Result<(), SourceError> {
    let program = cmd.get_program().to_string_lossy().to_string();
    debug!("Running {cmd:?}");

    let output = cmd.output().map_err(|source| SourceError::Spawn {
        program: program.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let skip = stderr.chars().count().saturating_sub(MAX_STDERR_CHARS);
        return Err(SourceError::Command {
            program,
            status: output.status.to_string(),
            stderr: stderr.chars().skip(skip).collect(),
        });
    }

    if !expected_output.exists() {
        return Err(SourceError::MissingOutput {
            program,
            path: expected_output.to_path_buf(),
        });
    }

    Ok(())
}
