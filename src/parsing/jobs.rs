use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::parsing::{excerpt, ParseError};

/// Number of tab-separated columns in a job table row
pub const JOB_TABLE_COLUMNS: usize = 5;

/// One row of a job table: a bin and everything needed to extract its reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinJob {
    /// Zero-based row number among the table's data rows
    pub row: usize,
    /// Bin name within the collection
    pub bin: String,
    /// Collection the bin belongs to
    pub collection: String,
    /// Profile database
    pub profile_db: PathBuf,
    /// Contig database
    pub contig_db: PathBuf,
    /// Alignments of the paired-end reads
    pub bam: PathBuf,
}

/// Parse a job table file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_job_table_file(path: &Path) -> Result<Vec<BinJob>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_job_table_text(&content)
}

/// Parse job table text: bin, collection, profile db, contig db, BAM.
///
/// There is no header row. Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row does not have exactly five
/// non-empty fields, or `ParseError::Empty` if there are no rows.
pub fn parse_job_table_text(text: &str) -> Result<Vec<BinJob>, ParseError> {
    let mut jobs = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        // Split before trimming so empty edge fields still count
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() != JOB_TABLE_COLUMNS {
            return Err(ParseError::InvalidFormat {
                line: line_num,
                reason: format!(
                    "expected {JOB_TABLE_COLUMNS} tab-separated fields, found {} in '{}'",
                    fields.len(),
                    excerpt(trimmed)
                ),
            });
        }

        if let Some(col) = fields.iter().position(|f| f.is_empty()) {
            return Err(ParseError::InvalidFormat {
                line: line_num,
                reason: format!("field {} is empty", col + 1),
            });
        }

        jobs.push(BinJob {
            row: jobs.len(),
            bin: fields[0].to_string(),
            collection: fields[1].to_string(),
            profile_db: PathBuf::from(fields[2]),
            contig_db: PathBuf::from(fields[3]),
            bam: PathBuf::from(fields[4]),
        });
    }

    if jobs.is_empty() {
        return Err(ParseError::Empty("job table rows"));
    }

    Ok(jobs)
}
