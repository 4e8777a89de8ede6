//! Reader and writer for two-line FASTA.
//!
//! Every record is exactly two lines: a header starting with `>` and a single
//! sequence line. Wrapped sequences are rejected rather than joined, because a
//! stray line would otherwise shift every following header onto a sequence.
//!
//! Supported inputs:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.gz`, `.bgz` (gzip or bgzip compressed)
//! - `-` for standard input

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::core::record::Record;
use crate::parsing::{excerpt, ParseError};

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a two-line FASTA file, decompressing if needed. `-` reads stdin.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_fasta(path: &Path) -> Result<FastaReader<Box<dyn BufRead>>, ParseError> {
    let inner: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(std::fs::File::open(path)?))
    };
    Ok(FastaReader::new(inner))
}

/// Streaming reader over two-line FASTA records.
///
/// Iteration stops after the first error.
pub struct FastaReader<R> {
    inner: R,
    buf: String,
    line: usize,
    failed: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next record, or `None` at end of input.
    ///
    /// Blank lines are skipped where a header is expected.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if a sequence line appears where a
    /// header was expected, a header appears where a sequence was expected, or
    /// the input ends after a header.
    pub fn read_record(&mut self) -> Result<Option<Record>, ParseError> {
        let header = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.is_empty() => {}
                Some(line) => break line,
            }
        };

        let Some(header) = header.strip_prefix('>') else {
            return Err(ParseError::InvalidFormat {
                line: self.line,
                reason: format!(
                    "expected a header starting with '>', found '{}'",
                    excerpt(&header)
                ),
            });
        };
        let header = header.to_string();

        let Some(sequence) = self.next_line()? else {
            return Err(ParseError::InvalidFormat {
                line: self.line + 1,
                reason: format!("header '>{}' has no sequence line", excerpt(&header)),
            });
        };

        if sequence.starts_with('>') {
            return Err(ParseError::InvalidFormat {
                line: self.line,
                reason: format!(
                    "expected the sequence of '>{}', found header '{}'",
                    excerpt(&header),
                    excerpt(&sequence)
                ),
            });
        }

        Ok(Some(Record { header, sequence }))
    }

    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        self.buf.clear();
        let read = match self.inner.read_line(&mut self.buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ParseError::InvalidFormat {
                    line: self.line + 1,
                    reason: "invalid UTF-8".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some(
            self.buf
                .trim_end_matches(|c| c == '\n' || c == '\r')
                .to_string(),
        ))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Write one record as two lines
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_record<W: Write>(writer: &mut W, record: &Record) -> io::Result<()> {
    writeln!(writer, ">{}", record.header)?;
    writeln!(writer, "{}", record.sequence)
}

/// Sort records by full header. The sort is stable, so duplicate headers keep
/// their input order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.header.cmp(&b.header));
}

/// Read a two-line FASTA, sort it by header and write it back out unwrapped.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns `ParseError` if the input is malformed or either file fails.
pub fn sort_fasta_file(input: &Path, output: &Path) -> Result<usize, ParseError> {
    let mut records = open_fasta(input)?.collect::<Result<Vec<_>, _>>()?;
    sort_records(&mut records);

    let mut writer = BufWriter::new(std::fs::File::create(output)?);
    for record in &records {
        write_record(&mut writer, record)?;
    }
    writer.flush()?;

    debug!(
        "Sorted {} records from {} into {}",
        records.len(),
        input.display(),
        output.display()
    );
    Ok(records.len())
}
