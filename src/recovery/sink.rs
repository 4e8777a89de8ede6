use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::core::record::MatePair;
use crate::parsing::fasta::write_record;

/// Destination for recovered pairs, accumulated across bins.
pub struct FastaSink {
    writer: Box<dyn Write>,
    path: Option<PathBuf>,
    pairs: u64,
}

impl FastaSink {
    /// Open `path` for appending, creating it if needed. Existing content is kept.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be opened.
    pub fn append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_file(file, path))
    }

    /// Create `path`, discarding any existing content.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be created.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_file(file, path))
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(BufWriter::new(io::stdout())),
            path: None,
            pairs: 0,
        }
    }

    fn from_file(file: File, path: &Path) -> Self {
        Self {
            writer: Box::new(BufWriter::new(file)),
            path: Some(path.to_path_buf()),
            pairs: 0,
        }
    }

    /// Write both records of a pair with a single write call.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_pair(&mut self, pair: &MatePair) -> io::Result<()> {
        let mut buf = Vec::with_capacity(
            pair.first.header.len()
                + pair.first.sequence.len()
                + pair.second.header.len()
                + pair.second.sequence.len()
                + 6,
        );
        write_pair_to(&mut buf, pair)?;
        self.writer.write_all(&buf)?;
        self.pairs += 1;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Pairs written through this sink
    #[must_use]
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    /// Destination path, `None` for stdout
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn write_pair_to<W: Write>(writer: &mut W, pair: &MatePair) -> io::Result<()> {
    write_record(writer, &pair.first)?;
    write_record(writer, &pair.second)
}

/// Staging area for one bin's pairs.
///
/// Pairs go to an anonymous temporary file and reach the sink only on
/// [`commit`](Self::commit). Dropping a `RowWriter` discards its pairs, so a
/// bin that fails halfway leaves the sink untouched.
pub struct RowWriter {
    file: BufWriter<File>,
    pairs: u64,
}

impl RowWriter {
    /// Stage in the system temporary directory
    ///
    /// # Errors
    ///
    /// Returns an IO error if the temporary file cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self::from_file(tempfile::tempfile()?))
    }

    /// Stage in `dir`
    ///
    /// # Errors
    ///
    /// Returns an IO error if the temporary file cannot be created.
    pub fn new_in(dir: &Path) -> io::Result<Self> {
        Ok(Self::from_file(tempfile::tempfile_in(dir)?))
    }

    fn from_file(file: File) -> Self {
        Self {
            file: BufWriter::new(file),
            pairs: 0,
        }
    }

    /// # Errors
    ///
    /// Returns any error from the staging file.
    pub fn write_pair(&mut self, pair: &MatePair) -> io::Result<()> {
        write_pair_to(&mut self.file, pair)?;
        self.pairs += 1;
        Ok(())
    }

    /// Append everything staged to `sink` and flush it.
    ///
    /// Returns the number of pairs committed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the staging file cannot be read back or the
    /// sink cannot be written.
    pub fn commit(self, sink: &mut FastaSink) -> io::Result<u64> {
        let mut file = self.file.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.seek(SeekFrom::Start(0))?;
        io::copy(&mut file, &mut sink.writer)?;
        sink.flush()?;
        sink.pairs += self.pairs;
        Ok(self.pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use tempfile::NamedTempFile;

    fn pair(name: &str) -> MatePair {
        MatePair::new(
            Record::new(format!("{name}.1"), "ACGT"),
            Record::new(format!("{name}.2"), "TGCA"),
        )
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let mut out = NamedTempFile::with_suffix(".fasta").unwrap();
        out.write_all(b">old.1\nAA\n>old.2\nCC\n").unwrap();
        out.flush().unwrap();

        let mut sink = FastaSink::append(out.path()).unwrap();
        sink.write_pair(&pair("new")).unwrap();
        sink.flush().unwrap();
        drop(sink);

        let content = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            content,
            ">old.1\nAA\n>old.2\nCC\n>new.1\nACGT\n>new.2\nTGCA\n"
        );
    }

    #[test]
    fn test_create_truncates() {
        let mut out = NamedTempFile::with_suffix(".fasta").unwrap();
        out.write_all(b">old.1\nAA\n").unwrap();
        out.flush().unwrap();

        let mut sink = FastaSink::create(out.path()).unwrap();
        sink.write_pair(&pair("new")).unwrap();
        sink.flush().unwrap();
        drop(sink);

        let content = std::fs::read_to_string(out.path()).unwrap();
        assert!(content.starts_with(">new.1\n"));
    }

    #[test]
    fn test_row_commit_and_discard() {
        let out = NamedTempFile::with_suffix(".fasta").unwrap();
        let mut sink = FastaSink::append(out.path()).unwrap();

        let mut kept = RowWriter::new().unwrap();
        kept.write_pair(&pair("a")).unwrap();
        kept.write_pair(&pair("b")).unwrap();
        assert_eq!(kept.commit(&mut sink).unwrap(), 2);

        let mut discarded = RowWriter::new().unwrap();
        discarded.write_pair(&pair("c")).unwrap();
        drop(discarded);

        sink.flush().unwrap();
        assert_eq!(sink.pairs(), 2);

        let content = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(
            content,
            ">a.1\nACGT\n>a.2\nTGCA\n>b.1\nACGT\n>b.2\nTGCA\n"
        );
    }
}
