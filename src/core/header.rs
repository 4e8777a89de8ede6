use thiserror::Error;

use crate::core::types::Mate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Read name '{0}' is too short to carry a basename, separator and mate indicator")]
    TooShort(String),

    #[error("Read name '{header}' has separator '{found}' before its mate indicator, expected '{expected}'")]
    UnexpectedSeparator {
        header: String,
        expected: char,
        found: char,
    },

    #[error("Read name '{header}' ends in '{found}', expected mate indicator 1 or 2")]
    InvalidMate { header: String, found: char },
}

/// A read name split into the fragment it belongs to and its mate indicator.
///
/// Paired-end read names follow `<basename><separator><mate>`, where the
/// separator and the mate indicator are one character each, e.g. `r1.1` and
/// `r1.2`, or `SRR390728.5/1` and `SRR390728.5/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadName<'a> {
    pub basename: &'a str,
    pub separator: char,
    pub mate: char,
}

impl<'a> ReadName<'a> {
    /// Split a read name into basename, separator and mate indicator.
    ///
    /// When `separator` is given the second-to-last character must equal it;
    /// otherwise any character is accepted in that position.
    ///
    /// # Errors
    ///
    /// Returns `HeaderError::TooShort` if the basename would be empty, or
    /// `HeaderError::UnexpectedSeparator` if the separator does not match.
    pub fn parse(name: &'a str, separator: Option<char>) -> Result<Self, HeaderError> {
        let mut tail = name.char_indices().rev();
        let (Some((_, mate)), Some((sep_idx, found))) = (tail.next(), tail.next()) else {
            return Err(HeaderError::TooShort(name.to_string()));
        };

        let basename = &name[..sep_idx];
        if basename.is_empty() {
            return Err(HeaderError::TooShort(name.to_string()));
        }

        if let Some(expected) = separator {
            if found != expected {
                return Err(HeaderError::UnexpectedSeparator {
                    header: name.to_string(),
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            basename,
            separator: found,
            mate,
        })
    }

    /// The mate indicator as a `Mate`, if it is `1` or `2`.
    ///
    /// # Errors
    ///
    /// Returns `HeaderError::InvalidMate` for any other indicator.
    pub fn strict_mate(&self) -> Result<Mate, HeaderError> {
        Mate::from_indicator(self.mate).ok_or_else(|| HeaderError::InvalidMate {
            header: format!("{}{}{}", self.basename, self.separator, self.mate),
            found: self.mate,
        })
    }
}

/// Trailing tag naming the contig database a read was extracted from.
///
/// The tag starts at the last occurrence of `delimiter` and runs to the end
/// of the header. It takes no part in pairing and is written back untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContigTag {
    pub delimiter: char,
}

impl ContigTag {
    #[must_use]
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Split a header into `(read_name, tag)`. The tag keeps its delimiter
    /// and is empty when the delimiter does not occur, so `read_name + tag`
    /// always reproduces the header.
    #[must_use]
    pub fn split<'a>(&self, header: &'a str) -> (&'a str, &'a str) {
        match header.rfind(self.delimiter) {
            Some(idx) => header.split_at(idx),
            None => (header, ""),
        }
    }

    #[must_use]
    pub fn strip<'a>(&self, header: &'a str) -> &'a str {
        self.split(header).0
    }
}

/// How record headers are read: optional contig tag, then a read name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFormat {
    /// Required separator before the mate indicator (any if `None`)
    pub separator: Option<char>,
    /// Trailing contig tag to ignore when pairing
    pub contig_tag: Option<ContigTag>,
}

impl HeaderFormat {
    /// Parse the read name out of a full record header.
    ///
    /// # Errors
    ///
    /// Returns a `HeaderError` if the read name is malformed.
    pub fn parse<'a>(&self, header: &'a str) -> Result<ReadName<'a>, HeaderError> {
        let name = match &self.contig_tag {
            Some(tag) => tag.strip(header),
            None => header,
        };
        ReadName::parse(name, self.separator)
    }
}
