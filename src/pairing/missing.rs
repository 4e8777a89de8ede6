//! Detection of mates absent from a header-sorted stream.
//!
//! Walks read names the same way as the pairing scan, but instead of dropping
//! an unpaired read it reports the name its mate would have. The list is the
//! input for re-fetching those mates from the raw reads; fetching itself is
//! left to the caller.

use crate::core::header::{HeaderError, HeaderFormat};
use crate::core::types::Mate;

/// A fragment seen with only one of its two reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMate {
    pub basename: String,
    pub separator: char,
    /// Contig tag of the read that was present, with its delimiter
    pub tag: String,
    pub present: Mate,
    pub missing: Mate,
}

impl MissingMate {
    /// Header the missing read would carry
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{}{}{}{}",
            self.basename, self.separator, self.missing, self.tag
        )
    }
}

/// List the missing mate of every fragment that appears exactly once.
///
/// `headers` must be sorted. Results follow the order in which the unpaired
/// fragments were encountered.
///
/// # Errors
///
/// Returns a `HeaderError` if a header is malformed or its mate indicator is
/// not `1` or `2`.
pub fn find_missing_mates<I, S>(
    headers: I,
    format: &HeaderFormat,
) -> Result<Vec<MissingMate>, HeaderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing = Vec::new();
    let mut running: Option<MissingMate> = None;

    for header in headers {
        let header = header.as_ref();
        let name = format.parse(header)?;
        let mate = name.strict_mate()?;

        match running.take() {
            Some(open) if open.basename == name.basename => {}
            previous => {
                missing.extend(previous);
                let tag = format
                    .contig_tag
                    .map(|t| t.split(header).1)
                    .unwrap_or_default();
                running = Some(MissingMate {
                    basename: name.basename.to_string(),
                    separator: name.separator,
                    tag: tag.to_string(),
                    present: mate,
                    missing: mate.other(),
                });
            }
        }
    }

    missing.extend(running);
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::header::ContigTag;

    fn names(missing: &[MissingMate]) -> Vec<String> {
        missing.iter().map(MissingMate::name).collect()
    }

    #[test]
    fn test_reports_only_unpaired_fragments() {
        let headers = [">a.1", ">b.1", ">b.2", ">c.2"];
        let missing = find_missing_mates(headers, &HeaderFormat::default()).unwrap();
        assert_eq!(names(&missing), vec![">a.2", ">c.1"]);
        assert_eq!(missing[0].present, Mate::One);
        assert_eq!(missing[1].missing, Mate::One);
    }

    #[test]
    fn test_nothing_missing() {
        let missing =
            find_missing_mates(["r1.1", "r1.2", "r2.1", "r2.2"], &HeaderFormat::default())
                .unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let missing = find_missing_mates(Vec::<String>::new(), &HeaderFormat::default()).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_keeps_separator_and_tag() {
        let format = HeaderFormat {
            separator: Some('/'),
            contig_tag: Some(ContigTag::new('|')),
        };
        let missing = find_missing_mates(["SRR1.7/2|bin_db"], &format).unwrap();
        assert_eq!(names(&missing), vec!["SRR1.7/1|bin_db"]);
    }

    #[test]
    fn test_rejects_unknown_indicator() {
        let result = find_missing_mates(["a.1", "b.3"], &HeaderFormat::default());
        assert!(matches!(
            result,
            Err(HeaderError::InvalidMate { found: '3', .. })
        ));
    }
}
