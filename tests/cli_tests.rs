//! End-to-end tests of the bin-reads command line.
//!
//! The `run` tests replace the read extractor with a shell script that copies
//! a prepared FASTA into place, so they only run on unix.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bin_reads() -> Command {
    Command::cargo_bin("bin-reads").expect("binary should build")
}

#[test]
fn test_pair_keeps_complete_pair() {
    bin_reads()
        .args(["pair", "-"])
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n")
        .assert()
        .success()
        .stdout(">r1.1\nACGT\n>r1.2\nTGCA\n");
}

#[test]
fn test_pair_drops_singletons() {
    bin_reads()
        .args(["pair", "-"])
        .write_stdin(">r1.1\nACGT\n>r2.1\nGGGG\n")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("dropped 2 singletons"));
}

#[test]
fn test_pair_drops_trailing_singleton() {
    bin_reads()
        .args(["pair", "-"])
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n>r2.1\nCCCC\n")
        .assert()
        .success()
        .stdout(">r1.1\nACGT\n>r1.2\nTGCA\n");
}

#[test]
fn test_pair_output_is_stable_when_repaired() {
    let input = ">a.1\nA\n>b.1\nC\n>b.2\nG\n>c.2\nT\n>d.1\nAA\n>d.2\nCC\n";
    let once = bin_reads()
        .args(["pair", "-"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(once.status.success());

    bin_reads()
        .args(["pair", "-"])
        .write_stdin(once.stdout.clone())
        .assert()
        .success()
        .stdout(String::from_utf8(once.stdout).unwrap());
}

#[test]
fn test_pair_rejects_wrapped_sequence() {
    bin_reads()
        .args(["pair", "-"])
        .write_stdin(">r1.1\nACGT\nACGT\n>r1.2\nTGCA\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_pair_rejects_unsorted_unless_asked_to_sort() {
    let input = ">r2.1\nGGGG\n>r1.2\nTGCA\n>r1.1\nACGT\n";

    bin_reads()
        .args(["pair", "-"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not sorted"));

    bin_reads()
        .args(["pair", "-", "--sort"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(">r1.1\nACGT\n>r1.2\nTGCA\n");
}

#[test]
fn test_pair_preserves_contig_tag() {
    bin_reads()
        .args(["pair", "-", "--tag-delimiter", "|", "--separator", "."])
        .write_stdin(">r1.1|bin_db\nACGT\n>r1.2|bin_db\nTGCA\n>r3.1|bin_db\nAAAA\n")
        .assert()
        .success()
        .stdout(">r1.1|bin_db\nACGT\n>r1.2|bin_db\nTGCA\n");
}

#[test]
fn test_pair_json_summary() {
    bin_reads()
        .args(["--format", "json", "pair", "-"])
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n>r2.1\nCCCC\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("\"pairs\": 1"))
        .stderr(predicate::str::contains("\"singletons\": 1"));
}

#[test]
fn test_pair_appends_to_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("paired.fasta");
    std::fs::write(&out, ">old.1\nAA\n>old.2\nCC\n").unwrap();

    bin_reads()
        .args(["pair", "-", "--append", "-o"])
        .arg(&out)
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n")
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content, ">old.1\nAA\n>old.2\nCC\n>r1.1\nACGT\n>r1.2\nTGCA\n");
}

#[test]
fn test_pair_failure_leaves_appended_output_untouched() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("paired.fasta");
    std::fs::write(&out, ">old.1\nAA\n>old.2\nCC\n").unwrap();

    // r1 pairs before the missing sequence line is hit
    bin_reads()
        .args(["pair", "-", "--append", "-o"])
        .arg(&out)
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n>r2.1\n>r2.2\nGG\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 6"));

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        ">old.1\nAA\n>old.2\nCC\n"
    );
}

#[test]
fn test_pair_failure_does_not_truncate_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("paired.fasta");
    std::fs::write(&out, ">old.1\nAA\n>old.2\nCC\n").unwrap();

    bin_reads()
        .args(["pair", "-", "-o"])
        .arg(&out)
        .write_stdin(">r1.1\nACGT\n>r1.2\nTGCA\n>r0.1\nGG\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not sorted"));

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        ">old.1\nAA\n>old.2\nCC\n"
    );
}

#[test]
fn test_pair_reports_line_of_invalid_utf8() {
    bin_reads()
        .args(["pair", "-"])
        .write_stdin(b">r1.1\nACGT\n>r1.2\nTG\xffCA\n".to_vec())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 4"))
        .stderr(predicate::str::contains("invalid UTF-8"));
}

#[test]
fn test_missing_lists_absent_mates() {
    bin_reads()
        .args(["missing", "-"])
        .write_stdin(">a.1\nA\n>b.1\nC\n>b.2\nG\n>c.2\nT\n")
        .assert()
        .success()
        .stdout(">a.2\n>c.1\n");
}

#[test]
fn test_missing_rejects_unknown_mate_indicator() {
    bin_reads()
        .args(["missing", "-"])
        .write_stdin(">a.1\nA\n>a.x\nC\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected mate indicator 1 or 2"));
}

#[cfg(unix)]
mod run {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Stand-in for the read extractor: copies the "BAM" argument, which
    /// here is an unsorted FASTA, to the `-o` path. Bin `bad` fails.
    const FAKE_EXTRACTOR: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
    case "$1" in
        -o) out="$2"; shift 2 ;;
        -b) bin="$2"; shift 2 ;;
        -p|-c|-C) shift 2 ;;
        *) reads="$1"; shift ;;
    esac
done
if [ "$bin" = "bad" ]; then
    echo "bin $bin not found in collection" >&2
    exit 1
fi
cat "$reads" > "$out"
"#;

    struct Fixture {
        dir: TempDir,
        extractor: PathBuf,
        table: PathBuf,
        out: PathBuf,
    }

    fn fixture(bins: &[(&str, &str)]) -> Fixture {
        let dir = TempDir::new().unwrap();

        let extractor = dir.path().join("fake-extract.sh");
        std::fs::write(&extractor, FAKE_EXTRACTOR).unwrap();
        std::fs::set_permissions(&extractor, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut table = String::new();
        for (bin, reads) in bins {
            let reads_path = dir.path().join(format!("{bin}.reads.fasta"));
            std::fs::write(&reads_path, reads).unwrap();
            table.push_str(&format!(
                "{bin}\tdefault\tPROFILE.db\tCONTIGS.db\t{}\n",
                reads_path.display()
            ));
        }
        let table_path = dir.path().join("bins.tsv");
        std::fs::write(&table_path, table).unwrap();

        let out = dir.path().join("recovered.fasta");
        Fixture {
            dir,
            extractor,
            table: table_path,
            out,
        }
    }

    fn run_cmd(f: &Fixture) -> Command {
        let mut cmd = bin_reads();
        cmd.arg("run")
            .arg("--table")
            .arg(&f.table)
            .arg("--out")
            .arg(&f.out)
            .arg("--anvio-program")
            .arg(&f.extractor)
            .args(["--sorter", "internal"]);
        cmd
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_run_recovers_pairs_across_bins() {
        let f = fixture(&[
            ("bin_1", ">b.2\nTTTT\n>a.1\nAAAA\n>a.2\nCCCC\n"),
            ("bin_2", ">d.2\nGTGT\n>c.1\nGGGG\n>d.1\nACAC\n"),
        ]);

        run_cmd(&f)
            .assert()
            .success()
            .stdout(predicate::str::contains("Pairs written: 2"));

        assert_eq!(
            read(&f.out),
            ">a.1\nAAAA\n>a.2\nCCCC\n>d.1\nACAC\n>d.2\nGTGT\n"
        );
    }

    #[test]
    fn test_run_reports_failed_bin_and_continues() {
        let f = fixture(&[
            ("bad", ">x.1\nAAAA\n>x.2\nCCCC\n"),
            ("bin_1", ">a.1\nAAAA\n>a.2\nCCCC\n"),
        ]);

        run_cmd(&f)
            .assert()
            .failure()
            .stdout(predicate::str::contains("bad: FAILED"))
            .stderr(predicate::str::contains("1 of 2 bins failed"));

        assert_eq!(read(&f.out), ">a.1\nAAAA\n>a.2\nCCCC\n");
    }

    #[test]
    fn test_run_appends_unless_overwrite() {
        let f = fixture(&[("bin_1", ">a.1\nAAAA\n>a.2\nCCCC\n")]);

        run_cmd(&f).assert().success();
        run_cmd(&f).assert().success();
        assert_eq!(read(&f.out), ">a.1\nAAAA\n>a.2\nCCCC\n".repeat(2));

        run_cmd(&f).arg("--overwrite").assert().success();
        assert_eq!(read(&f.out), ">a.1\nAAAA\n>a.2\nCCCC\n");
    }

    #[test]
    fn test_run_keeps_intermediates_in_work_dir() {
        let f = fixture(&[("bin_1", ">a.2\nCCCC\n>a.1\nAAAA\n")]);
        let work = f.dir.path().join("work");

        run_cmd(&f).arg("--work-dir").arg(&work).assert().success();

        let sorted = work.join("recovered.bin0.bin_1.tmp.fasta");
        assert_eq!(read(&sorted), ">a.1\nAAAA\n>a.2\nCCCC\n");
    }

    #[test]
    fn test_run_tsv_summary() {
        let f = fixture(&[("bin_1", ">a.1\nAAAA\n>a.2\nCCCC\n>b.1\nGGGG\n")]);

        run_cmd(&f)
            .args(["--format", "tsv"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "row\tbin\tstatus\trecords\tpairs\tsingletons\terror\n0\tbin_1\tok\t3\t1\t1\t\n",
            ));
    }
}
