use expenses_core::Source;
use expenses_ingest::{IngestError, load_export};
use std::fs;
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Every adapter returns records sorted by date regardless of file order.
#[test]
fn test_all_sources_emit_sorted_records() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        (
            Source::RbcChequing,
            write(&dir, "rbc.csv", "Date,Description,Amount\n2024/02/02,B,-1\n2024/01/02,A,2\n"),
        ),
        (
            Source::RbcMastercard,
            write(
                &dir,
                "rbc_mc.csv",
                "Transaction Date,Description,Amount\n2024/02/02,B,-1\n2024/01/02,A,2\n",
            ),
        ),
        (
            Source::CibcVisa,
            write(
                &dir,
                "cibc.csv",
                "Date,Description,Debit,Credit\n2024-02-02,B,1,\n2024-01-02,A,,2\n",
            ),
        ),
        (
            Source::AmexCobalt,
            write(
                &dir,
                "amex.csv",
                "Date,Description,Amount\n2 Feb. 2024,B,$1.00\n2 Jan. 2024,A,-$2.00\n",
            ),
        ),
    ];

    for (source, path) in files {
        let txns = load_export(source, &path).unwrap();
        assert_eq!(txns.len(), 2, "{source}");
        assert!(txns.windows(2).all(|w| w[0].date <= w[1].date), "{source}");
        assert_eq!(txns[0].description, "A", "{source}");
        assert_eq!(txns[0].amount, 2.0, "{source}");
        assert_eq!(txns[1].amount, -1.0, "{source}");
        assert!(txns.iter().all(|t| t.source == source));
    }
}

#[test]
fn test_malformed_amount_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "rbc.csv",
        "Date,Description,Amount\n2024/01/02,A,-1\n2024/01/03,B,oops\n",
    );
    match load_export(Source::RbcChequing, &path).unwrap_err() {
        IngestError::InvalidAmount { row, column, value } => {
            assert_eq!(row, 3);
            assert_eq!(column, "Amount");
            assert_eq!(value, "oops");
        }
        other => panic!("expected InvalidAmount, got {other:?}"),
    }
}
