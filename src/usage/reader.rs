use crate::error::AppError;
use crate::pricing::PricingCatalog;
use crate::usage::aggregator::{MeasuredSummary, UsageAggregator};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Stream a JSONL usage log through the aggregator.
///
/// The file is read line by line as raw bytes, so a line that is not UTF-8 is
/// skipped like any other malformed line. Only an I/O error stops the read,
/// keeping what was reduced so far.
pub fn read_usage_file(
    path: &Path,
    catalog: &PricingCatalog,
) -> Result<Option<MeasuredSummary>, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut aggregator = UsageAggregator::new(catalog);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => aggregator.push_bytes(&buf),
            Err(e) => {
                warn!("Stopped reading {} early: {}", path.display(), e);
                break;
            }
        }
    }

    let summary = aggregator.finish();
    match &summary {
        Some(s) => info!(
            "Measured {} calls from {} ({} lines skipped)",
            s.call_count,
            path.display(),
            s.skipped_lines
        ),
        None => info!("No usable usage records in {}", path.display()),
    }
    Ok(summary)
}

/// Load one optional side. Unreadable files narrow the report rather than fail it.
pub fn load_side(path: Option<&Path>, catalog: &PricingCatalog) -> Option<MeasuredSummary> {
    let path = path?;
    match read_usage_file(path, catalog) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Ignoring usage log: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceEntry;
    use std::io::Write;

    fn catalog() -> PricingCatalog {
        PricingCatalog::new(
            "",
            vec![],
            vec![PriceEntry::new("openai", "gpt-4o", 2.5, 10.0)],
        )
    }

    #[test]
    fn test_read_usage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"provider":"openai","model":"gpt-4o","input_tokens":1000000,"output_tokens":0}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, "partial line {{").unwrap();

        let summary = read_usage_file(file.path(), &catalog()).unwrap().unwrap();
        assert_eq!(summary.call_count, 1);
        assert!((summary.total_cost - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_utf8_line_does_not_stop_the_read() {
        let good = br#"{"provider":"openai","model":"gpt-4o","input_tokens":1000000,"output_tokens":0}"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(good).unwrap();
        file.write_all(b"\n\xff\xfe garbage\n").unwrap();
        file.write_all(good).unwrap();
        file.write_all(b"\n").unwrap();
        file.write_all(good).unwrap();
        file.write_all(b"\n").unwrap();

        let summary = read_usage_file(file.path(), &catalog()).unwrap().unwrap();
        assert_eq!(summary.call_count, 3);
        assert_eq!(summary.skipped_lines, 1);
        assert!((summary.total_cost - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = read_usage_file(Path::new("/nonexistent/usage.jsonl"), &catalog());
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_load_side_tolerates_missing_file() {
        assert!(load_side(Some(Path::new("/nonexistent/usage.jsonl")), &catalog()).is_none());
        assert!(load_side(None, &catalog()).is_none());
    }
}
