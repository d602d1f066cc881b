use anyhow::{bail, Context};
use log::warn;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thrustcore::{
    decode_with_report, summarize, DecodeReport, Record, StatisticsSummary, SummaryOptions,
};

/// One loaded dataset. Passed explicitly between loading, summarizing, and
/// the HTTP bridge instead of living in a process-wide global.
#[derive(Debug, Clone, Default)]
pub struct Session {
    source: Option<String>,
    records: Vec<Record>,
    report: DecodeReport,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_text(source: impl Into<String>, text: &str) -> Self {
        let (records, report) = decode_with_report(text);
        Self {
            source: Some(source.into()),
            records,
            report,
        }
    }

    /// Reads a captured log. Bytes that are not UTF-8 are replaced, since a
    /// noisy serial capture is still worth decoding.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("file not found: {}", path.display());
        }
        if !path.is_file() {
            bail!("not a file: {}", path.display());
        }

        let bytes = fs::read(path).with_context(|| format!("reading log {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, Cow::Owned(_)) {
            warn!("{} contains non UTF-8 bytes; they were replaced", path.display());
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(name, &text))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self, options: SummaryOptions) -> Option<StatisticsSummary> {
        summarize(&self.records, options)
    }

    pub fn describe(&self) -> String {
        match &self.source {
            Some(source) => format!("Loaded: {} ({} records)", source, self.records.len()),
            None => "No data loaded".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOG: &[u8] = b"=== UART Log Started ===\n\
        100,VALID,$thrust_test,0001,DATA,THST,-2.500,N,50*1A\n\
        200,INVALID,$thrust_test,0002,DATA,THST,3.000,N,150*2B\n";

    #[test]
    fn session_from_text_decodes_records() {
        let session = Session::from_text("inline", std::str::from_utf8(LOG).unwrap());
        assert_eq!(session.records().len(), 2);
        assert_eq!(session.report().skipped_lines, 1);
        assert_eq!(session.describe(), "Loaded: inline (2 records)");
    }

    #[test]
    fn session_load_tolerates_invalid_utf8() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(LOG).unwrap();
        temp.write_all(b"300,INVALID,\xff\xfe$thrust_test,0003,DATA,THST,4.0,N,250*3C\n")
            .unwrap();
        let session = Session::load(temp.path()).unwrap();
        assert_eq!(session.records().len(), 3);
        assert!(!session.records()[2].valid);
        assert_eq!(session.records()[2].value, Some(4.0));
    }

    #[test]
    fn session_load_rejects_missing_file_and_directory() {
        assert!(Session::load("/definitely/not/here.txt").is_err());
        let dir = tempfile::tempdir().unwrap();
        let err = Session::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn empty_session_has_no_summary() {
        let session = Session::empty();
        assert!(session.is_empty());
        assert!(session.summary(SummaryOptions::default()).is_none());
        assert_eq!(session.describe(), "No data loaded");
    }
}
