//! ファイルへ ldjson で追記する EventLog 実装
//!
//! 1 回の append ごとに開いて 1 行書いて閉じる。途中でプロセスが落ちても
//! 最後に書き終えた行までは読める状態が残る。

use crate::domain::LogRecord;
use crate::error::Error;
use crate::ports::outbound::{EventLog, FileSystem, Log, LogEntry, LogLevel};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイルへ ldjson を追記する EventLog 実装
pub struct FileLdjsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    logger: Arc<dyn Log>,
}

impl FileLdjsonLog {
    /// 出力先パス（解決済み）へ追記する writer を生成する。ファイル操作は prepare まで行わない。
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>, logger: Arc<dyn Log>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            logger,
        }
    }

    fn note(&self, message: &str) {
        let _ = self.logger.log(
            &LogEntry::new(LogLevel::Debug, "adapter", "output", message)
                .field("path", self.path.display().to_string()),
        );
    }
}

impl EventLog for FileLdjsonLog {
    fn prepare(&mut self, append: bool) -> Result<(), Error> {
        if self.fs.is_file(&self.path) && !append {
            self.note("Overwriting path");
            self.fs.remove_file(&self.path)?;
        } else {
            self.note("New output path");
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.open_append(&self.path)?;
        Ok(())
    }

    fn append(&mut self, record: &LogRecord) -> Result<(), Error> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(line.as_bytes()).map_err(|e| {
            Error::io_msg(format!("Failed to append to '{}': {}", self.path.display(), e))
        })?;
        w.flush().map_err(|e| {
            Error::io_msg(format!("Failed to flush '{}': {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{NoopLog, StdFileSystem};
    use crate::domain::{EventRecord, EventType, StatsSnapshot};
    use chrono::{TimeZone, Utc};

    fn writer(path: &Path) -> FileLdjsonLog {
        FileLdjsonLog::new(Arc::new(StdFileSystem), path, Arc::new(NoopLog))
    }

    fn record(event_type: EventType) -> LogRecord {
        LogRecord {
            data: EventRecord::empty(event_type),
            stats: StatsSnapshot::default(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 7, 12, 0, 0).unwrap(),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_prepare_creates_parent_dirs_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/report.ldjson");
        writer(&path).prepare(false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_prepare_truncates_unless_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.ldjson");
        std::fs::write(&path, "old line\n").unwrap();

        writer(&path).prepare(true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old line\n");

        writer(&path).prepare(false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_each_append_is_one_json_line_in_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.ldjson");
        let mut log = writer(&path);
        log.prepare(false).unwrap();
        log.append(&record(EventType::RunBegin)).unwrap();
        log.append(&record(EventType::RunEnd)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        let types: Vec<String> = content
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).expect("valid JSON line");
                v["data"]["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(types, vec!["start", "end"]);
    }

    #[test]
    fn test_prepare_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = writer(&blocker.join("report.ldjson")).prepare(false).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
