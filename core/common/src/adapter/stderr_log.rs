//! 診断ログの Log 実装（stderr へ JSON 1 行 / 何もしない）
//!
//! 出力ログ（ldjson）には一切書かない。verbose 時のみ StderrJsonLog を使う。

use crate::error::Error;
use crate::ports::outbound::{Log, LogEntry, LogLevel};

/// 診断ログを stderr に JSON 1 行で出す Log 実装
#[derive(Debug, Clone)]
pub struct StderrJsonLog {
    min_level: LogLevel,
}

impl StderrJsonLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        severity(level) <= severity(self.min_level)
    }
}

impl Default for StderrJsonLog {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

fn severity(level: LogLevel) -> u8 {
    match level {
        LogLevel::Error => 0,
        LogLevel::Warn => 1,
        LogLevel::Info => 2,
        LogLevel::Debug => 3,
    }
}

impl Log for StderrJsonLog {
    fn log(&self, entry: &LogEntry) -> Result<(), Error> {
        if !self.enabled(entry.level) {
            return Ok(());
        }
        let line = serde_json::to_string(entry)?;
        eprintln!("{}", line);
        Ok(())
    }
}

/// 何も出力しない Log 実装（既定・テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _entry: &LogEntry) -> Result<(), Error> {
        Ok(())
    }
}
