//! ログに書き出すレコード
//!
//! `EventRecord` は 1 イベント分の正規化済みデータ、`LogRecord` は ldjson の 1 行。

use super::stats::iso8601;
use super::{ErrorCode, EventType, RecordId, StatsSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// テスト結果（完了前は None）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    Passed,
    Failed,
    Pending,
}

/// 正規化済みエラー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl NormalizedError {
    /// ウォッチドッグの予約コードを持つか
    pub fn is_timeout(&self) -> bool {
        self.code.as_ref().map(ErrorCode::is_timeout).unwrap_or(false)
    }
}

/// 1 イベント分の正規化済みデータ（ldjson の `data`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub file: Option<String>,
    pub title: Option<String>,
    pub full_title: Option<String>,
    pub full_title_path: Vec<String>,
    pub duration: Option<u64>,
    pub result: Option<TestResult>,
    pub root: bool,
    pub error: Option<NormalizedError>,
    pub timed_out: bool,
}

impl EventRecord {
    /// subject を持たないイベント（run begin / end 等）の空レコード
    pub fn empty(event_type: EventType) -> Self {
        Self {
            id: None,
            event_type,
            file: None,
            title: None,
            full_title: None,
            full_title_path: Vec::new(),
            duration: None,
            result: None,
            root: false,
            error: None,
            timed_out: false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.error.as_ref().map(NormalizedError::is_timeout).unwrap_or(false)
    }
}

/// ldjson の 1 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub data: EventRecord,
    pub stats: StatsSnapshot,
    #[serde(serialize_with = "iso8601::serialize")]
    pub timestamp: DateTime<Utc>,
    /// run 開始からの経過ミリ秒
    pub elapsed_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_record_matches_wire_shape() {
        let rec = LogRecord {
            data: EventRecord::empty(EventType::RunBegin),
            stats: StatsSnapshot::default(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 7, 12, 0, 0).unwrap(),
            elapsed_ms: 0,
        };
        let line = serde_json::to_string(&rec).unwrap();
        assert!(line.starts_with(
            r#"{"data":{"id":null,"type":"start","file":null,"title":null,"fullTitle":null,"fullTitlePath":[],"duration":null,"result":null,"root":false,"error":null,"timedOut":false},"stats":{"#
        ));
        assert!(line.ends_with(r#""timestamp":"2026-02-07T12:00:00.000Z","elapsedMs":0}"#));
    }

    #[test]
    fn test_normalized_error_omits_absent_fields_but_keeps_null_stack() {
        let err = NormalizedError {
            message: Some("Error: x".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"message":"Error: x","stack":null}"#
        );
    }

    #[test]
    fn test_written_line_reads_back() {
        let mut data = EventRecord::empty(EventType::TestPass);
        data.id = Some(RecordId::new("0000abcd"));
        data.result = Some(TestResult::Passed);
        let rec = LogRecord {
            data,
            stats: StatsSnapshot::default(),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 7, 12, 0, 1).unwrap(),
            elapsed_ms: 1000,
        };
        let line = serde_json::to_string(&rec).unwrap();
        let back: LogRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, rec);
    }
}
