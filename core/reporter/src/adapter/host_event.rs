//! stdin から 1 行 1 イベントの JSON を読む
//!
//! 形式: `{"event": "<wire 名>", "subject": {...}?, "err": {...}?}`
//! subject / err は寛容に読む（型違いの項目は既定値に落とす）。
//! event 名が不明・JSON として読めない行は usage エラー。

use anyhow::{anyhow, Context};
use common::domain::{ErrorCode, ErrorLike, EventType, RecordId, Subject, SubjectKey, TestState};
use common::error::Error;
use serde_json::{Map, Value};
use std::io::BufRead;

/// ホストから届いたイベント 1 件
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub event_type: EventType,
    pub subject: Option<Subject>,
    pub err: Option<ErrorLike>,
}

/// 1 行を HostEvent に変換する
pub fn parse_host_event(line: &str) -> anyhow::Result<HostEvent> {
    let value: Value = serde_json::from_str(line).context("invalid JSON")?;
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("expected a JSON object"))?;
    let name = obj
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing \"event\" field"))?;
    let event_type =
        EventType::from_wire(name).ok_or_else(|| anyhow!("unknown event '{}'", name))?;

    Ok(HostEvent {
        event_type,
        subject: obj.get("subject").and_then(Value::as_object).map(subject_from),
        err: obj.get("err").and_then(error_from),
    })
}

/// BufRead から HostEvent を順に取り出す。空行は飛ばす。
pub struct HostEventReader<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> HostEventReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> Iterator for HostEventReader<R> {
    type Item = Result<HostEvent, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(Error::io_msg(format!("Failed to read stdin: {}", e)))),
            }
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_host_event(line.trim_end()).map_err(|e| {
                Error::invalid_argument(format!("line {}: {:#}", self.line_no, e))
            }));
        }
    }
}

fn subject_from(obj: &Map<String, Value>) -> Subject {
    Subject {
        key: obj.get("key").and_then(key_from),
        record_id: str_field(obj, "id").map(RecordId::new),
        title: str_field(obj, "title"),
        title_path: obj.get("titlePath").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        }),
        file: str_field(obj, "file"),
        state: match obj.get("state").and_then(Value::as_str) {
            Some("passed") => Some(TestState::Passed),
            Some("failed") => Some(TestState::Failed),
            _ => None,
        },
        pending: bool_field(obj, "pending"),
        duration: obj
            .get("duration")
            .and_then(Value::as_f64)
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64),
        err: obj.get("err").and_then(error_from),
        root: bool_field(obj, "root"),
        timed_out: bool_field(obj, "timedOut"),
    }
}

/// null / false は「エラー無し」。オブジェクト以外の値は中身の無いエラーとして扱う。
fn error_from(value: &Value) -> Option<ErrorLike> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Object(obj) => Some(ErrorLike {
            name: str_field(obj, "name"),
            message: str_field(obj, "message"),
            stack: str_field(obj, "stack"),
            code: match obj.get("code") {
                Some(Value::String(s)) => Some(ErrorCode::Text(s.clone())),
                Some(Value::Number(n)) => n.as_i64().map(ErrorCode::Number),
                _ => None,
            },
            actual: obj.get("actual").cloned(),
            expected: obj.get("expected").cloned(),
            show_diff: obj.get("showDiff").and_then(Value::as_bool),
        }),
        _ => Some(ErrorLike::default()),
    }
}

fn key_from(value: &Value) -> Option<SubjectKey> {
    match value {
        Value::String(s) if !s.is_empty() => Some(SubjectKey::new(s.clone())),
        Value::Number(n) => Some(SubjectKey::new(n.to_string())),
        _ => None,
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_parses_full_test_event() {
        let line = r#"{"event":"fail","subject":{"key":7,"title":"t","titlePath":["s","t"],"file":"a.js","state":"failed","duration":12.4,"timedOut":true},"err":{"name":"AssertionError","message":"m","actual":{"a":1},"expected":{"a":2},"code":"ERR_ASSERTION"}}"#;
        let ev = parse_host_event(line).unwrap();
        assert_eq!(ev.event_type, EventType::TestFail);
        let s = ev.subject.unwrap();
        assert_eq!(s.key.as_deref(), Some("7"));
        assert_eq!(s.title_path, Some(vec!["s".to_string(), "t".to_string()]));
        assert_eq!(s.state, Some(TestState::Failed));
        assert_eq!(s.duration, Some(12));
        assert!(s.timed_out);
        let err = ev.err.unwrap();
        assert_eq!(err.code, Some(ErrorCode::Text("ERR_ASSERTION".into())));
        assert_eq!(err.actual, Some(json!({"a": 1})));
    }

    #[test]
    fn test_wrong_typed_fields_fall_back_to_defaults() {
        let line = r#"{"event":"test","subject":{"key":[1],"title":5,"titlePath":"x","duration":-3,"pending":"yes"}}"#;
        let s = parse_host_event(line).unwrap().subject.unwrap();
        assert_eq!(s, Subject::default());
    }

    #[test]
    fn test_present_null_expected_is_kept() {
        let ev = parse_host_event(r#"{"event":"fail","err":{"actual":1,"expected":null}}"#).unwrap();
        assert_eq!(ev.err.unwrap().expected, Some(Value::Null));
    }

    #[test]
    fn test_non_object_error_is_empty_error() {
        let ev = parse_host_event(r#"{"event":"fail","err":"boom"}"#).unwrap();
        assert_eq!(ev.err, Some(ErrorLike::default()));
        let ev = parse_host_event(r#"{"event":"fail","err":null}"#).unwrap();
        assert_eq!(ev.err, None);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let err = parse_host_event(r#"{"event":"bogus"}"#).unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert!(parse_host_event(r#"{"subject":{}}"#).is_err());
        assert!(parse_host_event("not json").is_err());
    }

    #[test]
    fn test_reader_skips_blank_lines_and_reports_line_numbers() {
        let input = "{\"event\":\"start\"}\n\n   \n{\"event\":\"nope\"}\n";
        let mut reader = HostEventReader::new(Cursor::new(input));
        assert_eq!(reader.next().unwrap().unwrap().event_type, EventType::RunBegin);
        let err = reader.next().unwrap().unwrap_err();
        assert!(err.is_usage());
        assert!(err.to_string().starts_with("line 4:"), "{}", err);
        assert!(reader.next().is_none());
    }
}
