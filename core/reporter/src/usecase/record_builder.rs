//! subject とイベント種別から EventRecord を組み立てる
//!
//! 純粋関数。ID は呼び出し側（RunCoordinator）が registry から渡す。

use super::error_normalizer::normalize_error;
use common::ansi::strip_ansi;
use common::domain::{
    ErrorLike, EventRecord, EventType, RecordId, Subject, TestResult, TestState,
};

/// タイトル階層の区切り
pub const TITLE_SEPARATOR: &str = " -> ";

/// 1 イベント分のレコードを作る
///
/// `explicit_err` はイベントに添えられたエラーで、subject 自身の `err` より優先する。
/// subject が無い（run begin / end 等）ときは空レコードに明示エラーだけを載せる。
pub fn build_record(
    event_type: EventType,
    subject: Option<&Subject>,
    id: Option<RecordId>,
    explicit_err: Option<&ErrorLike>,
) -> EventRecord {
    let mut record = EventRecord::empty(event_type);
    record.id = id;

    let Some(subject) = subject else {
        record.error = explicit_err.map(normalize_error);
        return record;
    };

    record.file = subject.file.clone().filter(|f| !f.is_empty());
    record.title = subject
        .title
        .as_deref()
        .map(|t| strip_ansi(t).into_owned())
        .filter(|t| !t.is_empty());
    if let Some(path) = &subject.title_path {
        record.full_title = Some(strip_ansi(&path.join(TITLE_SEPARATOR)).into_owned());
        record.full_title_path = path.iter().map(|t| strip_ansi(t).into_owned()).collect();
    }
    record.duration = subject.duration;
    record.result = result_of(subject);
    record.root = subject.root;
    record.error = explicit_err.or(subject.err.as_ref()).map(normalize_error);
    record.timed_out = subject.timed_out;
    record
}

fn result_of(subject: &Subject) -> Option<TestResult> {
    match subject.state {
        Some(TestState::Passed) => Some(TestResult::Passed),
        Some(TestState::Failed) => Some(TestResult::Failed),
        None if subject.pending => Some(TestResult::Pending),
        None => None,
    }
}
