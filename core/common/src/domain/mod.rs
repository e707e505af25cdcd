//! ドメイン型（Newtype）
//!
//! String を直接運ばず、意味のある型に包んで境界を明確にする。

pub mod event;
pub mod options;
pub mod record;
pub mod stats;
pub mod subject;

use serde::{Deserialize, Serialize};

pub use event::EventType;
pub use options::ReporterOptions;
pub use record::{EventRecord, LogRecord, NormalizedError, TestResult};
pub use stats::StatsSnapshot;
pub use subject::{ErrorCode, ErrorLike, Subject, TestState};

/// レコード ID（13文字 base62、同じジェネレータ内では辞書順＝時系列）
///
/// suite / hook / test の 1 インスタンスにつき begin 時に 1 回だけ採番し、
/// 対応する end 系イベントでも同じ値を使う。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for RecordId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// ホスト側の subject 識別子（begin/end の対応付けにのみ使う）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectKey(String);

impl SubjectKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for SubjectKey {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SubjectKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SubjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
