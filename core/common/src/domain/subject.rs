//! イベントの対象（suite / hook / test）とそれに付随するエラー
//!
//! ホストが持つ可変オブジェクトのうち、記録に必要な項目だけを値として受け取る。
//! どの項目も欠けていてよい（記録側で既定値に落とす）。

use super::{RecordId, SubjectKey};
use crate::error::TIMEOUT_CODE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// テストの完了状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Passed,
    Failed,
}

/// エラーコード（文字列または数値のどちらもあり得る）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Text(String),
    Number(i64),
}

impl ErrorCode {
    /// ウォッチドッグの予約コード
    pub fn timeout() -> Self {
        Self::Text(TIMEOUT_CODE.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Text(s) if s == TIMEOUT_CODE)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// 投げられたエラー／アサーションエラー相当
///
/// `actual` / `expected` は `None` が「無い」、`Some(Value::Null)` が「null がある」。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLike {
    pub name: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
    pub code: Option<ErrorCode>,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub show_diff: Option<bool>,
}

impl ErrorLike {
    /// name + message だけのエラー
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// ウォッチドッグが合成する致命的エラー
    pub fn run_timeout() -> Self {
        Self {
            code: Some(ErrorCode::timeout()),
            ..Self::new("Error", "Routine timed out")
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// actual / expected を付ける（diff 生成の入力）
    pub fn with_values(mut self, actual: Value, expected: Value) -> Self {
        self.actual = Some(actual);
        self.expected = Some(expected);
        self
    }
}

/// イベントの対象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subject {
    /// begin/end を対応付けるためのホスト側識別子
    pub key: Option<SubjectKey>,
    /// begin 時に返された ID をホストが持ち回す場合に渡す（registry より優先）
    pub record_id: Option<RecordId>,
    pub title: Option<String>,
    /// 祖先から自身までのタイトル列。None は「タイトル階層を持たない」。
    pub title_path: Option<Vec<String>>,
    pub file: Option<String>,
    pub state: Option<TestState>,
    pub pending: bool,
    /// 実行時間（ms）
    pub duration: Option<u64>,
    pub err: Option<ErrorLike>,
    pub root: bool,
    pub timed_out: bool,
}

impl Subject {
    /// key とタイトル階層から subject を作る。title は階層の末尾。
    pub fn new(key: impl Into<SubjectKey>, title_path: &[&str]) -> Self {
        Self {
            key: Some(key.into()),
            title: title_path.last().map(|t| t.to_string()),
            title_path: Some(title_path.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    /// ルート suite（タイトル無し・階層は空）
    pub fn root_suite(key: impl Into<SubjectKey>) -> Self {
        Self {
            key: Some(key.into()),
            title: Some(String::new()),
            title_path: Some(Vec::new()),
            root: true,
            ..Default::default()
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn passed(mut self, duration: u64) -> Self {
        self.state = Some(TestState::Passed);
        self.duration = Some(duration);
        self
    }

    pub fn failed(mut self, duration: u64, err: ErrorLike) -> Self {
        self.state = Some(TestState::Failed);
        self.duration = Some(duration);
        self.err = Some(err);
        self
    }

    pub fn with_record_id(mut self, id: RecordId) -> Self {
        self.record_id = Some(id);
        self
    }

    pub fn skipped(mut self) -> Self {
        self.pending = true;
        self
    }
}
