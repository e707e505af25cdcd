//! ライフサイクルイベント種別
//!
//! ホストのテストフレームワークが発火するイベント名（wire 名）にそのまま対応する。

use serde::{Deserialize, Serialize};

/// ライフサイクルイベント種別（閉じた列挙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "start")]
    RunBegin,
    #[serde(rename = "end")]
    RunEnd,
    #[serde(rename = "suite")]
    SuiteBegin,
    #[serde(rename = "suite end")]
    SuiteEnd,
    #[serde(rename = "hook")]
    HookBegin,
    #[serde(rename = "hook end")]
    HookEnd,
    #[serde(rename = "test")]
    TestBegin,
    #[serde(rename = "pass")]
    TestPass,
    #[serde(rename = "fail")]
    TestFail,
    #[serde(rename = "pending")]
    TestPending,
    #[serde(rename = "waiting")]
    DelayBegin,
    #[serde(rename = "ready")]
    DelayEnd,
    #[serde(rename = "test end")]
    TestEnd,
    #[serde(rename = "retry")]
    TestRetry,
}

impl EventType {
    pub const ALL: [EventType; 14] = [
        EventType::RunBegin,
        EventType::RunEnd,
        EventType::SuiteBegin,
        EventType::SuiteEnd,
        EventType::HookBegin,
        EventType::HookEnd,
        EventType::TestBegin,
        EventType::TestPass,
        EventType::TestFail,
        EventType::TestPending,
        EventType::DelayBegin,
        EventType::DelayEnd,
        EventType::TestEnd,
        EventType::TestRetry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RunBegin => "start",
            EventType::RunEnd => "end",
            EventType::SuiteBegin => "suite",
            EventType::SuiteEnd => "suite end",
            EventType::HookBegin => "hook",
            EventType::HookEnd => "hook end",
            EventType::TestBegin => "test",
            EventType::TestPass => "pass",
            EventType::TestFail => "fail",
            EventType::TestPending => "pending",
            EventType::DelayBegin => "waiting",
            EventType::DelayEnd => "ready",
            EventType::TestEnd => "test end",
            EventType::TestRetry => "retry",
        }
    }

    /// wire 名から解決する
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// ログに 1 行として記録するイベントか（任意イベントは統計にのみ使う）
    pub fn is_recorded(&self) -> bool {
        !matches!(
            self,
            EventType::DelayBegin | EventType::DelayEnd | EventType::TestEnd | EventType::TestRetry
        )
    }

    /// subject に新しい ID を採番するイベントか
    pub fn assigns_id(&self) -> bool {
        matches!(
            self,
            EventType::SuiteBegin | EventType::HookBegin | EventType::TestBegin
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
