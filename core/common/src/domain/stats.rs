//! 統計スナップショット
//!
//! ホストが持つ累積カウンタのある時点のコピー。参照は保持しない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 時刻を ISO8601 UTC（ミリ秒・`Z`）で出力する serde ヘルパ
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(ts))
    }

    pub mod option {
        use super::format;
        use chrono::{DateTime, Utc};
        use serde::Serializer;

        pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => s.serialize_str(&format(ts)),
                None => s.serialize_none(),
            }
        }
    }
}

/// 累積カウンタのスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub suites: u64,
    pub tests: u64,
    pub passes: u64,
    pub pending: u64,
    pub failures: u64,
    #[serde(serialize_with = "iso8601::option::serialize")]
    pub start: Option<DateTime<Utc>>,
    #[serde(serialize_with = "iso8601::option::serialize")]
    pub end: Option<DateTime<Utc>>,
    /// run 終了までは None（ms）
    pub duration: Option<u64>,
}
