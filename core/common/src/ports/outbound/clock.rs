//! 時刻取得 Outbound ポート
//!
//! タイムスタンプ・経過時間・ID 生成はすべてこの trait 経由で現在時刻を得る。
//! テストでは固定時刻を返す実装を渡す。

use chrono::{DateTime, Utc};

/// 時刻取得の抽象
pub trait Clock: Send + Sync {
    /// 現在時刻（UTC）
    fn now(&self) -> DateTime<Utc>;

    /// 現在時刻をミリ秒（Unix epoch）で返す
    fn now_ms(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or_default()
    }
}
