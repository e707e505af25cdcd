//! 統計 Outbound ポート
//!
//! ホストが所有する累積カウンタを読み取り専用で参照する。
//! 呼ぶたびにコピーを返し、レコードはライブ参照を保持しない。

use crate::domain::StatsSnapshot;

pub trait StatsSource: Send + Sync {
    fn snapshot(&self) -> StatsSnapshot;
}
