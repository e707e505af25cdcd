//! イベント列から累積カウンタを数える StatsSource 実装
//!
//! ホストフレームワークの統計コレクタと同じ規則で数える。
//! レコーダより先に `observe` を呼ぶこと（記録時点のカウンタに反映させるため）。

use crate::domain::{EventType, StatsSnapshot, Subject};
use crate::ports::outbound::{Clock, StatsSource};
use std::sync::{Arc, Mutex};

/// 累積カウンタ（内部で可変、外へはコピーだけを渡す）
pub struct StatsCollector {
    clock: Arc<dyn Clock>,
    stats: Mutex<StatsSnapshot>,
}

impl StatsCollector {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            stats: Mutex::new(StatsSnapshot::default()),
        }
    }

    /// 1 イベント分カウンタを進める
    pub fn observe(&self, event_type: EventType, subject: Option<&Subject>) {
        let Ok(mut stats) = self.stats.lock() else {
            return;
        };
        match event_type {
            EventType::RunBegin => {
                if stats.start.is_none() {
                    stats.start = Some(self.clock.now());
                }
            }
            EventType::SuiteBegin => {
                if !subject.map(|s| s.root).unwrap_or(false) {
                    stats.suites += 1;
                }
            }
            EventType::TestPass => stats.passes += 1,
            EventType::TestFail => stats.failures += 1,
            EventType::TestPending => stats.pending += 1,
            EventType::TestEnd => stats.tests += 1,
            EventType::RunEnd => {
                if stats.end.is_none() {
                    let end = self.clock.now();
                    stats.end = Some(end);
                    stats.duration = stats
                        .start
                        .map(|start| (end - start).num_milliseconds().max(0) as u64);
                }
            }
            _ => {}
        }
    }
}

impl StatsSource for StatsCollector {
    fn snapshot(&self) -> StatsSnapshot {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }
}
