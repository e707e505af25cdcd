//! プロセス外ホストのイベント列をレコーダへ流す
//!
//! 統計はホストから受け取れないので、ここで StatsCollector に数えさせてから記録する。

use crate::adapter::host_event::HostEvent;
use crate::ports::inbound::LifecycleRecorder;
use common::adapter::StatsCollector;
use common::error::Error;
use std::sync::Arc;

pub struct EventPump {
    stats: Arc<StatsCollector>,
    recorder: Arc<dyn LifecycleRecorder>,
}

impl EventPump {
    pub fn new(stats: Arc<StatsCollector>, recorder: Arc<dyn LifecycleRecorder>) -> Self {
        Self { stats, recorder }
    }

    /// 1 件流す
    pub fn push(&self, event: &HostEvent) -> Result<(), Error> {
        self.stats.observe(event.event_type, event.subject.as_ref());
        self.recorder
            .handle(event.event_type, event.subject.as_ref(), event.err.as_ref())?;
        Ok(())
    }

    /// 入力が尽きるか、最初のエラーまで流す。戻り値は流したイベント数。
    pub fn run<I>(&self, events: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = Result<HostEvent, Error>>,
    {
        let mut count = 0;
        for event in events {
            self.push(&event?)?;
            count += 1;
        }
        Ok(count)
    }
}
