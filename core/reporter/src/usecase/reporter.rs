//! ホストから見たレコーダ本体
//!
//! RunCoordinator を Mutex で包み、ウォッチドッグと Supervisor をつなぐ。
//! ウォッチドッグの書き込みもホストの書き込みも同じロックを通る。

use super::coordinator::{CoordinatorPorts, RunCoordinator, RunPhase};
use super::supervisor::Supervisor;
use super::watchdog::Watchdog;
use crate::ports::inbound::LifecycleRecorder;
use common::domain::{ErrorLike, EventType, RecordId, ReporterOptions, Subject};
use common::error::Error;
use common::ports::outbound::{Log, LogEntry, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub struct Reporter {
    coordinator: Arc<Mutex<RunCoordinator>>,
    watchdog: Mutex<Option<Watchdog>>,
    supervisor: Arc<Supervisor>,
    logger: Arc<dyn Log>,
}

impl Reporter {
    /// 出力ログを準備し、全体タイムアウトが設定されていればウォッチドッグを起動する
    ///
    /// exit-on-timeout の Supervisor なら panic トラップもここで登録する。
    pub fn new(
        options: &ReporterOptions,
        ports: CoordinatorPorts,
        supervisor: Arc<Supervisor>,
    ) -> Result<Self, Error> {
        supervisor.install_panic_trap();
        let logger = ports.logger.clone();
        let coordinator = Arc::new(Mutex::new(RunCoordinator::new(options, ports)?));
        let watchdog = match options.overall_timeout_ms {
            Some(ms) => Some(arm_watchdog(
                ms,
                coordinator.clone(),
                supervisor.clone(),
                logger.clone(),
            )?),
            None => None,
        };
        Ok(Self {
            coordinator,
            watchdog: Mutex::new(watchdog),
            supervisor,
            logger,
        })
    }

    /// イベント 1 件を記録する
    ///
    /// 既に致命的エラー（タイムアウト等）を受けていれば、それを返して何も書かない。
    pub fn handle(
        &self,
        event_type: EventType,
        subject: Option<&Subject>,
        err: Option<&ErrorLike>,
    ) -> Result<Option<RecordId>, Error> {
        self.supervisor.check()?;
        if event_type == EventType::RunEnd {
            // 書き込みロックを取る前に止める（発火中なら書き終わるのを待つ）
            self.disarm();
            self.supervisor.check()?;
        }
        let result = self.lock()?.handle(event_type, subject, err);
        if let Err(e) = &result {
            if e.is_timeout() {
                self.supervisor.deliver(e.clone());
            }
        }
        result
    }

    /// ウォッチドッグを止める。何度呼んでもよい。
    pub fn disarm(&self) {
        let disarmed = self
            .watchdog
            .lock()
            .ok()
            .and_then(|mut w| w.as_mut().map(Watchdog::disarm))
            .unwrap_or(false);
        if disarmed {
            let _ = self.logger.log(&LogEntry::new(
                LogLevel::Debug,
                "usecase",
                "watchdog",
                "watchdog disarmed",
            ));
        }
    }

    /// 受け取った致命的エラーがあれば Err
    pub fn check(&self) -> Result<(), Error> {
        self.supervisor.check()
    }

    pub fn phase(&self) -> Result<RunPhase, Error> {
        Ok(self.lock()?.phase())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RunCoordinator>, Error> {
        self.coordinator
            .lock()
            .map_err(|_| Error::system("run coordinator lock poisoned"))
    }
}

impl LifecycleRecorder for Reporter {
    fn handle(
        &self,
        event_type: EventType,
        subject: Option<&Subject>,
        err: Option<&ErrorLike>,
    ) -> Result<Option<RecordId>, Error> {
        Reporter::handle(self, event_type, subject, err)
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.disarm();
    }
}

fn arm_watchdog(
    timeout_ms: u64,
    coordinator: Arc<Mutex<RunCoordinator>>,
    supervisor: Arc<Supervisor>,
    logger: Arc<dyn Log>,
) -> Result<Watchdog, Error> {
    let _ = logger.log(
        &LogEntry::new(LogLevel::Debug, "usecase", "watchdog", "watchdog armed")
            .field("timeout_ms", timeout_ms),
    );
    let fire_logger = logger.clone();
    Watchdog::arm(Duration::from_millis(timeout_ms), move || {
        let _ = fire_logger.log(
            &LogEntry::new(LogLevel::Warn, "usecase", "watchdog", "Overall timeout met")
                .field("timeout_ms", timeout_ms),
        );
        let result = match coordinator.lock() {
            Ok(mut c) => c.record_timeout(),
            Err(_) => Err(Error::system("run coordinator lock poisoned")),
        };
        if let Err(e) = result {
            supervisor.deliver(e);
        }
    })
}
