//! 1 回の run の状態と、ログへの書き込み経路
//!
//! ホストのイベントもウォッチドッグのタイムアウトも、すべて `write_event` を通る。
//! 呼び出し側（Reporter）が Mutex で直列化するので、行の順序は時間順になる。

use super::record_builder::build_record;
use chrono::{DateTime, Utc};
use common::domain::{
    ErrorLike, EventRecord, EventType, LogRecord, RecordId, ReporterOptions, Subject, SubjectKey,
    TestState,
};
use common::error::Error;
use common::ports::outbound::{Clock, EventLog, IdGenerator, Log, LogEntry, LogLevel, StatsSource};
use std::collections::HashMap;
use std::sync::Arc;

/// RunCoordinator が使う Outbound ポート一式
pub struct CoordinatorPorts {
    pub log: Box<dyn EventLog>,
    pub stats: Arc<dyn StatsSource>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub logger: Arc<dyn Log>,
}

/// run の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Running,
    Ended,
}

/// 実行中の test / hook（タイムアウト時の記録先）
#[derive(Debug, Clone)]
struct Running {
    id: RecordId,
    subject: Subject,
}

pub struct RunCoordinator {
    log: Box<dyn EventLog>,
    stats: Arc<dyn StatsSource>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    logger: Arc<dyn Log>,
    timeout_ms: Option<u64>,
    phase: RunPhase,
    timed_out: bool,
    /// ホストの統計に載らない、タイムアウトとして書いた fail の数
    synthesized_failures: u64,
    start: Option<DateTime<Utc>>,
    ids_by_subject: HashMap<SubjectKey, RecordId>,
    running: Vec<Running>,
}

impl RunCoordinator {
    /// 出力ログをこの時点で準備する（失敗は致命的）
    pub fn new(options: &ReporterOptions, ports: CoordinatorPorts) -> Result<Self, Error> {
        let CoordinatorPorts {
            mut log,
            stats,
            clock,
            ids,
            logger,
        } = ports;
        log.prepare(options.append)?;
        Ok(Self {
            log,
            stats,
            clock,
            ids,
            logger,
            timeout_ms: options.overall_timeout_ms,
            phase: RunPhase::NotStarted,
            timed_out: false,
            synthesized_failures: 0,
            start: None,
            ids_by_subject: HashMap::new(),
            running: Vec::new(),
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// タイムアウトレコードを書いたか
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// ホストのイベント 1 件を記録する
    ///
    /// begin 系では新しい ID を、end 系では対応する begin の ID を返す。
    pub fn handle(
        &mut self,
        event_type: EventType,
        subject: Option<&Subject>,
        err: Option<&ErrorLike>,
    ) -> Result<Option<RecordId>, Error> {
        if !event_type.is_recorded() {
            return Ok(None);
        }
        match event_type {
            EventType::RunBegin => {
                if self.phase != RunPhase::NotStarted {
                    return Ok(None);
                }
                self.phase = RunPhase::Running;
                self.start = Some(self.clock.now());
                self.note(LogLevel::Info, "run started");
                self.write_event(build_record(event_type, None, None, None))?;
                Ok(None)
            }
            EventType::RunEnd => {
                if self.phase == RunPhase::Ended {
                    return Ok(None);
                }
                self.phase = RunPhase::Ended;
                self.running.clear();
                self.note(LogLevel::Info, "run ended");
                self.write_event(build_record(event_type, None, None, None))?;
                Ok(None)
            }
            t if t.assigns_id() => {
                let id = self.ids.next_id();
                if let Some(key) = subject.and_then(|s| s.key.clone()) {
                    self.ids_by_subject.insert(key, id.clone());
                }
                if matches!(t, EventType::HookBegin | EventType::TestBegin) {
                    if let Some(s) = subject {
                        self.running.push(Running {
                            id: id.clone(),
                            subject: s.clone(),
                        });
                    }
                }
                self.write_event(build_record(t, subject, Some(id.clone()), err))?;
                Ok(Some(id))
            }
            t => {
                let id = subject.and_then(|s| self.bound_id(s));
                if t != EventType::SuiteEnd {
                    if let Some(id) = &id {
                        self.finish_running(id);
                    }
                }
                self.write_event(build_record(t, subject, id.clone(), err))?;
                Ok(id)
            }
        }
    }

    /// 全体タイムアウトを記録する
    ///
    /// 実行中の一番内側の test / hook の `fail` として書き、`Error::RunTimedOut` を返す。
    /// run が終わっていれば何もしない。
    pub fn record_timeout(&mut self) -> Result<(), Error> {
        if self.phase == RunPhase::Ended || self.timed_out {
            return Ok(());
        }
        let (subject, id) = match self.running.last() {
            Some(r) => {
                let mut subject = r.subject.clone();
                subject.state = Some(TestState::Failed);
                (Some(subject), Some(r.id.clone()))
            }
            None => (None, None),
        };
        let err = ErrorLike::run_timeout();
        self.note(LogLevel::Warn, "overall timeout reached");
        self.synthesized_failures += 1;
        self.write_event(build_record(EventType::TestFail, subject.as_ref(), id, Some(&err)))
    }

    fn bound_id(&self, subject: &Subject) -> Option<RecordId> {
        subject.record_id.clone().or_else(|| {
            subject
                .key
                .as_ref()
                .and_then(|k| self.ids_by_subject.get(k).cloned())
        })
    }

    /// 終わった runnable と、その内側で終わらなかったものを外す
    fn finish_running(&mut self, id: &RecordId) {
        if let Some(pos) = self.running.iter().rposition(|r| &r.id == id) {
            self.running.truncate(pos);
        }
    }

    fn write_event(&mut self, mut data: EventRecord) -> Result<(), Error> {
        let timestamp = self.clock.now();
        let start = *self.start.get_or_insert(timestamp);
        let elapsed_ms = (timestamp - start).num_milliseconds();

        let timed_out = data.is_timeout();
        if timed_out {
            let title = timeout_title(self.timeout_ms);
            data.title = Some(title.clone());
            data.full_title = Some(title);
            if let Some(error) = data.error.as_mut() {
                error.stack = None;
            }
        }

        let mut stats = self.stats.snapshot();
        stats.failures += self.synthesized_failures;
        let record = LogRecord {
            data,
            stats,
            timestamp,
            elapsed_ms,
        };
        self.log.append(&record)?;

        if timed_out {
            self.timed_out = true;
            return Err(Error::run_timed_out(self.timeout_ms));
        }
        Ok(())
    }

    fn note(&self, level: LogLevel, message: &str) {
        let _ = self
            .logger
            .log(&LogEntry::new(level, "usecase", "lifecycle", message));
    }
}

/// タイムアウトレコードのタイトル
pub fn timeout_title(timeout_ms: Option<u64>) -> String {
    match timeout_ms {
        Some(ms) => format!("Routine timeout, exceeded: {} ms", ms),
        None => "Routine timeout".to_string(),
    }
}
