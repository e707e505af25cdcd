//! テスト用の時計・終了トラップ・ホスト役

use crate::usecase::{CoordinatorPorts, Reporter, Supervisor};
use chrono::{DateTime, TimeZone, Utc};
use common::adapter::{MemoryEventLog, NoopLog, StatsCollector, StdClock, StdIdGenerator};
use common::domain::{ErrorLike, EventType, RecordId, ReporterOptions, Subject};
use common::error::Error;
use common::ports::outbound::{Clock, EventLog, Terminator};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn arc() -> Arc<dyn Clock> {
        Arc::new(Self(Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// terminate を呼ばれた終了コードを記録するだけ
#[derive(Default)]
pub struct RecordingTerminator(pub Mutex<Vec<i32>>);

impl RecordingTerminator {
    pub fn codes(&self) -> Vec<i32> {
        self.0.lock().unwrap().clone()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.0.lock().unwrap().push(code);
    }
}

/// ホスト役: 統計を数えてからレコーダに渡す
pub struct Host {
    pub reporter: Reporter,
    pub stats: Arc<StatsCollector>,
    pub terminator: Arc<RecordingTerminator>,
}

impl Host {
    pub fn with_log(options: ReporterOptions, clock: Arc<dyn Clock>, log: Box<dyn EventLog>) -> Self {
        let stats = Arc::new(StatsCollector::new(clock.clone()));
        let terminator = Arc::new(RecordingTerminator::default());
        let supervisor = Arc::new(Supervisor::new(
            options.exit_on_timeout,
            terminator.clone(),
            Arc::new(NoopLog),
        ));
        let ports = CoordinatorPorts {
            log,
            stats: stats.clone(),
            clock: clock.clone(),
            ids: Arc::new(StdIdGenerator::with_salt(clock, 0)),
            logger: Arc::new(NoopLog),
        };
        Self {
            reporter: Reporter::new(&options, ports, supervisor).unwrap(),
            stats,
            terminator,
        }
    }

    /// メモリログ + 実時計
    pub fn in_memory(options: ReporterOptions) -> (Self, MemoryEventLog) {
        let mem = MemoryEventLog::new();
        let host = Self::with_log(options, Arc::new(StdClock), Box::new(mem.clone()));
        (host, mem)
    }

    pub fn emit(
        &self,
        event_type: EventType,
        subject: Option<&Subject>,
        err: Option<&ErrorLike>,
    ) -> Result<Option<RecordId>, Error> {
        self.stats.observe(event_type, subject);
        self.reporter.handle(event_type, subject, err)
    }

    /// エラー無しのイベントを送る（失敗はテスト失敗）
    pub fn send(&self, event_type: EventType, subject: &Subject) {
        self.emit(event_type, Some(subject), None).unwrap();
    }

    pub fn hook(&self, suite: &str, key: &str, title: &str) {
        let hook = Subject::new(key, &[suite, title]).with_file(FILE);
        self.send(EventType::HookBegin, &hook);
        self.send(EventType::HookEnd, &hook);
    }

    /// 1 本のテストを begin → 結果 → test end まで流す
    pub fn test(&self, path: &[&str], key: &str, outcome: Outcome) {
        let test = Subject::new(key, path).with_file(FILE);
        match outcome {
            Outcome::Pass => {
                self.send(EventType::TestBegin, &test);
                self.send(EventType::TestPass, &test.clone().passed(1));
            }
            Outcome::Fail(err) => {
                self.send(EventType::TestBegin, &test);
                let failed = test.clone().failed(1, err.clone());
                self.emit(EventType::TestFail, Some(&failed), Some(&err)).unwrap();
            }
            Outcome::Skip => {
                self.send(EventType::TestPending, &test.clone().skipped());
            }
        }
        self.emit(EventType::TestEnd, Some(&test), None).unwrap();
    }
}

pub const FILE: &str = "/work/test/example.test.js";

pub enum Outcome {
    Pass,
    Fail(ErrorLike),
    Skip,
}

pub fn assertion_error(actual: Value, expected: Value) -> ErrorLike {
    ErrorLike::new("AssertionError", "Expected values to be strictly equal")
        .with_stack("AssertionError [ERR_ASSERTION]: Expected values to be strictly equal\n    at Context.<anonymous> (example.test.js:5:12)")
        .with_values(actual, expected)
}

/// 1 suite・全種の hook・1 テスト（pass）
pub fn run_single_passing(host: &Host) {
    let root = Subject::root_suite("root");
    let suite = Subject::new("s1", &["passing suite"]).with_file(FILE);
    host.emit(EventType::RunBegin, None, None).unwrap();
    host.send(EventType::SuiteBegin, &root);
    host.send(EventType::SuiteBegin, &suite);
    host.hook("passing suite", "h-before-all", "\"before all\" hook");
    let test = Subject::new("t1", &["passing suite", "passing test"]).with_file(FILE);
    host.send(EventType::TestBegin, &test);
    host.hook("passing suite", "h-before-each", "\"before each\" hook");
    host.send(EventType::TestPass, &test.clone().passed(2));
    host.hook("passing suite", "h-after-each", "\"after each\" hook");
    host.emit(EventType::TestEnd, Some(&test), None).unwrap();
    host.hook("passing suite", "h-after-all", "\"after all\" hook");
    host.send(EventType::SuiteEnd, &suite);
    host.send(EventType::SuiteEnd, &root);
    host.emit(EventType::RunEnd, None, None).unwrap();
}

/// 2 suite・入れ子・pass / fail / skip の混在
pub fn run_mixed(host: &Host) {
    let root = Subject::root_suite("root");
    host.emit(EventType::RunBegin, None, None).unwrap();
    host.send(EventType::SuiteBegin, &root);

    let s1 = Subject::new("s1", &["suite 1"]).with_file(FILE);
    host.send(EventType::SuiteBegin, &s1);
    host.test(&["suite 1", "test pass"], "t1", Outcome::Pass);
    host.test(
        &["suite 1", "test fail"],
        "t2",
        Outcome::Fail(assertion_error(Value::Null, Value::Bool(true))),
    );
    host.test(&["suite 1", "skipped test"], "t3", Outcome::Skip);
    let nested = Subject::new("s1a", &["suite 1", "nested describe"]).with_file(FILE);
    host.send(EventType::SuiteBegin, &nested);
    host.test(&["suite 1", "nested describe", "nested test pass"], "t4", Outcome::Pass);
    host.test(
        &["suite 1", "nested describe", "nested test fail"],
        "t5",
        Outcome::Fail(assertion_error(Value::Null, Value::Bool(true))),
    );
    host.send(EventType::SuiteEnd, &nested);
    host.send(EventType::SuiteEnd, &s1);

    let s2 = Subject::new("s2", &["suite 2"]).with_file(FILE);
    host.send(EventType::SuiteBegin, &s2);
    host.test(&["suite 2", "suite2 pass"], "t6", Outcome::Pass);
    host.send(EventType::SuiteEnd, &s2);

    host.send(EventType::SuiteEnd, &root);
    host.emit(EventType::RunEnd, None, None).unwrap();
}
