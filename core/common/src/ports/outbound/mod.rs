//! Outbound ポート: レコーダが外界（FS・時刻・ID・出力ログ・統計・プロセス終了）を使うための trait

pub mod clock;
pub mod event_log;
pub mod fs;
pub mod id_generator;
pub mod log;
pub mod stats_source;
pub mod terminator;

pub use clock::Clock;
pub use event_log::EventLog;
pub use fs::{FileMetadata, FileSystem};
pub use id_generator::IdGenerator;
pub use log::{now_iso8601, Log, LogEntry, LogLevel};
pub use stats_source::StatsSource;
pub use terminator::Terminator;
