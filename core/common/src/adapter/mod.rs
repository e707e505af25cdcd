//! アダプター（Outbound ポートの標準実装）
//!
//! usecase はポートの trait 経由でのみファイル・時刻・ID・プロセスに触れる。
//! ここには標準実装（Std*）とテスト・組み込み用の実装を置く。

pub mod file_ldjson_log;
pub mod memory_event_log;
pub mod stats_collector;
pub mod std_clock;
pub mod std_fs;
pub mod std_id_generator;
pub mod std_terminator;
pub mod stderr_log;

pub use file_ldjson_log::FileLdjsonLog;
pub use memory_event_log::MemoryEventLog;
pub use stats_collector::StatsCollector;
pub use std_clock::StdClock;
pub use std_fs::StdFileSystem;
pub use std_id_generator::StdIdGenerator;
pub use std_terminator::StdTerminator;
pub use stderr_log::{NoopLog, StderrJsonLog};
