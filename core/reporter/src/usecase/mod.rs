//! ユースケース層：正規化・diff・レコード組み立て・run 調停・タイムアウト監視

pub mod coordinator;
pub mod diff;
pub mod error_normalizer;
pub mod event_pump;
pub mod record_builder;
pub mod reporter;
pub mod supervisor;
pub mod watchdog;

pub use coordinator::{CoordinatorPorts, RunCoordinator, RunPhase};
pub use diff::{canonical_stringify, unified_diff};
pub use error_normalizer::normalize_error;
pub use event_pump::EventPump;
pub use record_builder::build_record;
pub use reporter::Reporter;
pub use supervisor::Supervisor;
pub use watchdog::Watchdog;
