//! reporter 固有のアダプタ（標準実装は common::adapter）

pub mod host_event;

pub use host_event::{parse_host_event, HostEvent, HostEventReader};
