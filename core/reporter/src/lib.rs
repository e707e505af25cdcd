//! ldjson レポーター
//!
//! テスト実行のライフサイクルイベントを 1 行 1 JSON のログに記録し、
//! 全体タイムアウトを監視する。インプロセスのホストは `usecase::Reporter` を直接、
//! プロセス外のホストは `ldjson-report` バイナリ（stdin）を使う。

pub mod adapter;
pub mod cli;
pub mod ports;
pub mod usecase;
pub mod wiring;

#[cfg(test)]
mod tests;
