//! ldjson レポーター共通ライブラリ
//!
//! ドメイン型・Outbound ポート・標準アダプタ・エラー型を提供する。

/// エラーハンドリング
pub mod error;

/// ドメイン型（イベント種別・subject・レコード・統計・設定）
pub mod domain;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// ANSI エスケープ除去
pub mod ansi;
