//! ポート定義（Inbound のみ。Outbound は common にある）

pub mod inbound;
