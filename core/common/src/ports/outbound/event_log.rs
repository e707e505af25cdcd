//! 出力ログ（ldjson）Outbound ポート
//!
//! 1 レコード = 1 行。書いた行は書き換えない。呼び出し順がそのまま行の順になる。

use crate::domain::LogRecord;
use crate::error::Error;

/// append-only の出力ログ
pub trait EventLog: Send {
    /// 起動時に 1 回だけ呼ぶ。`append` が false なら既存ファイルを消し、
    /// 親ディレクトリとファイルが存在する状態にする。失敗は致命的。
    fn prepare(&mut self, append: bool) -> Result<(), Error>;

    /// 1 レコードを 1 行として追記する。失敗は呼び出し元へそのまま返す（再試行しない）。
    fn append(&mut self, record: &LogRecord) -> Result<(), Error>;
}
