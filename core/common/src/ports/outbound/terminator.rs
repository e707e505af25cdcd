//! プロセス終了 Outbound ポート
//!
//! supervisor が終了コードを決めた後、実際にプロセスを終わらせる。
//! テストでは終了コードを記録するだけの実装を渡す。

pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}
