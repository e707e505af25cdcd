//! 全体タイムアウトのワンショットタイマー
//!
//! 専用スレッドで待ち、時間内に解除されなければ `on_fire` を 1 回だけ呼ぶ。
//! 解除は送信側を落とすだけで伝わる（受信側は切断を「解除」とみなす）。

use common::error::Error;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Watchdog {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Watchdog {
    /// タイマーを開始する
    pub fn arm<F>(timeout: Duration, on_fire: F) -> Result<Self, Error>
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("ldjson-watchdog".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(timeout) {
                    on_fire();
                }
            })
            .map_err(|e| Error::system(format!("Failed to start watchdog: {}", e)))?;
        Ok(Self {
            cancel: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }

    /// タイマーを解除してスレッドの終了を待つ。2 回目以降は何もしない。
    ///
    /// 既に発火していた場合は `on_fire` の完了を待つことになる。
    /// 戻り値: この呼び出しで解除したか
    pub fn disarm(&mut self) -> bool {
        let Some(tx) = self.cancel.take() else {
            return false;
        };
        drop(tx);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        true
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        // join はしない（発火中の on_fire を待つとロック順によっては詰まる）
        self.cancel.take();
    }
}
