//! メモリ上に行を溜める EventLog 実装（テスト・組み込み用）

use crate::domain::LogRecord;
use crate::error::Error;
use crate::ports::outbound::EventLog;
use std::sync::{Arc, Mutex};

/// シリアライズ済みの行をメモリに保持する EventLog
///
/// clone したハンドル同士で同じバッファを共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    lines: Arc<Mutex<Vec<String>>>,
    prepared: Arc<Mutex<Vec<bool>>>,
    fail_appends: bool,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// append が常に I/O エラーを返す（ディスクフル等の再現用）
    pub fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Self::default()
        }
    }

    /// 書かれた行（末尾の改行なし）
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// 各行を JSON として読み直したもの
    pub fn values(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }

    /// prepare に渡された append フラグの履歴
    pub fn prepare_calls(&self) -> Vec<bool> {
        self.prepared.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl EventLog for MemoryEventLog {
    fn prepare(&mut self, append: bool) -> Result<(), Error> {
        let mut prepared = self
            .prepared
            .lock()
            .map_err(|_| Error::system("memory log lock poisoned"))?;
        prepared.push(append);
        Ok(())
    }

    fn append(&mut self, record: &LogRecord) -> Result<(), Error> {
        if self.fail_appends {
            return Err(Error::io_msg("No space left on device"));
        }
        let line = serde_json::to_string(record)?;
        self.lines
            .lock()
            .map_err(|_| Error::system("memory log lock poisoned"))?
            .push(line);
        Ok(())
    }
}
