//! Inbound ポート: ホスト（インプロセスのテストフレームワーク・CLI のイベントポンプ）が
//! レコーダを呼び出すインターフェース

use common::domain::{ErrorLike, EventType, RecordId, Subject};
use common::error::Error;

/// ライフサイクルイベントを 1 件ずつ受け取る
///
/// 実装は usecase::Reporter。
pub trait LifecycleRecorder: Send + Sync {
    /// イベントを記録する。begin 系は新しい ID、end 系は対応する begin の ID を返す。
    fn handle(
        &self,
        event_type: EventType,
        subject: Option<&Subject>,
        err: Option<&ErrorLike>,
    ) -> Result<Option<RecordId>, Error>;
}
