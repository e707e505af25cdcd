//! エラーハンドリング
//!
//! 全クレート共通のエラー型。終了コードへの対応付けもここに集約する。

/// ウォッチドッグ発火時に付与する予約エラーコード
pub const TIMEOUT_CODE: &str = "RUN_TIMEOUT";

/// ウォッチドッグによる終了時の予約終了コード
pub const TIMEOUT_EXIT_CODE: i32 = 30;

/// 引数不正（usage）時の終了コード
pub const USAGE_EXIT_CODE: i32 = 64;

/// その他すべての失敗の終了コード
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 出力ファイルの準備・追記など I/O 失敗（常に致命的）
    #[error("{0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    System(String),
    /// 全体タイムアウト（ウォッチドッグ）。ログに記録された後に返される。
    #[error("Routine timed out")]
    RunTimedOut { timeout_ms: Option<u64> },
}

impl Error {
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    pub fn run_timed_out(timeout_ms: Option<u64>) -> Self {
        Self::RunTimedOut { timeout_ms }
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RunTimedOut { .. })
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RunTimedOut { .. } => TIMEOUT_EXIT_CODE,
            Self::InvalidArgument(_) => USAGE_EXIT_CODE,
            Self::Io(_) | Self::Json(_) | Self::System(_) => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
