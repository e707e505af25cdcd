//! レポーター設定
//!
//! ホストフレームワークの reporter options（文字列 key=value）と同じ解釈をする。

use crate::error::Error;
use std::path::{Path, PathBuf};

/// 出力ディレクトリの既定値
pub const DEFAULT_DIR: &str = "reports";
/// 出力ファイル名の既定値（ディレクトリ指定時にも付与する）
pub const DEFAULT_FILENAME: &str = "report.ldjson";

/// レポーター設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterOptions {
    pub output_path: Option<String>,
    pub append: bool,
    /// 全体タイムアウト（ms）。None ならウォッチドッグは無効。
    pub overall_timeout_ms: Option<u64>,
    pub exit_on_timeout: bool,
}

impl ReporterOptions {
    /// `key=value` の組から設定を作る。未知のキーは無視する。
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut opts = Self::default();
        for (key, value) in pairs {
            match key {
                "outputPath" => {
                    opts.output_path = Some(value.to_string()).filter(|s| !s.is_empty())
                }
                "append" => opts.append = parse_truthy(value),
                "overallTimeoutMs" => opts.overall_timeout_ms = parse_timeout_ms(value)?,
                "exitOnTimeout" | "trapAndExit" => opts.exit_on_timeout = parse_truthy(value),
                _ => {}
            }
        }
        Ok(opts)
    }

    /// 実際に書き出すファイルパス
    pub fn resolved_output_path(&self) -> PathBuf {
        resolve_output_path(self.output_path.as_deref())
    }
}

/// `"key=value"` を分割する（`=` が無ければ値は `"true"`）
pub fn split_pair(raw: &str) -> (&str, &str) {
    match raw.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => (raw.trim(), "true"),
    }
}

/// 真偽値として解釈する（true, t, yes, y, on, 1 のみ真）
pub fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "yes" | "y" | "on" | "1"
    )
}

/// 先頭の 10 進数字列をミリ秒として読む。0 は無効化。
pub fn parse_timeout_ms(value: &str) -> Result<Option<u64>, Error> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Err(Error::invalid_argument(format!(
            "overallTimeoutMs must be a number of milliseconds, got '{}'",
            value
        )));
    }
    let ms: u64 = digits.parse().map_err(|_| {
        Error::invalid_argument(format!("overallTimeoutMs is out of range: '{}'", value))
    })?;
    Ok(Some(ms).filter(|ms| *ms > 0))
}

/// 出力パスを解決する。
///
/// 未指定なら `reports/report.ldjson`。拡張子の無いパスはディレクトリとみなし
/// `report.ldjson` を付ける。それ以外はそのまま使う。
pub fn resolve_output_path(configured: Option<&str>) -> PathBuf {
    let path = match configured.filter(|s| !s.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => return Path::new(DEFAULT_DIR).join(DEFAULT_FILENAME),
    };
    match path.extension() {
        Some(ext) if !ext.is_empty() => path,
        _ => path.join(DEFAULT_FILENAME),
    }
}
