//! 投げられたエラーを記録用の形に正規化する
//!
//! 失敗しない。欠けている項目は単に出力から落とす。

use super::diff::{diff_values, same_kind};
use common::ansi::strip_ansi;
use common::domain::{ErrorLike, NormalizedError};

/// ErrorLike → NormalizedError
///
/// - message: name と message が両方あれば `"{name}: {message}"`、無ければ stack の 1 行目
/// - stack: そのまま（色は除去）
/// - diff: diff 抑止されておらず actual / expected が同じ種類の値のとき
/// - code: そのまま
pub fn normalize_error(err: &ErrorLike) -> NormalizedError {
    let name = present(&err.name);
    let stack = present(&err.stack).map(|s| strip_ansi(s).into_owned());

    let message = match (name, present(&err.message)) {
        (Some(name), Some(message)) => Some(format!("{}: {}", name, strip_ansi(message))),
        _ => stack
            .as_deref()
            .map(|s| s.split('\n').next().unwrap_or_default().to_string()),
    };

    NormalizedError {
        message,
        stack,
        diff: diff_of(err),
        code: err.code.clone(),
    }
}

fn diff_of(err: &ErrorLike) -> Option<String> {
    if err.show_diff == Some(false) {
        return None;
    }
    match (&err.actual, &err.expected) {
        (Some(actual), Some(expected)) if same_kind(actual, expected) => {
            Some(diff_values(actual, expected))
        }
        _ => None,
    }
}

/// 空文字列は「無い」扱い
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
