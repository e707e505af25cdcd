//! actual / expected の行単位 unified diff
//!
//! hunk ヘッダと「No newline at end of file」は出さない。
//! 削除行（actual 側）は `- `、追加行（expected 側）は `+ `、hunk 内の変更なし行は ` ` を前置する。

use serde_json::{Map, Value};
use similar::{ChangeTag, TextDiff};

/// hunk の前後に残す変更なし行の数
const CONTEXT_RADIUS: usize = 4;

/// 2 つのテキストの diff。差分が無ければ空文字列。
pub fn unified_diff(actual: &str, expected: &str) -> String {
    let diff = TextDiff::from_lines(actual, expected);
    let mut out = String::new();
    for group in diff.grouped_ops(CONTEXT_RADIUS) {
        for op in &group {
            for change in diff.iter_changes(op) {
                let prefix = match change.tag() {
                    ChangeTag::Delete => "- ",
                    ChangeTag::Insert => "+ ",
                    ChangeTag::Equal => " ",
                };
                let line = change.value();
                out.push_str(prefix);
                out.push_str(line.strip_suffix('\n').unwrap_or(line));
                out.push('\n');
            }
        }
    }
    out
}

/// 値同士の diff。両方文字列ならそのまま、そうでなければ正規化した JSON で比べる。
pub fn diff_values(actual: &Value, expected: &Value) -> String {
    match (actual, expected) {
        (Value::String(a), Value::String(e)) => unified_diff(a, e),
        _ => unified_diff(&canonical_stringify(actual), &canonical_stringify(expected)),
    }
}

/// 値の種類が同じか（null / bool / number / string / array / object）
pub fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// キー順を固定したコンパクト JSON
pub fn canonical_stringify(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for k in keys {
                sorted.insert(k.clone(), sort_keys(&obj[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
