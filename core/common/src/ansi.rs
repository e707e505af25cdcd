//! 端末の色・制御シーケンス（ANSI エスケープ）除去

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn ansi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI / OSC の両方（ESC または 8bit CSI 始まり）
        Regex::new(concat!(
            r"[\x1b\x{9b}][\[\]()#;?]*",
            r"(?:(?:(?:(?:;[-a-zA-Z\d/#&.:=?%@~_]+)*|[a-zA-Z\d]+(?:;[-a-zA-Z\d/#&.:=?%@~_]*)*)?\x07)",
            r"|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PR-TZcf-nq-uy=><~]))",
        ))
        .expect("ANSI pattern is valid")
    })
}

/// 文字列から ANSI エスケープシーケンスを取り除く
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ansi_regex().replace_all(s, "")
}
