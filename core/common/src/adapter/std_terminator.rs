//! std::process::exit で終了する Terminator 実装

use crate::ports::outbound::Terminator;

#[derive(Debug, Clone, Default)]
pub struct StdTerminator;

impl Terminator for StdTerminator {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}
