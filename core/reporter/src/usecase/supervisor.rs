//! 致命的エラーの受け口
//!
//! ウォッチドッグやホスト由来の致命的エラーはここへ渡す。
//! exit-on-timeout なら診断を出してプロセスを終了し、そうでなければ保持して
//! 次に Reporter を呼んだホストへ返す。ホストがプロセスそのもの（CLI）なら
//! terminate-on-fatal で、保持したうえでエラーの終了コードで終了する。

use common::error::{Error, GENERIC_FAILURE_EXIT_CODE, TIMEOUT_EXIT_CODE};
use common::ports::outbound::{Log, LogEntry, LogLevel, Terminator};
use std::fmt::Display;
use std::sync::{Arc, Mutex, Once};

static PANIC_TRAP: Once = Once::new();

pub struct Supervisor {
    exit_on_timeout: bool,
    terminate_on_fatal: bool,
    terminator: Arc<dyn Terminator>,
    logger: Arc<dyn Log>,
    fatal: Mutex<Option<Error>>,
}

impl Supervisor {
    pub fn new(exit_on_timeout: bool, terminator: Arc<dyn Terminator>, logger: Arc<dyn Log>) -> Self {
        Self {
            exit_on_timeout,
            terminate_on_fatal: false,
            terminator,
            logger,
            fatal: Mutex::new(None),
        }
    }

    /// exit-on-timeout でなくても、致命的エラーを受けたらプロセスを終える
    pub fn with_terminate_on_fatal(mut self) -> Self {
        self.terminate_on_fatal = true;
        self
    }

    /// 捕捉されなかった panic でもプロセスを終了させる（プロセスにつき 1 回だけ登録）
    pub fn install_panic_trap(&self) {
        if !self.exit_on_timeout {
            return;
        }
        let terminator = self.terminator.clone();
        PANIC_TRAP.call_once(move || {
            std::panic::set_hook(Box::new(move |info| {
                trap_uncaught(terminator.as_ref(), info);
            }));
        });
        let _ = self.logger.log(&LogEntry::new(
            LogLevel::Debug,
            "usecase",
            "fatal",
            "panic trap installed",
        ));
    }

    /// panic トラップが登録済みか
    pub fn panic_trap_installed() -> bool {
        PANIC_TRAP.is_completed()
    }

    /// 致命的エラーを受け取る
    pub fn deliver(&self, err: Error) {
        let _ = self.logger.log(
            &LogEntry::new(LogLevel::Error, "usecase", "fatal", err.to_string())
                .field("exit_on_timeout", self.exit_on_timeout),
        );
        if let Ok(mut fatal) = self.fatal.lock() {
            fatal.get_or_insert(err.clone());
        }
        if self.exit_on_timeout {
            if err.is_timeout() {
                eprintln!("Routine timed out");
                self.terminator.terminate(TIMEOUT_EXIT_CODE);
            } else {
                trap_uncaught(self.terminator.as_ref(), &err);
            }
        } else if self.terminate_on_fatal {
            eprintln!("{}", err);
            self.terminator.terminate(err.exit_code());
        }
    }

    /// 保持している致命的エラー
    pub fn fatal(&self) -> Option<Error> {
        self.fatal.lock().ok().and_then(|f| f.clone())
    }

    /// 致命的エラーを受け取っていれば Err
    pub fn check(&self) -> Result<(), Error> {
        match self.fatal() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// トラップ下の想定外の失敗: 診断を出して 1 で終える
fn trap_uncaught(terminator: &dyn Terminator, cause: &dyn Display) {
    eprintln!("Uncaught exception: {}", cause);
    terminator.terminate(GENERIC_FAILURE_EXIT_CODE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::NoopLog;

    #[derive(Default)]
    struct RecordingTerminator(Mutex<Vec<i32>>);

    impl Terminator for RecordingTerminator {
        fn terminate(&self, code: i32) {
            self.0.lock().unwrap().push(code);
        }
    }

    #[test]
    fn test_without_trap_error_is_kept_for_the_host() {
        let term = Arc::new(RecordingTerminator::default());
        let s = Supervisor::new(false, term.clone(), Arc::new(NoopLog));
        assert!(s.check().is_ok());
        s.deliver(Error::run_timed_out(Some(50)));
        assert_eq!(s.check(), Err(Error::run_timed_out(Some(50))));
        assert!(term.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_first_fatal_error_is_kept() {
        let s = Supervisor::new(false, Arc::new(RecordingTerminator::default()), Arc::new(NoopLog));
        s.deliver(Error::run_timed_out(Some(5)));
        s.deliver(Error::io_msg("disk full"));
        assert!(s.fatal().unwrap().is_timeout());
    }

    #[test]
    fn test_with_trap_timeout_exits_30_and_others_exit_1() {
        let term = Arc::new(RecordingTerminator::default());
        let s = Supervisor::new(true, term.clone(), Arc::new(NoopLog));
        s.deliver(Error::run_timed_out(Some(50)));
        s.deliver(Error::io_msg("disk full"));
        s.deliver(Error::invalid_argument("not a usage error here"));
        assert_eq!(*term.0.lock().unwrap(), vec![30, 1, 1]);
    }

    #[test]
    fn test_terminate_on_fatal_exits_with_the_error_code() {
        let term = Arc::new(RecordingTerminator::default());
        let s = Supervisor::new(false, term.clone(), Arc::new(NoopLog)).with_terminate_on_fatal();
        s.deliver(Error::run_timed_out(Some(50)));
        s.deliver(Error::io_msg("disk full"));
        assert_eq!(*term.0.lock().unwrap(), vec![30, 1]);
        assert!(s.fatal().unwrap().is_timeout());
    }

    #[test]
    fn test_uncaught_failure_under_trap_exits_1() {
        let term = RecordingTerminator::default();
        trap_uncaught(&term, &"panicked at 'boom'");
        assert_eq!(*term.0.lock().unwrap(), vec![1]);
    }
}
