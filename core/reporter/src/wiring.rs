//! 配線: 標準アダプタで Reporter を組み立てる

use std::path::PathBuf;
use std::sync::Arc;

use common::adapter::{
    FileLdjsonLog, NoopLog, StatsCollector, StdClock, StdFileSystem, StdIdGenerator,
    StdTerminator, StderrJsonLog,
};
use common::domain::ReporterOptions;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log, Terminator};

use crate::usecase::{CoordinatorPorts, EventPump, Reporter, Supervisor};

/// CLI が使う組み立て済みの部品
pub struct App {
    pub reporter: Arc<Reporter>,
    pub pump: EventPump,
    pub logger: Arc<dyn Log>,
    pub output_path: PathBuf,
}

/// 診断ログの出力先を選ぶ
pub fn diagnostics_logger(verbose: bool) -> Arc<dyn Log> {
    if verbose {
        Arc::new(StderrJsonLog::default())
    } else {
        Arc::new(NoopLog)
    }
}

/// 配線: 出力ファイルを準備し、必要ならウォッチドッグを仕掛ける
pub fn wire_reporter(options: &ReporterOptions, verbose: bool) -> Result<App, Error> {
    let logger = diagnostics_logger(verbose);
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let terminator: Arc<dyn Terminator> = Arc::new(StdTerminator);
    let stats = Arc::new(StatsCollector::new(Arc::clone(&clock)));
    let output_path = options.resolved_output_path();

    // CLI ではこのプロセスがホストなので、致命的エラーで run を終わらせる
    let supervisor = Arc::new(
        Supervisor::new(options.exit_on_timeout, terminator, Arc::clone(&logger))
            .with_terminate_on_fatal(),
    );

    let ports = CoordinatorPorts {
        log: Box::new(FileLdjsonLog::new(fs, &output_path, Arc::clone(&logger))),
        stats: stats.clone(),
        clock: Arc::clone(&clock),
        ids: Arc::new(StdIdGenerator::new(clock)),
        logger: Arc::clone(&logger),
    };
    let reporter = Arc::new(Reporter::new(options, ports, supervisor)?);
    let pump = EventPump::new(stats, reporter.clone());

    Ok(App {
        reporter,
        pump,
        logger,
        output_path,
    })
}
