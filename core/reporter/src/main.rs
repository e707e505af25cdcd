use std::io;
use std::process;

use common::error::Error;
use common::ports::outbound::{LogEntry, LogLevel};
use ldjson_reporter::adapter::HostEventReader;
use ldjson_reporter::cli::{parse_args, print_completion, print_help, ParseOutcome};
use ldjson_reporter::wiring::wire_reporter;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("ldjson-report: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    if config.help {
        print_help();
        return Ok(0);
    }

    let verbose = config.verbose
        || std::env::var("LDJSON_DEBUG")
            .map(|v| !v.is_empty())
            .unwrap_or(false);
    let app = wire_reporter(&config.options, verbose)?;
    let _ = app.logger.log(
        &LogEntry::new(LogLevel::Info, "cli", "lifecycle", "command started")
            .field("output_path", app.output_path.display().to_string()),
    );

    let stdin = io::stdin();
    let result = app
        .pump
        .run(HostEventReader::new(stdin.lock()))
        .and_then(|count| {
            // 入力が尽きた後でもタイムアウトを受けていれば失敗にする
            app.reporter.check()?;
            Ok(count)
        });
    app.reporter.disarm();

    match &result {
        Ok(count) => {
            let _ = app.logger.log(
                &LogEntry::new(LogLevel::Info, "cli", "lifecycle", "command finished")
                    .field("events", count),
            );
        }
        Err(e) => {
            let _ = app
                .logger
                .log(&LogEntry::new(LogLevel::Error, "cli", "error", e.to_string()));
        }
    }
    result.map(|_| 0)
}

fn print_usage() {
    eprintln!("Usage: ldjson-report [options] < events.jsonl");
}
