use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::options::{parse_timeout_ms, split_pair};
use common::domain::ReporterOptions;
use common::error::Error;

/// 実行ファイル名
pub const BIN_NAME: &str = "ldjson-report";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: 診断ログを stderr に JSON 1 行ずつ出す
    pub verbose: bool,
    /// フラグと -O key=value を合成した設定
    pub options: ReporterOptions,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Record test-run lifecycle events read from stdin as line-delimited JSON")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit diagnostic logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("output-path")
                .short('o')
                .long("output-path")
                .value_name("path")
                .help("Output file, or directory to hold report.ldjson")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("append")
                .long("append")
                .help("Keep an existing output file and append to it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("overall-timeout-ms")
                .long("overall-timeout-ms")
                .value_name("ms")
                .help("Abort the run after this many milliseconds (0 disables)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("exit-on-timeout")
                .long("exit-on-timeout")
                .help("Exit the process with status 30 when the overall timeout fires")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("reporter-option")
                .short('O')
                .long("reporter-option")
                .value_name("key=value")
                .help("Reporter option as key=value (outputPath, append, overallTimeoutMs, exitOnTimeout)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

/// -O の key=value を先に適用し、明示フラグで上書きする
fn matches_to_config(matches: &clap::ArgMatches) -> Result<Config, Error> {
    let pairs: Vec<&str> = matches
        .get_many::<String>("reporter-option")
        .map(|i| i.map(String::as_str).collect())
        .unwrap_or_default();
    let mut options = ReporterOptions::from_pairs(pairs.into_iter().map(split_pair))?;

    if let Some(path) = matches.get_one::<String>("output-path") {
        options.output_path = Some(path.clone()).filter(|p| !p.is_empty());
    }
    if matches.get_flag("append") {
        options.append = true;
    }
    if let Some(ms) = matches.get_one::<String>("overall-timeout-ms") {
        options.overall_timeout_ms = parse_timeout_ms(ms)?;
    }
    if matches.get_flag("exit-on-timeout") {
        options.exit_on_timeout = true;
    }

    Ok(Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        options,
    })
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)?))
}

/// 補完スクリプトを stdout に出す
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
}

pub fn print_help() {
    println!("Usage: {} [options] < events.jsonl", BIN_NAME);
    println!("Options:");
    println!("  -h, --help                      Show this help message");
    println!("  -o, --output-path <path>        Output file (default: reports/report.ldjson).");
    println!("                                  A path without extension is a directory; report.ldjson is appended.");
    println!("  --append                        Keep an existing output file instead of truncating it");
    println!("  --overall-timeout-ms <ms>       Record a timeout and abort when the run exceeds <ms> (0 disables)");
    println!("  --exit-on-timeout               Exit with status 30 on timeout (1 on other uncaught failures)");
    println!("  -O, --reporter-option <k=v>     Reporter option: outputPath, append, overallTimeoutMs, exitOnTimeout");
    println!("                                  Explicit flags win over -O options.");
    println!("  -v, --verbose                   Emit diagnostic logs to stderr");
    println!("  --generate <shell>              Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Input (stdin, one JSON object per line):");
    println!("  {{\"event\":\"test\",\"subject\":{{\"key\":\"t1\",\"title\":\"works\",\"titlePath\":[\"suite\",\"works\"]}}}}");
    println!("  Events: start, end, suite, suite end, hook, hook end, test, pass, fail, pending,");
    println!("          waiting, ready, test end, retry");
    println!();
    println!("Environment:");
    println!("  LDJSON_DEBUG    Non-empty value enables diagnostic logs (same as -v)");
    println!();
    println!("Exit status:");
    println!("  0 success, 30 overall timeout, 64 usage error, 1 other failure");
}
