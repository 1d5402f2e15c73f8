//! ae-script - run a script through the AndEngine scripting host

use ae_script::{EvaluationOutcome, HostConfig, ScriptEngineHost, VERSION};
use anyhow::{bail, Context as _};
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// Mimalloc global allocator (optional feature)
#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "\
Usage: ae-script [OPTIONS] [FILE]

Evaluates FILE (or stdin) in the AndEngine scripting host and exits with
0 for a reportable result, 1 for a failed, null or false result.

Options:
  -e, --eval <SCRIPT>    evaluate SCRIPT instead of reading FILE
      --json             print the outcome as JSON
      --heap-limit <N>   runtime memory ceiling in bytes
      --version          print the engine version and exit
  -h, --help             print this help";

/// Where the script comes from
#[derive(Debug, PartialEq)]
enum Source {
    Inline(String),
    File(String),
    Stdin,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run {
        source: Source,
        json: bool,
        heap_limit: Option<usize>,
    },
    Version,
    Help,
}

#[derive(Serialize)]
struct Report<'a> {
    engine: &'static str,
    exit_code: u8,
    outcome: &'a EvaluationOutcome,
}

fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for the outcome
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args().skip(1)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: impl Iterator<Item = String>) -> anyhow::Result<u8> {
    let (source, json, heap_limit) = match parse_args(args)? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(0);
        }
        Command::Version => {
            println!("ae-script {} (QuickJS-ng {})", VERSION, ae_script::engine_version());
            return Ok(0);
        }
        Command::Run { source, json, heap_limit } => (source, json, heap_limit),
    };

    let mut config = HostConfig::from_env()?;
    if let Some(bytes) = heap_limit {
        config = config.with_heap_limit(bytes);
    }

    let script = read_source(&source)?;
    let host = ScriptEngineHost::with_config(config)?;
    let outcome = host.evaluate(&script);
    let exit_code = outcome.exit_code();

    if json {
        let report = Report {
            engine: host.version(),
            exit_code,
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", outcome);
        if let Some(failure) = host.last_failure() {
            eprintln!("{}", failure.message);
        }
    }

    host.shutdown();
    Ok(exit_code)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut source = None;
    let mut json = false;
    let mut heap_limit = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "--json" => json = true,
            "-e" | "--eval" => {
                let script = args.next().context("--eval needs a script")?;
                source = Some(Source::Inline(script));
            }
            "--heap-limit" => {
                let value = args.next().context("--heap-limit needs a byte count")?;
                heap_limit = Some(value.parse().with_context(|| format!("bad heap limit {value:?}"))?);
            }
            other if other.starts_with('-') && other != "-" => bail!("unknown option {other}\n\n{USAGE}"),
            path => {
                if source.is_some() {
                    bail!("only one script may be given\n\n{USAGE}");
                }
                source = Some(if path == "-" { Source::Stdin } else { Source::File(path.to_string()) });
            }
        }
    }

    Ok(Command::Run {
        source: source.unwrap_or(Source::Stdin),
        json,
        heap_limit,
    })
}

fn read_source(source: &Source) -> anyhow::Result<String> {
    match source {
        Source::Inline(script) => Ok(script.clone()),
        Source::File(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        Source::Stdin => {
            let mut script = String::new();
            std::io::stdin().read_to_string(&mut script).context("reading stdin")?;
            Ok(script)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Command> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults_to_stdin() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run { source: Source::Stdin, json: false, heap_limit: None }
        );
    }

    #[test]
    fn test_parse_inline_with_options() {
        assert_eq!(
            parse(&["--json", "-e", "1 + 1", "--heap-limit", "1048576"]).unwrap(),
            Command::Run {
                source: Source::Inline("1 + 1".into()),
                json: true,
                heap_limit: Some(1048576),
            }
        );
    }

    #[test]
    fn test_parse_file() {
        assert_eq!(
            parse(&["game.js"]).unwrap(),
            Command::Run { source: Source::File("game.js".into()), json: false, heap_limit: None }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["-e"]).is_err());
        assert!(parse(&["--heap-limit", "big"]).is_err());
        assert!(parse(&["a.js", "b.js"]).is_err());
    }

    #[test]
    fn test_parse_version_and_help() {
        assert_eq!(parse(&["--version"]).unwrap(), Command::Version);
        assert_eq!(parse(&["-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_run_inline_exit_codes() {
        let args = |script: &str| vec!["-e".to_string(), script.to_string()].into_iter();
        assert_eq!(run(args("'ok'")).unwrap(), 0);
        assert_eq!(run(args("null")).unwrap(), 1);
        assert_eq!(run(args("syntax error here")).unwrap(), 1);
        assert_eq!(run(args("score = 3; score")).unwrap(), 0);
    }

    #[test]
    fn test_run_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(run(vec!["--version".to_string()].into_iter()).unwrap(), 0);
    }
}
