//! Purpose: `cartelera` CLI entry point and command dispatch bootstrap.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Query commands emit the same JSON envelopes as the HTTP routes.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Query misses are normal payloads and exit 0.
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{error::ErrorKind as ClapErrorKind, Parser, Subcommand, ValueHint};
use serde::Serialize;
use serde_json::{json, Value};

use cartelera::api::{to_exit_code, Error, ErrorKind};

mod command_dispatch;
mod reply;
mod serve;

const DEFAULT_DATA_PATH: &str = "DATA/movies_cleaned.csv";

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(err.to_string().lines().next().unwrap_or("invalid arguments"))
                    .with_hint("Run `cartelera --help` for usage."));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command, cli.data)
}

#[derive(Parser)]
#[command(
    name = "cartelera",
    version,
    about = "Read-only film catalog queries over HTTP or the command line",
    long_about = None,
    before_help = r#"Loads a film catalog CSV once and answers fixed lookups against it.

Mental model:
  - `serve` exposes the lookups as HTTP/JSON routes
  - every other command runs one lookup and prints the same JSON envelope
"#,
    after_help = r#"EXAMPLES
  $ cartelera --data DATA/movies_cleaned.csv info
  $ cartelera month enero
  $ cartelera recommend "Toy Story"
  $ cartelera serve --bind 127.0.0.1:8000
  $ curl http://127.0.0.1:8000/cantidad_filmaciones_mes/enero
"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = DEFAULT_DATA_PATH,
        help = "Path to the film catalog CSV",
        value_hint = ValueHint::FilePath
    )]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Serve the catalog lookups over HTTP")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000", help = "Address to listen on")]
        bind: SocketAddr,
        #[arg(long, help = "Permit binding to a non-loopback address")]
        allow_non_loopback: bool,
    },
    #[command(about = "Print dataset summary (rows, dated rows)")]
    Info,
    #[command(about = "Count films released in a month (Spanish month name)")]
    Month { mes: String },
    #[command(about = "Count films released on a weekday")]
    Day { dia: String },
    #[command(about = "Title, release year, and popularity score for a film")]
    Score { titulo: String },
    #[command(about = "Vote count and average for a film (2000-vote minimum)")]
    Votes { titulo: String },
    #[command(about = "Aggregate return for films crediting a name")]
    Actor { nombre: String },
    #[command(about = "Per-film figures for films crediting a name")]
    Director { nombre: String },
    #[command(about = "Up to five titles with the closest popularity")]
    Recommend { titulo: String },
}

fn emit_json(value: Value) {
    println!("{value}");
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<String>,
}

fn error_envelope(err: &Error) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorBody {
            kind: format!("{:?}", err.kind()),
            message: err.message().unwrap_or("error").to_string(),
            hint: err.hint().map(str::to_string),
            path: err.path().map(|path| path.to_string_lossy().to_string()),
            column: err.column().map(str::to_string),
        },
    }
}

fn emit_error(err: &Error) {
    match serde_json::to_string(&error_envelope(err)) {
        Ok(line) => eprintln!("{line}"),
        Err(_) => eprintln!("{err}"),
    }
}
