// ABOUTME: CLI entry point: script execution or a REPL

use clap::error::ErrorKind;
use clap::Parser;
use lox_interpreter::config;
use lox_interpreter::{run_source, RunOutcome};
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for a small dynamically-typed scripting language.
#[derive(Parser, Debug)]
#[command(name = "lox")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for a small scripting language")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Parsed manually (rather than via `CliArgs::parse()`) so a usage error maps to
    // exit code 64 instead of clap's default, while `--help`/`--version` still exit 0.
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    ExitCode::from(config::EXIT_SUCCESS as u8)
                }
                _ => ExitCode::from(config::EXIT_USAGE as u8),
            };
        }
    };

    match args.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

fn run_file(path: &PathBuf) -> ExitCode {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("Cannot read script file {}: {}", path.display(), err);
            return ExitCode::from(config::EXIT_FILE_ERROR as u8);
        }
    };

    let mut stdout = io::stdout();
    match run_source(&contents, &mut stdout) {
        RunOutcome::Ok => ExitCode::from(config::EXIT_SUCCESS as u8),
        RunOutcome::StaticError => ExitCode::from(config::EXIT_STATIC_ERROR as u8),
        RunOutcome::RuntimeError => ExitCode::from(config::EXIT_RUNTIME_ERROR as u8),
    }
}

/// Interactive prompt. An empty line or a closed input stream exits with `Bye!`
/// (ported from golox's `runPrompt`); each line gets a fresh `ErrorReporter` so
/// errors never carry over between prompts.
fn run_prompt() -> ExitCode {
    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl = match Editor::<(), rustyline::history::DefaultHistory>::with_config(rl_config) {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("Failed to initialize REPL: {err}");
            return ExitCode::from(config::EXIT_FILE_ERROR as u8);
        }
    };

    let history_file = ".lox_history";
    let _ = rl.load_history(history_file);

    let mut stdout = io::stdout();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.is_empty() {
                    println!("Bye!");
                    break;
                }
                let _ = run_source(&line, &mut stdout);
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    ExitCode::from(config::EXIT_SUCCESS as u8)
}
