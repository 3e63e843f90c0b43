// tython: Tython front end with a terminal tree viewer

use std::fs;
use std::io;
use std::path::Path;
use std::process;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{LevelFilter, Metadata, Record};
use ratatui::{backend::CrosstermBackend, Terminal};

use tython::parser::{tokenize, ParserOptions, Precedence, UnknownStatementPolicy};
use tython::parser::{parse_with, ParseError};
use tython::ui::App;

/// Exit status for programs using a construct the compiler cannot build yet.
const EXIT_NOT_IMPLEMENTED: i32 = 2;

/// Writes `log` records to stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Debug, Default)]
struct Args {
    file: Option<String>,
    tokens: bool,
    tree: bool,
    view: bool,
    debug: bool,
    options: ParserOptions,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <file.ty> [options]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tokens             Print the token list");
    eprintln!("  --tree               Print the syntax tree (default)");
    eprintln!("  --view               Open the source and tree in a terminal viewer");
    eprintln!("  --strict             Reject unknown statements and require a PROGRAM header");
    eprintln!("  --legacy-precedence  Fold + and - before * and /");
    eprintln!("  --require-header     Require PROGRAM \"<name>\" as the first statement");
    eprintln!("  --debug              Trace tokenizing and parsing to stderr");
    eprintln!("  --version            Print the version and exit");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--tokens" => parsed.tokens = true,
            "--tree" => parsed.tree = true,
            "--view" => parsed.view = true,
            "--strict" => {
                parsed.options.unknown_statements = UnknownStatementPolicy::Reject;
                parsed.options.require_program_header = true;
            }
            "--legacy-precedence" => parsed.options.precedence = Precedence::Legacy,
            "--require-header" => parsed.options.require_program_header = true,
            "--debug" => {
                parsed.debug = true;
                parsed.options.debug = true;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            file => {
                if parsed.file.is_some() {
                    return Err(format!("Unexpected argument '{}'", file));
                }
                parsed.file = Some(file.to_string());
            }
        }
    }
    if !parsed.tokens && !parsed.view {
        parsed.tree = true;
    }
    Ok(parsed)
}

fn exit_code(error: &ParseError) -> i32 {
    if error.is_not_implemented() {
        EXIT_NOT_IMPLEMENTED
    } else {
        1
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().collect();
    let program_name = argv.first().map(|s| s.as_str()).unwrap_or("tython");

    if argv.iter().skip(1).any(|a| a == "--version") {
        println!("tython {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let args = match parse_args(&argv[1.min(argv.len())..]) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            process::exit(1);
        }
    };

    let file = match &args.file {
        Some(file) => file.clone(),
        None => {
            eprintln!("Error: No input file provided");
            eprintln!();
            print_usage(program_name);
            process::exit(1);
        }
    };

    if !Path::new(&file).exists() {
        eprintln!("Error: File '{}' not found", file);
        process::exit(1);
    }

    // The viewer owns the terminal, so log lines would corrupt it
    let level = if args.view {
        LevelFilter::Off
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = log::set_logger(&LOGGER) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    log::set_max_level(level);

    let source = fs::read_to_string(&file)?;

    if args.tokens {
        match tokenize(&source) {
            Ok(tokens) => {
                for token in &tokens {
                    println!("{:>4}  {}", token.line(), token);
                }
            }
            Err(e) => {
                eprintln!("{}", ParseError::from(e));
                process::exit(1);
            }
        }
    }

    let outcome = parse_with(&source, args.options.clone());

    if args.view {
        return run_viewer(source, outcome);
    }

    match outcome {
        Ok(compilation) => {
            for diagnostic in &compilation.diagnostics {
                eprintln!("Warning: {}", diagnostic);
            }
            if args.tree {
                println!("{}", compilation.root);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(exit_code(&e));
        }
    }
}

fn run_viewer(
    source: String,
    outcome: Result<tython::parser::Compilation, ParseError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let code = outcome.as_ref().err().map(exit_code);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, outcome);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }
    if let Some(code) = code {
        process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        let owned: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        parse_args(&owned)
    }

    #[test]
    fn test_tree_is_default_output() {
        let parsed = args(&["demo.ty"]).unwrap();
        assert_eq!(parsed.file.as_deref(), Some("demo.ty"));
        assert!(parsed.tree);
        assert!(!parsed.tokens);

        let parsed = args(&["--tokens", "demo.ty"]).unwrap();
        assert!(parsed.tokens);
        assert!(!parsed.tree);
    }

    #[test]
    fn test_strict_flags() {
        let parsed = args(&["--strict", "--legacy-precedence", "demo.ty"]).unwrap();
        assert_eq!(parsed.options.unknown_statements, UnknownStatementPolicy::Reject);
        assert!(parsed.options.require_program_header);
        assert_eq!(parsed.options.precedence, Precedence::Legacy);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(args(&["--frobnicate"]).unwrap_err().contains("Unknown option"));
        assert!(args(&["a.ty", "b.ty"]).unwrap_err().contains("Unexpected argument"));
    }

    #[test]
    fn test_exit_codes() {
        let err = tython::parser::parse("CALL A").unwrap_err();
        assert_eq!(exit_code(&err), EXIT_NOT_IMPLEMENTED);
        let err = tython::parser::parse("A -> (1").unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }
}
