use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use log::info;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use clox::exit_code;
use clox::frontend::token_dumper::TokenDumper;
use clox::{InterpretError, Vm, VmConfig};

/// Bytecode interpreter for clox arithmetic expressions.
#[derive(Debug, Parser)]
#[command(name = "clox", version)]
struct Cli {
    /// Disassemble each compiled chunk before running it
    #[arg(short, long)]
    verbose: bool,

    /// Print the stack and each instruction as it executes
    #[arg(long)]
    trace: bool,

    /// Show tokens only
    #[arg(long)]
    tokens: bool,

    /// Disable ANSI colors in token dumps
    #[arg(long)]
    no_color: bool,

    /// Script to run; starts a REPL when omitted
    scripts: Vec<PathBuf>,
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::OK
            };
            process::exit(code);
        }
    };

    let config = VmConfig {
        print_code: cli.verbose,
        trace_execution: cli.trace,
    };

    let code = match cli.scripts.as_slice() {
        [] => repl(&cli, config),
        [script] => run_file(&cli, script, config),
        _ => {
            eprintln!("Usage: clox [OPTIONS] [SCRIPT]");
            exit_code::USAGE
        }
    };

    process::exit(code);
}

fn token_dumper(cli: &Cli) -> TokenDumper {
    let dumper = TokenDumper::new();
    if cli.no_color { dumper.no_color() } else { dumper }
}

fn run_file(cli: &Cli, path: &Path, config: VmConfig) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", path.display(), e);
            return exit_code::IO_ERROR;
        }
    };
    info!("running {}", path.display());

    if cli.tokens {
        token_dumper(cli).dump(&source);
        return exit_code::OK;
    }

    let mut vm = Vm::with_config(config);
    match vm.interpret(&source) {
        Ok(()) => exit_code::OK,
        Err(e) => {
            report(&e);
            e.exit_code()
        }
    }
}

fn repl(cli: &Cli, config: VmConfig) -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to initialize line editor: {}", e);
            return exit_code::IO_ERROR;
        }
    };

    let mut vm = Vm::with_config(config);

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                if cli.tokens {
                    token_dumper(cli).dump(&line);
                } else if let Err(e) = vm.interpret(&line) {
                    report(&e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                return exit_code::IO_ERROR;
            }
        }
    }

    exit_code::OK
}

fn report(e: &InterpretError) {
    eprintln!("{}", e);
}
