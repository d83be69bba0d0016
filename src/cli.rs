//! Command-line interface: `run`/`lint`/`parse`/`debug` over a source file.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::debug::{debug_tree, pretty_tree};
use crate::interpreter::{ExecState, Interpreter};
use crate::io::StdioIo;
use crate::normalizer::normalize;
use crate::parser;

#[derive(Parser)]
#[command(name = "pseudocod")]
#[command(about = "Interpreter for a Romanian-language teaching pseudocode dialect", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a pseudocode program
    Run {
        /// Path to the program's source file
        file: PathBuf,
    },
    /// Normalize a source file and print the result
    Lint {
        /// Path to the program's source file
        file: PathBuf,
    },
    /// Print the pretty-printed syntax tree
    Parse {
        /// Path to the program's source file
        file: PathBuf,
    },
    /// Print the full syntax tree, including ERROR/MISSING nodes
    Debug {
        /// Path to the program's source file
        file: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => cmd_run(&file),
        Commands::Lint { file } => cmd_lint(&file),
        Commands::Parse { file } => cmd_parse(&file),
        Commands::Debug { file } => cmd_debug(&file),
    }
}

fn read_source(path: &PathBuf) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("Nu pot citi fisierul '{}': {e}", path.display()).into())
}

fn cmd_run(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let normalized = normalize(&source);

    let mut interp = Interpreter::new(Box::new(StdioIo::new()));
    interp.load(&normalized);

    if !interp.parse_errors().is_empty() {
        for err in interp.parse_errors() {
            eprintln!("{}", err.display_with_source(&normalized));
        }
        return Err("eroare de sintaxa".into());
    }

    match interp.run() {
        ExecState::Done => Ok(()),
        ExecState::Error => {
            if let Some(err) = interp.error() {
                eprintln!("eroare: {err}");
            }
            Err("eroare de executie".into())
        }
        ExecState::NeedsInput => Err("programul asteapta date de intrare care nu sunt disponibile".into()),
        ExecState::Continue => unreachable!("run() does not return while still runnable"),
    }
}

fn cmd_lint(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    print!("{}", normalize(&source));
    Ok(())
}

fn cmd_parse(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let normalized = normalize(&source);

    let stmts = crate::arena::Arena::new();
    let exprs = crate::arena::Arena::new();
    let expr_refs = crate::arena::Arena::new();
    let names = crate::arena::Arena::new();
    let ctx = crate::arena_ctx::AstContext::new(&stmts, &exprs, &expr_refs, &names);
    let mut interner = crate::intern::Interner::new();
    let output = parser::parse(&normalized, ctx, &mut interner);

    if !output.errors.is_empty() {
        for err in &output.errors {
            eprintln!("{}", err.display_with_source(&normalized));
        }
        return Err("eroare de sintaxa".into());
    }

    print!("{}", pretty_tree(output.program, &normalized));
    Ok(())
}

fn cmd_debug(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let normalized = normalize(&source);

    let stmts = crate::arena::Arena::new();
    let exprs = crate::arena::Arena::new();
    let expr_refs = crate::arena::Arena::new();
    let names = crate::arena::Arena::new();
    let ctx = crate::arena_ctx::AstContext::new(&stmts, &exprs, &expr_refs, &names);
    let mut interner = crate::intern::Interner::new();
    let output = parser::parse(&normalized, ctx, &mut interner);

    print!("{}", debug_tree(output.program, &normalized));
    for err in &output.errors {
        eprintln!("{}", err.display_with_source(&normalized));
    }
    Ok(())
}
