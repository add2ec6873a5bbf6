//! `tacc` — the CLI entry point.
//!
//! Parses arguments, sets up logging, builds a [`tacc_drv::Config`],
//! and hands it to [`tacc_drv::run`]. Mirrors `faxt::main`'s
//! parse-then-init-logging-then-dispatch shape, simplified to the one
//! command this driver has (there are no subcommands to dispatch to).

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tacc_drv::{Config, Emit};

/// Compile a single source file through the lexer, parser, semantic
/// analyzer, and TAC generator, in that order.
#[derive(Parser, Debug)]
#[command(name = "tacc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A four-stage C-family compiler front-end")]
struct Cli {
    /// Source file to compile.
    input: PathBuf,

    /// Path to write the token-stream artifact to (§6).
    #[arg(long, default_value = "tokens.txt")]
    tokens_out: PathBuf,

    /// Path to write the indented AST artifact to (§6).
    #[arg(long, default_value = "ast.txt")]
    ast_out: PathBuf,

    /// Stop the pipeline after the named stage instead of running all
    /// four.
    #[arg(long, value_enum, default_value = "tac")]
    emit: Emit,

    /// Log per-stage progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new(cli.input, cli.tokens_out, cli.ast_out, cli.emit, cli.verbose);

    if let Err(err) = tacc_drv::run(&config) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
