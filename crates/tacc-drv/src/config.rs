//! Driver configuration (§5.5 of `SPEC_FULL.md`).
//!
//! The whole configuration surface is the one invocation's CLI flags —
//! there is no `tacc.toml` the way `faxt::config::Config` loads one,
//! because there is nothing beyond this run for a file to persist. The
//! `Cli`/`Config` split itself is kept anyway: `main.rs` owns argument
//! parsing and hands a plain [`Config`] to [`crate::run`], so the
//! pipeline-driving code never depends on `clap` directly.

use std::path::PathBuf;

/// Which stage to stop the pipeline after, matching `--emit` in the
/// teacher's `faxc-drv` (`--emit-tokens`/`--emit-ast`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    Tokens,
    Ast,
    Semantic,
    Tac,
}

impl Default for Emit {
    fn default() -> Self {
        Emit::Tac
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// The single input source file (§6: "Input source file").
    pub input: PathBuf,

    /// Where the token-stream artifact (§6) is written.
    pub tokens_out: PathBuf,

    /// Where the AST artifact (§6) is written.
    pub ast_out: PathBuf,

    /// Which stage to stop after.
    pub emit: Emit,

    /// Verbose per-stage progress on stderr.
    pub verbose: bool,
}

impl Config {
    pub fn new(input: PathBuf, tokens_out: PathBuf, ast_out: PathBuf, emit: Emit, verbose: bool) -> Self {
        Config {
            input,
            tokens_out,
            ast_out,
            emit,
            verbose,
        }
    }
}
