//! The driver: the one crate in the workspace allowed to touch the
//! filesystem or a CLI (§1's "deliberately OUT of scope" list for the
//! CORE, carried here as the ambient collaborator that does exactly
//! that work). Reads the input source, runs the four stages in order,
//! writes the token-stream and AST artifacts to disk, and writes the
//! TAC listing to stdout — the same shape as `faxc_drv::Session::compile`
//! driving `faxc-lex`/`faxc-par`/`faxc-sem`/... in sequence, minus the
//! stages this language doesn't have (optimization, codegen, linking).

pub mod config;
pub mod error;

use std::path::Path;

use tacc_util::diagnostic::Handler;

pub use config::{Config, Emit};
pub use error::{DriverError, Result};

/// Runs the pipeline described by `config` to completion, or returns
/// the first [`DriverError`] hit. Every write happens before the next
/// stage starts; a failure at any point leaves earlier artifacts on
/// disk but does not invoke stages after the failing one (§7).
pub fn run(config: &Config) -> Result<()> {
    let mut handler = Handler::new();

    let source = read_source(&config.input)?;

    tracing::info!(path = %config.input.display(), "lexing");
    let tokens = tacc_lex::tokenize(&source, &mut handler)?;
    write_artifact(&config.tokens_out, &render_tokens(&tokens))?;
    if config.emit == Emit::Tokens {
        return Ok(());
    }

    tracing::info!("parsing");
    let program = tacc_par::Parser::parse(&tokens, &mut handler)?;
    let ast_text = tacc_par::serialize(&program);
    write_artifact(&config.ast_out, &ast_text)?;
    if config.emit == Emit::Ast {
        return Ok(());
    }

    tracing::info!("running semantic analysis");
    tacc_sem::analyze(&ast_text, &mut handler)?;
    if config.emit == Emit::Semantic {
        return Ok(());
    }

    tracing::info!("generating three-address code");
    let tac_text = tacc_tac::generate(&ast_text);
    print!("{tac_text}");

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DriverError::ReadSource {
        path: path.display().to_string(),
        source,
    })
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| DriverError::WriteArtifact {
        path: path.display().to_string(),
        source,
    })
}

/// Renders the full token-stream file (§6): one `to_external_line` per
/// token, each followed by a newline, ending with the `EOF` line the
/// lexer always produces last.
fn render_tokens(tokens: &[tacc_lex::Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        out.push_str(&tok.to_external_line());
        out.push('\n');
    }
    out
}
