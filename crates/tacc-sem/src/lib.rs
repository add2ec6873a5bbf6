//! Semantic analysis: types every expression in the serialized AST and
//! enforces scoping and return-obligation rules (§4.3).
//!
//! Like [`tacc_par::parser`], this stage re-parses its input from
//! scratch — here the input is the AST's indented text, not source
//! characters, but the streaming-cursor design is the same (§3).

pub mod analyzer;
pub mod ast_lines;
pub mod scope;
pub mod types;

use tacc_util::diagnostic::{Diagnostic, Handler, Kind};
use tacc_util::error::Result;

use analyzer::Analyzer;

/// Runs the semantic pass over `ast_text` (the output of
/// [`tacc_par::serialize`]), reporting the first error to `handler` if
/// any step fails.
pub fn analyze(ast_text: &str, handler: &mut Handler) -> Result<()> {
    match Analyzer::new(ast_text).run() {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Some(line) = err.line() {
                handler.report(Diagnostic::new(Kind::Semantic, line, err.to_string()));
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_through_handler_on_failure() {
        let mut handler = Handler::new();
        let ast = "FunctionDefinition: f\n    Parameters:\n    Body:\n        Return: y\n";
        analyze(ast, &mut handler).unwrap_err();
        assert!(handler.has_errors());
        assert!(handler.first_error().unwrap().message.contains("undeclared"));
    }
}
