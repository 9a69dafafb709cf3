//! A small JEXL-style expression language used by `@Constraint`.
//!
//! Only parsing is provided: scripts are checked for syntax and rendered back
//! in a canonical form by [`Script::dump`].

mod ast;
mod lexer;
mod parser;

use thiserror::Error;

pub use ast::{BinaryOp, Expr, UnaryOp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// A parsed sequence of `;`-separated expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    statements: Vec<Expr>,
}

impl Script {
    /// # Errors
    /// Returns the first syntax error found in `source`.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let tokens = lexer::tokenize(source)?;
        let statements = parser::Parser::new(tokens, source.len()).script()?;
        Ok(Self { statements })
    }

    #[must_use]
    pub fn statements(&self) -> &[Expr] {
        &self.statements
    }

    /// Canonical single-line rendering of the script.
    #[must_use]
    pub fn dump(&self) -> String {
        self.statements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
