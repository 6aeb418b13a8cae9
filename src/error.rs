use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::pddl::parser::{self, ast::Requirement};

/// Errors that abort a validation run.
///
/// Step failures and unmet goals are not errors; they are reported through
/// [`crate::validator::Report`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Parse(ParseFailure),

    #[error("structural error: {0}")]
    Structural(String),

    #[error("unsupported feature: {context} requires {requirement}")]
    UnsupportedFeature { requirement: Requirement, context: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Classification label used by batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) | Self::Structural(_) => "STRUCTURAL_ERROR",
            Self::UnsupportedFeature { .. } => "UNSUPPORTED_FEATURE",
            Self::Io { .. } => "IO_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Json(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Syntax errors from one source, kept with the text so they can be quoted.
#[derive(Debug)]
pub struct ParseFailure {
    pub file: String,
    pub errors: Vec<parser::Error>,
    source: String,
}

impl ParseFailure {
    pub fn new(file: &str, source: &str, errors: Vec<parser::Error>) -> Self {
        Self { file: file.to_owned(), errors, source: source.to_owned() }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<&str> = self.source.lines().collect();
        for e in &self.errors {
            match e.pos {
                parser::Position::Span(span) => {
                    writeln!(f, "{}:{} Error:", self.file, span.line)?;
                    if let Some(eline) = lines.get(span.line.saturating_sub(1)) {
                        let line_number_string = format!("{}", span.line);
                        writeln!(f, "\t{}: {}", line_number_string, eline)?;
                        let debug_str_col_pos = line_number_string.len() + 1 + span.col;
                        writeln!(f, "\t{:->width$} {}", '^', e.message, width = debug_str_col_pos)?;
                    }
                }
                parser::Position::EOF => writeln!(f, "{}: Error at end of file: {}", self.file, e.message)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ParseFailure};
    use crate::pddl::parser::tokens::Span;
    use crate::pddl::parser::{self, Position};

    #[test]
    fn test_parse_failure_quotes_line() {
        let source = "(define (domain d)\n  (:predicates (p ?x)\n  (:action))";
        let e = parser::Error::new(Position::Span(Span::new(3, 11, 1)), "Expected identifier.");
        let text = Error::Parse(ParseFailure::new("domain.pddl", source, vec![e])).to_string();
        assert_eq!(text, "domain.pddl:3 Error:\n\t3:   (:action))\n\t------------^ Expected identifier.\n");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Error::structural("x").kind(), "STRUCTURAL_ERROR");
        assert_eq!(Error::Config("x".into()).kind(), "CONFIG_ERROR");
    }
}
