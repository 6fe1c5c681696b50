//! Error types for template conversion

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One grammar violation found while recognizing a template.
///
/// Problems are collected for a whole pass and only ever surface together, inside
/// [`ConvertError::Parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxProblem {
    /// 1-based line of the offending input
    pub line: usize,
    /// 0-based byte column inside `line`
    pub column: usize,
    pub message: String,
}

impl SyntaxProblem {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{} {}", self.line, self.column, self.message)
    }
}

/// Errors returned by the driver
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read template {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("problems parsing {path}:\n{}", format_problems(.problems))]
    Parse {
        path: String,
        problems: Vec<SyntaxProblem>,
    },
    #[error("route path {0:?} does not name a page, no class name can be derived from it")]
    InvalidRoute(String),
}

impl ConvertError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    /// The collected syntax problems, empty for any other failure
    pub fn problems(&self) -> &[SyntaxProblem] {
        match self {
            ConvertError::Parse { problems, .. } => problems,
            _ => &[],
        }
    }
}

fn format_problems(problems: &[SyntaxProblem]) -> String {
    problems
        .iter()
        .map(|problem| format!("  {}", problem))
        .collect::<Vec<_>>()
        .join("\n")
}
