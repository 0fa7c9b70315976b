use std::path::PathBuf;

use thiserror::Error;

use crate::classify::StatementKind;

#[derive(Error, Debug)]
pub enum BakeryError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Cannot open {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("Read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("load {kind}: {source}")]
    Load { kind: StatementKind, #[source] source: ParseError },
    #[error("Unterminated statement at end of input: {text}")]
    UnterminatedStatement { text: String },
    #[error("Duplicate recipe '{recipe}' in cookbook '{cookbook}'")]
    DuplicateRecipe { cookbook: String, recipe: String },
    #[error("{}: {source}", .path.display())]
    Recipe { path: PathBuf, #[source] source: Box<BakeryError> },
}

pub type Result<T> = std::result::Result<T, BakeryError>;

/// A statement that does not match the grammar it was classified into.
/// Line and column are 1-based and relative to the statement text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {line}:{col}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, (line, col): (usize, usize)) -> Self {
        Self { message: message.into(), line, col }
    }
}

// Helper conversions
impl From<config::ConfigError> for BakeryError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl BakeryError {
    /// The statement class that failed to parse, looking through file wrappers.
    pub fn statement_kind(&self) -> Option<StatementKind> {
        match self {
            Self::Load { kind, .. } => Some(*kind),
            Self::Recipe { source, .. } => source.statement_kind(),
            _ => None,
        }
    }
}
