// used to print out the statement class in error messages
use std::fmt;

use tracing::debug;

use crate::datalog::{Caveat, Fact, Rule};
use crate::error::{BakeryError, Result};
use crate::parser::Grammar;

pub const CAVEAT_OPENER: char = '[';
pub const RULE_ARROW: &str = "<-";

/// The grammar a statement belongs to, decided from its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Fact,
    Rule,
    Caveat,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Fact => "fact",
            StatementKind::Rule => "rule",
            StatementKind::Caveat => "caveat",
        })
    }
}

// The order of the checks matters: a caveat holds rules, so it contains the
// arrow too, and anything that is neither is taken to be a fact.
pub fn classify(statement: &str) -> StatementKind {
    if statement.starts_with(CAVEAT_OPENER) {
        StatementKind::Caveat
    } else if statement.contains(RULE_ARROW) {
        StatementKind::Rule
    } else {
        StatementKind::Fact
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStatement {
    Fact(Fact),
    Rule(Rule),
    Caveat(Caveat),
}

impl ParsedStatement {
    pub fn kind(&self) -> StatementKind {
        match self {
            ParsedStatement::Fact(_) => StatementKind::Fact,
            ParsedStatement::Rule(_) => StatementKind::Rule,
            ParsedStatement::Caveat(_) => StatementKind::Caveat,
        }
    }
}

/// Classifies `statement` and hands it to the matching grammar entry point.
/// A failure is final; no other grammar is attempted.
pub fn dispatch<G: Grammar + ?Sized>(grammar: &G, statement: &str) -> Result<ParsedStatement> {
    let kind = classify(statement);
    debug!(%kind, statement, "dispatching statement");
    let parsed = match kind {
        StatementKind::Caveat => grammar.parse_caveat(statement).map(ParsedStatement::Caveat),
        StatementKind::Rule => grammar.parse_rule(statement).map(ParsedStatement::Rule),
        StatementKind::Fact => grammar.parse_fact(statement).map(ParsedStatement::Fact),
    };
    parsed.map_err(|source| BakeryError::Load { kind, source })
}
