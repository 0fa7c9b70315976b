//! Datalog grammar: turns one statement's text into a [`Fact`], [`Rule`] or [`Caveat`].
//!
//! The loader only knows the [`Grammar`] trait. [`DatalogParser`] is the
//! implementation used by default, built on the PEG in `datalog.pest`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use pest::Parser;
use pest::error::{Error as PestError, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;
use regex::Regex;

use crate::datalog::{self, Caveat, CompareOp, Constraint, Fact, Predicate, StringFunction, Term};
use crate::error::ParseError;

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// The three entry points a recipe loader needs from a datalog grammar.
pub trait Grammar {
    fn parse_fact(&self, text: &str) -> ParseResult<Fact>;
    fn parse_rule(&self, text: &str) -> ParseResult<datalog::Rule>;
    fn parse_caveat(&self, text: &str) -> ParseResult<Caveat>;
}

#[derive(Parser)]
#[grammar = "datalog.pest"]
struct DatalogGrammar;

#[derive(Debug, Default, Clone, Copy)]
pub struct DatalogParser;

impl Grammar for DatalogParser {
    fn parse_fact(&self, text: &str) -> ParseResult<Fact> {
        let mut pairs = statement(Rule::fact_statement, text)?;
        let predicate = predicate(next(&mut pairs, "predicate", (1, 1))?)?;
        if let Some(variable) = predicate.variables().first() {
            return Err(ParseError::new(format!("fact cannot contain variable ${}", variable), (1, 1)));
        }
        Ok(Fact::new(predicate))
    }

    fn parse_rule(&self, text: &str) -> ParseResult<datalog::Rule> {
        let mut pairs = statement(Rule::rule_statement, text)?;
        rule_body(next(&mut pairs, "rule", (1, 1))?)
    }

    fn parse_caveat(&self, text: &str) -> ParseResult<Caveat> {
        let pairs = statement(Rule::caveat_statement, text)?;
        let queries = pairs
            .filter(|pair| pair.as_rule() == Rule::rule_body)
            .map(rule_body)
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Caveat::new(queries))
    }
}

impl FromStr for Fact {
    type Err = ParseError;
    fn from_str(s: &str) -> ParseResult<Self> {
        DatalogParser.parse_fact(s)
    }
}

impl FromStr for datalog::Rule {
    type Err = ParseError;
    fn from_str(s: &str) -> ParseResult<Self> {
        DatalogParser.parse_rule(s)
    }
}

impl FromStr for Caveat {
    type Err = ParseError;
    fn from_str(s: &str) -> ParseResult<Self> {
        DatalogParser.parse_caveat(s)
    }
}

// ------------- pair walking -------------
fn statement(rule: Rule, text: &str) -> ParseResult<Pairs<'_, Rule>> {
    let mut pairs = DatalogGrammar::parse(rule, text).map_err(from_pest)?;
    // the statement rule wraps everything between SOI and EOI
    let outer = next(&mut pairs, "statement", (1, 1))?;
    Ok(outer.into_inner())
}

fn from_pest(error: PestError<Rule>) -> ParseError {
    let error = error.renamed_rules(|rule| match rule {
        Rule::EOI => "end of statement".to_owned(),
        Rule::rule_body => "rule".to_owned(),
        other => format!("{:?}", other).replace('_', " "),
    });
    let position = match error.line_col {
        LineColLocation::Pos(position) => position,
        LineColLocation::Span(start, _) => start,
    };
    ParseError::new(error.variant.message(), position)
}

fn position(pair: &Pair<Rule>) -> (usize, usize) {
    pair.as_span().start_pos().line_col()
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>, what: &str, at: (usize, usize)) -> ParseResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| ParseError::new(format!("expected {}", what), at))
}

fn first_inner<'i>(pair: Pair<'i, Rule>, what: &str) -> ParseResult<Pair<'i, Rule>> {
    let at = position(&pair);
    next(&mut pair.into_inner(), what, at)
}

// ------------- terms -------------
fn term(pair: Pair<Rule>) -> ParseResult<Term> {
    let inner = first_inner(pair, "term")?;
    let at = position(&inner);
    match inner.as_rule() {
        Rule::symbol => Ok(Term::Symbol(first_inner(inner, "name")?.as_str().to_owned())),
        Rule::variable => Ok(Term::Variable(first_inner(inner, "name")?.as_str().to_owned())),
        Rule::string => string(inner).map(Term::Str),
        Rule::date => DateTime::parse_from_rfc3339(inner.as_str())
            .map(|date| Term::Date(date.with_timezone(&Utc)))
            .map_err(|e| ParseError::new(format!("invalid date {}: {}", inner.as_str(), e), at)),
        Rule::integer => inner
            .as_str()
            .parse::<i64>()
            .map(Term::Integer)
            .map_err(|e| ParseError::new(format!("invalid integer {}: {}", inner.as_str(), e), at)),
        Rule::bytes => {
            let digits = first_inner(inner, "hex digits")?;
            hex::decode(digits.as_str())
                .map(Term::Bytes)
                .map_err(|e| ParseError::new(format!("invalid hex bytes: {}", e), at))
        }
        Rule::boolean => Ok(Term::Bool(inner.as_str() == "true")),
        Rule::set => set(inner).map(Term::Set),
        other => Err(ParseError::new(format!("unexpected {:?}", other), at)),
    }
}

fn string(pair: Pair<Rule>) -> ParseResult<String> {
    let raw = first_inner(pair, "string")?.as_str();
    let mut unescaped = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some(escaped) => unescaped.push(escaped),
            None => unescaped.push('\\'),
        }
    }
    Ok(unescaped)
}

fn set(pair: Pair<Rule>) -> ParseResult<Vec<Term>> {
    let mut members = Vec::new();
    for member in pair.into_inner() {
        let at = position(&member);
        let member = term(member)?;
        match member {
            Term::Variable(_) => return Err(ParseError::new("sets cannot contain variables", at)),
            Term::Set(_) => return Err(ParseError::new("sets cannot be nested", at)),
            member => members.push(member),
        }
    }
    Ok(members)
}

fn predicate(pair: Pair<Rule>) -> ParseResult<Predicate> {
    let at = position(&pair);
    let mut inner = pair.into_inner();
    let name = next(&mut inner, "predicate name", at)?.as_str().to_owned();
    let terms = inner.map(term).collect::<ParseResult<Vec<_>>>()?;
    Ok(Predicate::new(name, terms))
}

// ------------- constraints -------------
fn variable_name(pair: Pair<Rule>) -> ParseResult<String> {
    Ok(first_inner(pair, "variable name")?.as_str().to_owned())
}

fn constraint(pair: Pair<Rule>) -> ParseResult<Constraint> {
    let inner = first_inner(pair, "constraint")?;
    let at = position(&inner);
    let rule = inner.as_rule();
    let mut parts = inner.into_inner();
    match rule {
        Rule::compare_constraint => {
            let variable = variable_name(next(&mut parts, "variable", at)?)?;
            let op = match next(&mut parts, "comparison operator", at)?.as_str() {
                "<" => CompareOp::Lt,
                ">" => CompareOp::Gt,
                "<=" => CompareOp::Le,
                ">=" => CompareOp::Ge,
                _ => CompareOp::Eq,
            };
            let value = term(next(&mut parts, "value", at)?)?;
            match (&value, op.is_ordering()) {
                (Term::Variable(_), _) | (Term::Set(_), _) => Err(ParseError::new(
                    format!("cannot compare ${} against {}", variable, value),
                    at,
                )),
                (Term::Integer(_), _) | (Term::Date(_), _) | (_, false) => {
                    Ok(Constraint::Compare { variable, op, value })
                }
                _ => Err(ParseError::new(
                    format!("ordering comparison {} needs an integer or date, found {}", op, value),
                    at,
                )),
            }
        }
        Rule::set_constraint => {
            let variable = variable_name(next(&mut parts, "variable", at)?)?;
            let negated = next(&mut parts, "in", at)?.as_rule() == Rule::not_in_op;
            let set = set(next(&mut parts, "set", at)?)?;
            Ok(Constraint::In { variable, set, negated })
        }
        Rule::function_constraint => {
            let function = match next(&mut parts, "function", at)?.as_str() {
                "prefix" => StringFunction::Prefix,
                "suffix" => StringFunction::Suffix,
                _ => StringFunction::Match,
            };
            let variable = variable_name(next(&mut parts, "variable", at)?)?;
            let argument = string(next(&mut parts, "string", at)?)?;
            if function == StringFunction::Match {
                Regex::new(&argument)
                    .map_err(|e| ParseError::new(format!("invalid match pattern: {}", e), at))?;
            }
            Ok(Constraint::Function { function, variable, argument })
        }
        other => Err(ParseError::new(format!("unexpected {:?}", other), at)),
    }
}

// ------------- rules -------------
fn rule_body(pair: Pair<Rule>) -> ParseResult<datalog::Rule> {
    let at = position(&pair);
    let mut parts = pair.into_inner();
    let head = predicate(next(&mut parts, "rule head", at)?)?;
    let body = next(&mut parts, "rule body", at)?
        .into_inner()
        .map(predicate)
        .collect::<ParseResult<Vec<_>>>()?;
    let constraints = match parts.next() {
        Some(constraints) => constraints
            .into_inner()
            .map(constraint)
            .collect::<ParseResult<Vec<_>>>()?,
        None => Vec::new(),
    };
    // every variable the rule produces or restricts must be bound by the body
    let bound: Vec<&str> = body.iter().flat_map(Predicate::variables).collect();
    let unbound = head
        .variables()
        .into_iter()
        .chain(constraints.iter().map(Constraint::variable))
        .find(|variable| !bound.contains(variable))
        .map(str::to_owned);
    if let Some(variable) = unbound {
        return Err(ParseError::new(format!("variable ${} does not appear in the rule body", variable), at));
    }
    Ok(datalog::Rule::new(head, body, constraints))
}
