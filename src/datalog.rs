//! The datalog objects recipes are made of.
//!
//! Statements come in three grammar classes: a [`Fact`] is a ground predicate,
//! a [`Rule`] derives a head predicate from a body of predicates filtered by
//! constraints, and a [`Caveat`] is a bracketed set of alternative rules that
//! must hold. Every object renders back to canonical datalog text through
//! `Display`, which is also how they are serialized.

// used to print out readable forms of datalog objects
use std::fmt;

// used for date terms
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

// ------------- Term -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Symbol(String),
    Variable(String),
    Integer(i64),
    Str(String),
    Date(DateTime<Utc>),
    Bytes(Vec<u8>),
    Bool(bool),
    Set(Vec<Term>),
}

impl Term {
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
    /// Variable names used by this term, sets included.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Term::Variable(name) => vec![name.as_str()],
            Term::Set(members) => members.iter().flat_map(Term::variables).collect(),
            _ => Vec::new(),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Symbol(s) => write!(f, "#{}", s),
            Term::Variable(v) => write!(f, "${}", v),
            Term::Integer(i) => write!(f, "{}", i),
            Term::Str(s) => write_quoted(f, s),
            Term::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Term::Bytes(b) => write!(f, "hex:{}", hex::encode(b)),
            Term::Bool(b) => write!(f, "{}", b),
            Term::Set(members) => {
                f.write_str("[")?;
                write_joined(f, members, ", ")?;
                f.write_str("]")
            }
        }
    }
}

// ------------- Predicate -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    name: String,
    terms: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, terms: Vec<Term>) -> Self {
        Self { name: name.into(), terms }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
    pub fn variables(&self) -> Vec<&str> {
        self.terms.iter().flat_map(Term::variables).collect()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_joined(f, &self.terms, ", ")?;
        f.write_str(")")
    }
}

// ------------- Constraint -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

impl CompareOp {
    /// Ordering comparisons only make sense for integers and dates.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Eq)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFunction {
    Prefix,
    Suffix,
    Match,
}

impl fmt::Display for StringFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            StringFunction::Prefix => "prefix",
            StringFunction::Suffix => "suffix",
            StringFunction::Match => "match",
        })
    }
}

/// Restriction on a variable bound by a rule body, written after `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    Compare { variable: String, op: CompareOp, value: Term },
    In { variable: String, set: Vec<Term>, negated: bool },
    Function { function: StringFunction, variable: String, argument: String },
}

impl Constraint {
    pub fn variable(&self) -> &str {
        match self {
            Constraint::Compare { variable, .. }
            | Constraint::In { variable, .. }
            | Constraint::Function { variable, .. } => variable,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constraint::Compare { variable, op, value } => write!(f, "${} {} {}", variable, op, value),
            Constraint::In { variable, set, negated } => {
                write!(f, "${} {}in [", variable, if *negated { "not " } else { "" })?;
                write_joined(f, set, ", ")?;
                f.write_str("]")
            }
            Constraint::Function { function, variable, argument } => {
                write!(f, "{}(${}, ", function, variable)?;
                write_quoted(f, argument)?;
                f.write_str(")")
            }
        }
    }
}

// ------------- Fact -------------
/// A ground predicate: no term is a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact(Predicate);

impl Fact {
    pub(crate) fn new(predicate: Predicate) -> Self {
        Self(predicate)
    }
    pub fn predicate(&self) -> &Predicate {
        &self.0
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ------------- Rule -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    head: Predicate,
    body: Vec<Predicate>,
    constraints: Vec<Constraint>,
}

impl Rule {
    pub(crate) fn new(head: Predicate, body: Vec<Predicate>, constraints: Vec<Constraint>) -> Self {
        Self { head, body, constraints }
    }
    pub fn head(&self) -> &Predicate {
        &self.head
    }
    pub fn body(&self) -> &[Predicate] {
        &self.body
    }
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} <- ", self.head)?;
        write_joined(f, &self.body, ", ")?;
        if !self.constraints.is_empty() {
            f.write_str(" @ ")?;
            write_joined(f, &self.constraints, ", ")?;
        }
        Ok(())
    }
}

// ------------- Caveat -------------
/// Alternative rules of which at least one must produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caveat {
    queries: Vec<Rule>,
}

impl Caveat {
    pub(crate) fn new(queries: Vec<Rule>) -> Self {
        Self { queries }
    }
    pub fn queries(&self) -> &[Rule] {
        &self.queries
    }
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        write_joined(f, &self.queries, " || ")?;
        f.write_str("]")
    }
}

// serialized as canonical datalog text
macro_rules! serialize_as_text {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}
serialize_as_text!(Fact, Rule, Caveat);
