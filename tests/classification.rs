use bakery::classify::{ParsedStatement, StatementKind, classify, dispatch};
use bakery::datalog::{Caveat, Fact, Rule};
use bakery::parser::{DatalogParser, Grammar, ParseResult};
use bakery::{BakeryError, ParseError};

#[test]
fn bracket_prefix_wins_over_arrow() {
    assert_eq!(classify("[a($x) <- b($x)]"), StatementKind::Caveat);
}

#[test]
fn arrow_anywhere_makes_a_rule() {
    assert_eq!(classify("a($x) <- b($x)"), StatementKind::Rule);
    assert_eq!(classify("a(#x) <-"), StatementKind::Rule, "classification never looks past the arrow");
}

#[test]
fn everything_else_is_a_fact() {
    assert_eq!(classify("a(#x)"), StatementKind::Fact);
    assert_eq!(classify(""), StatementKind::Fact);
    assert_eq!(classify(" [a(#x)]"), StatementKind::Fact, "bracket must be the first character");
}

#[test]
fn dispatch_returns_the_classified_object() {
    let parsed = dispatch(&DatalogParser, "[right(#authority, $f) <- resource(#ambient, $f)]").expect("caveat ok");
    assert_eq!(parsed.kind(), StatementKind::Caveat);
    assert!(matches!(parsed, ParsedStatement::Caveat(ref c) if c.queries().len() == 1));
}

#[test]
fn failures_are_tagged_with_the_attempted_grammar() {
    let cases = [
        ("[broken", "load caveat: "),
        ("broken <- ", "load rule: "),
        ("broken", "load fact: "),
    ];
    for (statement, tag) in cases {
        let err = dispatch(&DatalogParser, statement).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with(tag), "{statement:?} should fail with {tag:?}, got {msg:?}");
    }
}

#[test]
fn misclassified_statement_is_not_retried() {
    // a caveat-looking statement that is really a fact stays a caveat failure
    let err = dispatch(&DatalogParser, "[#a, #b]").unwrap_err();
    assert_eq!(err.statement_kind(), Some(StatementKind::Caveat));
}

// Records which entry point was called, to check routing without real parsing.
#[derive(Default)]
struct Refusing {
    calls: std::cell::RefCell<Vec<&'static str>>,
}

impl Refusing {
    fn refuse<T>(&self, entry: &'static str) -> ParseResult<T> {
        self.calls.borrow_mut().push(entry);
        Err(ParseError::new(format!("{entry} refused"), (1, 1)))
    }
}

impl Grammar for Refusing {
    fn parse_fact(&self, _: &str) -> ParseResult<Fact> {
        self.refuse("fact")
    }
    fn parse_rule(&self, _: &str) -> ParseResult<Rule> {
        self.refuse("rule")
    }
    fn parse_caveat(&self, _: &str) -> ParseResult<Caveat> {
        self.refuse("caveat")
    }
}

#[test]
fn dispatch_calls_exactly_one_entry_point() {
    let grammar = Refusing::default();
    for statement in ["[x <- y]", "x <- y", "x"] {
        let err = dispatch(&grammar, statement).unwrap_err();
        assert!(matches!(err, BakeryError::Load { .. }));
    }
    assert_eq!(*grammar.calls.borrow(), vec!["caveat", "rule", "fact"]);
}
