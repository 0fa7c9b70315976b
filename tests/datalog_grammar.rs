use bakery::datalog::{Caveat, CompareOp, Constraint, Fact, Rule, StringFunction, Term};
use bakery::parser::{DatalogParser, Grammar};

#[test]
fn fact_terms_of_every_kind() {
    let fact: Fact = r#"all(#sym, "str", 42, -7, 2021-05-07T18:00:00Z, hex:00ff, true, [1, "two", #three])"#
        .parse()
        .expect("fact ok");
    let terms = fact.predicate().terms();
    assert_eq!(terms.len(), 8);
    assert_eq!(terms[0], Term::Symbol("sym".to_owned()));
    assert_eq!(terms[1], Term::Str("str".to_owned()));
    assert_eq!(terms[2], Term::Integer(42));
    assert_eq!(terms[3], Term::Integer(-7));
    assert!(matches!(terms[4], Term::Date(_)));
    assert_eq!(terms[5], Term::Bytes(vec![0x00, 0xff]));
    assert_eq!(terms[6], Term::Bool(true));
    assert!(matches!(&terms[7], Term::Set(members) if members.len() == 3));
}

#[test]
fn facts_cannot_hold_variables() {
    let err = DatalogParser.parse_fact("owner(#ambient, $user)").unwrap_err();
    assert!(err.message.contains("$user"), "got {err}");
}

#[test]
fn rule_with_constraints() {
    let rule: Rule = r#"allowed($f) <- resource(#ambient, $f), size($f, $s) @ $s <= 1024, prefix($f, "/tmp"), $f not in ["/tmp/x"]"#
        .parse()
        .expect("rule ok");
    assert_eq!(rule.body().len(), 2);
    assert_eq!(
        rule.constraints(),
        &[
            Constraint::Compare { variable: "s".to_owned(), op: CompareOp::Le, value: Term::Integer(1024) },
            Constraint::Function {
                function: StringFunction::Prefix,
                variable: "f".to_owned(),
                argument: "/tmp".to_owned(),
            },
            Constraint::In {
                variable: "f".to_owned(),
                set: vec![Term::Str("/tmp/x".to_owned())],
                negated: true,
            },
        ]
    );
}

#[test]
fn head_variables_must_be_bound() {
    let err = DatalogParser.parse_rule("grant($who) <- resource(#ambient, $f)").unwrap_err();
    assert!(err.message.contains("$who"), "got {err}");
}

#[test]
fn constraint_variables_must_be_bound() {
    let err = DatalogParser.parse_rule("grant($f) <- resource(#ambient, $f) @ $t > 3").unwrap_err();
    assert!(err.message.contains("$t"), "got {err}");
}

#[test]
fn ordering_needs_numbers_or_dates() {
    assert!(DatalogParser.parse_rule("a($x) <- b($x) @ $x < 2030-01-01T00:00:00Z").is_ok());
    let err = DatalogParser.parse_rule("a($x) <- b($x) @ $x < \"zzz\"").unwrap_err();
    assert!(err.message.contains("ordering comparison"), "got {err}");
}

#[test]
fn match_patterns_must_compile() {
    assert!(DatalogParser.parse_rule(r#"a($x) <- b($x) @ match($x, "^/home/[a-z]+$")"#).is_ok());
    let err = DatalogParser.parse_rule(r#"a($x) <- b($x) @ match($x, "(unclosed")"#).unwrap_err();
    assert!(err.message.contains("invalid match pattern"), "got {err}");
}

#[test]
fn caveat_with_alternatives() {
    let caveat: Caveat = "[ok($f) <- read($f) || ok($f) <- write($f) @ $f == #admin]"
        .parse()
        .expect("caveat ok");
    assert_eq!(caveat.queries().len(), 2);
    assert_eq!(caveat.queries()[1].constraints().len(), 1);
}

#[test]
fn sets_cannot_nest_or_hold_variables() {
    assert!(DatalogParser.parse_fact("s([1, [2]])").is_err());
    assert!(DatalogParser.parse_rule("a($x) <- b($x) @ $x in [$y]").is_err());
}

#[test]
fn invalid_dates_and_bytes_are_rejected() {
    assert!(DatalogParser.parse_fact("d(2021-13-40T00:00:00Z)").is_err());
    assert!(DatalogParser.parse_fact("b(hex:abc)").is_err(), "odd number of hex digits");
}

#[test]
fn canonical_text_parses_back_to_the_same_object() {
    let sources = [
        r#"[right(#authority, $file, #read) <- resource(#ambient, $file), owner(#ambient, $user, $file) @ $user == "user\"name", prefix($file, "/home/username")]"#,
        "[a($x) <- b($x) @ $x in [1, 2] || a($x) <- c($x) @ $x >= 2021-05-07T18:00:00Z]",
    ];
    for source in sources {
        let caveat: Caveat = source.parse().expect("caveat ok");
        let reparsed: Caveat = caveat.to_string().parse().expect("canonical text ok");
        assert_eq!(caveat, reparsed, "{source}");
    }
}

#[test]
fn error_position_points_into_the_statement() {
    let err = DatalogParser.parse_fact("human(#authority, ,)").unwrap_err();
    assert_eq!((err.line, err.col), (1, 19), "got {err}");
}
