//! Unit tests for parsing through the public entry points

use fhir_filter::ast::*;
use fhir_filter::{parse_filter, try_parse_filter, Engine, Error, TokenType};

#[test]
fn test_parse_comparisons() {
    assert!(parse_filter("name eq peter").is_some());
    assert!(parse_filter("birthdate ge 1990-01-01").is_some());
    assert!(parse_filter(r#"name co "pet""#).is_some());
    assert!(parse_filter("code eq http://loinc.org|1234-5").is_some());
    assert!(parse_filter("value-quantity gt 5.4").is_some());
}

#[test]
fn test_parse_logical() {
    assert!(parse_filter("a eq 1 and b eq 2").is_some());
    assert!(parse_filter("a eq 1 or b eq 2").is_some());
    assert!(parse_filter("a eq 1 and b eq 2 or c eq 3 and d eq 4").is_some());
    assert!(parse_filter("(a eq 1 and b eq 2) or (c eq 3)").is_some());
}

#[test]
fn test_parse_not() {
    assert!(parse_filter("not (a eq 1)").is_some());
    assert!(parse_filter("not (not (a eq 1))").is_some());
    assert!(parse_filter("not a eq 1").is_none());
    assert!(parse_filter("not not (a eq 1)").is_none());
}

#[test]
fn test_parse_paths() {
    assert!(parse_filter("item.answer.valueCoding eq x").is_some());
    assert!(parse_filter("item[linkId eq Q1].answer eq x").is_some());
    assert!(parse_filter("item[linkId eq Q1 or linkId eq Q2] eq x").is_some());
    assert!(parse_filter("a[b[c eq 1].d eq 2].e eq 3").is_some());
    assert!(parse_filter("_has:Observation:patient:code eq x").is_some());
}

#[test]
fn test_has_without_colon_is_a_plain_name() {
    let ast = parse_filter("_has eq 1").unwrap();
    let params = ast.param_exps();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].left, ParamValue::Path(ParamPath::name("_has")));

    assert!(parse_filter("_has: eq 1").is_none());
    assert!(parse_filter("_has:Obs eq 1").is_none());
}

#[test]
fn test_no_precedence_between_and_or() {
    let ast = parse_filter("a eq 1 or b eq 2 and c eq 3").unwrap();
    match ast {
        Expression::Logical(LogicalExpression { head, rest }) => {
            assert!(matches!(head, BaseExpression::Filter(BaseFilter::Param(_))));
            let connectives: Vec<Connective> = rest.iter().map(|(c, _)| *c).collect();
            assert_eq!(connectives, vec![Connective::Or, Connective::And]);
        }
        other => panic!("Expected flat chain, got {:?}", other),
    }
}

#[test]
fn test_canonical_rendering() {
    let cases = [
        ("a eq 1", "a eq 1"),
        ("item . linkId eq   A", "item.linkId eq A"),
        ("not(a eq 1)", "not (a eq 1)"),
        ("(a eq 1)or(b eq 2)", "(a eq 1) or (b eq 2)"),
        (
            r#"patient[ gender eq female ].name co "pet""#,
            r#"patient[gender eq female].name co "pet""#,
        ),
        (
            "_has:Observation:patient:code eq x",
            "_has:Observation:patient:code eq x",
        ),
    ];

    for (input, rendered) in cases {
        let ast = parse_filter(input).unwrap();
        assert_eq!(ast.to_string(), rendered, "input: {}", input);
    }
}

#[test]
fn test_rendering_reparses_to_equal_ast() {
    for input in [
        "a eq 1 and (b lt 28 or b gt 26)",
        r#"not (x[y eq "z w"].v sw "a\"b")"#,
        "_has:Obs:subject.patient:code eq http://x|y or k eq 2021-01-01T10:00:00Z",
    ] {
        let ast = parse_filter(input).unwrap();
        assert_eq!(parse_filter(&ast.to_string()), Some(ast), "input: {}", input);
    }
}

#[test]
fn test_try_parse_reports_fault() {
    match try_parse_filter("a eq 1 and") {
        Err(Error::UnexpectedEof { .. }) => {}
        other => panic!("Expected end-of-input fault, got {:?}", other),
    }

    match try_parse_filter("a eq 1 b") {
        Err(err @ Error::UnexpectedToken { .. }) => assert_eq!(err.position(), Some(7)),
        other => panic!("Expected unexpected token, got {:?}", other),
    }

    match try_parse_filter("a eq 1 # b") {
        Err(Error::Lex { position, .. }) => assert_eq!(position, 7),
        other => panic!("Expected lex fault, got {:?}", other),
    }
}

#[test]
fn test_engine_tokenize() {
    let tokens = Engine::default().tokenize("a eq 1");
    let types: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
    assert_eq!(
        types,
        vec![
            TokenType::ParamName,
            TokenType::CompareOp,
            TokenType::NumberOrDate,
            TokenType::Eof
        ]
    );
}
