//! Scenario S4: a JSON-shaped grammar assembled purely from this crate's
//! own combinators, as an integration test fixture. It is not a published
//! feature of the crate — just a stand-in for "a complete grammar with AST
//! construction typechecks and runs deterministically", exercised here the
//! way a grammar author actually would: non-terminals wired together with
//! `declare_rule`/`define_rule`, values built with `map`/`construct`.

use typed_peg::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn whitespace() -> impl Expr<Output = typed_peg::hlist::HNil> + Clone {
    class(CharClass::from_descriptor(" \t\r\n").unwrap()).many()
}

fn json_string_bytes() -> impl Expr<Output = typed_peg::hlist::HCons<Vec<u8>, typed_peg::hlist::HNil>> + Clone
{
    char('"')
        .seq(class(CharClass::from_descriptor("^\"").unwrap()).many().captured())
        .seq(char('"'))
}

fn json_number() -> impl Expr<Output = typed_peg::hlist::HCons<f64, typed_peg::hlist::HNil>> + Clone
{
    char('-')
        .or_not()
        .seq(class(CharClass::from_descriptor("0-9").unwrap()).at_least_one())
        .seq(
            char('.')
                .seq(class(CharClass::from_descriptor("0-9").unwrap()).at_least_one())
                .or_not(),
        )
        .captured()
        .map(|bytes: Vec<u8>| std::str::from_utf8(&bytes).unwrap().parse::<f64>().unwrap())
}

/// Build the `value := object | array | string | number | true | false | null`
/// grammar, returning a reference to its rule so the caller controls the
/// rule's (and hence the whole grammar's) lifetime.
fn build_value_rule() -> Rule<typed_peg::hlist::HCons<Json, typed_peg::hlist::HNil>> {
    let value: Rule<typed_peg::hlist::HCons<Json, typed_peg::hlist::HNil>> = declare_rule("value");

    let member = json_string_bytes()
        .map(|bytes: Vec<u8>| String::from_utf8(bytes).unwrap())
        .seq(whitespace())
        .seq(char(':'))
        .seq(whitespace())
        .seq(nterm(&value))
        .map(|key: String, v: Json| (key, v));

    let object = char('{')
        .seq(whitespace())
        .seq(member.separated_by(
            whitespace().seq(char(',')).seq(whitespace()),
            0,
            None,
        ))
        .seq(whitespace())
        .seq(char('}'))
        .map(|members: Vec<(String, Json)>| Json::Object(members));

    let array = char('[')
        .seq(whitespace())
        .seq(nterm(&value).separated_by(
            whitespace().seq(char(',')).seq(whitespace()),
            0,
            None,
        ))
        .seq(whitespace())
        .seq(char(']'))
        .map(|items: Vec<Json>| Json::Array(items));

    let string_value = json_string_bytes()
        .map(|bytes: Vec<u8>| Json::String(String::from_utf8(bytes).unwrap()));

    let number_value = json_number().map(|n: f64| Json::Number(n));

    let literal_value = literal("true")
        .supply(Json::Bool(true))
        .or(literal("false").supply(Json::Bool(false)))
        .or(literal("null").supply(Json::Null));

    let pattern = object
        .or(array)
        .or(string_value)
        .or(number_value)
        .or(literal_value);

    define_rule(&value, pattern).unwrap();
    value
}

#[test]
fn s4_object_with_array_of_numbers() {
    let value = build_value_rule();
    let grammar = nterm(&value).seq(whitespace());
    let parser = Parser::new(&grammar);

    let outcome = parser.parse(br#"{"k":[1,2,3]}"#);
    assert!(outcome.is_success());
    assert_eq!(
        outcome.value().unwrap(),
        Json::Object(vec![(
            "k".to_string(),
            Json::Array(vec![
                Json::Number(1.0),
                Json::Number(2.0),
                Json::Number(3.0)
            ])
        )])
    );
}

#[test]
fn s4_missing_value_after_colon_fails_with_furthest_failure() {
    let value = build_value_rule();
    let grammar = nterm(&value);
    let parser = Parser::new(&grammar);

    let outcome = parser.parse(br#"{"k":}"#);
    assert!(!outcome.is_success());
    assert_eq!(outcome.furthest_failure_offset(), Some(5));
}
