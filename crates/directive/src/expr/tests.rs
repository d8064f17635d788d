use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[rstest]
#[case("'hello'", Value::from("hello"))]
#[case("\"hello\"", Value::from("hello"))]
#[case("'it\\'s'", Value::from("it's"))]
#[case("'a, b'", Value::from("a, b"))]
#[case("'back\\\\slash'", Value::from("back\\slash"))]
#[case("''", Value::from(""))]
#[case(" 42 ", Value::Int(42))]
#[case("-7", Value::Int(-7))]
#[case("2.5", Value::Float(2.5))]
#[case("1e3", Value::Float(1000.0))]
#[case("true", Value::Bool(true))]
#[case("FALSE", Value::Bool(false))]
#[case("null", Value::Null)]
fn literals(#[case] raw: &str, #[case] expected: Value) {
	assert_eq!(parse_literal(raw).unwrap(), expected);
}

#[rstest]
#[case("$user")]
#[case("strtoupper('x')")]
#[case("'a' . 'b'")]
#[case("'unterminated")]
#[case("inf")]
#[case("1, 2")]
#[case("")]
fn non_literals_are_rejected(#[case] raw: &str) {
	assert!(matches!(
		parse_literal(raw),
		Err(DirectiveError::UnsupportedExpression(_))
	));
}

#[test]
fn tag_alone_defaults_argument_to_empty_string() {
	assert_eq!(
		Directive::parse("'sidebar'").unwrap(),
		Directive {
			tag: "sidebar".into(),
			arg: Value::from(""),
		}
	);
}

#[test]
fn splits_at_first_comma_outside_strings() {
	assert_eq!(
		Directive::parse("'a,b', 'c,d'").unwrap(),
		Directive {
			tag: "a,b".into(),
			arg: Value::from("c,d"),
		}
	);
	assert_eq!(Directive::parse("'footer', 3").unwrap().arg, Value::Int(3));
}

#[test]
fn extra_arguments_are_unsupported() {
	assert!(matches!(
		Directive::parse("'footer', 1, 2"),
		Err(DirectiveError::UnsupportedExpression(expr)) if expr == "1, 2"
	));
}

#[rstest]
#[case("")]
#[case("  ")]
#[case(", 'x'")]
fn missing_tag(#[case] expression: &str) {
	assert!(matches!(
		Directive::parse(expression),
		Err(DirectiveError::MissingTag)
	));
}

#[test]
fn tag_must_be_a_string() {
	assert!(matches!(
		Directive::parse("42"),
		Err(DirectiveError::UnsupportedExpression(expr)) if expr == "42"
	));
}

#[rstest]
#[case("'x')", Some(3))]
#[case("'a)b')rest", Some(5))]
#[case("f(1))", Some(4))]
#[case("'x'", None)]
#[case("'x)", None)]
fn closing_paren(#[case] body: &str, #[case] expected: Option<usize>) {
	assert_eq!(find_close(body), expected);
}
