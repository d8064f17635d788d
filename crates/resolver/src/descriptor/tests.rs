use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[rstest]
#[case("Mailer@send", "Mailer", "send", false)]
#[case("Mailer", "Mailer", "handle", true)]
#[case(" Mailer @ send ", "Mailer", "send", false)]
#[case("Mailer@send@later", "Mailer", "send@later", false)]
fn parses_target_and_method(
	#[case] input: &str,
	#[case] target: &str,
	#[case] method: &str,
	#[case] bare: bool,
) {
	let descriptor = Descriptor::parse(input).unwrap();
	assert_eq!(descriptor.target(), target);
	assert_eq!(descriptor.method(), method);
	assert_eq!(descriptor.is_bare(), bare);
}

#[rstest]
#[case("", "empty target")]
#[case("   ", "empty target")]
#[case("@send", "empty target")]
#[case("Mailer@", "empty method")]
fn rejects_missing_parts(#[case] input: &str, #[case] reason: &'static str) {
	assert_eq!(
		Descriptor::parse(input),
		Err(ResolveError::Malformed {
			descriptor: input.to_string(),
			reason,
		})
	);
}

#[test]
fn displays_with_resolved_method() {
	assert_eq!(Descriptor::parse("Mailer").unwrap().to_string(), "Mailer@handle");
	let parsed: Descriptor = "Mailer@send".parse().unwrap();
	assert_eq!(parsed.to_string(), "Mailer@send");
}
