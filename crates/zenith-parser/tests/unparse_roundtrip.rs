// Round-trip tests: parsing the canonical rendering of a parse must yield
// an equal AST, and the rendering itself must be a fixpoint.

use zenith_ast::unparse::unparse;
use zenith_parser::{parse_source, ParseOptions};

const SAMPLE: &str = r#"
target test_target:
    key:"Test key"
    dictionnary:
        ev1:"Test event 1"
        ev2:"Test event 2"
    law test_law:
        start_date:2024-01-01 at 10:00
        period:1.0
        Event:
            A[ev1]:"First event"
            B[ev2]:"Second event"
        GROUP:(A 30^15 - B 15^0)
    end_law
end_target

law solo:
    start_date:2025-12-25 at 15:45
    period:1.30
    Event:
        A:"alpha"
        B:"beta"
    GROUP:(A 30^0 - B 45^15)
end_law
"#;

#[test]
fn test_parse_unparse_parse_is_identity() {
    let options = ParseOptions::default();
    let first = parse_source(SAMPLE, 0, &options).expect("original parses");
    let rendered = unparse(&first);
    let second = parse_source(&rendered, 0, &options)
        .unwrap_or_else(|e| panic!("canonical rendering must reparse: {}\n{}", e, rendered));

    // Structural equality via the JSON encoding, which excludes spans.
    assert_eq!(
        zenith_ast::json::ast_to_json(&first),
        zenith_ast::json::ast_to_json(&second)
    );
}

#[test]
fn test_unparse_is_a_fixpoint() {
    let options = ParseOptions::default();
    let first = parse_source(SAMPLE, 0, &options).expect("original parses");
    let once = unparse(&first);
    let twice = unparse(&parse_source(&once, 0, &options).expect("rendering parses"));
    assert_eq!(once, twice);
}

#[test]
fn test_escaped_quotes_survive_roundtrip() {
    let source = r#"
law q:
    start_date:2025-01-01 at 00:00
    period:30
    Event:
        A:"say \"hello\""
    GROUP:(A 30^0)
end_law
"#;
    let options = ParseOptions::default();
    let first = parse_source(source, 0, &options).expect("original parses");
    let rendered = unparse(&first);
    let second = parse_source(&rendered, 0, &options).expect("rendering parses");
    assert_eq!(
        zenith_ast::json::ast_to_json(&first),
        zenith_ast::json::ast_to_json(&second)
    );
}
