// Integration tests that parse realistic multi-line corpora, catching
// issues that inline single-construct tests might miss.

use zenith_ast::{Node, Point};
use zenith_parser::{parse_source, ParseErrorKind, ParseOptions};

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
"#;

fn options() -> ParseOptions {
    ParseOptions::default()
}

#[test]
fn test_parse_sample_corpus() {
    let ast = parse_source(SAMPLE, 0, &options()).expect("parsing should succeed");
    assert_eq!(ast.roots.len(), 1);

    let target = match &ast.roots[0] {
        Node::Target(target) => target,
        other => panic!("expected a target root, got {:?}", other),
    };
    assert_eq!(target.name, "test_target");
    assert_eq!(target.key, "Test key");
    assert_eq!(target.dictionary.len(), 2);
    assert_eq!(target.dictionary["ev1"].description, "Test event 1");
    assert_eq!(target.children.len(), 1);

    let law = match &target.children[0] {
        Node::Law(law) => law,
        other => panic!("expected a nested law, got {:?}", other),
    };
    assert_eq!(law.name, "test_law");
    assert_eq!(law.start_date.to_string(), "2024-01-01");
    assert_eq!(law.period, Point::from_minutes(60));
    assert_eq!(law.events.len(), 2);
    assert_eq!(law.events["A"].tag.as_deref(), Some("ev1"));
    assert_eq!(law.events["A"].description, "First event");

    assert_eq!(law.group.len(), 2);
    assert_eq!(law.group[0].event_ref, "A");
    assert_eq!(law.group[0].coherence, Point::from_minutes(30));
    assert_eq!(law.group[0].dispersal, Point::from_minutes(15));
    assert_eq!(law.group[1].event_ref, "B");
}

#[test]
fn test_parse_nested_hierarchy() {
    let source = r#"
target parent:
    key:"Parent key"
    dictionnary:
        base:"Base event"
    target child:
        key:"Child key"
        dictionnary:
            derived[base]:"Derived event"
        law child_law:
            start_date:2024-01-01 at 09:00
            period:2.0
            Event:
                X[derived]:"Child event"
            GROUP:(X 2.0^0)
        end_law
    end_target
    law parent_law:
        start_date:2024-01-01 at 14:00
        period:1.0
        Event:
            Y[base]:"Parent event"
        GROUP:(Y 1.0^0)
    end_law
end_target
"#;
    let ast = parse_source(source, 0, &options()).expect("parsing should succeed");
    let parent = match &ast.roots[0] {
        Node::Target(target) => target,
        _ => panic!("expected target"),
    };
    assert_eq!(parent.children.len(), 2);
    match &parent.children[0] {
        Node::Target(child) => {
            assert_eq!(child.name, "child");
            assert_eq!(
                child.dictionary["derived"].parent_ref.as_deref(),
                Some("base")
            );
        }
        other => panic!("expected child target, got {:?}", other),
    }
    match &parent.children[1] {
        Node::Law(law) => assert_eq!(law.name, "parent_law"),
        other => panic!("expected trailing law, got {:?}", other),
    }
}

#[test]
fn test_parse_top_level_law() {
    let source = r#"
law M:
    start_date:2025-01-01 at 00:00
    period:1.0
    Event:
        A:"x"
    GROUP:(A 1.0^0)
end_law
"#;
    let ast = parse_source(source, 0, &options()).expect("parsing should succeed");
    assert_eq!(ast.roots.len(), 1);
    match &ast.roots[0] {
        Node::Law(law) => {
            assert_eq!(law.name, "M");
            assert_eq!(law.events["A"].tag, None);
        }
        _ => panic!("expected law"),
    }
}

#[test]
fn test_parse_empty_corpus() {
    let ast = parse_source("", 0, &options()).expect("empty corpus is valid");
    assert!(ast.roots.is_empty());
}

#[test]
fn test_same_event_repeats_in_group() {
    let source = r#"
law repeat:
    start_date:2025-01-01 at 08:00
    period:2.0
    Event:
        A:"work"
        B:"rest"
    GROUP:(A 30^0 - B 15^0 - A 30^0 - B 15^0 - A 30^0)
end_law
"#;
    let ast = parse_source(source, 0, &options()).expect("parsing should succeed");
    match &ast.roots[0] {
        Node::Law(law) => {
            assert_eq!(law.group.len(), 5);
            assert_eq!(law.events.len(), 2);
        }
        _ => panic!("expected law"),
    }
}

#[test]
fn test_missing_colon_is_rejected() {
    let source = "target test: law missing end_target";
    let err = parse_source(source, 0, &options()).unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken | ParseErrorKind::UnexpectedEof
    ));
}

#[test]
fn test_truncated_law_is_rejected() {
    let source = "law m:\n    start_date:2025-01-01 at 00:00\n    period:1.0\n";
    let err = parse_source(source, 0, &options()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_invalid_calendar_date_is_rejected() {
    let source = r#"
law m:
    start_date:2025-02-30 at 00:00
    period:1.0
    Event:
        A:"x"
    GROUP:(A 1.0^0)
end_law
"#;
    let err = parse_source(source, 0, &options()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidDate);
}

#[test]
fn test_duplicate_event_declaration_is_rejected() {
    let source = r#"
law m:
    start_date:2025-01-01 at 00:00
    period:1.0
    Event:
        A:"x"
        A:"y"
    GROUP:(A 1.0^0)
end_law
"#;
    let err = parse_source(source, 0, &options()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
}

#[test]
fn test_depth_limit() {
    let shallow = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    let source = r#"
target a:
    key:"a"
    dictionnary:
    target b:
        key:"b"
        dictionnary:
        target c:
            key:"c"
            dictionnary:
        end_target
    end_target
end_target
"#;
    let err = parse_source(source, 0, &shallow).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LimitExceeded);
    assert!(parse_source(source, 0, &ParseOptions::default()).is_ok());
}

#[test]
fn test_token_limit() {
    let tight = ParseOptions {
        max_tokens: 4,
        ..ParseOptions::default()
    };
    let err = parse_source("law m: start_date:2025-01-01 at 00:00", 0, &tight).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LimitExceeded);
}

#[test]
fn test_lexical_error_surfaces() {
    let err = parse_source("law € :", 0, &options()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lexical);
}
