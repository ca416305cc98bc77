//! Canonical rendering of an AST back to source text.
//!
//! One declaration per line, four-space indents per nesting level, the
//! `GROUP` expression on a single parenthesized line with ` - ` separators.
//! Unparsing then reparsing yields an equal AST (modulo spans); unparse
//! output is a fixpoint of `parse ∘ unparse`.

use crate::ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Target};
use crate::foundation::time::format_time;

const INDENT: &str = "    ";

/// Render a full AST to canonical source text.
pub fn unparse(ast: &Ast) -> String {
    let mut out = String::new();
    for node in &ast.roots {
        unparse_node(&mut out, node, 0);
    }
    out
}

fn unparse_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Law(law) => unparse_law(out, law, depth),
        Node::Target(target) => unparse_target(out, target, depth),
    }
}

fn unparse_law(out: &mut String, law: &Law, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    let entry_pad = INDENT.repeat(depth + 2);

    out.push_str(&format!("{}law {}:\n", pad, law.name));
    out.push_str(&format!(
        "{}start_date:{} at {}\n",
        inner,
        law.start_date.format("%Y-%m-%d"),
        format_time(law.start_time)
    ));
    out.push_str(&format!("{}period:{}\n", inner, law.period));

    out.push_str(&format!("{}Event:\n", inner));
    for event in law.events.values() {
        out.push_str(&format!("{}{}\n", entry_pad, render_event(event)));
    }

    let terms: Vec<String> = law.group.iter().map(render_term).collect();
    out.push_str(&format!("{}GROUP:({})\n", inner, terms.join(" - ")));
    out.push_str(&format!("{}end_law\n", pad));
}

fn unparse_target(out: &mut String, target: &Target, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    let entry_pad = INDENT.repeat(depth + 2);

    out.push_str(&format!("{}target {}:\n", pad, target.name));
    out.push_str(&format!("{}key:{}\n", inner, quote(&target.key)));
    out.push_str(&format!("{}dictionnary:\n", inner));
    for entry in target.dictionary.values() {
        out.push_str(&format!("{}{}\n", entry_pad, render_dict_entry(entry)));
    }
    for child in &target.children {
        unparse_node(out, child, depth + 1);
    }
    out.push_str(&format!("{}end_target\n", pad));
}

fn render_event(event: &EventDecl) -> String {
    match &event.tag {
        Some(tag) => format!("{}[{}]:{}", event.name, tag, quote(&event.description)),
        None => format!("{}:{}", event.name, quote(&event.description)),
    }
}

fn render_dict_entry(entry: &DictEntry) -> String {
    match &entry.parent_ref {
        Some(parent) => format!(
            "{}[{}]:{}",
            entry.local_key,
            parent,
            quote(&entry.description)
        ),
        None => format!("{}:{}", entry.local_key, quote(&entry.description)),
    }
}

fn render_term(term: &GroupTerm) -> String {
    format!("{} {}^{}", term.event_ref, term.coherence, term.dispersal)
}

/// Quote a string literal, escaping embedded quotes.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::point::Point;
    use crate::foundation::span::Span;
    use chrono::{NaiveDate, NaiveTime};
    use indexmap::IndexMap;

    fn sample_law() -> Law {
        let mut events = IndexMap::new();
        events.insert(
            "A".to_string(),
            EventDecl {
                name: "A".to_string(),
                tag: Some("ev1".to_string()),
                description: "First event".to_string(),
                span: Span::zero(0),
            },
        );
        Law {
            name: "test_law".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            period: Point::parse("1.0").unwrap(),
            events,
            group: vec![GroupTerm {
                event_ref: "A".to_string(),
                coherence: Point::from_minutes(30),
                dispersal: Point::from_minutes(15),
                span: Span::zero(0),
            }],
            span: Span::zero(0),
        }
    }

    #[test]
    fn test_unparse_law_layout() {
        let ast = Ast {
            roots: vec![Node::Law(sample_law())],
        };
        let text = unparse(&ast);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "law test_law:");
        assert_eq!(lines[1], "    start_date:2024-01-01 at 10:00");
        assert_eq!(lines[2], "    period:0.1.0");
        assert_eq!(lines[3], "    Event:");
        assert_eq!(lines[4], "        A[ev1]:\"First event\"");
        assert_eq!(lines[5], "    GROUP:(A 0.30^0.15)");
        assert_eq!(lines[6], "end_law");
    }

    #[test]
    fn test_unparse_target_nesting() {
        let mut dictionary = IndexMap::new();
        dictionary.insert(
            "ev1".to_string(),
            DictEntry {
                local_key: "ev1".to_string(),
                parent_ref: None,
                description: "Test event".to_string(),
                span: Span::zero(0),
            },
        );
        let ast = Ast {
            roots: vec![Node::Target(Target {
                name: "t".to_string(),
                key: "Test key".to_string(),
                dictionary,
                children: vec![Node::Law(sample_law())],
                span: Span::zero(0),
            })],
        };
        let text = unparse(&ast);
        assert!(text.contains("target t:\n    key:\"Test key\"\n    dictionnary:\n        ev1:\"Test event\"\n"));
        assert!(text.contains("    law test_law:\n        start_date:"));
        assert!(text.ends_with("end_target\n"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }
}
