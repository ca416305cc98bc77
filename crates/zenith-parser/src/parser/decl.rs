//! Law and target declaration parsers.
//!
//! Grammar (EBNF):
//!
//! ```text
//! corpus      := { law | target }
//! law         := "law" IDENT ":" law_body "end_law"
//! law_body    := "start_date" ":" DATE "at" TIME
//!                "period" ":" POINT
//!                "Event" ":" { event_decl }
//!                "GROUP" ":" "(" group_term { "-" group_term } ")"
//! event_decl  := IDENT [ "[" IDENT "]" ] ":" STRING
//! group_term  := IDENT POINT "^" POINT
//! target      := "target" IDENT ":" target_body "end_target"
//! target_body := "key" ":" STRING
//!                "dictionnary" ":" { dict_entry }
//!                { law | target }
//! dict_entry  := IDENT [ "[" IDENT "]" ] ":" STRING
//! POINT       := number | dotted_number
//! ```

use super::error::ParseError;
use super::stream::TokenStream;
use super::ParseOptions;
use indexmap::IndexMap;
use zenith_ast::foundation::point::Point;
use zenith_ast::foundation::time;
use zenith_ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Target};
use zenith_lexer::Token;

/// Parse a whole corpus: top-level laws and targets until end of input.
pub fn parse_corpus(stream: &mut TokenStream, options: &ParseOptions) -> Result<Ast, ParseError> {
    let mut roots = Vec::new();
    while !stream.at_end() {
        match stream.peek() {
            Some(Token::Law) => roots.push(Node::Law(parse_law(stream)?)),
            Some(Token::Target) => roots.push(Node::Target(parse_target(stream, 1, options)?)),
            other => {
                return Err(ParseError::unexpected_token(
                    other,
                    "'law' or 'target'",
                    stream.current_span(),
                ))
            }
        }
    }
    Ok(Ast { roots })
}

/// Parse one law declaration.
fn parse_law(stream: &mut TokenStream) -> Result<Law, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Law)?;
    let name = stream.expect_ident("a law name")?;
    stream.expect(Token::Colon)?;

    stream.expect(Token::StartDate)?;
    stream.expect(Token::Colon)?;
    let start_date = parse_date(stream)?;
    stream.expect(Token::At)?;
    let start_time = parse_time(stream)?;

    stream.expect(Token::Period)?;
    stream.expect(Token::Colon)?;
    let period = parse_point(stream)?;

    stream.expect(Token::Event)?;
    stream.expect(Token::Colon)?;
    let mut events = IndexMap::new();
    while matches!(stream.peek(), Some(Token::Ident(_))) {
        let event = parse_event_decl(stream)?;
        let span = event.span;
        if events.insert(event.name.clone(), event).is_some() {
            return Err(ParseError::invalid_literal(
                "duplicate event declaration in this law",
                span,
            ));
        }
    }

    stream.expect(Token::Group)?;
    stream.expect(Token::Colon)?;
    stream.expect(Token::LParen)?;
    let mut group = vec![parse_group_term(stream)?];
    while stream.check(&Token::Dash) {
        stream.advance();
        group.push(parse_group_term(stream)?);
    }
    stream.expect(Token::RParen)?;

    stream.expect(Token::EndLaw)?;

    Ok(Law {
        name: name.to_string(),
        start_date,
        start_time,
        period,
        events,
        group,
        span: stream.span_from(start),
    })
}

/// Parse one target declaration, recursing into nested laws and targets.
fn parse_target(
    stream: &mut TokenStream,
    depth: usize,
    options: &ParseOptions,
) -> Result<Target, ParseError> {
    if depth > options.max_depth {
        return Err(ParseError::limit(
            format!(
                "target nesting depth {} exceeds the configured maximum of {}",
                depth, options.max_depth
            ),
            stream.current_span(),
        ));
    }

    let start = stream.current_pos();
    stream.expect(Token::Target)?;
    let name = stream.expect_ident("a target name")?;
    stream.expect(Token::Colon)?;

    stream.expect(Token::Key)?;
    stream.expect(Token::Colon)?;
    let key = stream.expect_string("the target key string")?;

    stream.expect(Token::Dictionnary)?;
    stream.expect(Token::Colon)?;
    let mut dictionary = IndexMap::new();
    while matches!(stream.peek(), Some(Token::Ident(_))) {
        let entry = parse_dict_entry(stream)?;
        let span = entry.span;
        if dictionary.insert(entry.local_key.clone(), entry).is_some() {
            return Err(ParseError::invalid_literal(
                "duplicate dictionary entry in this target",
                span,
            ));
        }
    }

    let mut children = Vec::new();
    loop {
        match stream.peek() {
            Some(Token::Law) => children.push(Node::Law(parse_law(stream)?)),
            Some(Token::Target) => {
                children.push(Node::Target(parse_target(stream, depth + 1, options)?))
            }
            Some(Token::EndTarget) => break,
            other => {
                return Err(ParseError::unexpected_token(
                    other,
                    "'law', 'target', or 'end_target'",
                    stream.current_span(),
                ))
            }
        }
    }
    stream.expect(Token::EndTarget)?;

    Ok(Target {
        name: name.to_string(),
        key: key.to_string(),
        dictionary,
        children,
        span: stream.span_from(start),
    })
}

/// Parse `IDENT [ "[" IDENT "]" ] ":" STRING` as an event declaration.
fn parse_event_decl(stream: &mut TokenStream) -> Result<EventDecl, ParseError> {
    let start = stream.current_pos();
    let name = stream.expect_ident("an event name")?;
    let tag = parse_bracket_ref(stream)?;
    stream.expect(Token::Colon)?;
    let description = stream.expect_string("the event description string")?;
    Ok(EventDecl {
        name: name.to_string(),
        tag,
        description: description.to_string(),
        span: stream.span_from(start),
    })
}

/// Parse `IDENT [ "[" IDENT "]" ] ":" STRING` as a dictionary entry.
fn parse_dict_entry(stream: &mut TokenStream) -> Result<DictEntry, ParseError> {
    let start = stream.current_pos();
    let local_key = stream.expect_ident("a dictionary key")?;
    let parent_ref = parse_bracket_ref(stream)?;
    stream.expect(Token::Colon)?;
    let description = stream.expect_string("the entry description string")?;
    Ok(DictEntry {
        local_key: local_key.to_string(),
        parent_ref,
        description: description.to_string(),
        span: stream.span_from(start),
    })
}

/// Parse an optional `[ IDENT ]` reference.
fn parse_bracket_ref(stream: &mut TokenStream) -> Result<Option<String>, ParseError> {
    if !stream.check(&Token::LBracket) {
        return Ok(None);
    }
    stream.advance();
    let name = stream.expect_ident("a reference name")?;
    stream.expect(Token::RBracket)?;
    Ok(Some(name.to_string()))
}

/// Parse `IDENT POINT "^" POINT` as a group term.
fn parse_group_term(stream: &mut TokenStream) -> Result<GroupTerm, ParseError> {
    let start = stream.current_pos();
    let event_ref = stream.expect_ident("an event reference")?;
    let coherence = parse_point(stream)?;
    stream.expect(Token::Caret)?;
    let dispersal = parse_point(stream)?;
    Ok(GroupTerm {
        event_ref: event_ref.to_string(),
        coherence,
        dispersal,
        span: stream.span_from(start),
    })
}

/// Parse a point literal: a bare number is a minute count, a dotted number
/// goes through point arithmetic.
fn parse_point(stream: &mut TokenStream) -> Result<Point, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Number(n)) => {
            let minutes = *n;
            stream.advance();
            Ok(Point::from_minutes(minutes))
        }
        Some(Token::DottedNumber(text)) => {
            let text = text.clone();
            stream.advance();
            Point::parse(&text)
                .map_err(|e| ParseError::invalid_literal(format!("malformed point: {}", e), span))
        }
        other => Err(ParseError::unexpected_token(
            other,
            "a point literal",
            span,
        )),
    }
}

/// Parse a date literal, validating calendar ranges.
fn parse_date(stream: &mut TokenStream) -> Result<chrono::NaiveDate, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Date(text)) => {
            let text = text.clone();
            stream.advance();
            time::parse_date(&text).map_err(|e| ParseError::invalid_date(e.to_string(), span))
        }
        other => Err(ParseError::unexpected_token(
            other,
            "a date (YYYY-MM-DD)",
            span,
        )),
    }
}

/// Parse a time literal, validating clock ranges.
fn parse_time(stream: &mut TokenStream) -> Result<chrono::NaiveTime, ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Time(text)) => {
            let text = text.clone();
            stream.advance();
            time::parse_time(&text).map_err(|e| ParseError::invalid_date(e.to_string(), span))
        }
        other => Err(ParseError::unexpected_token(
            other,
            "a time (HH:MM)",
            span,
        )),
    }
}
