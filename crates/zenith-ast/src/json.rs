//! Tagged JSON encoding of the AST.
//!
//! Every node carries a `"kind"` field (`corpus`, `law`, `target`, `event`,
//! `group_term`, `dict_entry`), a `"name"` where applicable, and typed child
//! arrays. Spans are not encoded: the JSON AST is structural, and decoding
//! yields nodes with empty spans.
//!
//! Points are encoded as their signed minute counts; dates and times as
//! their canonical text.

use crate::ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Target};
use crate::foundation::point::Point;
use crate::foundation::span::Span;
use crate::foundation::time::{self, format_time, TimeError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One node of the JSON AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JsonNode {
    Corpus {
        roots: Vec<JsonNode>,
    },
    Law {
        name: String,
        start_date: String,
        start_time: String,
        period: i64,
        events: Vec<JsonNode>,
        group: Vec<JsonNode>,
    },
    Target {
        name: String,
        key: String,
        dictionary: Vec<JsonNode>,
        children: Vec<JsonNode>,
    },
    Event {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        description: String,
    },
    GroupTerm {
        event_ref: String,
        coherence: i64,
        dispersal: i64,
    },
    DictEntry {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<String>,
        description: String,
    },
}

impl JsonNode {
    /// The `kind` tag of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            JsonNode::Corpus { .. } => "corpus",
            JsonNode::Law { .. } => "law",
            JsonNode::Target { .. } => "target",
            JsonNode::Event { .. } => "event",
            JsonNode::GroupTerm { .. } => "group_term",
            JsonNode::DictEntry { .. } => "dict_entry",
        }
    }
}

/// Failure while decoding a JSON AST.
#[derive(Debug, Error)]
pub enum JsonAstError {
    /// A child array held a node of the wrong kind.
    #[error("expected a {expected} node, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
    /// A date or time string failed calendar validation.
    #[error(transparent)]
    Time(#[from] TimeError),
    /// Malformed JSON or a structure serde cannot map onto the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Encode an AST as a `corpus` JSON node.
pub fn ast_to_json(ast: &Ast) -> JsonNode {
    JsonNode::Corpus {
        roots: ast.roots.iter().map(node_to_json).collect(),
    }
}

/// Encode an AST as a JSON string.
pub fn ast_to_json_string(ast: &Ast, pretty: bool) -> Result<String, JsonAstError> {
    let node = ast_to_json(ast);
    let text = if pretty {
        serde_json::to_string_pretty(&node)?
    } else {
        serde_json::to_string(&node)?
    };
    Ok(text)
}

/// Decode a `corpus` JSON node back into an AST.
pub fn ast_from_json(node: &JsonNode) -> Result<Ast, JsonAstError> {
    match node {
        JsonNode::Corpus { roots } => Ok(Ast {
            roots: roots
                .iter()
                .map(node_from_json)
                .collect::<Result<_, _>>()?,
        }),
        other => Err(JsonAstError::WrongKind {
            expected: "corpus",
            found: other.kind(),
        }),
    }
}

/// Decode a JSON AST from text.
pub fn ast_from_json_str(text: &str) -> Result<Ast, JsonAstError> {
    let node: JsonNode = serde_json::from_str(text)?;
    ast_from_json(&node)
}

fn node_to_json(node: &Node) -> JsonNode {
    match node {
        Node::Law(law) => law_to_json(law),
        Node::Target(target) => target_to_json(target),
    }
}

fn law_to_json(law: &Law) -> JsonNode {
    JsonNode::Law {
        name: law.name.clone(),
        start_date: law.start_date.format("%Y-%m-%d").to_string(),
        start_time: format_time(law.start_time),
        period: law.period.minutes(),
        events: law
            .events
            .values()
            .map(|event| JsonNode::Event {
                name: event.name.clone(),
                tag: event.tag.clone(),
                description: event.description.clone(),
            })
            .collect(),
        group: law
            .group
            .iter()
            .map(|term| JsonNode::GroupTerm {
                event_ref: term.event_ref.clone(),
                coherence: term.coherence.minutes(),
                dispersal: term.dispersal.minutes(),
            })
            .collect(),
    }
}

fn target_to_json(target: &Target) -> JsonNode {
    JsonNode::Target {
        name: target.name.clone(),
        key: target.key.clone(),
        dictionary: target
            .dictionary
            .values()
            .map(|entry| JsonNode::DictEntry {
                name: entry.local_key.clone(),
                parent: entry.parent_ref.clone(),
                description: entry.description.clone(),
            })
            .collect(),
        children: target.children.iter().map(node_to_json).collect(),
    }
}

fn node_from_json(node: &JsonNode) -> Result<Node, JsonAstError> {
    match node {
        JsonNode::Law {
            name,
            start_date,
            start_time,
            period,
            events,
            group,
        } => {
            let mut event_map = IndexMap::new();
            for event in events {
                match event {
                    JsonNode::Event {
                        name,
                        tag,
                        description,
                    } => {
                        event_map.insert(
                            name.clone(),
                            EventDecl {
                                name: name.clone(),
                                tag: tag.clone(),
                                description: description.clone(),
                                span: Span::default(),
                            },
                        );
                    }
                    other => {
                        return Err(JsonAstError::WrongKind {
                            expected: "event",
                            found: other.kind(),
                        })
                    }
                }
            }

            let mut terms = Vec::with_capacity(group.len());
            for term in group {
                match term {
                    JsonNode::GroupTerm {
                        event_ref,
                        coherence,
                        dispersal,
                    } => terms.push(GroupTerm {
                        event_ref: event_ref.clone(),
                        coherence: Point::from_minutes(*coherence),
                        dispersal: Point::from_minutes(*dispersal),
                        span: Span::default(),
                    }),
                    other => {
                        return Err(JsonAstError::WrongKind {
                            expected: "group_term",
                            found: other.kind(),
                        })
                    }
                }
            }

            Ok(Node::Law(Law {
                name: name.clone(),
                start_date: time::parse_date(start_date)?,
                start_time: time::parse_time(start_time)?,
                period: Point::from_minutes(*period),
                events: event_map,
                group: terms,
                span: Span::default(),
            }))
        }
        JsonNode::Target {
            name,
            key,
            dictionary,
            children,
        } => {
            let mut dict_map = IndexMap::new();
            for entry in dictionary {
                match entry {
                    JsonNode::DictEntry {
                        name,
                        parent,
                        description,
                    } => {
                        dict_map.insert(
                            name.clone(),
                            DictEntry {
                                local_key: name.clone(),
                                parent_ref: parent.clone(),
                                description: description.clone(),
                                span: Span::default(),
                            },
                        );
                    }
                    other => {
                        return Err(JsonAstError::WrongKind {
                            expected: "dict_entry",
                            found: other.kind(),
                        })
                    }
                }
            }

            Ok(Node::Target(Target {
                name: name.clone(),
                key: key.clone(),
                dictionary: dict_map,
                children: children
                    .iter()
                    .map(node_from_json)
                    .collect::<Result<_, _>>()?,
                span: Span::default(),
            }))
        }
        other => Err(JsonAstError::WrongKind {
            expected: "law or target",
            found: other.kind(),
        }),
    }
}
