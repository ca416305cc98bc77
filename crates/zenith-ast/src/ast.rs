//! Typed syntax tree for the Zenith corpus language.
//!
//! One struct per node kind; children are owned. Targets form a tree and
//! references between nodes (event tags, dictionary parent keys) are
//! name-based, never pointers, so the tree has no cycles to manage.
//!
//! Ordered name lookups use `IndexMap`: declaration order is part of the
//! language contract (simulation and aggregation never re-sort).

use crate::foundation::point::Point;
use crate::foundation::span::Span;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

/// A parsed source unit: the ordered top-level laws and targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    /// Top-level nodes in declaration order
    pub roots: Vec<Node>,
}

/// A top-level or nested declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Law(Law),
    Target(Target),
}

impl Node {
    /// Declared name of this node.
    pub fn name(&self) -> &str {
        match self {
            Node::Law(law) => &law.name,
            Node::Target(target) => &target.name,
        }
    }
}

/// A planned temporal session.
///
/// Invariants enforced by validation (not construction): every `event_ref`
/// in `group` is declared in `events`; event tags resolve through the
/// enclosing target chain; the group durations should sum to `period`.
#[derive(Debug, Clone, PartialEq)]
pub struct Law {
    pub name: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    /// Total planned period in minutes
    pub period: Point,
    /// Declared events, by name, in declaration order
    pub events: IndexMap<String, EventDecl>,
    /// The group expression: ordered slots, one simulated event each
    pub group: Vec<GroupTerm>,
    pub span: Span,
}

impl Law {
    /// Combined start date and time.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    /// Sum of coherence + dispersal over all group terms, in minutes.
    pub fn group_duration_minutes(&self) -> i64 {
        self.group
            .iter()
            .map(|term| term.coherence.minutes() + term.dispersal.minutes())
            .sum()
    }
}

/// A named entry in a law's `Event:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub name: String,
    /// Optional dictionary key reference in the enclosing target chain
    pub tag: Option<String>,
    pub description: String,
    pub span: Span,
}

/// One slot in a law's `GROUP:` expression.
///
/// The same event name may appear in several terms; each occurrence is a
/// separate slot.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTerm {
    pub event_ref: String,
    /// Useful minutes of the slot
    pub coherence: Point,
    /// Used-but-dispersive minutes of the slot
    pub dispersal: Point,
    pub span: Span,
}

impl GroupTerm {
    /// Total slot duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.coherence.minutes() + self.dispersal.minutes()
    }
}

/// An entry in a target's `dictionnary:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub local_key: String,
    /// Optional key of an entry in an ancestor target's dictionary
    pub parent_ref: Option<String>,
    pub description: String,
    pub span: Span,
}

/// A named objective with a local dictionary and nested laws or targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub key: String,
    /// Dictionary entries by local key, in declaration order
    pub dictionary: IndexMap<String, DictEntry>,
    /// Nested laws and targets in declaration order
    pub children: Vec<Node>,
    pub span: Span,
}
