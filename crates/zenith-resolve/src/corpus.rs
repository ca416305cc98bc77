//! The corpus: an AST plus name indices and resolution queries.
//!
//! Indices are name-based. A `LawInfo`/`TargetInfo` stores the child-index
//! path of its node from the roots, so lookups walk a handful of vector
//! indices instead of holding back-references into the tree.

use crate::error::ResolveError;
use indexmap::IndexMap;
use serde::Serialize;
use zenith_ast::{Ast, DictEntry, Law, Node, Target};

/// A parsed corpus with name indices, generations, and per-law context.
///
/// Built once with [`Corpus::build`]; immutable afterwards. Duplicate names
/// keep their first occurrence in the indices; the validator reports the
/// collision separately.
#[derive(Debug, Clone)]
pub struct Corpus {
    ast: Ast,
    laws: IndexMap<String, LawInfo>,
    targets: IndexMap<String, TargetInfo>,
    max_generation: u32,
}

/// Index entry for one law.
#[derive(Debug, Clone)]
pub struct LawInfo {
    /// Child-index path from the AST roots to this law
    path: Vec<usize>,
    /// Enclosing target names, outermost first; empty for a root law
    pub target_chain: Vec<String>,
    /// Effective event descriptions after dictionary inheritance
    pub descriptions: IndexMap<String, String>,
}

/// Index entry for one target.
#[derive(Debug, Clone)]
pub struct TargetInfo {
    /// Child-index path from the AST roots to this target
    path: Vec<usize>,
    /// Structural depth from the outermost root (roots have generation 1)
    pub generation: u32,
    /// Enclosing target name, if any
    pub parent: Option<String>,
    /// Direct child target names in declaration order
    pub children: Vec<String>,
    /// Direct child law names in declaration order
    pub direct_laws: Vec<String>,
}

/// Hierarchy description of one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetHierarchy {
    pub name: String,
    /// Target names from the root down to this target, inclusive
    pub path: Vec<String>,
    pub generation: u32,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub descendant_targets: Vec<String>,
    pub direct_laws: Vec<String>,
    pub descendant_laws: Vec<String>,
}

impl Corpus {
    /// Build indices over an AST.
    pub fn build(ast: Ast) -> Corpus {
        let mut laws = IndexMap::new();
        let mut targets = IndexMap::new();
        let mut max_generation = 0;

        fn visit<'a>(
            nodes: &'a [Node],
            path: &mut Vec<usize>,
            chain: &mut Vec<&'a Target>,
            chain_names: &mut Vec<String>,
            laws: &mut IndexMap<String, LawInfo>,
            targets: &mut IndexMap<String, TargetInfo>,
            max_generation: &mut u32,
        ) {
            for (index, node) in nodes.iter().enumerate() {
                path.push(index);
                match node {
                    Node::Law(law) => {
                        laws.entry(law.name.clone()).or_insert_with(|| LawInfo {
                            path: path.clone(),
                            target_chain: chain_names.clone(),
                            descriptions: effective_descriptions(law, chain),
                        });
                    }
                    Node::Target(target) => {
                        let generation = chain.len() as u32 + 1;
                        *max_generation = (*max_generation).max(generation);
                        targets
                            .entry(target.name.clone())
                            .or_insert_with(|| TargetInfo {
                                path: path.clone(),
                                generation,
                                parent: chain_names.last().cloned(),
                                children: target
                                    .children
                                    .iter()
                                    .filter_map(|c| match c {
                                        Node::Target(t) => Some(t.name.clone()),
                                        Node::Law(_) => None,
                                    })
                                    .collect(),
                                direct_laws: target
                                    .children
                                    .iter()
                                    .filter_map(|c| match c {
                                        Node::Law(l) => Some(l.name.clone()),
                                        Node::Target(_) => None,
                                    })
                                    .collect(),
                            });
                        chain.push(target);
                        chain_names.push(target.name.clone());
                        visit(
                            &target.children,
                            path,
                            chain,
                            chain_names,
                            laws,
                            targets,
                            max_generation,
                        );
                        chain_names.pop();
                        chain.pop();
                    }
                }
                path.pop();
            }
        }

        let mut path = Vec::new();
        let mut chain: Vec<&Target> = Vec::new();
        let mut chain_names: Vec<String> = Vec::new();
        visit(
            &ast.roots,
            &mut path,
            &mut chain,
            &mut chain_names,
            &mut laws,
            &mut targets,
            &mut max_generation,
        );

        Corpus {
            ast,
            laws,
            targets,
            max_generation,
        }
    }

    /// The underlying AST.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Look up a law node by name.
    pub fn law(&self, name: &str) -> Option<&Law> {
        let info = self.laws.get(name)?;
        match self.node_at(&info.path) {
            Some(Node::Law(law)) => Some(law),
            _ => None,
        }
    }

    /// Look up a target node by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        let info = self.targets.get(name)?;
        match self.node_at(&info.path) {
            Some(Node::Target(target)) => Some(target),
            _ => None,
        }
    }

    /// Index entry for a law.
    pub fn law_info(&self, name: &str) -> Option<&LawInfo> {
        self.laws.get(name)
    }

    /// Index entry for a target.
    pub fn target_info(&self, name: &str) -> Option<&TargetInfo> {
        self.targets.get(name)
    }

    /// All law names in traversal order.
    pub fn law_names(&self) -> impl Iterator<Item = &str> {
        self.laws.keys().map(String::as_str)
    }

    /// All target names in traversal order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Maximum observed generation; 0 when the corpus has no targets.
    pub fn max_generation(&self) -> u32 {
        self.max_generation
    }

    /// Targets whose `key` equals the given string.
    pub fn targets_by_key(&self, key: &str) -> Vec<String> {
        self.targets
            .keys()
            .filter(|name| self.target(name).is_some_and(|t| t.key == key))
            .cloned()
            .collect()
    }

    /// All laws reachable by descending from the named target, depth-first,
    /// preserving declaration order.
    pub fn laws_for_target(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let target = self
            .target(name)
            .ok_or_else(|| ResolveError::TargetNotFound(name.to_string()))?;
        let mut names = Vec::new();
        collect_laws(&target.children, &mut names);
        Ok(names)
    }

    /// Laws visible at a population level, in target-tree traversal order.
    ///
    /// - `population >= 1`: root laws plus the direct laws of every target
    ///   with generation ≤ `population`
    /// - `population == 0`: laws declared at the corpus root only
    /// - `population == -1`: the maximum observed generation
    pub fn laws_for_population(&self, population: i64) -> Result<Vec<String>, ResolveError> {
        let level = match population {
            -1 => self.max_generation as i64,
            p if p < -1 => return Err(ResolveError::InvalidPopulation(population)),
            p => p,
        };

        fn visit(nodes: &[Node], generation: i64, level: i64, out: &mut Vec<String>) {
            for node in nodes {
                match node {
                    // A law's visibility is decided by its enclosing target's
                    // generation; root laws (generation 0 scope) always count.
                    Node::Law(law) => {
                        if generation <= level {
                            out.push(law.name.clone());
                        }
                    }
                    Node::Target(target) => {
                        visit(&target.children, generation + 1, level, out)
                    }
                }
            }
        }

        let mut names = Vec::new();
        visit(&self.ast.roots, 0, level, &mut names);
        Ok(names)
    }

    /// Hierarchy description of a target: path, parent, descendants.
    pub fn hierarchy(&self, name: &str) -> Result<TargetHierarchy, ResolveError> {
        let info = self
            .targets
            .get(name)
            .ok_or_else(|| ResolveError::TargetNotFound(name.to_string()))?;
        let target = self
            .target(name)
            .ok_or_else(|| ResolveError::TargetNotFound(name.to_string()))?;

        let mut path = Vec::new();
        let mut cursor = Some(name.to_string());
        while let Some(current) = cursor {
            path.push(current.clone());
            cursor = self.targets.get(&current).and_then(|t| t.parent.clone());
        }
        path.reverse();

        let mut descendant_targets = Vec::new();
        let mut descendant_laws = Vec::new();
        collect_descendants(&target.children, &mut descendant_targets, &mut descendant_laws);

        Ok(TargetHierarchy {
            name: name.to_string(),
            path,
            generation: info.generation,
            parent: info.parent.clone(),
            children: info.children.clone(),
            descendant_targets,
            direct_laws: info.direct_laws.clone(),
            descendant_laws,
        })
    }

    fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.ast.roots.get(first)?;
        for &index in rest {
            match node {
                Node::Target(target) => node = target.children.get(index)?,
                Node::Law(_) => return None,
            }
        }
        Some(node)
    }
}

fn collect_laws(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Law(law) => out.push(law.name.clone()),
            Node::Target(target) => collect_laws(&target.children, out),
        }
    }
}

fn collect_descendants(nodes: &[Node], targets: &mut Vec<String>, laws: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Law(law) => laws.push(law.name.clone()),
            Node::Target(target) => {
                targets.push(target.name.clone());
                collect_descendants(&target.children, targets, laws);
            }
        }
    }
}

/// Effective event descriptions for a law under its target chain.
///
/// An untagged event keeps its own description. A tagged event takes the
/// description of the entry its tag resolves to; when entries chain upward
/// through `parent_ref`, the outermost ancestor entry wins. An unresolvable
/// tag falls back to the event's own description (the validator reports it).
fn effective_descriptions(law: &Law, chain: &[&Target]) -> IndexMap<String, String> {
    law.events
        .values()
        .map(|event| {
            let description = event
                .tag
                .as_deref()
                .and_then(|tag| resolve_tag(chain, tag))
                .map(|entry| entry.description.clone())
                .unwrap_or_else(|| event.description.clone());
            (event.name.clone(), description)
        })
        .collect()
}

/// Resolve a dictionary key against a target chain.
///
/// Finds the innermost dictionary declaring `key`, then follows `parent_ref`
/// links outward as far as they resolve.
pub(crate) fn resolve_tag<'a>(chain: &[&'a Target], key: &str) -> Option<&'a DictEntry> {
    let (mut depth, mut entry) = chain
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, target)| target.dictionary.get(key).map(|entry| (i, entry)))?;

    while let Some(parent_key) = entry.parent_ref.as_deref() {
        match chain[..depth]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, target)| target.dictionary.get(parent_key).map(|e| (i, e)))
        {
            Some((i, outer)) => {
                depth = i;
                entry = outer;
            }
            None => break,
        }
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_parser::{parse_source, ParseOptions};

    fn corpus(source: &str) -> Corpus {
        let ast = parse_source(source, 0, &ParseOptions::default()).expect("fixture parses");
        Corpus::build(ast)
    }

    const NESTED: &str = r#"
target t1:
    key:"outer"
    dictionnary:
        base:"Outer description"
    target t2:
        key:"inner"
        dictionnary:
            derived[base]:"Inner description"
        law l:
            start_date:2024-01-01 at 09:00
            period:2.0
            Event:
                X[derived]:"Own description"
            GROUP:(X 2.0^0)
        end_law
    end_target
end_target
"#;

    #[test]
    fn test_generations() {
        let corpus = corpus(NESTED);
        assert_eq!(corpus.target_info("t1").unwrap().generation, 1);
        assert_eq!(corpus.target_info("t2").unwrap().generation, 2);
        assert_eq!(corpus.max_generation(), 2);
    }

    #[test]
    fn test_parent_links_are_names() {
        let corpus = corpus(NESTED);
        assert_eq!(corpus.target_info("t1").unwrap().parent, None);
        assert_eq!(
            corpus.target_info("t2").unwrap().parent.as_deref(),
            Some("t1")
        );
    }

    #[test]
    fn test_law_chain_and_lookup() {
        let corpus = corpus(NESTED);
        let info = corpus.law_info("l").unwrap();
        assert_eq!(info.target_chain, vec!["t1", "t2"]);
        assert_eq!(corpus.law("l").unwrap().name, "l");
        assert!(corpus.law("absent").is_none());
    }

    #[test]
    fn test_dictionary_inheritance_outermost_wins() {
        let corpus = corpus(NESTED);
        let info = corpus.law_info("l").unwrap();
        // X is tagged [derived]; derived chains to base in t1.
        assert_eq!(info.descriptions["X"], "Outer description");
    }

    #[test]
    fn test_untagged_event_keeps_own_description() {
        let corpus = corpus(
            r#"
law solo:
    start_date:2024-01-01 at 09:00
    period:1.0
    Event:
        A:"kept"
    GROUP:(A 1.0^0)
end_law
"#,
        );
        assert_eq!(corpus.law_info("solo").unwrap().descriptions["A"], "kept");
        assert!(corpus.law_info("solo").unwrap().target_chain.is_empty());
    }

    #[test]
    fn test_laws_for_target_depth_first() {
        let corpus = corpus(NESTED);
        assert_eq!(corpus.laws_for_target("t1").unwrap(), vec!["l"]);
        assert_eq!(corpus.laws_for_target("t2").unwrap(), vec!["l"]);
        assert_eq!(
            corpus.laws_for_target("absent").unwrap_err(),
            ResolveError::TargetNotFound("absent".to_string())
        );
    }

    #[test]
    fn test_population_levels() {
        let corpus = corpus(NESTED);
        // l belongs to t2 (generation 2): invisible at population 1.
        assert!(corpus.laws_for_population(1).unwrap().is_empty());
        assert_eq!(corpus.laws_for_population(2).unwrap(), vec!["l"]);
        assert_eq!(corpus.laws_for_population(-1).unwrap(), vec!["l"]);
        assert!(corpus.laws_for_population(0).unwrap().is_empty());
        assert_eq!(
            corpus.laws_for_population(-2).unwrap_err(),
            ResolveError::InvalidPopulation(-2)
        );
    }

    #[test]
    fn test_population_includes_root_laws() {
        let corpus = corpus(
            r#"
law root_law:
    start_date:2024-01-01 at 08:00
    period:1.0
    Event:
        A:"a"
    GROUP:(A 1.0^0)
end_law
target t:
    key:"k"
    dictionnary:
    law nested:
        start_date:2024-01-01 at 09:00
        period:1.0
        Event:
            B:"b"
        GROUP:(B 1.0^0)
    end_law
end_target
"#,
        );
        assert_eq!(corpus.laws_for_population(0).unwrap(), vec!["root_law"]);
        assert_eq!(
            corpus.laws_for_population(1).unwrap(),
            vec!["root_law", "nested"]
        );
    }

    #[test]
    fn test_population_monotonicity() {
        let corpus = corpus(NESTED);
        let mut previous: Vec<String> = Vec::new();
        for level in 0..=3 {
            let current = corpus.laws_for_population(level).unwrap();
            assert!(
                previous.iter().all(|law| current.contains(law)),
                "population {} lost laws from population {}",
                level,
                level - 1
            );
            previous = current;
        }
    }

    #[test]
    fn test_hierarchy() {
        let corpus = corpus(NESTED);
        let hierarchy = corpus.hierarchy("t2").unwrap();
        assert_eq!(hierarchy.path, vec!["t1", "t2"]);
        assert_eq!(hierarchy.generation, 2);
        assert_eq!(hierarchy.parent.as_deref(), Some("t1"));
        assert_eq!(hierarchy.direct_laws, vec!["l"]);

        let root = corpus.hierarchy("t1").unwrap();
        assert_eq!(root.descendant_targets, vec!["t2"]);
        assert_eq!(root.descendant_laws, vec!["l"]);
    }

    #[test]
    fn test_targets_by_key() {
        let corpus = corpus(NESTED);
        assert_eq!(corpus.targets_by_key("inner"), vec!["t2"]);
        assert!(corpus.targets_by_key("absent").is_empty());
    }
}
