//! Course dependency graph.
//!
//! Edges point from a requirement to the course that requires it, so
//! successors of a node are the courses downstream of it and predecessors are
//! the courses it depends on.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::core::course::{CourseCode, RequirementKind};
use crate::error::{CurriculumError, Result};

pub mod builder;
pub mod check;
pub mod layout;
pub mod ops;
pub mod project;
pub mod viz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseNode {
    pub code: CourseCode,
    pub title: String,
    pub semester: u32,
}

/// Directed graph of courses, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    graph: DiGraph<CourseNode, RequirementKind>,
    index: HashMap<CourseCode, NodeIndex>,
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course, or refreshes the title and semester of an existing one
    /// while keeping its first position.
    pub(crate) fn upsert_course(&mut self, node: CourseNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.code) {
            self.graph[idx] = node;
            return idx;
        }
        let code = node.code.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(code, idx);
        idx
    }

    /// Adds `from -> to` unless that ordered pair already exists. Returns
    /// whether an edge was added.
    pub(crate) fn add_requirement(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        kind: RequirementKind,
    ) -> bool {
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, kind);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn course(&self, code: &str) -> Option<&CourseNode> {
        self.index.get(code).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Courses in table order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order as `(requirement, dependent, kind)`.
    pub fn edges(&self) -> impl Iterator<Item = (&CourseCode, &CourseCode, RequirementKind)> {
        self.graph.edge_references().map(move |edge| {
            (
                &self.graph[edge.source()].code,
                &self.graph[edge.target()].code,
                *edge.weight(),
            )
        })
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    pub(crate) fn node_index(&self, code: &str) -> Result<NodeIndex> {
        self.index
            .get(code)
            .copied()
            .ok_or_else(|| CurriculumError::UnknownNode(code.to_string()))
    }

    pub(crate) fn inner(&self) -> &DiGraph<CourseNode, RequirementKind> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(code: &str, semester: u32) -> CourseNode {
        CourseNode {
            code: CourseCode::new(code),
            title: format!("{code} title"),
            semester,
        }
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut graph = CourseGraph::new();
        let a = graph.upsert_course(node("A", 1));
        let b = graph.upsert_course(node("B", 2));
        assert!(graph.add_requirement(a, b, RequirementKind::Prerequisite));
        assert!(!graph.add_requirement(a, b, RequirementKind::Corequisite));
        assert_eq!(graph.edge_count(), 1);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges[0].2, RequirementKind::Prerequisite);
    }

    #[test]
    fn upsert_keeps_position_and_refreshes_attributes() {
        let mut graph = CourseGraph::new();
        graph.upsert_course(node("A", 1));
        graph.upsert_course(node("B", 2));
        graph.upsert_course(CourseNode {
            code: CourseCode::new("A"),
            title: "Renamed".to_string(),
            semester: 4,
        });

        let codes: Vec<_> = graph.courses().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
        let a = graph.course("A").expect("course A");
        assert_eq!(a.title, "Renamed");
        assert_eq!(a.semester, 4);
    }

    #[test]
    fn unknown_course_has_no_index() {
        let graph = CourseGraph::new();
        assert!(!graph.contains("NOPE"));
        assert!(matches!(
            graph.node_index("NOPE"),
            Err(CurriculumError::UnknownNode(code)) if code == "NOPE"
        ));
    }
}
