use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::core::course::{CourseCode, CourseRecord, RequirementKind};
use crate::graph::CourseGraph;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterViolation {
    pub requirement: CourseCode,
    pub requirement_semester: u32,
    pub course: CourseCode,
    pub course_semester: u32,
    pub kind: RequirementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub course: CourseCode,
    pub reference: String,
    pub kind: RequirementKind,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub cycles: Vec<Vec<CourseCode>>,
    pub violations: Vec<SemesterViolation>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl CheckReport {
    /// Unresolved references are tolerated and do not make a report fail.
    pub fn has_failures(&self) -> bool {
        !self.cycles.is_empty() || !self.violations.is_empty()
    }
}

pub fn check_curriculum(graph: &CourseGraph, records: &[CourseRecord]) -> CheckReport {
    CheckReport {
        cycles: find_cycles(graph),
        violations: semester_violations(graph),
        unresolved: unresolved_references(graph, records),
    }
}

/// A prerequisite must be taken in an earlier semester than the course that
/// requires it; a corequisite no later than that course.
pub fn semester_violations(graph: &CourseGraph) -> Vec<SemesterViolation> {
    let mut violations = Vec::new();
    for (from, to, kind) in graph.edges() {
        let (Some(requirement), Some(course)) =
            (graph.course(from.as_str()), graph.course(to.as_str()))
        else {
            continue;
        };
        let ordered = match kind {
            RequirementKind::Prerequisite => requirement.semester < course.semester,
            RequirementKind::Corequisite => requirement.semester <= course.semester,
        };
        if !ordered {
            violations.push(SemesterViolation {
                requirement: from.clone(),
                requirement_semester: requirement.semester,
                course: to.clone(),
                course_semester: course.semester,
                kind,
            });
        }
    }
    violations
}

pub fn unresolved_references(
    graph: &CourseGraph,
    records: &[CourseRecord],
) -> Vec<UnresolvedReference> {
    records
        .iter()
        .flat_map(|record| {
            record
                .requirements()
                .filter(move |(reference, _)| !graph.contains(reference.trim()))
                .map(move |(reference, kind)| UnresolvedReference {
                    course: record.code.clone(),
                    reference: reference.trim().to_string(),
                    kind,
                })
        })
        .collect()
}

pub fn find_cycles(graph: &CourseGraph) -> Vec<Vec<CourseCode>> {
    let inner = graph.inner();
    let mut state: HashMap<NodeIndex, VisitState> = HashMap::new();
    let mut stack: Vec<NodeIndex> = Vec::new();
    let mut cycles = Vec::new();

    for node in inner.node_indices() {
        if state.contains_key(&node) {
            continue;
        }
        visit_node(graph, node, &mut state, &mut stack, &mut cycles);
    }

    cycles
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|idx| inner[idx].code.clone())
                .collect()
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

fn visit_node(
    graph: &CourseGraph,
    node: NodeIndex,
    state: &mut HashMap<NodeIndex, VisitState>,
    stack: &mut Vec<NodeIndex>,
    cycles: &mut Vec<Vec<NodeIndex>>,
) {
    if let Some(existing) = state.get(&node) {
        if *existing == VisitState::Visiting {
            if let Some(pos) = stack.iter().position(|idx| *idx == node) {
                cycles.push(stack[pos..].to_vec());
            }
        }
        return;
    }

    state.insert(node, VisitState::Visiting);
    stack.push(node);
    for next in graph.inner().neighbors_directed(node, Direction::Outgoing) {
        visit_node(graph, next, state, stack, cycles);
    }
    stack.pop();
    state.insert(node, VisitState::Visited);
}
