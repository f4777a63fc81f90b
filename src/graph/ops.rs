use std::collections::HashSet;
use std::str::FromStr;

use petgraph::Direction;

use crate::config::ConfigError;
use crate::core::course::CourseCode;
use crate::error::Result;
use crate::graph::CourseGraph;

/// Courses reachable from a start course, never including the start itself.
pub type ReachableSet = HashSet<CourseCode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceDirection {
    /// Successors: courses that depend on the start course.
    Forward,
    /// Predecessors: courses the start course depends on.
    Backward,
}

impl TraceDirection {
    fn as_petgraph(self) -> Direction {
        match self {
            TraceDirection::Forward => Direction::Outgoing,
            TraceDirection::Backward => Direction::Incoming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceScope {
    Downstream,
    Upstream,
    Both,
}

impl TraceScope {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceScope::Downstream => "downstream",
            TraceScope::Upstream => "upstream",
            TraceScope::Both => "both",
        }
    }
}

impl FromStr for TraceScope {
    type Err = ConfigError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "down" | "downstream" | "forward" => Ok(TraceScope::Downstream),
            "up" | "upstream" | "backward" => Ok(TraceScope::Upstream),
            "both" => Ok(TraceScope::Both),
            _ => Err(ConfigError::UnknownScope(input.to_string())),
        }
    }
}

pub fn trace(graph: &CourseGraph, start: &str, direction: TraceDirection) -> Result<ReachableSet> {
    let start_idx = graph.node_index(start)?;
    let inner = graph.inner();
    let direction = direction.as_petgraph();

    let mut visited = HashSet::new();
    let mut stack = vec![start_idx];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        stack.extend(inner.neighbors_directed(current, direction));
    }
    visited.remove(&start_idx);

    Ok(visited
        .into_iter()
        .map(|idx| inner[idx].code.clone())
        .collect())
}

pub fn trace_both(graph: &CourseGraph, start: &str) -> Result<ReachableSet> {
    let mut reachable = trace(graph, start, TraceDirection::Forward)?;
    reachable.extend(trace(graph, start, TraceDirection::Backward)?);
    Ok(reachable)
}

pub fn trace_scope(graph: &CourseGraph, start: &str, scope: TraceScope) -> Result<ReachableSet> {
    match scope {
        TraceScope::Downstream => trace(graph, start, TraceDirection::Forward),
        TraceScope::Upstream => trace(graph, start, TraceDirection::Backward),
        TraceScope::Both => trace_both(graph, start),
    }
}

pub fn sorted_codes(set: &ReachableSet) -> Vec<CourseCode> {
    let mut out: Vec<_> = set.iter().cloned().collect();
    out.sort();
    out
}
