//! Display subgraph derivation.
//!
//! A display graph always keeps every course; only the edge set is filtered,
//! according to an [`EdgePolicy`]. Each course is tagged with a [`NodeClass`]
//! relative to the selected course.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::config::ConfigError;
use crate::core::course::CourseCode;
use crate::error::Result;
use crate::graph::ops::{ReachableSet, TraceScope};
use crate::graph::CourseGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Every edge of the course graph.
    #[default]
    AllEdges,
    /// Edges touching the selected course, plus edges with both ends in the
    /// relevant set.
    ConnectedClosure,
    /// Edges out of the selected course into the relevant set, plus edges
    /// internal to it. Nothing points into the selected course.
    DownstreamChain,
}

impl EdgePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgePolicy::AllEdges => "all-edges",
            EdgePolicy::ConnectedClosure => "connected-closure",
            EdgePolicy::DownstreamChain => "downstream-chain",
        }
    }

    /// Relevant set traced when the caller does not pick a scope.
    pub fn default_scope(self) -> TraceScope {
        match self {
            EdgePolicy::AllEdges | EdgePolicy::DownstreamChain => TraceScope::Downstream,
            EdgePolicy::ConnectedClosure => TraceScope::Both,
        }
    }

    fn keeps(self, start: &str, relevant: &ReachableSet, from: &str, to: &str) -> bool {
        match self {
            EdgePolicy::AllEdges => true,
            EdgePolicy::ConnectedClosure => {
                from == start || to == start || (relevant.contains(from) && relevant.contains(to))
            }
            EdgePolicy::DownstreamChain => {
                relevant.contains(to) && (from == start || relevant.contains(from))
            }
        }
    }
}

impl FromStr for EdgePolicy {
    type Err = ConfigError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "all-edges" | "all" => Ok(EdgePolicy::AllEdges),
            "connected-closure" | "connected" => Ok(EdgePolicy::ConnectedClosure),
            "downstream-chain" | "downstream" => Ok(EdgePolicy::DownstreamChain),
            _ => Err(ConfigError::UnknownPolicy(input.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    Selected,
    Connected,
    Unrelated,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Selected => "selected",
            NodeClass::Connected => "connected",
            NodeClass::Unrelated => "unrelated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayGraph {
    pub start: CourseCode,
    pub policy: EdgePolicy,
    /// Every course, in table order.
    pub nodes: Vec<CourseCode>,
    /// Kept edges as `(requirement, dependent)`, in graph insertion order.
    pub edges: Vec<(CourseCode, CourseCode)>,
    pub classes: HashMap<CourseCode, NodeClass>,
}

impl DisplayGraph {
    pub fn class_of(&self, code: &str) -> Option<NodeClass> {
        self.classes.get(code).copied()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges
            .iter()
            .any(|(f, t)| f.as_str() == from && t.as_str() == to)
    }

    /// Adjacency map of the kept edges, for tree rendering.
    pub fn adjacency(&self) -> HashMap<CourseCode, Vec<CourseCode>> {
        let mut out: HashMap<CourseCode, Vec<CourseCode>> = HashMap::new();
        for (from, to) in &self.edges {
            out.entry(from.clone()).or_default().push(to.clone());
        }
        out
    }
}

pub fn classify(start: &str, relevant: &ReachableSet, code: &str) -> NodeClass {
    if code == start {
        NodeClass::Selected
    } else if relevant.contains(code) {
        NodeClass::Connected
    } else {
        NodeClass::Unrelated
    }
}

pub fn project(
    graph: &CourseGraph,
    start: &str,
    relevant: &ReachableSet,
    policy: EdgePolicy,
) -> Result<DisplayGraph> {
    let start = graph.node_index(start)?;
    let start = graph.inner()[start].code.clone();
    for code in relevant {
        graph.node_index(code.as_str())?;
    }

    let nodes: Vec<CourseCode> = graph.courses().map(|course| course.code.clone()).collect();
    let classes = nodes
        .iter()
        .map(|code| {
            let class = classify(start.as_str(), relevant, code.as_str());
            (code.clone(), class)
        })
        .collect();
    let edges = graph
        .edges()
        .filter(|(from, to, _)| policy.keeps(start.as_str(), relevant, from.as_str(), to.as_str()))
        .map(|(from, to, _)| (from.clone(), to.clone()))
        .collect::<Vec<_>>();

    tracing::debug!(
        course = %start,
        policy = policy.as_str(),
        relevant = relevant.len(),
        edges = edges.len(),
        "projected display graph"
    );

    Ok(DisplayGraph {
        start,
        policy,
        nodes,
        edges,
        classes,
    })
}
