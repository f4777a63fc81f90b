use std::path::Path;

use crate::config::TableConfig;
use crate::core::course::{CourseCode, CourseRecord};
use crate::core::table::load_table;
use crate::error::Result;
use crate::graph::builder::build_graph;
use crate::graph::ops::{trace_scope, ReachableSet, TraceScope};
use crate::graph::project::{project, DisplayGraph, EdgePolicy};
use crate::graph::CourseGraph;

/// A loaded course table and its graph. Built once and only read afterwards,
/// so it can be shared across threads by reference.
#[derive(Debug)]
pub struct Curriculum {
    records: Vec<CourseRecord>,
    graph: CourseGraph,
}

/// Result of selecting one course.
#[derive(Debug, Clone)]
pub struct Selection {
    pub start: CourseCode,
    pub scope: TraceScope,
    pub relevant: ReachableSet,
    pub display: DisplayGraph,
}

impl Curriculum {
    pub fn load(path: &Path, config: &TableConfig) -> Result<Self> {
        let records = load_table(path, config)?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<CourseRecord>) -> Result<Self> {
        let graph = build_graph(&records)?;
        Ok(Self { records, graph })
    }

    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn graph(&self) -> &CourseGraph {
        &self.graph
    }

    /// Traces and projects from `code`. `scope` defaults to the policy's own
    /// scope.
    pub fn select(
        &self,
        code: &str,
        policy: EdgePolicy,
        scope: Option<TraceScope>,
    ) -> Result<Selection> {
        let scope = scope.unwrap_or_else(|| policy.default_scope());
        let relevant = trace_scope(&self.graph, code, scope)?;
        let display = project(&self.graph, code, &relevant, policy)?;
        tracing::info!(
            course = code,
            scope = scope.as_str(),
            policy = policy.as_str(),
            connected = relevant.len(),
            "selected course"
        );
        Ok(Selection {
            start: display.start.clone(),
            scope,
            relevant,
            display,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::parse_table;
    use crate::error::CurriculumError;
    use crate::graph::project::NodeClass;

    const TABLE: &str = "\
Course Code,Course Title,Semester,Prerequisites,Corequisites
AERO101,Intro,1,,
AERO201,Aerodynamics,2,AERO101,
AERO301,Flight Mech,3,AERO201,
HIST101,History,1,,
";

    fn curriculum() -> Curriculum {
        let records = parse_table(TABLE, &TableConfig::default()).expect("parse table");
        Curriculum::from_records(records).expect("build curriculum")
    }

    #[test]
    fn select_uses_policy_default_scope() {
        let curriculum = curriculum();
        let selection = curriculum
            .select("AERO201", EdgePolicy::ConnectedClosure, None)
            .expect("select");
        assert_eq!(selection.scope, TraceScope::Both);
        assert_eq!(selection.relevant.len(), 2);
        assert_eq!(
            selection.display.class_of("AERO101"),
            Some(NodeClass::Connected)
        );
        assert_eq!(
            selection.display.class_of("HIST101"),
            Some(NodeClass::Unrelated)
        );
    }

    #[test]
    fn explicit_scope_overrides_policy_default() {
        let curriculum = curriculum();
        let selection = curriculum
            .select("AERO301", EdgePolicy::AllEdges, Some(TraceScope::Upstream))
            .expect("select");
        assert!(selection.relevant.contains("AERO101"));
        assert!(selection.relevant.contains("AERO201"));
        assert_eq!(selection.display.edges.len(), 2);
    }

    #[test]
    fn unknown_selection_leaves_curriculum_usable() {
        let curriculum = curriculum();
        let err = curriculum
            .select("AERO999", EdgePolicy::DownstreamChain, None)
            .unwrap_err();
        assert!(matches!(err, CurriculumError::UnknownNode(_)));

        let selection = curriculum
            .select("AERO101", EdgePolicy::DownstreamChain, None)
            .expect("select after error");
        assert!(selection.display.has_edge("AERO101", "AERO201"));
        assert!(selection.display.has_edge("AERO201", "AERO301"));
    }

    #[test]
    fn curriculum_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Curriculum>();
    }
}
