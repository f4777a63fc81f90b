use crate::core::course::CourseRecord;
use crate::error::{CurriculumError, Result};
use crate::graph::{CourseGraph, CourseNode};

/// Builds the course graph from table rows.
///
/// All courses are added first so a requirement may name a course that
/// appears later in the table. References that match no course are dropped.
pub fn build_graph(records: &[CourseRecord]) -> Result<CourseGraph> {
    for (idx, record) in records.iter().enumerate() {
        validate_record(idx + 1, record)?;
    }

    let mut graph = CourseGraph::new();
    for record in records {
        if graph.contains(record.code.as_str()) {
            tracing::warn!(course = %record.code, "duplicate course code, later row wins");
        }
        graph.upsert_course(CourseNode {
            code: record.code.clone(),
            title: record.title.clone(),
            semester: record.semester,
        });
    }

    let mut dropped = 0usize;
    for record in records {
        let target = graph.node_index(record.code.as_str())?;
        for (reference, kind) in record.requirements() {
            let reference = reference.trim();
            if reference.is_empty() {
                continue;
            }
            match graph.node_index(reference) {
                Ok(source) => {
                    graph.add_requirement(source, target, kind);
                }
                Err(_) => {
                    dropped += 1;
                    tracing::debug!(
                        course = %record.code,
                        reference,
                        kind = kind.as_str(),
                        "dropping unresolved reference"
                    );
                }
            }
        }
    }

    tracing::debug!(
        courses = graph.node_count(),
        edges = graph.edge_count(),
        dropped,
        "built course graph"
    );
    Ok(graph)
}

fn validate_record(row: usize, record: &CourseRecord) -> Result<()> {
    if record.code.as_str().trim().is_empty() {
        return Err(CurriculumError::MissingField {
            row,
            field: "Course Code".to_string(),
            detail: "value is empty".to_string(),
        });
    }
    if record.semester == 0 {
        return Err(CurriculumError::MissingField {
            row,
            field: "Semester".to_string(),
            detail: "semester must be a positive integer".to_string(),
        });
    }
    Ok(())
}
