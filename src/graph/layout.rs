use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::core::course::CourseCode;
use crate::graph::CourseGraph;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Places courses in one column per semester, stacked downwards in table
/// order.
pub fn semester_grid(graph: &CourseGraph, config: &LayoutConfig) -> HashMap<CourseCode, Position> {
    let mut rows_per_semester: HashMap<u32, u32> = HashMap::new();
    let mut positions = HashMap::new();

    for course in graph.courses() {
        let row = rows_per_semester.entry(course.semester).or_insert(0);
        positions.insert(
            course.code.clone(),
            Position {
                x: f64::from(course.semester) * config.x_gap,
                y: -f64::from(*row) * config.y_gap,
            },
        );
        *row += 1;
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::CourseRecord;
    use crate::graph::builder::build_graph;

    fn record(code: &str, semester: u32) -> CourseRecord {
        CourseRecord {
            code: CourseCode::new(code),
            title: code.to_string(),
            semester,
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
        }
    }

    #[test]
    fn courses_stack_within_their_semester_column() {
        let graph = build_graph(&[
            record("AERO101", 1),
            record("MATH101", 1),
            record("AERO201", 2),
            record("PHYS101", 1),
        ])
        .expect("build graph");
        let positions = semester_grid(&graph, &LayoutConfig::default());

        assert_eq!(positions["AERO101"], Position { x: 2.0, y: 0.0 });
        assert_eq!(positions["MATH101"], Position { x: 2.0, y: -1.5 });
        assert_eq!(positions["PHYS101"], Position { x: 2.0, y: -3.0 });
        assert_eq!(positions["AERO201"], Position { x: 4.0, y: 0.0 });
    }

    #[test]
    fn gaps_come_from_config() {
        let graph = build_graph(&[record("A", 3), record("B", 3)]).expect("build graph");
        let positions = semester_grid(
            &graph,
            &LayoutConfig {
                x_gap: 1.0,
                y_gap: 2.0,
            },
        );
        assert_eq!(positions["B"], Position { x: 3.0, y: -2.0 });
    }
}
