use std::collections::HashMap;

use crate::core::course::CourseCode;
use crate::graph::layout::Position;
use crate::graph::ops::TraceScope;
use crate::graph::project::{DisplayGraph, NodeClass};

pub fn render_tree(
    roots: &[CourseCode],
    edges: &HashMap<CourseCode, Vec<CourseCode>>,
    labels: &HashMap<CourseCode, String>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(label_for(root, labels));
        out.push('\n');
        let mut path = vec![root.clone()];
        render_tree_children(root, edges, labels, "", &mut path, &mut out);
    }
    out
}

pub fn render_flat(
    roots: &[CourseCode],
    edges: &HashMap<CourseCode, Vec<CourseCode>>,
    labels: &HashMap<CourseCode, String>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(label_for(root, labels));
        out.push('\n');
        let mut path = vec![root.clone()];
        render_flat_children(root, edges, labels, 1, &mut path, &mut out);
    }
    out
}

/// Graphviz rendering with classification colours and pinned semester-grid
/// positions (use `neato -n` to honour them).
pub fn render_dot(
    display: &DisplayGraph,
    labels: &HashMap<CourseCode, String>,
    positions: &HashMap<CourseCode, Position>,
    caption: &str,
) -> String {
    let mut out = String::from("digraph curriculum {\n");
    out.push_str(&format!("  label=\"{}\";\n", escape_dot_string(caption)));
    out.push_str("  node [style=filled];\n");
    for node in &display.nodes {
        let label = escape_dot_string(label_for(node, labels));
        let class = display
            .class_of(node.as_str())
            .unwrap_or(NodeClass::Unrelated);
        let color = fill_color(class);
        let pos = positions
            .get(node)
            .map(|pos| format!(", pos=\"{},{}!\"", pos.x, pos.y))
            .unwrap_or_default();
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\"{}];\n",
            escape_dot_string(node.as_str()),
            label,
            color,
            pos
        ));
    }
    for (from, to) in &display.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot_string(from.as_str()),
            escape_dot_string(to.as_str())
        ));
    }
    out.push_str("}\n");
    out
}

pub fn fill_color(class: NodeClass) -> &'static str {
    match class {
        NodeClass::Selected => "orange",
        NodeClass::Connected => "lightgreen",
        NodeClass::Unrelated => "lightblue",
    }
}

pub fn caption(start: &CourseCode, scope: TraceScope) -> String {
    let connected = match scope {
        TraceScope::Downstream => "courses that depend on it",
        TraceScope::Upstream => "courses it depends on",
        TraceScope::Both => "courses connected to it",
    };
    format!("Dependencies of {start}: orange = selected course | green = {connected}")
}

fn label_for<'a>(code: &'a CourseCode, labels: &'a HashMap<CourseCode, String>) -> &'a str {
    labels
        .get(code)
        .map(String::as_str)
        .unwrap_or_else(|| code.as_str())
}

fn render_tree_children(
    node: &CourseCode,
    edges: &HashMap<CourseCode, Vec<CourseCode>>,
    labels: &HashMap<CourseCode, String>,
    prefix: &str,
    path: &mut Vec<CourseCode>,
    out: &mut String,
) {
    let mut children = edges.get(node).cloned().unwrap_or_default();
    children.sort();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(label_for(child, labels));
        if path.contains(child) {
            out.push_str(" (cycle)\n");
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        next_prefix.push_str(if is_last { "    " } else { "|   " });
        render_tree_children(child, edges, labels, &next_prefix, path, out);
        path.pop();
    }
}

fn render_flat_children(
    node: &CourseCode,
    edges: &HashMap<CourseCode, Vec<CourseCode>>,
    labels: &HashMap<CourseCode, String>,
    depth: usize,
    path: &mut Vec<CourseCode>,
    out: &mut String,
) {
    let mut children = edges.get(node).cloned().unwrap_or_default();
    children.sort();
    for child in children {
        out.push_str(&"  ".repeat(depth));
        out.push_str(label_for(&child, labels));
        if path.contains(&child) {
            out.push_str(" (cycle)\n");
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        render_flat_children(&child, edges, labels, depth + 1, path, out);
        path.pop();
    }
}

fn escape_dot_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
