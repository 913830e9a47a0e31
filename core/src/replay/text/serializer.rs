//! Text recording serializer
//!
//! Converts edge lists back into the text format.

use crate::replay::types::Edge;

/// Serialize edges to the comma-joined form
///
/// Entries are written in `(frame, position)` order, so edges that share a
/// frame keep their relative order.
pub fn serialize(edges: &[Edge]) -> String {
    ordered(edges)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize edges one entry per line, with a trailing newline
pub fn serialize_lines(edges: &[Edge]) -> String {
    let mut out = String::new();
    for edge in ordered(edges) {
        out.push_str(&edge.to_string());
        out.push('\n');
    }
    out
}

fn ordered(edges: &[Edge]) -> Vec<Edge> {
    let mut sorted = edges.to_vec();
    // Stable: ties keep insertion order
    sorted.sort_by_key(|edge| edge.frame);
    sorted
}
