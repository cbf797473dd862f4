//! Pure per-family renderers.
//!
//! Each function maps a step state to a visual model using only role flags
//! already present in the snapshot, so jumping straight to any position
//! renders identically to stepping there one at a time. The optional
//! previous model is a transition hint for surfaces; it never affects the
//! produced frame.

use crate::render::model::{DrawOp, Tint, VisualModel};
use crate::trace::step::{GridCell, GridPos, StepState};

/// Render one step state into a declarative frame. Idempotent: equal
/// states always yield equal models.
pub fn render_step(state: &StepState, _prev: Option<&VisualModel>) -> VisualModel {
    match state {
        StepState::Sorting {
            array,
            comparing_indices,
            sorted_indices,
            pivot_index,
            aux_indices: _,
        } => render_sorting(array, comparing_indices, sorted_indices, *pivot_index),
        StepState::GraphShortestPath {
            nodes,
            edges,
            distances,
            visited,
            current_node,
            relaxing_node,
        } => render_graph(nodes, edges, distances, visited, current_node, relaxing_node),
        StepState::GridPathfinding {
            grid,
            start,
            end,
            open_set,
            closed_set,
            path,
            current,
        } => render_grid(grid, start, end, open_set, closed_set, path, current),
        StepState::NQueens {
            board,
            current_cell,
            conflicts,
        } => render_queens(board, current_cell, conflicts),
        StepState::Sieve {
            limit,
            primes,
            eliminated,
            current_prime,
            checking,
        } => render_sieve(*limit, primes, eliminated, *current_prime, *checking),
        StepState::BinarySearch {
            array,
            left,
            right,
            mid,
            target,
            found,
        } => render_binary_search(array, *left, *right, *mid, *target, *found),
    }
}

fn render_sorting(
    array: &[f64],
    comparing: &[usize],
    sorted: &[usize],
    pivot: Option<usize>,
) -> VisualModel {
    let ops = array
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let tint = if comparing.contains(&i) {
                Tint::Compare
            } else if pivot == Some(i) {
                Tint::Pivot
            } else if sorted.contains(&i) {
                Tint::Sorted
            } else {
                Tint::Default
            };
            DrawOp::Rect {
                x: i as f64,
                y: 0.0,
                w: 1.0,
                h: *value,
                tint,
                label: Some(format!("{value}")),
            }
        })
        .collect();
    VisualModel::new(ops)
}

fn render_graph(
    nodes: &[crate::trace::step::GraphNode],
    edges: &[crate::trace::step::GraphEdge],
    distances: &std::collections::BTreeMap<String, Option<f64>>,
    visited: &[String],
    current: &Option<String>,
    relaxing: &Option<String>,
) -> VisualModel {
    let mut ops = Vec::with_capacity(nodes.len() + edges.len());
    let pos = |id: &str| -> (f64, f64) {
        nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| (n.x, n.y))
            .unwrap_or((0.0, 0.0))
    };
    for edge in edges {
        let (x1, y1) = pos(&edge.from);
        let (x2, y2) = pos(&edge.to);
        let tint = if relaxing.as_deref() == Some(edge.to.as_str())
            && current.as_deref() == Some(edge.from.as_str())
        {
            Tint::Active
        } else {
            Tint::Default
        };
        ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            tint,
            label: Some(format!("{}", edge.weight)),
        });
    }
    for node in nodes {
        let tint = if current.as_deref() == Some(node.id.as_str()) {
            Tint::Active
        } else if relaxing.as_deref() == Some(node.id.as_str()) {
            Tint::Frontier
        } else if visited.iter().any(|v| v == &node.id) {
            Tint::Visited
        } else {
            Tint::Default
        };
        let distance = match distances.get(&node.id) {
            Some(Some(d)) => format!("{d}"),
            _ => "∞".to_string(),
        };
        ops.push(DrawOp::Circle {
            x: node.x,
            y: node.y,
            r: 1.0,
            tint,
            label: Some(format!("{} ({distance})", node.label)),
        });
    }
    VisualModel::new(ops)
}

fn render_grid(
    grid: &[Vec<GridCell>],
    start: &GridPos,
    end: &GridPos,
    open_set: &[GridPos],
    closed_set: &[GridPos],
    path: &[GridPos],
    current: &Option<GridPos>,
) -> VisualModel {
    let mut ops = Vec::new();
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let here = GridPos { row, col };
            let tint = if *cell == GridCell::Wall {
                Tint::Wall
            } else if here == *start || here == *end {
                Tint::Target
            } else if path.contains(&here) {
                Tint::Path
            } else if *current == Some(here) {
                Tint::Active
            } else if closed_set.contains(&here) {
                Tint::Visited
            } else if open_set.contains(&here) {
                Tint::Frontier
            } else {
                Tint::Default
            };
            ops.push(DrawOp::Rect {
                x: col as f64,
                y: row as f64,
                w: 1.0,
                h: 1.0,
                tint,
                label: None,
            });
        }
    }
    VisualModel::new(ops)
}

fn render_queens(
    board: &[Vec<bool>],
    current_cell: &Option<GridPos>,
    conflicts: &[GridPos],
) -> VisualModel {
    let mut ops = Vec::new();
    for (row, cells) in board.iter().enumerate() {
        for (col, occupied) in cells.iter().enumerate() {
            let here = GridPos { row, col };
            let tint = if conflicts.contains(&here) {
                Tint::Conflict
            } else if *current_cell == Some(here) {
                Tint::Active
            } else {
                Tint::Default
            };
            ops.push(DrawOp::Rect {
                x: col as f64,
                y: row as f64,
                w: 1.0,
                h: 1.0,
                tint,
                label: None,
            });
            if *occupied {
                ops.push(DrawOp::Circle {
                    x: col as f64 + 0.5,
                    y: row as f64 + 0.5,
                    r: 0.4,
                    tint: if conflicts.contains(&here) {
                        Tint::Conflict
                    } else {
                        Tint::Found
                    },
                    label: Some("Q".to_string()),
                });
            }
        }
    }
    VisualModel::new(ops)
}

fn render_sieve(
    limit: u64,
    primes: &[u64],
    eliminated: &[u64],
    current_prime: Option<u64>,
    checking: Option<u64>,
) -> VisualModel {
    // Numbers laid out in rows of ten, 2 through limit
    let mut ops = Vec::new();
    for n in 2..=limit {
        let tint = if checking == Some(n) {
            Tint::Compare
        } else if current_prime == Some(n) {
            Tint::Active
        } else if primes.contains(&n) {
            Tint::Prime
        } else if eliminated.contains(&n) {
            Tint::Eliminated
        } else {
            Tint::Default
        };
        ops.push(DrawOp::Rect {
            x: (n % 10) as f64,
            y: (n / 10) as f64,
            w: 1.0,
            h: 1.0,
            tint,
            label: Some(n.to_string()),
        });
    }
    VisualModel::new(ops)
}

fn render_binary_search(
    array: &[f64],
    left: usize,
    right: usize,
    mid: Option<usize>,
    target: f64,
    found: bool,
) -> VisualModel {
    let mut ops: Vec<DrawOp> = array
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let tint = if found && mid == Some(i) {
                Tint::Found
            } else if mid == Some(i) {
                Tint::Active
            } else if i < left || i > right {
                Tint::Eliminated
            } else {
                Tint::Default
            };
            DrawOp::Rect {
                x: i as f64,
                y: 0.0,
                w: 1.0,
                h: *value,
                tint,
                label: Some(format!("{value}")),
            }
        })
        .collect();
    ops.push(DrawOp::Text {
        x: 0.0,
        y: -1.0,
        tint: Tint::Target,
        text: format!("target {target}"),
    });
    VisualModel::new(ops)
}
