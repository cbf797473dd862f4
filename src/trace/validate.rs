//! Pure schema validation for steps and runs.
//!
//! Invoked by the trace store before a run is accepted as sealed, so schema
//! errors never surface mid-playback. Unknown extra fields in documents are
//! ignored at decode time and are never a validation failure.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::trace::step::{AlgorithmFamily, GridPos, Run, Step, StepState};

/// Schema violation, naming the offending field path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing field `{path}`")]
    MissingField { path: String },
    #[error("`{path}` out of range: {detail}")]
    OutOfRange { path: String, detail: String },
    #[error("type mismatch at `{path}`: expected {expected}")]
    TypeMismatch { path: String, expected: String },
}

impl SchemaError {
    fn missing(path: impl Into<String>) -> Self {
        SchemaError::MissingField { path: path.into() }
    }

    fn out_of_range(path: impl Into<String>, detail: impl Into<String>) -> Self {
        SchemaError::OutOfRange {
            path: path.into(),
            detail: detail.into(),
        }
    }

    fn mismatch(path: impl Into<String>, expected: impl Into<String>) -> Self {
        SchemaError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
        }
    }
}

/// Validate a single step against its declared family.
///
/// Checks that the state variant matches the family and that every
/// referenced index/id is in range for the snapshot it appears in.
pub fn validate_step(step: &Step, family: AlgorithmFamily) -> Result<(), SchemaError> {
    let path = format!("steps[{}]", step.index);
    if step.family != family {
        return Err(SchemaError::mismatch(
            format!("{path}.family"),
            family.as_str(),
        ));
    }
    if step.state.family() != family {
        return Err(SchemaError::mismatch(
            format!("{path}.state"),
            format!("state for family `{}`", family.as_str()),
        ));
    }
    validate_state(&step.state, &format!("{path}.state"))
}

/// Validate a whole run: index contiguity, per-step family, per-step state
pub fn validate_run(run: &Run) -> Result<(), SchemaError> {
    for (i, step) in run.steps.iter().enumerate() {
        if step.index != i {
            return Err(SchemaError::out_of_range(
                format!("steps[{i}].index"),
                format!("expected contiguous index {i}, found {}", step.index),
            ));
        }
        validate_step(step, run.family)?;
    }
    Ok(())
}

fn validate_state(state: &StepState, path: &str) -> Result<(), SchemaError> {
    match state {
        StepState::Sorting {
            array,
            comparing_indices,
            sorted_indices,
            pivot_index,
            aux_indices,
        } => {
            let len = array.len();
            check_indices(comparing_indices, len, &format!("{path}.comparing_indices"))?;
            check_indices(sorted_indices, len, &format!("{path}.sorted_indices"))?;
            if let Some(pivot) = pivot_index {
                check_index(*pivot, len, &format!("{path}.pivot_index"))?;
            }
            if let Some(aux) = aux_indices {
                check_index(aux.i, len, &format!("{path}.aux_indices.i"))?;
                check_index(aux.j, len, &format!("{path}.aux_indices.j"))?;
                check_index(aux.low, len, &format!("{path}.aux_indices.low"))?;
                check_index(aux.high, len, &format!("{path}.aux_indices.high"))?;
            }
            Ok(())
        }
        StepState::GraphShortestPath {
            nodes,
            edges,
            distances,
            visited,
            current_node,
            relaxing_node,
        } => {
            let ids: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
            for (i, edge) in edges.iter().enumerate() {
                for (end, id) in [("from", &edge.from), ("to", &edge.to)] {
                    if !ids.contains(id.as_str()) {
                        return Err(SchemaError::out_of_range(
                            format!("{path}.edges[{i}].{end}"),
                            format!("unknown node id `{id}`"),
                        ));
                    }
                }
            }
            // Every node must carry a distance entry (None = unreachable)
            for node in nodes {
                if !distances.contains_key(&node.id) {
                    return Err(SchemaError::missing(format!(
                        "{path}.distances.{}",
                        node.id
                    )));
                }
            }
            for (i, id) in visited.iter().enumerate() {
                if !ids.contains(id.as_str()) {
                    return Err(SchemaError::out_of_range(
                        format!("{path}.visited[{i}]"),
                        format!("unknown node id `{id}`"),
                    ));
                }
            }
            for (field, id) in [("current_node", current_node), ("relaxing_node", relaxing_node)] {
                if let Some(id) = id {
                    if !ids.contains(id.as_str()) {
                        return Err(SchemaError::out_of_range(
                            format!("{path}.{field}"),
                            format!("unknown node id `{id}`"),
                        ));
                    }
                }
            }
            Ok(())
        }
        StepState::GridPathfinding {
            grid,
            start,
            end,
            open_set,
            closed_set,
            path: found_path,
            current,
        } => {
            let (rows, cols) = grid_dims(grid, path)?;
            check_pos(start, rows, cols, &format!("{path}.start"))?;
            check_pos(end, rows, cols, &format!("{path}.end"))?;
            check_positions(open_set, rows, cols, &format!("{path}.open_set"))?;
            check_positions(closed_set, rows, cols, &format!("{path}.closed_set"))?;
            check_positions(found_path, rows, cols, &format!("{path}.path"))?;
            if let Some(current) = current {
                check_pos(current, rows, cols, &format!("{path}.current"))?;
            }
            Ok(())
        }
        StepState::NQueens {
            board,
            current_cell,
            conflicts,
        } => {
            let (rows, cols) = board_dims(board, path)?;
            if let Some(cell) = current_cell {
                check_pos(cell, rows, cols, &format!("{path}.current_cell"))?;
            }
            check_positions(conflicts, rows, cols, &format!("{path}.conflicts"))?;
            Ok(())
        }
        StepState::Sieve {
            limit,
            primes,
            eliminated,
            current_prime,
            checking,
        } => {
            check_sieve_members(primes, *limit, &format!("{path}.primes"))?;
            check_sieve_members(eliminated, *limit, &format!("{path}.eliminated"))?;
            if let Some(p) = current_prime {
                check_sieve_member(*p, *limit, &format!("{path}.current_prime"))?;
            }
            if let Some(c) = checking {
                check_sieve_member(*c, *limit, &format!("{path}.checking"))?;
            }
            Ok(())
        }
        StepState::BinarySearch {
            array,
            left,
            right,
            mid,
            found,
            ..
        } => {
            let len = array.len();
            check_index(*left, len, &format!("{path}.left"))?;
            check_index(*right, len, &format!("{path}.right"))?;
            if let Some(mid) = mid {
                check_index(*mid, len, &format!("{path}.mid"))?;
            }
            if *found && mid.is_none() {
                return Err(SchemaError::missing(format!("{path}.mid")));
            }
            Ok(())
        }
    }
}

fn check_index(value: usize, len: usize, path: &str) -> Result<(), SchemaError> {
    if value >= len {
        return Err(SchemaError::out_of_range(
            path,
            format!("index {value} not below length {len}"),
        ));
    }
    Ok(())
}

fn check_indices(values: &[usize], len: usize, path: &str) -> Result<(), SchemaError> {
    for (i, value) in values.iter().enumerate() {
        check_index(*value, len, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

fn check_pos(pos: &GridPos, rows: usize, cols: usize, path: &str) -> Result<(), SchemaError> {
    if pos.row >= rows || pos.col >= cols {
        return Err(SchemaError::out_of_range(
            path,
            format!(
                "position ({}, {}) outside {rows}x{cols} bounds",
                pos.row, pos.col
            ),
        ));
    }
    Ok(())
}

fn check_positions(
    positions: &[GridPos],
    rows: usize,
    cols: usize,
    path: &str,
) -> Result<(), SchemaError> {
    for (i, pos) in positions.iter().enumerate() {
        check_pos(pos, rows, cols, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

fn check_sieve_member(value: u64, limit: u64, path: &str) -> Result<(), SchemaError> {
    if value > limit {
        return Err(SchemaError::out_of_range(
            path,
            format!("{value} exceeds limit {limit}"),
        ));
    }
    Ok(())
}

fn check_sieve_members(values: &[u64], limit: u64, path: &str) -> Result<(), SchemaError> {
    for (i, value) in values.iter().enumerate() {
        check_sieve_member(*value, limit, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

fn grid_dims(grid: &[Vec<crate::trace::step::GridCell>], path: &str) -> Result<(usize, usize), SchemaError> {
    let rows = grid.len();
    let cols = grid.first().map(Vec::len).unwrap_or(0);
    for (i, row) in grid.iter().enumerate() {
        if row.len() != cols {
            return Err(SchemaError::mismatch(
                format!("{path}.grid[{i}]"),
                format!("row of uniform width {cols}"),
            ));
        }
    }
    Ok((rows, cols))
}

fn board_dims(board: &[Vec<bool>], path: &str) -> Result<(usize, usize), SchemaError> {
    let rows = board.len();
    let cols = board.first().map(Vec::len).unwrap_or(0);
    for (i, row) in board.iter().enumerate() {
        if row.len() != cols {
            return Err(SchemaError::mismatch(
                format!("{path}.board[{i}]"),
                format!("row of uniform width {cols}"),
            ));
        }
    }
    Ok((rows, cols))
}
