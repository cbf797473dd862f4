//! Canonical step schema for algorithm execution traces.
//!
//! Every step carries a complete snapshot of algorithm state, so a renderer
//! reconstructs the frame for any position without consulting prior steps.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of algorithm families. Adding a family means adding a
/// [`StepState`] variant and a renderer for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmFamily {
    Sorting,
    GraphShortestPath,
    GridPathfinding,
    NQueens,
    Sieve,
    BinarySearch,
}

impl AlgorithmFamily {
    /// String tag used in serialized documents
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmFamily::Sorting => "sorting",
            AlgorithmFamily::GraphShortestPath => "graph-shortest-path",
            AlgorithmFamily::GridPathfinding => "grid-pathfinding",
            AlgorithmFamily::NQueens => "n-queens",
            AlgorithmFamily::Sieve => "sieve",
            AlgorithmFamily::BinarySearch => "binary-search",
        }
    }

    /// Display name for UIs
    pub fn label(&self) -> &'static str {
        match self {
            AlgorithmFamily::Sorting => "Sorting",
            AlgorithmFamily::GraphShortestPath => "Graph Shortest Path",
            AlgorithmFamily::GridPathfinding => "Grid Pathfinding",
            AlgorithmFamily::NQueens => "N-Queens",
            AlgorithmFamily::Sieve => "Sieve of Eratosthenes",
            AlgorithmFamily::BinarySearch => "Binary Search",
        }
    }

    /// Parse from the serialized tag; `None` for unknown tags
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sorting" => Some(AlgorithmFamily::Sorting),
            "graph-shortest-path" => Some(AlgorithmFamily::GraphShortestPath),
            "grid-pathfinding" => Some(AlgorithmFamily::GridPathfinding),
            "n-queens" => Some(AlgorithmFamily::NQueens),
            "sieve" => Some(AlgorithmFamily::Sieve),
            "binary-search" => Some(AlgorithmFamily::BinarySearch),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a sealed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Auxiliary index pointers used by partition/merge style sorting steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxIndices {
    pub i: usize,
    pub j: usize,
    pub low: usize,
    pub high: usize,
}

/// A positioned node in a shortest-path graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// A weighted edge between two graph nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// One cell of a pathfinding grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridCell {
    Open,
    Wall,
}

/// Row/column position inside a grid or board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

/// Complete per-family algorithm state snapshot.
///
/// Each variant is self-sufficient: renderers derive a full frame from the
/// variant alone. `distances` uses `None` for unreachable (infinity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum StepState {
    Sorting {
        array: Vec<f64>,
        comparing_indices: Vec<usize>,
        sorted_indices: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot_index: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aux_indices: Option<AuxIndices>,
    },
    GraphShortestPath {
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        distances: BTreeMap<String, Option<f64>>,
        visited: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_node: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relaxing_node: Option<String>,
    },
    GridPathfinding {
        grid: Vec<Vec<GridCell>>,
        start: GridPos,
        end: GridPos,
        open_set: Vec<GridPos>,
        closed_set: Vec<GridPos>,
        path: Vec<GridPos>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<GridPos>,
    },
    NQueens {
        board: Vec<Vec<bool>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_cell: Option<GridPos>,
        conflicts: Vec<GridPos>,
    },
    Sieve {
        limit: u64,
        primes: Vec<u64>,
        eliminated: Vec<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_prime: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checking: Option<u64>,
    },
    BinarySearch {
        array: Vec<f64>,
        left: usize,
        right: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mid: Option<usize>,
        target: f64,
        found: bool,
    },
}

impl StepState {
    /// Family this snapshot belongs to
    pub fn family(&self) -> AlgorithmFamily {
        match self {
            StepState::Sorting { .. } => AlgorithmFamily::Sorting,
            StepState::GraphShortestPath { .. } => AlgorithmFamily::GraphShortestPath,
            StepState::GridPathfinding { .. } => AlgorithmFamily::GridPathfinding,
            StepState::NQueens { .. } => AlgorithmFamily::NQueens,
            StepState::Sieve { .. } => AlgorithmFamily::Sieve,
            StepState::BinarySearch { .. } => AlgorithmFamily::BinarySearch,
        }
    }
}

/// One immutable snapshot of algorithm state at a point in execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Position within the run; contiguous from 0
    pub index: usize,
    pub family: AlgorithmFamily,
    /// Producer-defined label such as `compare` or `swap`
    pub step_type: String,
    /// Human-readable narration for this step
    pub description: String,
    pub state: StepState,
}

/// One sealed execution trace for a single algorithm invocation.
///
/// Write-once: the trace store never mutates persisted steps, and playback
/// only operates on sealed runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub family: AlgorithmFamily,
    pub created_at: DateTime<Utc>,
    pub steps: Vec<Step>,
}

impl Run {
    /// Assemble a run from producer-emitted steps
    pub fn new(family: AlgorithmFamily, steps: Vec<Step>) -> Self {
        Self {
            id: RunId::new(),
            family,
            created_at: Utc::now(),
            steps,
        }
    }

    /// Index of the final step, if the run has any steps
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_tags_round_trip() {
        for family in [
            AlgorithmFamily::Sorting,
            AlgorithmFamily::GraphShortestPath,
            AlgorithmFamily::GridPathfinding,
            AlgorithmFamily::NQueens,
            AlgorithmFamily::Sieve,
            AlgorithmFamily::BinarySearch,
        ] {
            assert_eq!(AlgorithmFamily::parse(family.as_str()), Some(family));
            let json = serde_json::to_string(&family).unwrap();
            assert_eq!(json, format!("\"{}\"", family.as_str()));
        }
    }

    #[test]
    fn step_state_serializes_with_family_tag() {
        let state = StepState::Sorting {
            array: vec![5.0, 3.0],
            comparing_indices: vec![0, 1],
            sorted_indices: vec![],
            pivot_index: None,
            aux_indices: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["family"], "sorting");
        assert_eq!(json["array"][0], 5.0);
        // Optional fields are omitted entirely when unset
        assert!(json.get("pivot_index").is_none());
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let json = r#"{
            "family": "binary-search",
            "array": [1.0, 2.0, 3.0],
            "left": 0,
            "right": 2,
            "mid": 1,
            "target": 2.0,
            "found": true,
            "some_future_field": {"nested": true}
        }"#;
        let state: StepState = serde_json::from_str(json).unwrap();
        assert_eq!(state.family(), AlgorithmFamily::BinarySearch);
    }

    #[test]
    fn unreachable_distance_round_trips_as_null() {
        let mut distances = BTreeMap::new();
        distances.insert("a".to_string(), Some(0.0));
        distances.insert("b".to_string(), None);
        let state = StepState::GraphShortestPath {
            nodes: vec![],
            edges: vec![],
            distances,
            visited: vec![],
            current_node: None,
            relaxing_node: None,
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: StepState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
