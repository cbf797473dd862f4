//! Canonical step schema, run traces, and pure validation.

pub mod demo;
pub mod step;
pub mod validate;

pub use step::{
    AlgorithmFamily, AuxIndices, GraphEdge, GraphNode, GridCell, GridPos, Run, RunId, Step,
    StepState,
};
pub use validate::{validate_run, validate_step, SchemaError};
