//! Trace store boundary: load and save sealed runs by id.
//!
//! `save_run` validates before accepting a run as sealed, so playback never
//! sees a schema-invalid step. Stores are write-once per run id.

pub mod document;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::trace::step::{Run, RunId};
use crate::trace::validate::{validate_run, SchemaError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("run {0} not found")]
    NotFound(RunId),
    #[error("run failed validation: {0}")]
    Validation(#[from] SchemaError),
    #[error("run document is corrupt: {0}")]
    Corrupt(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Keyed load/save contract for sealed runs
pub trait TraceStore: Send + Sync {
    /// Load a sealed run by id
    fn load_run(&self, id: RunId) -> Result<Run, StoreError>;

    /// Validate and persist a run under a fresh id, returning that id.
    /// Existing documents are never mutated.
    fn save_run(&self, run: &Run) -> Result<RunId, StoreError>;
}

/// Directory of `<run_id>.jsonl` documents
pub struct FileTraceStore {
    dir: PathBuf,
}

impl FileTraceStore {
    /// Open a store rooted at `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the default store under the user data dir (`~/.traceplay/runs`)
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(crate::util::runs_dir())
    }

    fn run_path(&self, id: RunId) -> PathBuf {
        self.dir.join(format!("{id}.jsonl"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TraceStore for FileTraceStore {
    fn load_run(&self, id: RunId) -> Result<Run, StoreError> {
        let path = self.run_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id));
        }
        let run = document::read_jsonl_from_path(&path)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(run)
    }

    fn save_run(&self, run: &Run) -> Result<RunId, StoreError> {
        validate_run(run)?;
        let id = RunId::new();
        let sealed = Run { id, ..run.clone() };
        document::write_jsonl_to_path(&sealed, &self.run_path(id))?;
        tracing::debug!(run_id = %id, family = %sealed.family, steps = sealed.steps.len(), "saved run");
        Ok(id)
    }
}

/// In-memory store for tests and embedding
#[derive(Default)]
pub struct MemoryTraceStore {
    runs: Mutex<HashMap<RunId, Run>>,
}

impl MemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceStore for MemoryTraceStore {
    fn load_run(&self, id: RunId) -> Result<Run, StoreError> {
        self.runs
            .lock()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn save_run(&self, run: &Run) -> Result<RunId, StoreError> {
        validate_run(run)?;
        let id = RunId::new();
        let sealed = Run { id, ..run.clone() };
        self.runs.lock().insert(id, sealed);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::demo::bubble_sort_run;
    use crate::trace::step::{AlgorithmFamily, Step, StepState};
    use tempfile::tempdir;

    #[test]
    fn file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileTraceStore::open(dir.path()).unwrap();

        let run = bubble_sort_run(&[2.0, 1.0]);
        let id = store.save_run(&run).unwrap();
        let loaded = store.load_run(id).unwrap();

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.steps, run.steps);
    }

    #[test]
    fn load_unknown_run_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FileTraceStore::open(dir.path()).unwrap();
        let err = store.load_run(RunId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn save_rejects_invalid_run() {
        let store = MemoryTraceStore::new();
        let run = Run::new(
            AlgorithmFamily::Sorting,
            vec![Step {
                index: 0,
                family: AlgorithmFamily::Sorting,
                step_type: "compare".to_string(),
                description: "bad".to_string(),
                state: StepState::Sorting {
                    array: vec![1.0],
                    comparing_indices: vec![5],
                    sorted_indices: vec![],
                    pivot_index: None,
                    aux_indices: None,
                },
            }],
        );
        let err = store.save_run(&run).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTraceStore::new();
        let run = bubble_sort_run(&[3.0, 2.0, 1.0]);
        let id = store.save_run(&run).unwrap();
        let loaded = store.load_run(id).unwrap();
        assert_eq!(loaded.steps, run.steps);
    }
}
