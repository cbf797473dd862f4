//! Trace store contract: validation at save, round-trip fidelity

use proptest::prelude::*;
use tempfile::tempdir;

use traceplay::store::{FileTraceStore, StoreError, TraceStore};
use traceplay::trace::demo::{bubble_sort_run, sieve_run};
use traceplay::trace::step::{AlgorithmFamily, Run, RunId, Step, StepState};
use traceplay::trace::validate::validate_run;

#[test]
fn save_then_load_is_structurally_identical() {
    let dir = tempdir().unwrap();
    let store = FileTraceStore::open(dir.path()).unwrap();

    let run = sieve_run(15);
    let id = store.save_run(&run).unwrap();
    let loaded = store.load_run(id).unwrap();

    // save_run assigns a fresh id; everything else survives unchanged
    assert_eq!(loaded.family, run.family);
    assert_eq!(loaded.steps, run.steps);
    assert_eq!(
        loaded.created_at.timestamp_millis(),
        run.created_at.timestamp_millis()
    );
}

#[test]
fn saving_never_mutates_an_existing_document() {
    let dir = tempdir().unwrap();
    let store = FileTraceStore::open(dir.path()).unwrap();

    let run = bubble_sort_run(&[3.0, 1.0, 2.0]);
    let first = store.save_run(&run).unwrap();
    let before = store.load_run(first).unwrap();

    // A second save creates a new document under a new id
    let second = store.save_run(&run).unwrap();
    assert_ne!(first, second);
    let after = store.load_run(first).unwrap();
    assert_eq!(before, after);
}

#[test]
fn invalid_run_is_rejected_at_save_time() {
    let dir = tempdir().unwrap();
    let store = FileTraceStore::open(dir.path()).unwrap();

    let run = Run::new(
        AlgorithmFamily::BinarySearch,
        vec![Step {
            index: 0,
            family: AlgorithmFamily::BinarySearch,
            step_type: "probe".to_string(),
            description: "probe out of range".to_string(),
            state: StepState::BinarySearch {
                array: vec![1.0, 2.0],
                left: 0,
                right: 5,
                mid: None,
                target: 2.0,
                found: false,
            },
        }],
    );
    let err = store.save_run(&run).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(dir.path().read_dir().unwrap().next().is_none());
}

#[test]
fn loading_unknown_id_is_not_found() {
    let dir = tempdir().unwrap();
    let store = FileTraceStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.load_run(RunId::new()),
        Err(StoreError::NotFound(_))
    ));
}

proptest! {
    // Instrumented bubble sorts over arbitrary inputs stay schema-valid
    // and survive the document round-trip byte-for-byte in content
    #[test]
    fn generated_sorting_runs_validate_and_round_trip(
        values in proptest::collection::vec(-1000.0f64..1000.0, 1..12)
    ) {
        let run = bubble_sort_run(&values);
        prop_assert_eq!(validate_run(&run), Ok(()));

        let dir = tempdir().unwrap();
        let store = FileTraceStore::open(dir.path()).unwrap();
        let id = store.save_run(&run).unwrap();
        let loaded = store.load_run(id).unwrap();
        prop_assert_eq!(loaded.steps, run.steps);
    }
}
