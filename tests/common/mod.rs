//! Shared fixtures for integration tests

use std::sync::Arc;

use traceplay::trace::demo::bubble_sort_run;
use traceplay::trace::step::{AlgorithmFamily, Run, Step, StepState};

/// A sealed sorting run over a reversed array; long enough to scrub around
pub fn scramble_run() -> Arc<Run> {
    Arc::new(bubble_sort_run(&[5.0, 4.0, 3.0, 2.0, 1.0]))
}

/// Minimal hand-built sorting run with exactly `n` steps
pub fn flat_run(n: usize) -> Arc<Run> {
    let steps = (0..n)
        .map(|index| Step {
            index,
            family: AlgorithmFamily::Sorting,
            step_type: "noop".to_string(),
            description: format!("step {index}"),
            state: StepState::Sorting {
                array: vec![1.0, 2.0, 3.0],
                comparing_indices: vec![],
                sorted_indices: vec![],
                pivot_index: None,
                aux_indices: None,
            },
        })
        .collect();
    Arc::new(Run::new(AlgorithmFamily::Sorting, steps))
}
