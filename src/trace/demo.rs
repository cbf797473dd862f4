//! Demo run producers for the CLI and tests.
//!
//! Playback treats run construction as an external concern; these producers
//! exist so the engine can be exercised end to end without a real
//! instrumentation frontend. Every emitted run is sealed and schema-valid.

use crate::trace::step::{AlgorithmFamily, Run, Step, StepState};

fn sorting_step(
    index: usize,
    step_type: &str,
    description: String,
    array: &[f64],
    comparing: Vec<usize>,
    sorted: Vec<usize>,
) -> Step {
    Step {
        index,
        family: AlgorithmFamily::Sorting,
        step_type: step_type.to_string(),
        description,
        state: StepState::Sorting {
            array: array.to_vec(),
            comparing_indices: comparing,
            sorted_indices: sorted,
            pivot_index: None,
            aux_indices: None,
        },
    }
}

/// Trace a bubble sort over `values`, one step per comparison and swap
pub fn bubble_sort_run(values: &[f64]) -> Run {
    let mut array = values.to_vec();
    let mut steps = Vec::new();
    let n = array.len();
    let mut sorted: Vec<usize> = Vec::new();

    for pass in 0..n.saturating_sub(1) {
        for i in 0..n - 1 - pass {
            steps.push(sorting_step(
                steps.len(),
                "compare",
                format!("Compare positions {i} and {}", i + 1),
                &array,
                vec![i, i + 1],
                sorted.clone(),
            ));
            if array[i] > array[i + 1] {
                array.swap(i, i + 1);
                steps.push(sorting_step(
                    steps.len(),
                    "swap",
                    format!("Swap positions {i} and {}", i + 1),
                    &array,
                    vec![],
                    sorted.clone(),
                ));
            }
        }
        sorted.push(n - 1 - pass);
    }
    if n > 0 {
        sorted.push(0);
    }
    steps.push(sorting_step(
        steps.len(),
        "done",
        "Array sorted".to_string(),
        &array,
        vec![],
        sorted,
    ));

    Run::new(AlgorithmFamily::Sorting, steps)
}

/// Trace a binary search for `target` over a sorted `array`
pub fn binary_search_run(array: &[f64], target: f64) -> Run {
    let mut steps = Vec::new();
    let mut left = 0usize;
    let mut right = array.len().saturating_sub(1);
    let push = |step_type: &str,
                description: String,
                left: usize,
                right: usize,
                mid: Option<usize>,
                found: bool,
                steps: &mut Vec<Step>| {
        steps.push(Step {
            index: steps.len(),
            family: AlgorithmFamily::BinarySearch,
            step_type: step_type.to_string(),
            description,
            state: StepState::BinarySearch {
                array: array.to_vec(),
                left,
                right,
                mid,
                target,
                found,
            },
        });
    };

    push(
        "init",
        format!("Search for {target} in {} elements", array.len()),
        left,
        right,
        None,
        false,
        &mut steps,
    );

    while left <= right && !array.is_empty() {
        let mid = left + (right - left) / 2;
        push(
            "probe",
            format!("Probe midpoint {mid}"),
            left,
            right,
            Some(mid),
            false,
            &mut steps,
        );
        if array[mid] == target {
            push(
                "done",
                format!("Found {target} at index {mid}"),
                left,
                right,
                Some(mid),
                true,
                &mut steps,
            );
            break;
        }
        if array[mid] < target {
            left = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            right = mid - 1;
        }
        if left > right {
            break;
        }
        push(
            "narrow",
            format!("Narrow window to [{left}, {right}]"),
            left,
            right,
            Some(mid),
            false,
            &mut steps,
        );
    }

    Run::new(AlgorithmFamily::BinarySearch, steps)
}

/// Trace a sieve of Eratosthenes up to `limit`
pub fn sieve_run(limit: u64) -> Run {
    let mut steps = Vec::new();
    let mut is_prime = vec![true; (limit as usize) + 1];
    let mut primes: Vec<u64> = Vec::new();
    let mut eliminated: Vec<u64> = Vec::new();
    let push = |step_type: &str,
                description: String,
                primes: &[u64],
                eliminated: &[u64],
                current_prime: Option<u64>,
                checking: Option<u64>,
                steps: &mut Vec<Step>| {
        steps.push(Step {
            index: steps.len(),
            family: AlgorithmFamily::Sieve,
            step_type: step_type.to_string(),
            description,
            state: StepState::Sieve {
                limit,
                primes: primes.to_vec(),
                eliminated: eliminated.to_vec(),
                current_prime,
                checking,
            },
        });
    };

    push(
        "init",
        format!("Sieve numbers 2 through {limit}"),
        &primes,
        &eliminated,
        None,
        None,
        &mut steps,
    );

    for p in 2..=limit {
        if !is_prime[p as usize] {
            continue;
        }
        primes.push(p);
        push(
            "mark-prime",
            format!("{p} is prime"),
            &primes,
            &eliminated,
            Some(p),
            None,
            &mut steps,
        );
        let mut multiple = p * p;
        while multiple <= limit {
            if is_prime[multiple as usize] {
                is_prime[multiple as usize] = false;
                eliminated.push(multiple);
                push(
                    "eliminate",
                    format!("Eliminate {multiple}, a multiple of {p}"),
                    &primes,
                    &eliminated,
                    Some(p),
                    Some(multiple),
                    &mut steps,
                );
            }
            multiple += p;
        }
    }
    push(
        "done",
        format!("Found {} primes", primes.len()),
        &primes,
        &eliminated,
        None,
        None,
        &mut steps,
    );

    Run::new(AlgorithmFamily::Sieve, steps)
}
