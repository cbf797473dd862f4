//! End-to-end playback flows: scrubbing, cadence, renderer determinism

use std::time::Duration;

use traceplay::config::PlaybackConfig;
use traceplay::playback::{Phase, PlaybackEvent, Player, Scheduler};
use traceplay::render::render_step;
use traceplay::trace::demo::{binary_search_run, bubble_sort_run, sieve_run};

use super::common::{flat_run, scramble_run};

#[test]
fn demo_runs_have_contiguous_indices() {
    for run in [
        bubble_sort_run(&[9.0, 1.0, 8.0, 2.0]),
        binary_search_run(&[1.0, 2.0, 3.0, 4.0], 3.0),
        sieve_run(20),
    ] {
        for (i, step) in run.steps.iter().enumerate() {
            assert_eq!(step.index, i);
        }
    }
}

#[tokio::test]
async fn seeking_renders_identically_to_stepping() {
    let run = scramble_run();
    let k = run.steps.len() - 2;

    // Step one position at a time up to k
    let mut stepper = Scheduler::new(PlaybackConfig::default());
    stepper.bind(run.clone()).unwrap();
    let mut frame_by_stepping = render_step(&stepper.current_step().unwrap().state, None);
    for i in 1..=k {
        stepper.seek(i).unwrap();
        let prev = frame_by_stepping.clone();
        frame_by_stepping = render_step(&stepper.current_step().unwrap().state, Some(&prev));
    }

    // Jump straight to k
    let mut seeker = Scheduler::new(PlaybackConfig::default());
    seeker.bind(run).unwrap();
    seeker.seek(k).unwrap();
    let frame_by_seeking = render_step(&seeker.current_step().unwrap().state, None);

    assert_eq!(frame_by_stepping, frame_by_seeking);
}

#[tokio::test(start_paused = true)]
async fn playthrough_visits_every_step_in_order() {
    let run = flat_run(5);
    let player = Player::spawn(PlaybackConfig::default());
    let mut rx = player.subscribe();

    player.bind(run).unwrap();
    player.set_speed(8.0).unwrap();
    player.play().unwrap();

    let mut indices = Vec::new();
    while let Some(PlaybackEvent::PositionChanged { index, finished, .. }) = rx.recv().await {
        indices.push(index);
        if finished {
            break;
        }
    }
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(player.phase(), Phase::Finished);
}

#[tokio::test(start_paused = true)]
async fn scrubbing_while_playing_keeps_cadence() {
    let run = flat_run(10);
    let player = Player::spawn(PlaybackConfig::default());
    player.bind(run).unwrap();
    player.play().unwrap();

    // Storm of seeks well inside the first tick interval
    for index in [7, 3, 5] {
        tokio::time::sleep(Duration::from_millis(50)).await;
        player.seek(index).unwrap();
    }

    // First tick still fires on the original schedule, from the last
    // seeked position
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(player.state().position, 6);
}

#[tokio::test(start_paused = true)]
async fn finished_run_replays_from_start() {
    let run = flat_run(3);
    let player = Player::spawn(PlaybackConfig::default());
    player.bind(run).unwrap();
    player.seek(2).unwrap();
    assert_eq!(player.phase(), Phase::Finished);

    player.play().unwrap();
    assert_eq!(player.state().position, 0);
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(player.phase(), Phase::Finished);
}
