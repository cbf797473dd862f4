//! Explanation trigger behavior against a live player

use std::sync::Arc;
use std::time::Duration;

use traceplay::config::PlaybackConfig;
use traceplay::explain::{ExplanationEvent, ExplanationTrigger, MockProvider};
use traceplay::playback::Player;
use traceplay::trace::step::AlgorithmFamily;

use super::common::flat_run;

fn spawn_trigger(
    provider: MockProvider,
    player: &Player,
) -> (
    ExplanationTrigger,
    tokio::sync::mpsc::UnboundedReceiver<ExplanationEvent>,
) {
    ExplanationTrigger::spawn(
        Arc::new(provider),
        player.subscribe(),
        PlaybackConfig::default().explain_settle,
    )
}

#[tokio::test(start_paused = true)]
async fn rapid_seeks_settle_to_one_request() {
    let player = Player::spawn(PlaybackConfig::default());
    let provider = MockProvider::new();
    let calls = provider.call_log();
    let (_trigger, _events) = spawn_trigger(provider, &player);

    player.bind(flat_run(6)).unwrap();
    // 0 -> 1 -> 2 -> 3 inside 50ms of each other
    for index in [1, 2, 3] {
        tokio::time::sleep(Duration::from_millis(15)).await;
        player.seek(index).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(calls.lock().clone(), vec![(AlgorithmFamily::Sorting, 3)]);
}

#[tokio::test(start_paused = true)]
async fn each_settled_pause_gets_its_own_explanation() {
    let player = Player::spawn(PlaybackConfig::default());
    let provider = MockProvider::new();
    let (_trigger, mut events) = spawn_trigger(provider, &player);

    player.bind(flat_run(6)).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    player.seek(4).unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert_eq!(
        first,
        ExplanationEvent::Ready {
            key: (AlgorithmFamily::Sorting, 0),
            text: "Step 0 of a Sorting run".to_string(),
        }
    );
    assert_eq!(
        second,
        ExplanationEvent::Ready {
            key: (AlgorithmFamily::Sorting, 4),
            text: "Step 4 of a Sorting run".to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn provider_failure_never_blocks_advancement() {
    let player = Player::spawn(PlaybackConfig::default());
    let provider = MockProvider::new().with_failure();
    let (_trigger, mut events) = spawn_trigger(provider, &player);

    player.bind(flat_run(3)).unwrap();
    player.set_speed(8.0).unwrap();
    player.play().unwrap();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(player.state().position, 2);

    // The settled position degraded to unavailable instead of erroring out
    let event = events.recv().await.unwrap();
    assert!(matches!(event, ExplanationEvent::Unavailable { .. }));
}
