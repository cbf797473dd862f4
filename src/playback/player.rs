//! Tokio-driven playback handle.
//!
//! Wraps a [`Scheduler`] behind a mutex and spawns one driver task that
//! sleeps until the next armed deadline, then ticks. One logical timeline
//! per player: a new tick never fires while a previous tick's synchronous
//! subscriber notifications are still resolving, because both happen under
//! the same lock in the same task. Control calls never block on the driver.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::PlaybackConfig;
use crate::playback::scheduler::{Phase, PlaybackError, PlaybackEvent, PlaybackState, Scheduler};
use crate::trace::step::Run;

pub struct Player {
    inner: Arc<Mutex<Scheduler>>,
    wake: Arc<Notify>,
    driver: JoinHandle<()>,
}

impl Player {
    /// Spawn a player on the current tokio runtime
    pub fn spawn(config: PlaybackConfig) -> Self {
        let inner = Arc::new(Mutex::new(Scheduler::new(config)));
        let wake = Arc::new(Notify::new());
        let driver = tokio::spawn(drive(inner.clone(), wake.clone()));
        Self {
            inner,
            wake,
            driver,
        }
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        self.inner.lock().subscribe()
    }

    pub fn bind(&self, run: Arc<Run>) -> Result<(), PlaybackError> {
        let result = self.inner.lock().bind(run);
        self.wake.notify_one();
        result
    }

    pub fn play(&self) -> Result<(), PlaybackError> {
        let result = self.inner.lock().play(Instant::now());
        self.wake.notify_one();
        result
    }

    pub fn pause(&self) -> Result<(), PlaybackError> {
        let result = self.inner.lock().pause();
        self.wake.notify_one();
        result
    }

    pub fn seek(&self, index: usize) -> Result<usize, PlaybackError> {
        // No wake: seeking never re-arms the pending deadline
        self.inner.lock().seek(index)
    }

    pub fn set_speed(&self, multiplier: f64) -> Result<(), PlaybackError> {
        self.inner.lock().set_speed(multiplier)
    }

    pub fn reset(&self) -> Result<(), PlaybackError> {
        let result = self.inner.lock().reset();
        self.wake.notify_one();
        result
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase()
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state()
    }

    pub fn run(&self) -> Option<Arc<Run>> {
        self.inner.lock().run()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(inner: Arc<Mutex<Scheduler>>, wake: Arc<Notify>) {
    loop {
        let deadline = inner.lock().next_deadline();
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => {
                        inner.lock().tick(Instant::now());
                    }
                    _ = wake.notified() => {}
                }
            }
            None => wake.notified().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::demo::bubble_sort_run;
    use std::time::Duration;

    fn three_step_run() -> Arc<Run> {
        // bubble sort of a reversed pair: compare, swap, done
        let run = bubble_sort_run(&[2.0, 1.0]);
        assert_eq!(run.steps.len(), 3);
        Arc::new(run)
    }

    #[tokio::test(start_paused = true)]
    async fn cadence_at_double_speed() {
        let player = Player::spawn(PlaybackConfig::default());
        player.bind(three_step_run()).unwrap();
        player.set_speed(2.0).unwrap();
        player.play().unwrap();

        tokio::time::sleep(Duration::from_millis(490)).await;
        assert_eq!(player.state().position, 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(player.state().position, 1);
        assert_eq!(player.phase(), Phase::Playing);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(player.state().position, 2);
        // Finished without an explicit pause()
        assert!(!player.state().playing);
        assert_eq!(player.phase(), Phase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_retains_position() {
        let player = Player::spawn(PlaybackConfig::default());
        player.bind(three_step_run()).unwrap();
        player.play().unwrap();

        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(player.state().position, 1);

        player.pause().unwrap();
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(player.state().position, 1);
        assert_eq!(player.phase(), Phase::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_from_finished() {
        let player = Player::spawn(PlaybackConfig::default());
        player.bind(three_step_run()).unwrap();
        player.seek(2).unwrap();
        assert_eq!(player.phase(), Phase::Finished);

        player.play().unwrap();
        assert_eq!(player.state().position, 0);
        assert_eq!(player.phase(), Phase::Playing);

        tokio::time::sleep(Duration::from_millis(2010)).await;
        assert_eq!(player.phase(), Phase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_position_change() {
        let player = Player::spawn(PlaybackConfig::default());
        let mut rx = player.subscribe();
        player.bind(three_step_run()).unwrap();
        player.play().unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;

        let mut indices = Vec::new();
        while let Ok(PlaybackEvent::PositionChanged { index, .. }) = rx.try_recv() {
            indices.push(index);
        }
        // bind emits 0, then ticks emit 1 and 2
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
