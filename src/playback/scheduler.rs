//! Playback state machine.
//!
//! The scheduler is the sole owner and mutator of the timeline position.
//! Advancement is cooperative: the driver calls [`Scheduler::tick`] one
//! deadline at a time, and every position mutation notifies subscribers
//! synchronously before anything else happens. Renderers are plain
//! subscribers, decoupled from any UI runtime.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::PlaybackConfig;
use crate::trace::step::{Run, Step};

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("run has no steps and cannot be bound")]
    NotSealed,
    #[error("speed multiplier {0} outside accepted range")]
    InvalidSpeed(f64),
    #[error("no run is bound")]
    Unbound,
}

/// Derived playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unbound,
    Paused,
    Playing,
    Finished,
}

/// Notification fanned out on every position mutation
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    PositionChanged {
        run: Arc<Run>,
        index: usize,
        playing: bool,
        finished: bool,
    },
}

/// Transient per-session view of scheduler state; never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub position: usize,
    pub playing: bool,
    pub speed: f64,
    pub phase: Phase,
}

pub struct Scheduler {
    config: PlaybackConfig,
    run: Option<Arc<Run>>,
    position: usize,
    playing: bool,
    speed: f64,
    next_tick_at: Option<Instant>,
    subscribers: Vec<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl Scheduler {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            run: None,
            position: 0,
            playing: false,
            speed: 1.0,
            next_tick_at: None,
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Unsubscribe by dropping the receiver;
    /// closed channels are pruned on the next emit.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Attach a sealed run: position 0, paused
    pub fn bind(&mut self, run: Arc<Run>) -> Result<(), PlaybackError> {
        if run.is_empty() {
            return Err(PlaybackError::NotSealed);
        }
        self.run = Some(run);
        self.position = 0;
        self.playing = false;
        self.next_tick_at = None;
        self.emit_position();
        Ok(())
    }

    /// Start advancing once per `tick_base / speed` of wall-clock time.
    /// From Finished this replays from the start.
    pub fn play(&mut self, now: Instant) -> Result<(), PlaybackError> {
        let last = self.last_index()?;
        if self.playing {
            return Ok(());
        }
        if self.position == last {
            // Replay from the start rather than a no-op
            self.seek(0)?;
            if self.last_index()? == 0 {
                return Ok(());
            }
        }
        self.playing = true;
        self.next_tick_at = Some(now + self.config.tick_interval(self.speed));
        Ok(())
    }

    /// Stop advancing, retaining position
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.last_index()?;
        self.playing = false;
        self.next_tick_at = None;
        Ok(())
    }

    /// Jump to `index`, clamped to the valid range. Takes effect
    /// immediately regardless of playing state; a pending auto-advance
    /// deadline is left untouched so scrubbing never changes cadence.
    pub fn seek(&mut self, index: usize) -> Result<usize, PlaybackError> {
        let last = self.last_index()?;
        let clamped = index.min(last);
        self.position = clamped;
        if clamped == last && self.playing {
            // Reaching the end finishes playback, however we got there
            self.playing = false;
            self.next_tick_at = None;
        }
        self.emit_position();
        Ok(clamped)
    }

    /// Change the speed multiplier. Applies from the next armed deadline
    /// onward; the currently pending tick keeps its schedule.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), PlaybackError> {
        if !multiplier.is_finite()
            || multiplier < self.config.min_speed
            || multiplier > self.config.max_speed
        {
            return Err(PlaybackError::InvalidSpeed(multiplier));
        }
        self.speed = multiplier;
        Ok(())
    }

    /// Seek to 0 and pause
    pub fn reset(&mut self) -> Result<(), PlaybackError> {
        self.seek(0)?;
        self.pause()
    }

    /// Advance one position if a due deadline is pending.
    /// Returns true when the position moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing {
            return false;
        }
        let Some(deadline) = self.next_tick_at else {
            return false;
        };
        if now < deadline {
            return false;
        }
        let Some(last) = self.run.as_ref().and_then(|r| r.last_index()) else {
            return false;
        };
        if self.position >= last {
            self.playing = false;
            self.next_tick_at = None;
            return false;
        }
        self.position += 1;
        if self.position == last {
            // Auto-finish: playing clears without an explicit pause
            self.playing = false;
            self.next_tick_at = None;
        } else {
            // Re-arm from the fired deadline; the new speed (if changed)
            // applies from here on
            self.next_tick_at = Some(deadline + self.config.tick_interval(self.speed));
        }
        self.emit_position();
        true
    }

    /// Deadline of the pending auto-advance, if playing
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick_at
    }

    pub fn phase(&self) -> Phase {
        match (&self.run, self.playing) {
            (None, _) => Phase::Unbound,
            (Some(_), true) => Phase::Playing,
            (Some(run), false) => {
                if run.last_index() == Some(self.position) {
                    Phase::Finished
                } else {
                    Phase::Paused
                }
            }
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn run(&self) -> Option<Arc<Run>> {
        self.run.clone()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.run.as_ref().and_then(|r| r.steps.get(self.position))
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            position: self.position,
            playing: self.playing,
            speed: self.speed,
            phase: self.phase(),
        }
    }

    fn last_index(&self) -> Result<usize, PlaybackError> {
        self.run
            .as_ref()
            .and_then(|r| r.last_index())
            .ok_or(PlaybackError::Unbound)
    }

    fn emit_position(&mut self) {
        let Some(run) = self.run.clone() else {
            return;
        };
        let finished = run.last_index() == Some(self.position) && !self.playing;
        let event = PlaybackEvent::PositionChanged {
            run,
            index: self.position,
            playing: self.playing,
            finished,
        };
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
