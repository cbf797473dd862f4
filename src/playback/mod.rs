//! Playback scheduling: timeline position, play/pause/seek, speed.

pub mod player;
pub mod scheduler;

pub use player::Player;
pub use scheduler::{Phase, PlaybackError, PlaybackEvent, PlaybackState, Scheduler};
