pub mod config;
pub mod explain;
pub mod playback;
pub mod render;
pub mod store;
pub mod trace;
pub mod util;

pub use config::PlaybackConfig;
pub use explain::{ExplanationEvent, ExplanationProvider, ExplanationTrigger};
pub use playback::{Phase, PlaybackError, PlaybackEvent, PlaybackState, Player, Scheduler};
pub use render::{render_step, RenderSurface, VisualModel};
pub use store::{FileTraceStore, MemoryTraceStore, StoreError, TraceStore};
pub use trace::{validate_run, validate_step, AlgorithmFamily, Run, RunId, SchemaError, Step, StepState};
