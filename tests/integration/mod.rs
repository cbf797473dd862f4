#[path = "../common/mod.rs"]
pub mod common;

pub mod explain_flow;
pub mod playback_flow;
pub mod store_roundtrip;
