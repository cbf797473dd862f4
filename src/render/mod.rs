//! Renderer contract: pure step-to-frame functions and the surface trait.

pub mod families;
pub mod model;
pub mod text;

pub use families::render_step;
pub use model::{DrawOp, RenderSurface, Tint, VisualModel};
pub use text::TextRenderer;
