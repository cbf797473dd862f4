//! Declarative visual model: what to draw for a step, never how.
//!
//! Concrete painting (canvas, vector graphics, terminal) is a leaf concern
//! behind [`RenderSurface`]; this model only carries geometry and semantic
//! tints derived from role flags in the step state.

use serde::{Deserialize, Serialize};

use crate::trace::step::Step;

/// Semantic color role. Surfaces map these to actual colors; the model
/// itself stays styling-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tint {
    Default,
    Compare,
    Sorted,
    Pivot,
    Active,
    Visited,
    Frontier,
    Path,
    Wall,
    Conflict,
    Eliminated,
    Prime,
    Found,
    Target,
}

/// One draw primitive, positioned in an abstract unit coordinate space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        tint: Tint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        tint: Tint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Circle {
        x: f64,
        y: f64,
        r: f64,
        tint: Tint,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        tint: Tint,
        text: String,
    },
}

impl DrawOp {
    pub fn tint(&self) -> Tint {
        match self {
            DrawOp::Rect { tint, .. }
            | DrawOp::Line { tint, .. }
            | DrawOp::Circle { tint, .. }
            | DrawOp::Text { tint, .. } => *tint,
        }
    }
}

/// Complete declarative frame for one step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualModel {
    pub ops: Vec<DrawOp>,
}

impl VisualModel {
    pub fn new(ops: Vec<DrawOp>) -> Self {
        Self { ops }
    }
}

/// Presentation surface consuming rendered frames. Implementations paint;
/// they never contain algorithm logic.
pub trait RenderSurface {
    fn present(&mut self, step: &Step, model: &VisualModel);
}
