//! Terminal text surface for visual models.
//!
//! Folds draw primitives into character rows by integer position. This is
//! one possible leaf surface; it consumes the visual model only and knows
//! nothing about any algorithm.

use std::collections::BTreeMap;
use std::io::Write;

use crate::render::model::{DrawOp, RenderSurface, Tint, VisualModel};
use crate::trace::step::Step;

fn glyph(tint: Tint) -> char {
    match tint {
        Tint::Default => '.',
        Tint::Compare => '^',
        Tint::Sorted => '=',
        Tint::Pivot => 'p',
        Tint::Active => '@',
        Tint::Visited => 'v',
        Tint::Frontier => 'o',
        Tint::Path => '*',
        Tint::Wall => '#',
        Tint::Conflict => 'x',
        Tint::Eliminated => '-',
        Tint::Prime => '+',
        Tint::Found => '!',
        Tint::Target => 'T',
    }
}

/// Render a model into printable lines, one glyph per primitive cell
pub fn model_lines(model: &VisualModel) -> Vec<String> {
    let mut rows: BTreeMap<i64, BTreeMap<i64, char>> = BTreeMap::new();
    for op in &model.ops {
        let (x, y, tint) = match op {
            DrawOp::Rect { x, y, tint, .. } => (*x, *y, *tint),
            DrawOp::Circle { x, y, tint, .. } => (*x, *y, *tint),
            DrawOp::Line { x1, y1, tint, .. } => (*x1, *y1, *tint),
            DrawOp::Text { x, y, tint, .. } => (*x, *y, *tint),
        };
        rows.entry(y.floor() as i64)
            .or_default()
            .insert(x.floor() as i64, glyph(tint));
    }
    rows.into_values()
        .map(|cols| {
            let max = cols.keys().next_back().copied().unwrap_or(0);
            let min = cols.keys().next().copied().unwrap_or(0).min(0);
            (min..=max)
                .map(|c| cols.get(&c).copied().unwrap_or(' '))
                .collect()
        })
        .collect()
}

/// Text surface writing each presented frame to a writer
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderSurface for TextRenderer<W> {
    fn present(&mut self, step: &Step, model: &VisualModel) {
        let _ = writeln!(
            self.out,
            "[{}] {}: {}",
            step.index, step.step_type, step.description
        );
        for line in model_lines(model) {
            let _ = writeln!(self.out, "  {line}");
        }
        let _ = self.out.flush();
    }
}
