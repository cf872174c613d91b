use serde::{Deserialize, Serialize};

use super::{Color, DrawSurface, Path, Point, Rect, StrokeStyle, TextStyle};

/// A single primitive as it reached the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Stroke { path: Path, style: StrokeStyle },
    Fill { path: Path, color: Color },
    FillRect { rect: Rect, color: Color },
    Text { text: String, at: Point, style: TextStyle },
}

/// Keeps every operation issued since the last clear.
///
/// Two surfaces holding equal op lists render identical pixels, which makes
/// this the reference backend for comparing draws.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillRect { rect, .. } => Some(rect),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn stroke_path(&mut self, path: &Path, style: StrokeStyle) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            style,
        });
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}
