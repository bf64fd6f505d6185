//! Abstract page-drawing commands handed to a document backend.

use serde::{Deserialize, Serialize};

/// Vector graphic placed by [`DrawInstruction::DrawImage`].
///
/// Coordinates are in canvas units with the origin at the top-left corner
/// and `y` growing downwards. The backend scales the canvas into the
/// instruction's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Graphic {
    Line {
        canvas_width: f32,
        canvas_height: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke_width: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// Text baseline at `(x, y)` in points from the bottom-left corner.
    DrawText {
        page: usize,
        x: f32,
        y: f32,
        size: f32,
        text: String,
    },
    DrawImage {
        page: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: Graphic,
    },
    /// Appends a blank page. Its index is the page count before the append.
    AddPage { width: f32, height: f32 },
}

impl DrawInstruction {
    pub fn page(&self) -> Option<usize> {
        match self {
            DrawInstruction::DrawText { page, .. } | DrawInstruction::DrawImage { page, .. } => {
                Some(*page)
            }
            DrawInstruction::AddPage { .. } => None,
        }
    }
}
