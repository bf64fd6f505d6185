//! Flowing text across pages.
//!
//! [`PageWriter`] owns the instruction list and the page count for one
//! report. Each block is laid out from a [`Cursor`] and returns the cursor
//! where it stopped, so callers thread the position explicitly.

use tracing::debug;

use crate::draw::DrawInstruction;
use crate::layout::ReportLayout;
use crate::wrap::Line;

/// Current target page and vertical write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
}

impl Cursor {
    pub fn new(page: usize, y: f32) -> Self {
        Self { page, y }
    }
}

/// Geometry the paginator needs from a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowMetrics {
    pub x: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub paragraph_spacing: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub page_width: f32,
    pub page_height: f32,
}

impl From<&ReportLayout> for FlowMetrics {
    fn from(layout: &ReportLayout) -> Self {
        Self {
            x: layout.text_x,
            font_size: layout.font_size,
            line_height: layout.line_height,
            paragraph_spacing: layout.paragraph_spacing,
            top_margin: layout.top_margin,
            bottom_margin: layout.bottom_margin,
            page_width: layout.page_width,
            page_height: layout.page_height,
        }
    }
}

/// Accumulates draw instructions for one document.
#[derive(Debug, Clone)]
pub struct PageWriter {
    instructions: Vec<DrawInstruction>,
    page_count: usize,
}

impl PageWriter {
    /// `page_count` is the number of pages already in the template.
    pub fn new(page_count: usize) -> Self {
        Self {
            instructions: Vec::new(),
            page_count,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    pub fn into_parts(self) -> (Vec<DrawInstruction>, usize) {
        (self.instructions, self.page_count)
    }

    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }

    pub fn text(&mut self, page: usize, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.instructions.push(DrawInstruction::DrawText {
            page,
            x,
            y,
            size,
            text: text.into(),
        });
    }

    /// Appends a blank page and returns its index.
    pub fn add_page(&mut self, width: f32, height: f32) -> usize {
        self.instructions
            .push(DrawInstruction::AddPage { width, height });
        let index = self.page_count;
        self.page_count += 1;
        debug!(page = index, "appended overflow page");
        index
    }

    /// Lays out `lines` starting at `cursor`.
    ///
    /// A text line below the bottom margin first moves to a fresh page at the
    /// top margin. Blank lines only consume paragraph spacing and never break
    /// a page.
    pub fn flow(&mut self, lines: &[Line], mut cursor: Cursor, metrics: &FlowMetrics) -> Cursor {
        for line in lines {
            match line {
                Line::Blank => cursor.y -= metrics.paragraph_spacing,
                Line::Text(text) => {
                    if cursor.y < metrics.bottom_margin {
                        cursor.page = self.add_page(metrics.page_width, metrics.page_height);
                        cursor.y = metrics.top_margin;
                    }
                    self.text(cursor.page, metrics.x, cursor.y, metrics.font_size, text.clone());
                    cursor.y -= metrics.line_height;
                }
            }
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::wrap_text;

    fn metrics() -> FlowMetrics {
        FlowMetrics {
            x: 50.0,
            font_size: 10.0,
            line_height: 12.0,
            paragraph_spacing: 6.0,
            top_margin: 780.0,
            bottom_margin: 60.0,
            page_width: 595.0,
            page_height: 842.0,
        }
    }

    fn text_lines(n: usize) -> Vec<Line> {
        (0..n).map(|i| Line::Text(format!("line {i}"))).collect()
    }

    fn drawn_ys(writer: &PageWriter) -> Vec<(usize, f32)> {
        writer
            .instructions()
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::DrawText { page, y, .. } => Some((*page, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_short_block_stays_on_page() {
        let mut writer = PageWriter::new(5);
        let end = writer.flow(&text_lines(3), Cursor::new(2, 680.0), &metrics());
        assert_eq!(end, Cursor::new(2, 644.0));
        assert_eq!(writer.page_count(), 5);
        assert_eq!(drawn_ys(&writer), vec![(2, 680.0), (2, 668.0), (2, 656.0)]);
    }

    #[test]
    fn test_overflow_appends_page_and_resets_to_top() {
        let mut writer = PageWriter::new(5);
        // 100, 88, 76, 64 fit; 52 is below the margin.
        let end = writer.flow(&text_lines(6), Cursor::new(4, 100.0), &metrics());
        assert_eq!(writer.page_count(), 6);
        assert_eq!(
            drawn_ys(&writer),
            vec![
                (4, 100.0),
                (4, 88.0),
                (4, 76.0),
                (4, 64.0),
                (5, 780.0),
                (5, 768.0)
            ]
        );
        assert_eq!(end, Cursor::new(5, 756.0));
        assert!(matches!(
            writer.instructions()[4],
            DrawInstruction::AddPage { width, height } if width == 595.0 && height == 842.0
        ));
    }

    #[test]
    fn test_long_block_never_draws_below_bottom_margin() {
        let mut writer = PageWriter::new(5);
        let lines = text_lines(500);
        writer.flow(&lines, Cursor::new(1, 370.0), &metrics());

        let drawn = drawn_ys(&writer);
        assert_eq!(drawn.len(), 500);
        assert!(drawn.iter().all(|(_, y)| *y >= 60.0));
        // 370 -> 60 holds 26 lines, each fresh page holds 61.
        assert_eq!(writer.page_count(), 5 + 8);
    }

    #[test]
    fn test_blank_lines_never_break_pages() {
        let mut writer = PageWriter::new(5);
        let lines = vec![Line::Blank, Line::Blank, Line::Blank];
        let end = writer.flow(&lines, Cursor::new(0, 61.0), &metrics());
        assert_eq!(writer.page_count(), 5);
        assert!(writer.instructions().is_empty());
        assert_eq!(end.y, 43.0);
    }

    #[test]
    fn test_text_after_blank_below_margin_breaks() {
        let mut writer = PageWriter::new(5);
        let lines = wrap_text("first\nsecond", 40);
        writer.flow(&lines, Cursor::new(0, 72.0), &metrics());
        // "first" at 72, blank -> 54, "second" moves to a new page.
        assert_eq!(drawn_ys(&writer), vec![(0, 72.0), (5, 780.0)]);
    }
}
