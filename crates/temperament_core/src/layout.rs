//! Report layout configuration.
//!
//! Every coordinate the compositor uses lives here. Defaults match the
//! production template; a YAML file may override any subset of fields.
//! Coordinates are PDF points with the origin at the bottom-left corner.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TemperamentError};

/// A single fixed-position text field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSlot {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl FieldSlot {
    const fn new(page: usize, x: f32, y: f32, size: f32) -> Self {
        Self { page, x, y, size }
    }
}

/// Where a flowing text block starts. `x` comes from [`ReportLayout::text_x`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSlot {
    pub page: usize,
    pub y: f32,
}

impl BlockSlot {
    const fn new(page: usize, y: f32) -> Self {
        Self { page, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSlot {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedFields {
    pub id: FieldSlot,
    pub name: FieldSlot,
    pub birth_date: FieldSlot,
    pub age: FieldSlot,
    pub test_date: FieldSlot,
    pub phone: FieldSlot,
    pub test_duration: FieldSlot,
    pub email: FieldSlot,
    pub temperament: FieldSlot,
    pub subtemperament: FieldSlot,
    pub temperament_heading: FieldSlot,
    pub subtemperament_heading: FieldSlot,
}

impl Default for FixedFields {
    fn default() -> Self {
        Self {
            id: FieldSlot::new(0, 70.0, 690.0, 14.0),
            name: FieldSlot::new(0, 155.0, 690.0, 14.0),
            birth_date: FieldSlot::new(0, 150.0, 677.0, 10.0),
            age: FieldSlot::new(0, 390.0, 677.0, 10.0),
            test_date: FieldSlot::new(0, 150.0, 665.0, 10.0),
            phone: FieldSlot::new(0, 390.0, 665.0, 10.0),
            test_duration: FieldSlot::new(0, 150.0, 654.0, 10.0),
            email: FieldSlot::new(0, 390.0, 654.0, 10.0),
            temperament: FieldSlot::new(0, 420.0, 595.0, 10.0),
            subtemperament: FieldSlot::new(0, 420.0, 571.0, 10.0),
            temperament_heading: FieldSlot::new(0, 185.0, 495.0, 14.0),
            subtemperament_heading: FieldSlot::new(1, 173.0, 707.0, 14.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowBlocks {
    pub temperament_description: BlockSlot,
    pub subtemperament_description: BlockSlot,
    pub behavior: BlockSlot,
    pub positive: BlockSlot,
    pub caution: BlockSlot,
    pub challenge: BlockSlot,
    pub suggestion: BlockSlot,
    pub characters: BlockSlot,
}

impl Default for FlowBlocks {
    fn default() -> Self {
        Self {
            temperament_description: BlockSlot::new(0, 470.0),
            subtemperament_description: BlockSlot::new(1, 680.0),
            behavior: BlockSlot::new(1, 370.0),
            positive: BlockSlot::new(2, 680.0),
            caution: BlockSlot::new(2, 370.0),
            challenge: BlockSlot::new(3, 680.0),
            suggestion: BlockSlot::new(3, 370.0),
            characters: BlockSlot::new(4, 680.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Size of pages appended on overflow.
    pub page_width: f32,
    pub page_height: f32,
    /// Left edge of flowing text.
    pub text_x: f32,
    pub font_size: f32,
    pub line_height: f32,
    /// Vertical gap for a blank line between paragraphs.
    pub paragraph_spacing: f32,
    /// Maximum characters per wrapped line.
    pub wrap_width: usize,
    /// `y` after a page break.
    pub top_margin: f32,
    /// No text line is drawn below this `y`.
    pub bottom_margin: f32,
    /// Minimum page count of a usable template.
    pub required_pages: usize,
    pub fields: FixedFields,
    pub blocks: FlowBlocks,
    pub dial: ImageSlot,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            text_x: 50.0,
            font_size: 10.0,
            line_height: 12.0,
            paragraph_spacing: 6.0,
            wrap_width: 110,
            top_margin: 780.0,
            bottom_margin: 60.0,
            required_pages: 5,
            fields: FixedFields::default(),
            blocks: FlowBlocks::default(),
            dial: ImageSlot {
                page: 0,
                x: 92.0,
                y: 500.0,
                width: 155.0,
                height: 155.0,
            },
        }
    }
}

impl ReportLayout {
    /// Load a layout from a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TemperamentError::Configuration(format!(
                "cannot read report layout {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let layout: ReportLayout = serde_yaml::from_str(content).map_err(|e| {
            TemperamentError::Configuration(format!("invalid report layout: {}", e))
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Rejects layouts the paginator cannot make progress with.
    pub fn validate(&self) -> Result<()> {
        if self.line_height <= 0.0 {
            return Err(TemperamentError::Configuration(
                "line_height must be positive".into(),
            ));
        }
        if self.wrap_width == 0 {
            return Err(TemperamentError::Configuration(
                "wrap_width must be positive".into(),
            ));
        }
        if self.top_margin < self.bottom_margin {
            return Err(TemperamentError::Configuration(format!(
                "top_margin {} is below bottom_margin {}",
                self.top_margin, self.bottom_margin
            )));
        }
        let highest_page = self.highest_fixed_page();
        if highest_page >= self.required_pages {
            return Err(TemperamentError::Configuration(format!(
                "layout places content on page {} but requires only {} template pages",
                highest_page + 1,
                self.required_pages
            )));
        }
        Ok(())
    }

    fn highest_fixed_page(&self) -> usize {
        let f = &self.fields;
        let b = &self.blocks;
        [
            f.id.page,
            f.name.page,
            f.birth_date.page,
            f.age.page,
            f.test_date.page,
            f.phone.page,
            f.test_duration.page,
            f.email.page,
            f.temperament.page,
            f.subtemperament.page,
            f.temperament_heading.page,
            f.subtemperament_heading.page,
            b.temperament_description.page,
            b.subtemperament_description.page,
            b.behavior.page,
            b.positive.page,
            b.caution.page,
            b.challenge.page,
            b.suggestion.page,
            b.characters.page,
            self.dial.page,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}
