//! Report compositor.
//!
//! Turns a stored result plus its reference text into the ordered
//! [`DrawInstruction`] list for a template of `template_pages` pages.
//! Fixed fields go first, then the dial, then each flowing block from its
//! configured start position.

use serde::Serialize;
use tracing::debug;

use crate::calendar::{age_on, elapsed_hms, format_date};
use crate::dial::dial_graphic;
use crate::draw::DrawInstruction;
use crate::error::{Result, TemperamentError};
use crate::layout::{BlockSlot, FieldSlot, ReportLayout};
use crate::paginate::{Cursor, FlowMetrics, PageWriter};
use crate::types::{Language, ReferenceText, ReportRecord};
use crate::wrap::{wrap_text, Line};

/// Maximum related-character blurbs printed.
pub const MAX_CHARACTERS: usize = 3;

/// Composed report ready for a document backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedReport {
    pub instructions: Vec<DrawInstruction>,
    /// Template pages plus appended overflow pages.
    pub page_count: usize,
    pub appended_pages: usize,
}

/// Fixed strings that vary with the report language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub not_available: &'static str,
    pub not_provided: &'static str,
    pub temperament_heading: &'static str,
    pub subtemperament_heading: &'static str,
}

impl Labels {
    pub fn for_language(lang: Language) -> Self {
        match lang {
            Language::Pt => Labels {
                not_available: "Não disponível",
                not_provided: "Não informado",
                temperament_heading: "Descrição do Temperamento",
                subtemperament_heading: "Características do Subtemperamento",
            },
            Language::En => Labels {
                not_available: "Not available",
                not_provided: "Not provided",
                temperament_heading: "Temperament Description",
                subtemperament_heading: "Sub-temperament Characteristics",
            },
        }
    }
}

fn or_placeholder<'a>(text: Option<&'a str>, labels: &Labels) -> &'a str {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => labels.not_available,
    }
}

struct Compositor<'a> {
    layout: &'a ReportLayout,
    metrics: FlowMetrics,
    writer: PageWriter,
}

impl<'a> Compositor<'a> {
    fn field(&mut self, slot: FieldSlot, text: impl Into<String>) {
        self.writer.text(slot.page, slot.x, slot.y, slot.size, text);
    }

    fn block(&mut self, slot: BlockSlot, text: &str) -> Cursor {
        self.flow_from(Cursor::new(slot.page, slot.y), text)
    }

    fn flow_from(&mut self, cursor: Cursor, text: &str) -> Cursor {
        let lines = wrap_text(text, self.layout.wrap_width);
        self.writer.flow(&lines, cursor, &self.metrics)
    }
}

/// Duration from the stored start/end times, or the stored value when the
/// times were never captured.
fn report_duration(record: &ReportRecord) -> String {
    match (record.started_at.as_deref(), record.finished_at.as_deref()) {
        (Some(start), Some(end)) => elapsed_hms(Some(start), Some(end)),
        _ if !record.test_duration.is_empty() => record.test_duration.clone(),
        _ => elapsed_hms(None, None),
    }
}

pub fn compose(
    record: &ReportRecord,
    reference: &ReferenceText,
    layout: &ReportLayout,
    lang: Language,
    template_pages: usize,
) -> Result<ComposedReport> {
    if template_pages < layout.required_pages {
        return Err(TemperamentError::Configuration(format!(
            "template has {} pages, layout requires {}",
            template_pages, layout.required_pages
        )));
    }

    let labels = Labels::for_language(lang);
    let fields = &layout.fields;
    let blocks = &layout.blocks;
    let temperament = record.classification.temperament.display_name(lang);
    let subtemperament = record.classification.subtemperament.display_name(lang);

    let mut c = Compositor {
        layout,
        metrics: FlowMetrics::from(layout),
        writer: PageWriter::new(template_pages),
    };

    // Page 1: identity and result
    c.field(fields.id, record.id.to_string());
    c.field(fields.name, record.name.as_str());
    c.field(fields.birth_date, format_date(record.birth_date, lang));
    c.field(
        fields.age,
        age_on(record.birth_date, record.test_date).to_string(),
    );
    c.field(fields.test_date, format_date(record.test_date, lang));
    c.field(
        fields.phone,
        record
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(labels.not_provided),
    );
    c.field(fields.test_duration, report_duration(record));
    c.field(fields.email, record.email.as_str());
    c.field(fields.temperament, temperament);
    c.field(fields.subtemperament, subtemperament);
    c.field(
        fields.temperament_heading,
        format!("{} {}", labels.temperament_heading, temperament),
    );
    c.field(
        fields.subtemperament_heading,
        format!("{} {}", labels.subtemperament_heading, subtemperament),
    );

    let dial = layout.dial;
    c.writer.push(DrawInstruction::DrawImage {
        page: dial.page,
        x: dial.x,
        y: dial.y,
        width: dial.width,
        height: dial.height,
        image: dial_graphic(record.classification.subtemperament),
    });

    // Flowing blocks
    let text = reference.temperament.clone().unwrap_or_default();
    let sections: [(BlockSlot, Option<&str>); 7] = [
        (blocks.temperament_description, text.description.as_deref()),
        (
            blocks.subtemperament_description,
            reference.subtemperament_description.as_deref(),
        ),
        (blocks.behavior, text.behavior.as_deref()),
        (blocks.positive, text.positive.as_deref()),
        (blocks.caution, text.caution.as_deref()),
        (blocks.challenge, text.challenge.as_deref()),
        (blocks.suggestion, text.suggestion.as_deref()),
    ];
    for (slot, body) in sections {
        c.block(slot, or_placeholder(body, &labels));
    }

    // Related characters share one cursor, separated like paragraphs.
    let mut cursor = Cursor::new(blocks.characters.page, blocks.characters.y);
    if reference.characters.is_empty() {
        c.flow_from(cursor, labels.not_available);
    } else {
        for (idx, blurb) in reference.characters.iter().take(MAX_CHARACTERS).enumerate() {
            if idx > 0 {
                cursor = c.writer.flow(&[Line::Blank], cursor, &c.metrics);
            }
            cursor = c.flow_from(cursor, or_placeholder(Some(blurb), &labels));
        }
    }

    let (instructions, page_count) = c.writer.into_parts();
    let appended_pages = page_count - template_pages;
    debug!(
        result_id = record.id,
        instructions = instructions.len(),
        appended_pages,
        "report composed"
    );
    Ok(ComposedReport {
        instructions,
        page_count,
        appended_pages,
    })
}
