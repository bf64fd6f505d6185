//! lopdf document backend.
//!
//! Opens the stored template, buffers draw operations per page and, on
//! finish, appends one content stream per touched page. Existing page
//! content is wrapped in `q`/`Q` so the template's graphics state cannot
//! leak into the overlay. Text uses the configured TrueType font, embedded
//! once as a simple font with its advance widths for codes 32 to 255.
//! Text is encoded as WinAnsi, so any character outside Windows-1252
//! prints as `?`.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;
use ttf_parser::{Face, GlyphId};

use temperament_core::ports::{DocumentBackend, ReportDocument};
use temperament_core::{DrawInstruction, Graphic, Result, TemperamentError};

/// Resource name of the embedded font on every page.
const FONT_KEY: &str = "FTemp";
const FONT_NAME: &str = "ReportFont";
const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

fn render_err(e: lopdf::Error) -> TemperamentError {
    TemperamentError::Render(e.to_string())
}

/// Character a WinAnsi code stands for.
fn win_ansi_char(code: u8) -> Option<char> {
    let bytes = [code];
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&bytes);
    text.chars().next()
}

/// Font metrics in PDF glyph space (1000 units per em).
#[derive(Debug, Clone, PartialEq)]
struct FontMetrics {
    /// Advance widths for `FIRST_CHAR..=LAST_CHAR`.
    widths: Vec<i64>,
    missing_width: i64,
    bbox: [i64; 4],
    ascent: i64,
    descent: i64,
    cap_height: i64,
}

impl FontMetrics {
    fn read(font: &[u8]) -> Result<Self> {
        let face = Face::parse(font, 0).map_err(|e| {
            TemperamentError::Configuration(format!(
                "font is not a usable TrueType or OpenType file: {}",
                e
            ))
        })?;
        let scale = 1000.0 / f32::from(face.units_per_em());
        let to_pdf = |units: f32| (units * scale).round() as i64;
        let advance = |glyph: GlyphId| {
            face.glyph_hor_advance(glyph)
                .map(|width| to_pdf(f32::from(width)))
        };

        let missing_width = advance(GlyphId(0)).unwrap_or(0);
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                win_ansi_char(code)
                    .and_then(|ch| face.glyph_index(ch))
                    .and_then(advance)
                    .unwrap_or(missing_width)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = to_pdf(f32::from(face.ascender()));
        Ok(Self {
            widths,
            missing_width,
            bbox: [
                to_pdf(f32::from(bbox.x_min)),
                to_pdf(f32::from(bbox.y_min)),
                to_pdf(f32::from(bbox.x_max)),
                to_pdf(f32::from(bbox.y_max)),
            ],
            ascent,
            descent: to_pdf(f32::from(face.descender())),
            cap_height: face
                .capital_height()
                .map(|h| to_pdf(f32::from(h)))
                .unwrap_or(ascent),
        })
    }
}

/// WinAnsi bytes for `text`. Characters outside Windows-1252 become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if had_errors || bytes.len() != 1 {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl DocumentBackend for LopdfBackend {
    fn open(&self, template: &[u8], font: &[u8]) -> Result<Box<dyn ReportDocument>> {
        let doc = Document::load_mem(template).map_err(|e| {
            TemperamentError::Configuration(format!("template is not a readable PDF: {}", e))
        })?;
        let metrics = FontMetrics::read(font)?;
        LopdfDocument::new(doc, font, &metrics).map(|d| Box::new(d) as Box<dyn ReportDocument>)
    }
}

pub struct LopdfDocument {
    doc: Document,
    pages_root: ObjectId,
    /// Page object ids in display order, template pages first.
    pages: Vec<ObjectId>,
    font_id: ObjectId,
    operations: BTreeMap<usize, Vec<Operation>>,
}

impl LopdfDocument {
    fn new(mut doc: Document, font: &[u8], metrics: &FontMetrics) -> Result<Self> {
        let pages_root = doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| TemperamentError::Configuration(format!("template has no page tree: {}", e)))?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let font_id = embed_font(&mut doc, font, metrics);
        Ok(Self {
            doc,
            pages_root,
            pages,
            font_id,
            operations: BTreeMap::new(),
        })
    }

    fn ops(&mut self, page: usize) -> Result<&mut Vec<Operation>> {
        if page >= self.pages.len() {
            return Err(TemperamentError::Render(format!(
                "page {} out of range ({} pages)",
                page,
                self.pages.len()
            )));
        }
        Ok(self.operations.entry(page).or_default())
    }

    fn add_page(&mut self, width: f32, height: f32) -> Result<()> {
        let contents_id = self.doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_root,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        });

        let root = self
            .doc
            .get_object_mut(self.pages_root)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?;
        let mut kids = root
            .get(b"Kids")
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default();
        kids.push(page_id.into());
        let count = root.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        root.set("Kids", kids);
        root.set("Count", count + 1);

        self.pages.push(page_id);
        debug!(page = self.pages.len() - 1, "pdf page appended");
        Ok(())
    }

    /// Resources dictionary the page actually uses, following inheritance.
    fn effective_resources(&self, page_id: ObjectId) -> Dictionary {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let Ok(node) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Ok(resources) = node.get(b"Resources") {
                if let Some(dict) = self.resolve_dict(resources) {
                    return dict;
                }
            }
            current = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Dictionary::new()
    }

    fn resolve_dict(&self, object: &Object) -> Option<Dictionary> {
        match object {
            Object::Dictionary(dict) => Some(dict.clone()),
            Object::Reference(id) => self.doc.get_dictionary(*id).ok().cloned(),
            _ => None,
        }
    }

    /// Give the page an inline resources dictionary that includes the font.
    fn install_font(&mut self, page_id: ObjectId) -> Result<()> {
        let mut resources = self.effective_resources(page_id);
        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|f| self.resolve_dict(f))
            .unwrap_or_default();
        fonts.set(FONT_KEY, self.font_id);
        resources.set("Font", fonts);

        self.doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?
            .set("Resources", resources);
        Ok(())
    }

    fn append_content(&mut self, page_id: ObjectId, operations: Vec<Operation>) -> Result<()> {
        let mut wrapped = vec![Operation::new("Q", vec![])];
        wrapped.extend(operations);
        // Leading newline keeps the operator apart from an unterminated
        // template stream when the streams are concatenated.
        let mut overlay = b"\n".to_vec();
        overlay.extend(
            Content {
                operations: wrapped,
            }
            .encode()
            .map_err(render_err)?,
        );

        let save_id = self.doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        let overlay_id = self.doc.add_object(Stream::new(dictionary! {}, overlay));

        let page = self
            .doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?;
        let mut contents = vec![Object::Reference(save_id)];
        match page.get(b"Contents") {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            Ok(existing @ Object::Reference(_)) => contents.push(existing.clone()),
            _ => {}
        }
        contents.push(Object::Reference(overlay_id));
        page.set("Contents", contents);
        Ok(())
    }
}

fn embed_font(doc: &mut Document, font: &[u8], metrics: &FontMetrics) -> ObjectId {
    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.len() as i64 },
        font.to_vec(),
    ));
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => FONT_NAME,
        "Flags" => 32,
        "FontBBox" => metrics.bbox.iter().copied().map(Object::Integer).collect::<Vec<_>>(),
        "ItalicAngle" => 0,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => 80,
        "MissingWidth" => metrics.missing_width,
        "FontFile2" => file_id,
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => FONT_NAME,
        "Encoding" => "WinAnsiEncoding",
        "FirstChar" => i64::from(FIRST_CHAR),
        "LastChar" => i64::from(LAST_CHAR),
        "Widths" => metrics.widths.iter().copied().map(Object::Integer).collect::<Vec<_>>(),
        "FontDescriptor" => descriptor_id,
    })
}

fn text_ops(x: f32, y: f32, size: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("Tf", vec![Object::Name(FONT_KEY.as_bytes().to_vec()), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Maps a top-left canvas graphic into the `(x, y, width, height)` box.
fn graphic_ops(x: f32, y: f32, width: f32, height: f32, graphic: &Graphic) -> Vec<Operation> {
    match graphic {
        Graphic::Line {
            canvas_width,
            canvas_height,
            x1,
            y1,
            x2,
            y2,
            stroke_width,
        } => {
            let sx = width / canvas_width;
            let sy = height / canvas_height;
            let to_page = |cx: f32, cy: f32| (x + cx * sx, y + height - cy * sy);
            let (ax, ay) = to_page(*x1, *y1);
            let (bx, by) = to_page(*x2, *y2);
            vec![
                Operation::new("q", vec![]),
                Operation::new("RG", vec![0.into(), 0.into(), 0.into()]),
                Operation::new("w", vec![(stroke_width * sx.min(sy)).into()]),
                Operation::new("J", vec![1.into()]),
                Operation::new("m", vec![ax.into(), ay.into()]),
                Operation::new("l", vec![bx.into(), by.into()]),
                Operation::new("S", vec![]),
                Operation::new("Q", vec![]),
            ]
        }
    }
}

impl ReportDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn apply(&mut self, instruction: &DrawInstruction) -> Result<()> {
        match instruction {
            DrawInstruction::DrawText {
                page,
                x,
                y,
                size,
                text,
            } => self.ops(*page)?.extend(text_ops(*x, *y, *size, text)),
            DrawInstruction::DrawImage {
                page,
                x,
                y,
                width,
                height,
                image,
            } => self
                .ops(*page)?
                .extend(graphic_ops(*x, *y, *width, *height, image)),
            DrawInstruction::AddPage { width, height } => self.add_page(*width, *height)?,
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<u8>> {
        let operations = std::mem::take(&mut self.operations);
        for (page, ops) in operations {
            let page_id = self.pages[page];
            self.install_font(page_id)?;
            self.append_content(page_id, ops)?;
        }

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| TemperamentError::Render(format!("cannot write pdf: {}", e)))?;
        Ok(bytes)
    }
}
