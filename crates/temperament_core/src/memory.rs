//! In-memory port implementations for tests and local demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::draw::DrawInstruction;
use crate::error::{Result, TemperamentError};
use crate::ports::{DocumentBackend, ReferenceStore, ReportDocument, ResultStore, TemplateStore};
use crate::types::{
    Classification, Language, NewReportRecord, ReferenceText, ReportRecord, ResultId,
    SubTemperament, Temperament, TemperamentText,
};

// ── Results ───────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryResultStore {
    rows: RwLock<Vec<ReportRecord>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save_result(&self, record: &NewReportRecord) -> Result<ResultId> {
        let mut rows = self.rows.write().await;
        let id = rows.len() as ResultId + 1;
        rows.push(ReportRecord::from_new(id, record.clone(), Utc::now()));
        Ok(id)
    }

    async fn load_result(&self, id: ResultId) -> Result<Option<ReportRecord>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }
}

// ── Reference text ────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryReferenceStore {
    temperaments: RwLock<HashMap<(Temperament, Language), TemperamentText>>,
    subtemperaments: RwLock<HashMap<(SubTemperament, Language), String>>,
    characters: RwLock<HashMap<(Temperament, Language), Vec<String>>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_temperament(&self, t: Temperament, lang: Language, text: TemperamentText) {
        self.temperaments.write().await.insert((t, lang), text);
    }

    pub async fn put_subtemperament(
        &self,
        s: SubTemperament,
        lang: Language,
        description: impl Into<String>,
    ) {
        self.subtemperaments
            .write()
            .await
            .insert((s, lang), description.into());
    }

    pub async fn add_character(&self, t: Temperament, lang: Language, blurb: impl Into<String>) {
        self.characters
            .write()
            .await
            .entry((t, lang))
            .or_default()
            .push(blurb.into());
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn reference_text(
        &self,
        classification: &Classification,
        lang: Language,
    ) -> Result<ReferenceText> {
        let t = classification.temperament;
        let s = classification.subtemperament;
        Ok(ReferenceText {
            temperament: self.temperaments.read().await.get(&(t, lang)).cloned(),
            subtemperament_description: self.subtemperaments.read().await.get(&(s, lang)).cloned(),
            characters: self
                .characters
                .read()
                .await
                .get(&(t, lang))
                .map(|c| c.iter().take(3).cloned().collect())
                .unwrap_or_default(),
        })
    }
}

// ── Templates ─────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn load_template(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.templates.read().await.get(name).cloned())
    }

    async fn save_template(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.templates
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

// ── Recording document ────────────────────────────────────────

/// Document backend that records instructions instead of drawing.
///
/// Every template is treated as `template_pages` pages long. `finish`
/// returns the applied instructions as JSON.
pub struct RecordingBackend {
    template_pages: usize,
    applied: Arc<Mutex<Vec<DrawInstruction>>>,
}

impl RecordingBackend {
    pub fn new(template_pages: usize) -> Self {
        Self {
            template_pages,
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Instructions applied by every document opened so far.
    pub fn applied(&self) -> Vec<DrawInstruction> {
        self.applied
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

impl DocumentBackend for RecordingBackend {
    fn open(&self, template: &[u8], font: &[u8]) -> Result<Box<dyn ReportDocument>> {
        if template.is_empty() {
            return Err(TemperamentError::Configuration("empty template".into()));
        }
        if font.is_empty() {
            return Err(TemperamentError::Configuration("empty font".into()));
        }
        Ok(Box::new(RecordingDocument {
            page_count: self.template_pages,
            local: Vec::new(),
            shared: Arc::clone(&self.applied),
        }))
    }
}

pub struct RecordingDocument {
    page_count: usize,
    local: Vec<DrawInstruction>,
    shared: Arc<Mutex<Vec<DrawInstruction>>>,
}

impl ReportDocument for RecordingDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn apply(&mut self, instruction: &DrawInstruction) -> Result<()> {
        match instruction.page() {
            Some(page) if page >= self.page_count => {
                return Err(TemperamentError::Render(format!(
                    "page {} out of range ({} pages)",
                    page, self.page_count
                )))
            }
            _ => {}
        }
        if let DrawInstruction::AddPage { .. } = instruction {
            self.page_count += 1;
        }
        self.local.push(instruction.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        let RecordingDocument { local, shared, .. } = *self;
        let bytes =
            serde_json::to_vec(&local).map_err(|e| TemperamentError::Render(e.to_string()))?;
        shared
            .lock()
            .map_err(|_| TemperamentError::Render("recording lock poisoned".into()))?
            .extend(local);
        Ok(bytes)
    }
}
