//! Port traits: the seams between the report pipeline and its storage and
//! document backends.
//!
//! Postgres implementations live in `temperament_postgres`, the PDF backend
//! in `temperament_server`, and in-memory doubles in [`crate::memory`].

use async_trait::async_trait;

use crate::draw::DrawInstruction;
use crate::error::Result;
use crate::types::{Classification, Language, NewReportRecord, ReferenceText, ReportRecord, ResultId};

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist a validated submission and return its new id.
    async fn save_result(&self, record: &NewReportRecord) -> Result<ResultId>;

    async fn load_result(&self, id: ResultId) -> Result<Option<ReportRecord>>;
}

#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Text for one classification. Missing rows come back as `None` or an
    /// empty list, never as an error.
    async fn reference_text(
        &self,
        classification: &Classification,
        lang: Language,
    ) -> Result<ReferenceText>;
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load_template(&self, name: &str) -> Result<Option<Vec<u8>>>;

    async fn save_template(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Opens report templates for drawing.
pub trait DocumentBackend: Send + Sync {
    /// Fails with `Configuration` when the template or font cannot be used.
    fn open(&self, template: &[u8], font: &[u8]) -> Result<Box<dyn ReportDocument>>;
}

/// One template being filled in.
pub trait ReportDocument: Send {
    fn page_count(&self) -> usize;

    fn apply(&mut self, instruction: &DrawInstruction) -> Result<()>;

    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}
