//! ReportService: submission and report generation over the port traits.
//!
//! Holds `Arc<dyn Port>` references so the same pipeline runs against
//! Postgres in the server and against in-memory doubles in tests.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, instrument};

use crate::compose::{compose, ComposedReport};
use crate::error::{Result, TemperamentError};
use crate::layout::ReportLayout;
use crate::ports::{DocumentBackend, ReferenceStore, ResultStore, TemplateStore};
use crate::submission::SubmissionRequest;
use crate::types::{Language, ReportRecord, ResultId};

pub struct ReportService {
    pub results: Arc<dyn ResultStore>,
    pub references: Arc<dyn ReferenceStore>,
    pub templates: Arc<dyn TemplateStore>,
    pub backend: Arc<dyn DocumentBackend>,
    pub layout: Arc<ReportLayout>,
    pub font_path: PathBuf,
}

impl ReportService {
    pub fn new(
        results: Arc<dyn ResultStore>,
        references: Arc<dyn ReferenceStore>,
        templates: Arc<dyn TemplateStore>,
        backend: Arc<dyn DocumentBackend>,
        font_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            results,
            references,
            templates,
            backend,
            layout: Arc::new(ReportLayout::default()),
            font_path: font_path.into(),
        }
    }

    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    /// Validate, classify and persist one submission.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: &SubmissionRequest, today: NaiveDate) -> Result<ResultId> {
        let record = request.validate(today)?;
        let id = self.results.save_result(&record).await.map_err(|e| {
            error!(error = %e, "failed to save result");
            e
        })?;
        info!(
            id,
            temperament = %record.classification.temperament,
            subtemperament = %record.classification.subtemperament,
            "result saved"
        );
        Ok(id)
    }

    async fn record(&self, id: ResultId) -> Result<ReportRecord> {
        self.results
            .load_result(id)
            .await?
            .ok_or_else(|| TemperamentError::NotFound(format!("result {}", id)))
    }

    /// Draw instructions for a report, without touching the template.
    /// `template_pages` defaults to the layout's required page count.
    pub async fn draw_plan(
        &self,
        id: ResultId,
        lang: Language,
        template_pages: Option<usize>,
    ) -> Result<ComposedReport> {
        let record = self.record(id).await?;
        let reference = self
            .references
            .reference_text(&record.classification, lang)
            .await?;
        compose(
            &record,
            &reference,
            &self.layout,
            lang,
            template_pages.unwrap_or(self.layout.required_pages),
        )
    }

    /// Render the finished report document.
    ///
    /// Template and font are checked before the record so a broken
    /// deployment reports a configuration error rather than a missing row.
    #[instrument(skip(self))]
    pub async fn render_report(&self, id: ResultId, lang: Language) -> Result<Vec<u8>> {
        let template_name = lang.template_name();
        let template = self
            .templates
            .load_template(&template_name)
            .await?
            .ok_or_else(|| {
                error!(template = %template_name, "report template missing");
                TemperamentError::Configuration(format!("template {} not found", template_name))
            })?;
        debug!(template = %template_name, bytes = template.len(), "template loaded");

        let font = tokio::fs::read(&self.font_path).await.map_err(|e| {
            error!(path = %self.font_path.display(), error = %e, "font missing");
            TemperamentError::Configuration(format!(
                "font {} unavailable: {}",
                self.font_path.display(),
                e
            ))
        })?;

        let mut document = self.backend.open(&template, &font)?;
        let plan = self.draw_plan(id, lang, Some(document.page_count())).await?;

        for instruction in &plan.instructions {
            document.apply(instruction).map_err(|e| {
                error!(id, error = %e, "draw instruction failed");
                e
            })?;
        }
        let bytes = document.finish()?;
        info!(
            id,
            lang = lang.as_str(),
            pages = plan.page_count,
            appended = plan.appended_pages,
            bytes = bytes.len(),
            "report rendered"
        );
        Ok(bytes)
    }
}
