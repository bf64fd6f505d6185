//! GET /gerar-pdf/:id: render the report PDF.
//! GET /gerar-pdf/:id/layout: composed draw instructions as JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use temperament_core::{ComposedReport, Language, ReportService, ResultId, TemperamentError};

use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub lang: Option<String>,
}

impl ReportQuery {
    fn language(&self) -> Language {
        self.lang.as_deref().map(Language::parse).unwrap_or_default()
    }
}

fn parse_id(raw: &str) -> Result<ResultId, TemperamentError> {
    raw.trim()
        .parse()
        .map_err(|_| TemperamentError::InvalidInput(format!("invalid result id {:?}", raw)))
}

pub async fn render_pdf(
    Extension(service): Extension<Arc<ReportService>>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let bytes = service.render_report(id, query.language()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=resultado.pdf",
            ),
        ],
        bytes,
    ))
}

pub async fn draw_plan(
    Extension(service): Extension<Arc<ReportService>>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ComposedReport>, AppError> {
    let id = parse_id(&id)?;
    let plan = service.draw_plan(id, query.language(), None).await?;
    Ok(Json(plan))
}
