//! POST /salvar-resultado: validate, classify and store one test.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Extension, Json};
use serde::Serialize;
use temperament_core::{ReportService, ResultId, SubmissionRequest, TemperamentError};

use crate::error::AppError;

pub const SAVED_MESSAGE: &str = "Resultado salvo com sucesso!";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub id: ResultId,
}

pub async fn submit_result(
    Extension(service): Extension<Arc<ReportService>>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let Json(request) =
        payload.map_err(|e| TemperamentError::InvalidInput(e.body_text()))?;
    let today = chrono::Local::now().date_naive();
    let id = service.submit(&request, today).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: SAVED_MESSAGE,
            id,
        }),
    ))
}
