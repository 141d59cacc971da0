// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{criteria::CriteriaStore, report::GradingResponse},
    services::{grading::grade_upload, scorer::Scorer},
};

/// Query string accepted by the upload endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    /// Include per-record verdicts (and model feedback) in the response.
    #[serde(default)]
    pub details: bool,
}

/// Grades an uploaded answer sheet.
///
/// * Expects `multipart/form-data` with a `file` field (.csv, .xlsx or .xls).
/// * Responds with per-question performance and per-student average scores.
/// * Malformed uploads are rejected with 400 and nothing is graded.
pub async fn upload_quiz(
    State(criteria): State<Arc<CriteriaStore>>,
    State(scorer): State<Arc<dyn Scorer>>,
    Query(params): Query<UploadParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload: {}", e);
        AppError::BadRequest("Invalid content type".to_string())
    })?;

    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no file name".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("Missing file upload".to_string()))?;

    let outcome = grade_upload(&bytes, &filename, &criteria, scorer.as_ref())
        .await
        .map_err(|e| {
            tracing::warn!("Rejected upload '{}': {}", filename, e);
            AppError::from(e)
        })?;

    Ok(Json(GradingResponse {
        report: outcome.report,
        results: params.details.then_some(outcome.scored),
    }))
}

/// Lists the grading criteria currently in effect.
pub async fn list_criteria(State(criteria): State<Arc<CriteriaStore>>) -> impl IntoResponse {
    Json(criteria.as_ref().clone())
}
