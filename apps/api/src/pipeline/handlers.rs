//! Axum route handlers for the generation pipeline and artifact reads.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::documents::handlers::get_company;
use crate::errors::AppError;
use crate::models::artifact::ArtifactRow;
use crate::pipeline::artifacts::ArtifactKind;
use crate::pipeline::generator::{
    self, load_artifact_text, GenerationRunResponse,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePillarRequest {
    /// Inline pillar source content. Falls back to the uploaded
    /// pillar_brief document when absent.
    pub content: Option<String>,
}

/// POST /api/v1/companies/:company_id/generate/core
pub async fn handle_generate_core(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<GenerationRunResponse>, AppError> {
    let company = get_company(&state.db, company_id).await?;
    let response = generator::run_core_generation(&state, &company).await?;
    Ok(Json(response))
}

/// POST /api/v1/companies/:company_id/generate/website
pub async fn handle_generate_website(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<GenerationRunResponse>, AppError> {
    let company = get_company(&state.db, company_id).await?;
    let response = generator::run_website_generation(&state, &company).await?;
    Ok(Json(response))
}

/// POST /api/v1/companies/:company_id/generate/pillar
pub async fn handle_generate_pillar(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(request): Json<GeneratePillarRequest>,
) -> Result<Json<GenerationRunResponse>, AppError> {
    let company = get_company(&state.db, company_id).await?;
    let response =
        generator::run_pillar_generation(&state, &company, request.content).await?;
    Ok(Json(response))
}

/// GET /api/v1/companies/:company_id/artifacts
pub async fn handle_list_artifacts(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<ArtifactRow>>, AppError> {
    get_company(&state.db, company_id).await?;
    let rows = sqlx::query_as::<_, ArtifactRow>(
        "SELECT * FROM artifacts WHERE company_id = $1 ORDER BY created_at",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/companies/:company_id/artifacts/:kind
///
/// Returns the artifact's current text, edits included.
pub async fn handle_get_artifact(
    State(state): State<AppState>,
    Path((company_id, kind)): Path<(Uuid, String)>,
) -> Result<String, AppError> {
    get_company(&state.db, company_id).await?;
    let kind: ArtifactKind = kind.parse().map_err(AppError::Validation)?;
    load_artifact_text(&state, company_id, kind).await
}
