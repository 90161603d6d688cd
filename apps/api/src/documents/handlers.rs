//! Axum route handlers for companies, brief uploads, stage bundles, and
//! the download-edit-overwrite loop on generated artifacts.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::documents::archive::build_zip;
use crate::documents::{briefs, store};
use crate::errors::AppError;
use crate::models::company::CompanyRow;
use crate::models::document::DocumentRow;
use crate::pipeline::artifacts::{ArtifactKind, Stage};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentsResponse {
    pub uploaded: Vec<String>,
    /// Required briefs still absent after this upload.
    pub missing: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentRow>,
    pub missing: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Companies
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(request): Json<CreateCompanyRequest>,
) -> Result<Json<CompanyRow>, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Company name cannot be empty".to_string()));
    }

    let company = sqlx::query_as::<_, CompanyRow>(
        "INSERT INTO companies (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    info!("Created company {} ({})", company.name, company.id);
    Ok(Json(company))
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    let companies =
        sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies ORDER BY created_at")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(companies))
}

/// Loads a company row or fails with 404. Shared by all company-scoped handlers.
pub async fn get_company(pool: &PgPool, company_id: Uuid) -> Result<CompanyRow, AppError> {
    sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE id = $1")
        .bind(company_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Brief documents
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/companies/:company_id/documents
///
/// Multipart upload. Each part's field name is the brief kind
/// (product_list, usp, key_stats, about_us, colour_scheme, pillar_brief).
/// Re-uploading a kind replaces the stored document.
pub async fn handle_upload_documents(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadDocumentsResponse>, AppError> {
    get_company(&state.db, company_id).await?;

    let mut uploaded = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        let kind = field
            .name()
            .ok_or_else(|| AppError::Validation("Multipart field missing a name".to_string()))?
            .to_string();
        if !briefs::is_known_kind(&kind) {
            return Err(AppError::Validation(format!("Unknown brief kind '{kind}'")));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload '{kind}': {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation(format!("Upload '{kind}' is empty")));
        }

        let s3_key = briefs::document_s3_key(company_id, &kind);
        store::put_object(&state.s3, &state.config.s3_bucket, &s3_key, data, "application/pdf")
            .await?;

        sqlx::query(
            r#"
            INSERT INTO company_documents (id, company_id, kind, s3_key)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (company_id, kind)
            DO UPDATE SET s3_key = EXCLUDED.s3_key, uploaded_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&kind)
        .bind(&s3_key)
        .execute(&state.db)
        .await?;

        info!("Stored brief '{kind}' for company {company_id}");
        uploaded.push(kind);
    }

    if uploaded.is_empty() {
        return Err(AppError::Validation("No documents in upload".to_string()));
    }

    let documents = briefs::list_documents(&state.db, company_id).await?;
    Ok(Json(UploadDocumentsResponse {
        uploaded,
        missing: missing_required(&documents),
    }))
}

/// GET /api/v1/companies/:company_id/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<DocumentListResponse>, AppError> {
    get_company(&state.db, company_id).await?;
    let documents = briefs::list_documents(&state.db, company_id).await?;
    let missing = missing_required(&documents);
    Ok(Json(DocumentListResponse { documents, missing }))
}

fn missing_required(documents: &[DocumentRow]) -> Vec<String> {
    briefs::REQUIRED_BRIEFS
        .iter()
        .filter(|kind| !documents.iter().any(|d| d.kind == **kind))
        .map(|kind| kind.to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Stage bundles
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/companies/:company_id/bundles/:stage
///
/// Streams a zip of the stage's stored files — the uploaded briefs for
/// `uploads`, otherwise whichever of the stage's artifacts exist so far.
pub async fn handle_download_bundle(
    State(state): State<AppState>,
    Path((company_id, stage)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let company = get_company(&state.db, company_id).await?;
    let stage: Stage = stage.parse().map_err(AppError::Validation)?;

    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    match stage {
        Stage::Uploads => {
            for doc in briefs::list_documents(&state.db, company_id).await? {
                if let Some(bytes) =
                    store::get_object(&state.s3, &state.config.s3_bucket, &doc.s3_key).await?
                {
                    entries.push((format!("{}.pdf", doc.kind), bytes.to_vec()));
                }
            }
        }
        _ => {
            for kind in stage.artifacts() {
                let key = kind.s3_key(company_id);
                if let Some(bytes) =
                    store::get_object(&state.s3, &state.config.s3_bucket, &key).await?
                {
                    entries.push((kind.file_name(), bytes.to_vec()));
                }
            }
        }
    }

    if entries.is_empty() {
        return Err(AppError::NotFound(format!(
            "No files stored yet for stage '{stage:?}'"
        )));
    }

    let zip_bytes = build_zip(&entries)?;
    let file_name = format!("{}_{}.zip", company.name.replace(' ', "_"), stage_slug(stage));

    Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from(zip_bytes))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("build bundle response: {e}")))
}

fn stage_slug(stage: Stage) -> &'static str {
    match stage {
        Stage::Uploads => "uploads",
        Stage::Generation => "generation",
        Stage::Keywords => "keywords",
        Stage::Website => "website",
        Stage::Pillar => "pillar",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Artifact overwrite
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/companies/:company_id/artifacts/:kind
///
/// Replaces a generated artifact with a user-edited version. The edited copy
/// becomes the input to any later pipeline step that reads this artifact.
pub async fn handle_overwrite_artifact(
    State(state): State<AppState>,
    Path((company_id, kind)): Path<(Uuid, String)>,
    body: bytes::Bytes,
) -> Result<StatusCode, AppError> {
    get_company(&state.db, company_id).await?;
    let kind: ArtifactKind = kind.parse().map_err(AppError::Validation)?;

    if body.is_empty() {
        return Err(AppError::Validation("Replacement content is empty".to_string()));
    }

    let s3_key = kind.s3_key(company_id);
    store::put_object(&state.s3, &state.config.s3_bucket, &s3_key, body, "text/plain").await?;

    sqlx::query(
        r#"
        INSERT INTO artifacts (id, company_id, kind, s3_key, edited)
        VALUES ($1, $2, $3, $4, true)
        ON CONFLICT (company_id, kind)
        DO UPDATE SET edited = true, updated_at = now()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(kind.as_str())
    .bind(&s3_key)
    .execute(&state.db)
    .await?;

    info!("Artifact '{kind}' overwritten for company {company_id}");
    Ok(StatusCode::NO_CONTENT)
}
