//! Company brief documents — the five required workshop PDFs plus the
//! optional pillar brief, and the loader that turns them into prompt inputs.

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;
use uuid::Uuid;

use crate::documents::{pdf, store};
use crate::errors::AppError;
use crate::models::document::DocumentRow;

/// Briefs that must all be uploaded before generation can run.
pub const REQUIRED_BRIEFS: &[&str] = &[
    "product_list",
    "usp",
    "key_stats",
    "about_us",
    "colour_scheme",
];

/// Optional long-form brief consumed only by the pillar page step.
pub const PILLAR_BRIEF: &str = "pillar_brief";

pub fn is_known_kind(kind: &str) -> bool {
    kind == PILLAR_BRIEF || REQUIRED_BRIEFS.contains(&kind)
}

pub fn document_s3_key(company_id: Uuid, kind: &str) -> String {
    format!("uploads/{company_id}/{kind}.pdf")
}

/// Extracted text of the five required briefs.
#[derive(Debug, Clone)]
pub struct BriefTexts {
    pub product_list: String,
    pub usp: String,
    pub key_stats: String,
    pub about_us: String,
    pub colour_scheme: String,
}

pub async fn list_documents(pool: &PgPool, company_id: Uuid) -> Result<Vec<DocumentRow>, AppError> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT * FROM company_documents WHERE company_id = $1 ORDER BY kind",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Loads and extracts all five required briefs. Fails with a validation
/// error naming the first missing brief so the caller knows what to upload.
pub async fn load_brief_texts(
    pool: &PgPool,
    s3: &S3Client,
    bucket: &str,
    company_id: Uuid,
) -> Result<BriefTexts, AppError> {
    let documents = list_documents(pool, company_id).await?;

    let mut texts = std::collections::HashMap::new();
    for kind in REQUIRED_BRIEFS {
        let doc = documents
            .iter()
            .find(|d| d.kind == *kind)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Required brief '{kind}' has not been uploaded yet"
                ))
            })?;
        let bytes = store::get_object(s3, bucket, &doc.s3_key)
            .await?
            .ok_or_else(|| AppError::S3(format!("stored brief {} is missing", doc.s3_key)))?;
        texts.insert(*kind, pdf::extract_text(&bytes)?);
    }

    let mut take = |kind: &str| texts.remove(kind).unwrap_or_default();
    Ok(BriefTexts {
        product_list: take("product_list"),
        usp: take("usp"),
        key_stats: take("key_stats"),
        about_us: take("about_us"),
        colour_scheme: take("colour_scheme"),
    })
}

/// Loads the optional pillar brief, if one was uploaded.
pub async fn load_pillar_brief(
    pool: &PgPool,
    s3: &S3Client,
    bucket: &str,
    company_id: Uuid,
) -> Result<Option<String>, AppError> {
    let doc = sqlx::query_as::<_, DocumentRow>(
        "SELECT * FROM company_documents WHERE company_id = $1 AND kind = $2",
    )
    .bind(company_id)
    .bind(PILLAR_BRIEF)
    .fetch_optional(pool)
    .await?;

    let Some(doc) = doc else {
        return Ok(None);
    };
    let bytes = store::get_object(s3, bucket, &doc.s3_key)
        .await?
        .ok_or_else(|| AppError::S3(format!("stored brief {} is missing", doc.s3_key)))?;
    Ok(Some(pdf::extract_text(&bytes)?))
}
