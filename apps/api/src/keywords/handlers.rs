//! Keyword ranking endpoint: accepts researched keyword CSVs, runs the
//! ranking pass, and stores the shortlist as the `top_keywords` artifact.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::handlers::get_company;
use crate::errors::AppError;
use crate::keywords::ingest::parse_batch;
use crate::keywords::ranker::{rank_keywords, KeywordBatch};
use crate::pipeline::artifacts::ArtifactKind;
use crate::pipeline::generator::save_artifact_raw;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub source: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct RankKeywordsResponse {
    pub keywords: Vec<String>,
    pub total_rows: usize,
    pub batches: Vec<BatchSummary>,
    /// True when every row was filtered out and the shortlist is empty.
    pub empty_after_filter: bool,
}

/// POST /api/v1/companies/:company_id/keywords/rank
///
/// Multipart upload of one or more research-tool CSV exports. Each file
/// becomes its own source batch; the merged shortlist is written to
/// `top_keywords.csv` for the website steps to consume.
pub async fn handle_rank_keywords(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<RankKeywordsResponse>, AppError> {
    let company = get_company(&state.db, company_id).await?;

    let mut batches: Vec<KeywordBatch> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let source = format!("{}_csv_file_{}", company.name, batches.len() + 1);
        batches.push(parse_batch(&source, &data)?);
    }

    if batches.is_empty() {
        return Err(AppError::Validation("No CSV files in upload".to_string()));
    }

    let total_rows: usize = batches.iter().map(|b| b.rows.len()).sum();
    let keywords = rank_keywords(&batches, &state.ranker);

    let empty_after_filter = keywords.is_empty();
    if empty_after_filter {
        warn!(
            "All {total_rows} keyword rows for company {} were filtered out",
            company.name
        );
    } else {
        info!(
            "Ranked {} keywords from {total_rows} rows across {} batches for company {}",
            keywords.len(),
            batches.len(),
            company.name
        );
    }

    save_artifact_raw(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        company_id,
        ArtifactKind::TopKeywords,
        shortlist_csv(&keywords)?,
    )
    .await?;

    Ok(Json(RankKeywordsResponse {
        keywords,
        total_rows,
        batches: batches
            .iter()
            .map(|b| BatchSummary {
                source: b.source.clone(),
                rows: b.rows.len(),
            })
            .collect(),
        empty_after_filter,
    }))
}

/// Serializes the shortlist as a single-column CSV. Keywords can legally
/// contain commas or quotes, so the writer's quoting does the escaping.
fn shortlist_csv(keywords: &[String]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Keyword"])
        .map_err(|e| AppError::Internal(anyhow::anyhow!("write shortlist header: {e}")))?;
    for keyword in keywords {
        writer
            .write_record([keyword.as_str()])
            .map_err(|e| AppError::Internal(anyhow::anyhow!("write shortlist row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("finalize shortlist csv: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlist_round_trips_awkward_keywords() {
        let keywords = vec![
            "garden sheds".to_string(),
            "sheds, bases & kits".to_string(),
            "10\" timber \"premium\" posts".to_string(),
            "multi\nline".to_string(),
        ];
        let bytes = shortlist_csv(&keywords).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(vec!["Keyword"]));
        let parsed: Vec<String> = reader
            .records()
            .map(|r| r.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(parsed, keywords);
    }

    #[test]
    fn test_empty_shortlist_is_header_only() {
        let bytes = shortlist_csv(&[]).unwrap();
        assert_eq!(bytes, b"Keyword\n");
    }
}
