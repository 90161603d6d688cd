pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::keywords::handlers as keywords;
use crate::pipeline::handlers as pipeline;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Companies
        .route(
            "/api/v1/companies",
            post(documents::handle_create_company).get(documents::handle_list_companies),
        )
        // Brief documents
        .route(
            "/api/v1/companies/:company_id/documents",
            post(documents::handle_upload_documents).get(documents::handle_list_documents),
        )
        // Keyword ranking
        .route(
            "/api/v1/companies/:company_id/keywords/rank",
            post(keywords::handle_rank_keywords),
        )
        // Generation pipeline
        .route(
            "/api/v1/companies/:company_id/generate/core",
            post(pipeline::handle_generate_core),
        )
        .route(
            "/api/v1/companies/:company_id/generate/website",
            post(pipeline::handle_generate_website),
        )
        .route(
            "/api/v1/companies/:company_id/generate/pillar",
            post(pipeline::handle_generate_pillar),
        )
        // Artifacts
        .route(
            "/api/v1/companies/:company_id/artifacts",
            get(pipeline::handle_list_artifacts),
        )
        .route(
            "/api/v1/companies/:company_id/artifacts/:kind",
            get(pipeline::handle_get_artifact).put(documents::handle_overwrite_artifact),
        )
        // Stage download bundles
        .route(
            "/api/v1/companies/:company_id/bundles/:stage",
            get(documents::handle_download_bundle),
        )
        .with_state(state)
}
