use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::keywords::ranker::RankerConfig;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable generation backend. Default: LlmClient. Tests swap in a stub.
    pub generator: Arc<dyn TextGenerator>,
    /// Keyword ranker thresholds — quota, cap, filter gates, epsilon.
    pub ranker: RankerConfig,
}
