//! Pipeline orchestration — runs the generation steps in dependency order.
//!
//! Flow: load briefs → fill prompt → generate → polish (prose artifacts
//! only) → persist. Each artifact is stored as soon as its step completes so
//! a later failure never loses earlier outputs, and every later step re-reads
//! its inputs from the store — picking up any user edits made in between.

use aws_sdk_s3::Client as S3Client;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::documents::briefs::{self, BriefTexts};
use crate::documents::store;
use crate::errors::AppError;
use crate::llm_client::prompts::{
    BRIEF_GROUNDING_INSTRUCTION, EDITOR_PROMPT_TEMPLATE, EDITOR_SYSTEM,
};
use crate::llm_client::TextGenerator;
use crate::models::company::CompanyRow;
use crate::pipeline::artifacts::ArtifactKind;
use crate::pipeline::prompts::*;
use crate::state::AppState;

/// Result of one pipeline run: the artifacts written, in execution order.
#[derive(Debug, Serialize)]
pub struct GenerationRunResponse {
    pub company_id: Uuid,
    pub artifacts: Vec<ArtifactKind>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core generation: persona → mission → SEO summary → seed keywords → voice
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_core_generation(
    state: &AppState,
    company: &CompanyRow,
) -> Result<GenerationRunResponse, AppError> {
    let briefs = briefs::load_brief_texts(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        company.id,
    )
    .await?;
    info!("Running core generation for company {}", company.name);

    let generator = state.generator.as_ref();
    let mut written = Vec::new();

    let persona_prompt = fill(
        BUYER_PERSONA_PROMPT_TEMPLATE,
        &with_briefs(&briefs, &[("company_name", &company.name)]),
    );
    let buyer_persona = polished(
        generator,
        BUYER_PERSONA_SYSTEM,
        &persona_prompt,
        ArtifactKind::BuyerPersona,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::BuyerPersona, &buyer_persona).await?;
    written.push(ArtifactKind::BuyerPersona);

    let mission_prompt = fill(
        MISSION_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("buyer_persona", &buyer_persona),
            ],
        ),
    );
    let mission_values = polished(
        generator,
        MISSION_SYSTEM,
        &mission_prompt,
        ArtifactKind::MissionValues,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::MissionValues, &mission_values).await?;
    written.push(ArtifactKind::MissionValues);

    let summary_prompt = fill(
        SEO_SUMMARY_PROMPT_TEMPLATE,
        &with_briefs(&briefs, &[("buyer_persona", &buyer_persona)]),
    );
    let seo_summary = polished(
        generator,
        SEO_SUMMARY_SYSTEM,
        &summary_prompt,
        ArtifactKind::SeoSummary,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::SeoSummary, &seo_summary).await?;
    written.push(ArtifactKind::SeoSummary);

    // Seed keyword list is machine-consumed — no polish pass.
    let keywords_prompt = fill(
        SEO_KEYWORDS_PROMPT_TEMPLATE,
        &[("seo_summary", seo_summary.as_str())],
    );
    let seo_keywords = generator
        .generate(SEO_KEYWORDS_SYSTEM, &keywords_prompt)
        .await?;
    save_artifact(state, company.id, ArtifactKind::SeoKeywords, &seo_keywords).await?;
    written.push(ArtifactKind::SeoKeywords);

    let voice_prompt = fill(
        BRAND_VOICE_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("buyer_persona", &buyer_persona),
                ("mission_values", &mission_values),
            ],
        ),
    );
    let brand_voice = polished(
        generator,
        BRAND_VOICE_SYSTEM,
        &voice_prompt,
        ArtifactKind::BrandVoice,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::BrandVoice, &brand_voice).await?;
    written.push(ArtifactKind::BrandVoice);

    info!(
        "Core generation complete for {}: {} artifacts",
        company.name,
        written.len()
    );
    Ok(GenerationRunResponse {
        company_id: company.id,
        artifacts: written,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Website generation: clusters → structure → home page → about page
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_website_generation(
    state: &AppState,
    company: &CompanyRow,
) -> Result<GenerationRunResponse, AppError> {
    let briefs = briefs::load_brief_texts(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        company.id,
    )
    .await?;
    let buyer_persona = load_artifact_text(state, company.id, ArtifactKind::BuyerPersona).await?;
    let top_keywords = load_artifact_text(state, company.id, ArtifactKind::TopKeywords).await?;
    info!("Running website generation for company {}", company.name);

    let generator = state.generator.as_ref();
    let mut written = Vec::new();

    let cluster_prompt = fill(
        TOPIC_CLUSTER_PROMPT_TEMPLATE,
        &[
            ("company_name", company.name.as_str()),
            ("product_list", briefs.product_list.as_str()),
            ("buyer_persona", buyer_persona.as_str()),
            ("top_keywords", top_keywords.as_str()),
        ],
    );
    let topic_cluster = generator
        .generate(TOPIC_CLUSTER_SYSTEM, &cluster_prompt)
        .await?;
    save_artifact(state, company.id, ArtifactKind::TopicCluster, &topic_cluster).await?;
    written.push(ArtifactKind::TopicCluster);

    let extract_prompt = fill(
        EXTRACT_KEYWORDS_PROMPT_TEMPLATE,
        &[("topic_cluster", topic_cluster.as_str())],
    );
    let cluster_keywords = generator
        .generate(EXTRACT_KEYWORDS_SYSTEM, &extract_prompt)
        .await?;
    save_artifact(
        state,
        company.id,
        ArtifactKind::ClusterKeywords,
        &cluster_keywords,
    )
    .await?;
    written.push(ArtifactKind::ClusterKeywords);

    let structure_prompt = fill(
        WEBSITE_STRUCTURE_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("buyer_persona", &buyer_persona),
                ("topic_cluster", &topic_cluster),
                ("keywords", &cluster_keywords),
            ],
        ),
    );
    let website_structure = generator
        .generate(WEBSITE_STRUCTURE_SYSTEM, &structure_prompt)
        .await?;
    save_artifact(
        state,
        company.id,
        ArtifactKind::WebsiteStructure,
        &website_structure,
    )
    .await?;
    written.push(ArtifactKind::WebsiteStructure);

    let brand_voice = load_artifact_text(state, company.id, ArtifactKind::BrandVoice).await?;

    let home_prompt = fill(
        HOME_PAGE_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("brand_voice", &brand_voice),
                ("keywords", &cluster_keywords),
            ],
        ),
    );
    let home_page = polished(generator, HOME_PAGE_SYSTEM, &home_prompt, ArtifactKind::HomePage)
        .await?;
    save_artifact(state, company.id, ArtifactKind::HomePage, &home_page).await?;
    written.push(ArtifactKind::HomePage);

    let about_prompt = fill(
        ABOUT_US_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("brand_voice", &brand_voice),
                ("keywords", &cluster_keywords),
            ],
        ),
    );
    let about_page = polished(
        generator,
        ABOUT_US_SYSTEM,
        &about_prompt,
        ArtifactKind::AboutUsPage,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::AboutUsPage, &about_page).await?;
    written.push(ArtifactKind::AboutUsPage);

    info!(
        "Website generation complete for {}: {} artifacts",
        company.name,
        written.len()
    );
    Ok(GenerationRunResponse {
        company_id: company.id,
        artifacts: written,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Pillar page generation
// ────────────────────────────────────────────────────────────────────────────

/// Generates the long-form pillar page. Source content is either supplied
/// inline or read from the previously uploaded pillar brief PDF.
pub async fn run_pillar_generation(
    state: &AppState,
    company: &CompanyRow,
    inline_content: Option<String>,
) -> Result<GenerationRunResponse, AppError> {
    let pillar_content = match inline_content.filter(|c| !c.trim().is_empty()) {
        Some(content) => content,
        None => briefs::load_pillar_brief(
            &state.db,
            &state.s3,
            &state.config.s3_bucket,
            company.id,
        )
        .await?
        .ok_or_else(|| {
            AppError::Validation(
                "Provide pillar content inline or upload a pillar_brief document first"
                    .to_string(),
            )
        })?,
    };

    let briefs = briefs::load_brief_texts(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        company.id,
    )
    .await?;
    let brand_voice = load_artifact_text(state, company.id, ArtifactKind::BrandVoice).await?;
    let keywords = load_artifact_text(state, company.id, ArtifactKind::ClusterKeywords).await?;
    info!("Running pillar generation for company {}", company.name);

    let pillar_prompt = fill(
        PILLAR_PAGE_PROMPT_TEMPLATE,
        &with_briefs(
            &briefs,
            &[
                ("company_name", &company.name),
                ("pillar_content", &pillar_content),
                ("brand_voice", &brand_voice),
                ("keywords", &keywords),
            ],
        ),
    );
    let pillar_page = polished(
        state.generator.as_ref(),
        PILLAR_PAGE_SYSTEM,
        &pillar_prompt,
        ArtifactKind::PillarPage,
    )
    .await?;
    save_artifact(state, company.id, ArtifactKind::PillarPage, &pillar_page).await?;

    Ok(GenerationRunResponse {
        company_id: company.id,
        artifacts: vec![ArtifactKind::PillarPage],
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Step helpers
// ────────────────────────────────────────────────────────────────────────────

/// Fills a prompt template: replaces each `{name}` placeholder, plus the
/// shared `{grounding_instruction}` fragment.
fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut prompt =
        template.replace("{grounding_instruction}", BRIEF_GROUNDING_INSTRUCTION);
    for (name, value) in pairs {
        prompt = prompt.replace(&format!("{{{name}}}"), value);
    }
    prompt
}

/// Extends step-specific pairs with the five brief texts every prose
/// template can reference.
fn with_briefs<'a>(
    briefs: &'a BriefTexts,
    extra: &[(&'a str, &'a str)],
) -> Vec<(&'a str, &'a str)> {
    let mut pairs = vec![
        ("product_list", briefs.product_list.as_str()),
        ("usp", briefs.usp.as_str()),
        ("key_stats", briefs.key_stats.as_str()),
        ("about_us", briefs.about_us.as_str()),
        ("colour_scheme", briefs.colour_scheme.as_str()),
    ];
    pairs.extend_from_slice(extra);
    pairs
}

/// Generates a draft then runs the editor polish pass over it. The polished
/// text is what gets persisted — the draft is discarded.
async fn polished(
    generator: &dyn TextGenerator,
    system: &str,
    prompt: &str,
    kind: ArtifactKind,
) -> Result<String, AppError> {
    let draft = generator.generate(system, prompt).await?;
    let polish_prompt = EDITOR_PROMPT_TEMPLATE
        .replace("{file_name}", &kind.file_name())
        .replace("{file_content}", &draft);
    generator.generate(EDITOR_SYSTEM, &polish_prompt).await
}

/// Persists a generated artifact: object store first, then the index row.
/// Regeneration clears any `edited` flag — the new text is authoritative.
pub async fn save_artifact(
    state: &AppState,
    company_id: Uuid,
    kind: ArtifactKind,
    text: &str,
) -> Result<(), AppError> {
    save_artifact_raw(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        company_id,
        kind,
        text.as_bytes().to_vec(),
    )
    .await
}

pub async fn save_artifact_raw(
    pool: &PgPool,
    s3: &S3Client,
    bucket: &str,
    company_id: Uuid,
    kind: ArtifactKind,
    body: Vec<u8>,
) -> Result<(), AppError> {
    let s3_key = kind.s3_key(company_id);
    let content_type = if matches!(kind, ArtifactKind::TopKeywords) {
        "text/csv"
    } else {
        "text/plain"
    };
    store::put_object(s3, bucket, &s3_key, body.into(), content_type).await?;

    sqlx::query(
        r#"
        INSERT INTO artifacts (id, company_id, kind, s3_key, edited)
        VALUES ($1, $2, $3, $4, false)
        ON CONFLICT (company_id, kind)
        DO UPDATE SET edited = false, updated_at = now()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(kind.as_str())
    .bind(&s3_key)
    .execute(pool)
    .await?;

    info!("Saved artifact '{kind}' for company {company_id}");
    Ok(())
}

/// Reads a prerequisite artifact's text, failing with a validation error
/// that names the missing step.
pub async fn load_artifact_text(
    state: &AppState,
    company_id: Uuid,
    kind: ArtifactKind,
) -> Result<String, AppError> {
    match store::get_text(&state.s3, &state.config.s3_bucket, &kind.s3_key(company_id)).await {
        Ok(text) => Ok(text),
        Err(AppError::NotFound(_)) => Err(AppError::Validation(format!(
            "Artifact '{kind}' has not been generated yet — run its pipeline step first"
        ))),
        Err(e) => Err(e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every (system, prompt) pair and replies with a numbered tag.
    struct CannedGenerator {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl CannedGenerator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, system: &str, prompt: &str) -> Result<String, AppError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((system.to_string(), prompt.to_string()));
            Ok(format!("output-{}", calls.len()))
        }
    }

    #[test]
    fn test_fill_replaces_placeholders_and_grounding() {
        let prompt = fill(
            BUYER_PERSONA_PROMPT_TEMPLATE,
            &[
                ("company_name", "Acme Sheds"),
                ("product_list", "sheds"),
                ("usp", "fast delivery"),
                ("key_stats", "est. 1999"),
                ("about_us", "family firm"),
            ],
        );
        assert!(prompt.contains("Acme Sheds"));
        assert!(prompt.contains("fast delivery"));
        assert!(!prompt.contains("{company_name}"));
        assert!(!prompt.contains("{grounding_instruction}"));
        assert!(prompt.contains("Do NOT invent products"));
    }

    #[test]
    fn test_with_briefs_carries_all_five_texts() {
        let briefs = BriefTexts {
            product_list: "p".to_string(),
            usp: "u".to_string(),
            key_stats: "k".to_string(),
            about_us: "a".to_string(),
            colour_scheme: "c".to_string(),
        };
        let pairs = with_briefs(&briefs, &[("company_name", "Acme")]);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&("colour_scheme", "c")));
    }

    #[tokio::test]
    async fn test_polished_runs_draft_then_editor_pass() {
        let generator = CannedGenerator::new();
        let result = polished(
            &generator,
            BUYER_PERSONA_SYSTEM,
            "draft prompt",
            ArtifactKind::BuyerPersona,
        )
        .await
        .unwrap();

        // Second call's output wins — the polish replaces the draft
        assert_eq!(result, "output-2");

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, BUYER_PERSONA_SYSTEM);
        assert_eq!(calls[1].0, EDITOR_SYSTEM);
        assert!(
            calls[1].1.contains("output-1"),
            "editor pass must receive the draft"
        );
        assert!(calls[1].1.contains("buyer_persona.txt"));
    }

    #[tokio::test]
    async fn test_generator_error_propagates_from_polish() {
        struct FailingGenerator;

        #[async_trait]
        impl TextGenerator for FailingGenerator {
            async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, AppError> {
                Err(AppError::Llm("backend unavailable".to_string()))
            }
        }

        let err = polished(
            &FailingGenerator,
            HOME_PAGE_SYSTEM,
            "prompt",
            ArtifactKind::HomePage,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
