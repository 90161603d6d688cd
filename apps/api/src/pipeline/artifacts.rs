//! Artifact catalogue — every output the pipeline can produce, with its
//! storage naming and the download bundle it belongs to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every pipeline output, in dependency order. Earlier artifacts feed the
/// prompts of later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    BuyerPersona,
    MissionValues,
    SeoSummary,
    SeoKeywords,
    BrandVoice,
    TopKeywords,
    TopicCluster,
    ClusterKeywords,
    WebsiteStructure,
    HomePage,
    AboutUsPage,
    PillarPage,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::BuyerPersona => "buyer_persona",
            ArtifactKind::MissionValues => "mission_values",
            ArtifactKind::SeoSummary => "seo_summary",
            ArtifactKind::SeoKeywords => "seo_keywords",
            ArtifactKind::BrandVoice => "brand_voice",
            ArtifactKind::TopKeywords => "top_keywords",
            ArtifactKind::TopicCluster => "topic_cluster",
            ArtifactKind::ClusterKeywords => "cluster_keywords",
            ArtifactKind::WebsiteStructure => "website_structure",
            ArtifactKind::HomePage => "home_page",
            ArtifactKind::AboutUsPage => "about_us_page",
            ArtifactKind::PillarPage => "pillar_page",
        }
    }

    /// File name used inside download bundles and the object store.
    /// The ranked keyword list is the only CSV; everything else is prose.
    pub fn file_name(&self) -> String {
        match self {
            ArtifactKind::TopKeywords => format!("{}.csv", self.as_str()),
            _ => format!("{}.txt", self.as_str()),
        }
    }

    pub fn s3_key(&self, company_id: Uuid) -> String {
        format!("processed/{company_id}/{}", self.file_name())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer_persona" => Ok(ArtifactKind::BuyerPersona),
            "mission_values" => Ok(ArtifactKind::MissionValues),
            "seo_summary" => Ok(ArtifactKind::SeoSummary),
            "seo_keywords" => Ok(ArtifactKind::SeoKeywords),
            "brand_voice" => Ok(ArtifactKind::BrandVoice),
            "top_keywords" => Ok(ArtifactKind::TopKeywords),
            "topic_cluster" => Ok(ArtifactKind::TopicCluster),
            "cluster_keywords" => Ok(ArtifactKind::ClusterKeywords),
            "website_structure" => Ok(ArtifactKind::WebsiteStructure),
            "home_page" => Ok(ArtifactKind::HomePage),
            "about_us_page" => Ok(ArtifactKind::AboutUsPage),
            "pillar_page" => Ok(ArtifactKind::PillarPage),
            other => Err(format!("unknown artifact kind '{other}'")),
        }
    }
}

/// Download bundle stages, mirroring the pipeline's step groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The raw uploaded briefs — documents, not artifacts.
    Uploads,
    Generation,
    Keywords,
    Website,
    Pillar,
}

impl Stage {
    /// Artifacts bundled for this stage. Empty for `Uploads`, which zips the
    /// brief documents instead.
    pub fn artifacts(&self) -> &'static [ArtifactKind] {
        match self {
            Stage::Uploads => &[],
            Stage::Generation => &[
                ArtifactKind::BuyerPersona,
                ArtifactKind::MissionValues,
                ArtifactKind::SeoSummary,
                ArtifactKind::SeoKeywords,
                ArtifactKind::BrandVoice,
            ],
            Stage::Keywords => &[ArtifactKind::TopKeywords],
            Stage::Website => &[
                ArtifactKind::TopicCluster,
                ArtifactKind::ClusterKeywords,
                ArtifactKind::WebsiteStructure,
                ArtifactKind::HomePage,
                ArtifactKind::AboutUsPage,
            ],
            Stage::Pillar => &[ArtifactKind::PillarPage],
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploads" => Ok(Stage::Uploads),
            "generation" => Ok(Stage::Generation),
            "keywords" => Ok(Stage::Keywords),
            "website" => Ok(Stage::Website),
            "pillar" => Ok(Stage::Pillar),
            other => Err(format!("unknown stage '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            ArtifactKind::BuyerPersona,
            ArtifactKind::TopKeywords,
            ArtifactKind::PillarPage,
        ] {
            assert_eq!(kind.as_str().parse::<ArtifactKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_top_keywords_is_csv_rest_are_text() {
        assert_eq!(ArtifactKind::TopKeywords.file_name(), "top_keywords.csv");
        assert_eq!(ArtifactKind::HomePage.file_name(), "home_page.txt");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("resume".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_stage_bundles_cover_all_generated_artifacts() {
        let bundled: usize = [
            Stage::Generation,
            Stage::Keywords,
            Stage::Website,
            Stage::Pillar,
        ]
        .iter()
        .map(|s| s.artifacts().len())
        .sum();
        assert_eq!(bundled, 12);
    }
}
