// All LLM prompt constants for the pipeline steps.
// The cross-cutting editor/grounding fragments live in llm_client::prompts.

/// System prompt for the buyer persona step.
pub const BUYER_PERSONA_SYSTEM: &str = "You are a senior marketing strategist who \
    builds evidence-based buyer personas from company workshop documents. \
    Write in clear, structured prose with headed sections.";

/// Buyer persona prompt template. Replace `{company_name}`, `{product_list}`,
/// `{usp}`, `{key_stats}`, `{about_us}`.
pub const BUYER_PERSONA_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Create a detailed buyer persona for {company_name}.

Cover: demographics, role and seniority, goals, pain points, buying triggers,
objections, preferred channels, and a short day-in-the-life narrative.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}"#;

pub const MISSION_SYSTEM: &str = "You are a brand consultant who distils company \
    documents into a concise mission statement and a set of core values.";

/// Replace `{company_name}`, `{product_list}`, `{usp}`, `{key_stats}`,
/// `{about_us}`, `{buyer_persona}`.
pub const MISSION_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write a mission statement and 4-6 core values for {company_name}, grounded in
the documents below and resonant with the buyer persona.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BUYER PERSONA:
{buyer_persona}"#;

pub const SEO_SUMMARY_SYSTEM: &str = "You are an SEO content strategist. Summarize \
    company material into a briefing an SEO writer can work from.";

/// Replace `{product_list}`, `{usp}`, `{key_stats}`, `{about_us}`, `{buyer_persona}`.
pub const SEO_SUMMARY_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Produce an SEO briefing: what the company sells, who it serves, the search
intent behind each product area, and the themes worth targeting.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BUYER PERSONA:
{buyer_persona}"#;

pub const SEO_KEYWORDS_SYSTEM: &str = "You are an SEO keyword researcher. \
    Return one keyword or phrase per line with no numbering or commentary.";

/// Replace `{seo_summary}`.
pub const SEO_KEYWORDS_PROMPT_TEMPLATE: &str = r#"From the SEO briefing below, list
the seed keywords and phrases the company should research further. One per line.

SEO BRIEFING:
{seo_summary}"#;

pub const BRAND_VOICE_SYSTEM: &str = "You are a brand voice specialist. Define a \
    practical tone-of-voice guide writers can apply immediately.";

/// Replace `{company_name}`, `{product_list}`, `{usp}`, `{key_stats}`,
/// `{about_us}`, `{buyer_persona}`, `{mission_values}`.
pub const BRAND_VOICE_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Define the brand voice for {company_name}: personality traits, tone spectrum,
vocabulary to prefer and avoid, and three before/after example rewrites.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BUYER PERSONA:
{buyer_persona}

MISSION AND VALUES:
{mission_values}"#;

pub const TOPIC_CLUSTER_SYSTEM: &str = "You are a content architect. Group keywords \
    into pillar topics and supporting cluster topics.";

/// Replace `{company_name}`, `{product_list}`, `{buyer_persona}`, `{top_keywords}`.
pub const TOPIC_CLUSTER_PROMPT_TEMPLATE: &str = r#"Build a topic cluster plan for
{company_name}: 3-5 pillar topics, each with supporting cluster topics, mapped to
the ranked keywords below and the persona's search intent.

PRODUCT LIST:
{product_list}

BUYER PERSONA:
{buyer_persona}

RANKED KEYWORDS:
{top_keywords}"#;

pub const EXTRACT_KEYWORDS_SYSTEM: &str = "You are a precise editor. Extract exactly \
    what is asked for with no commentary.";

/// Replace `{topic_cluster}`.
pub const EXTRACT_KEYWORDS_PROMPT_TEMPLATE: &str = r#"From the topic cluster plan
below, extract the final list of target keywords, one per line.

TOPIC CLUSTER PLAN:
{topic_cluster}"#;

pub const WEBSITE_STRUCTURE_SYSTEM: &str = "You are an information architect. \
    Design website structures as an indented page tree with a one-line purpose per page.";

/// Replace `{company_name}`, `{product_list}`, `{usp}`, `{key_stats}`,
/// `{about_us}`, `{buyer_persona}`, `{topic_cluster}`, `{keywords}`.
pub const WEBSITE_STRUCTURE_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Design the website structure for {company_name}: top navigation, page hierarchy,
and which target keywords each page owns.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BUYER PERSONA:
{buyer_persona}

TOPIC CLUSTER PLAN:
{topic_cluster}

TARGET KEYWORDS:
{keywords}"#;

pub const HOME_PAGE_SYSTEM: &str = "You are a conversion copywriter. Write complete, \
    publish-ready web page copy in the company's brand voice.";

/// Replace `{company_name}`, `{product_list}`, `{usp}`, `{key_stats}`,
/// `{about_us}`, `{brand_voice}`, `{keywords}`.
pub const HOME_PAGE_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write the home page copy for {company_name}: hero headline and subheading,
proof points, product overview sections, and a closing call to action. Work the
target keywords in naturally — never stuff them.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BRAND VOICE GUIDE:
{brand_voice}

TARGET KEYWORDS:
{keywords}"#;

pub const ABOUT_US_SYSTEM: &str = "You are a brand storyteller. Write About pages \
    that are factual, warm, and free of cliché.";

/// Replace `{company_name}`, `{product_list}`, `{usp}`, `{key_stats}`,
/// `{about_us}`, `{brand_voice}`, `{keywords}`.
pub const ABOUT_US_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write the About Us page for {company_name}: origin story, what the company does
today, what sets it apart, and the team's promise to customers.

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US SOURCE MATERIAL:
{about_us}

BRAND VOICE GUIDE:
{brand_voice}

TARGET KEYWORDS:
{keywords}"#;

pub const PILLAR_PAGE_SYSTEM: &str = "You are a long-form content writer. Produce \
    comprehensive pillar pages with clear section headings and internal-link anchors.";

/// Replace `{company_name}`, `{pillar_content}`, `{product_list}`, `{usp}`,
/// `{key_stats}`, `{about_us}`, `{brand_voice}`, `{keywords}`.
pub const PILLAR_PAGE_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write a long-form pillar page for {company_name} based on the supplied outline
or source content. Structure it with headed sections an SEO team can link
cluster articles into.

PILLAR SOURCE CONTENT:
{pillar_content}

PRODUCT LIST:
{product_list}

UNIQUE SELLING PROPOSITION:
{usp}

KEY STATISTICS:
{key_stats}

ABOUT US:
{about_us}

BRAND VOICE GUIDE:
{brand_voice}

TARGET KEYWORDS:
{keywords}"#;
