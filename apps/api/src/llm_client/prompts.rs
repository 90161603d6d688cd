// Shared prompt constants and prompt-building utilities.
// Each pipeline step defines its own prompts in pipeline::prompts.
// This file contains cross-cutting fragments used by more than one step.

/// System prompt for the language-polish pass that runs after every prose
/// artifact. The polished text replaces the draft in place.
pub const EDITOR_SYSTEM: &str = "You are a meticulous British English editor. \
    Correct grammar, spelling, and awkward phrasing while preserving the \
    author's meaning, structure, and formatting exactly. \
    Return ONLY the edited document. \
    Do NOT add commentary, preambles, or notes about your changes.";

/// Polish prompt template. Replace `{file_name}` and `{file_content}`.
pub const EDITOR_PROMPT_TEMPLATE: &str = "Edit the following document ({file_name}) \
for grammar, clarity, and consistent British English. Keep headings, lists, and \
paragraph breaks intact.\n\n{file_content}";

/// Instruction appended to every generation prompt so outputs stay grounded
/// in the uploaded briefs rather than invented detail.
pub const BRIEF_GROUNDING_INSTRUCTION: &str = "\
    Use ONLY facts present in the supplied company documents. \
    Do NOT invent products, statistics, or claims that the documents do not support. \
    If a document is silent on a point, leave that point out.";
