//! System prompts and prompt templates for note enrichment

/// System prompt for the summarize endpoint
pub const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes notes.";

/// System prompt for the organize endpoint.
///
/// The response contract is a bare JSON array of `{"content": ...}` objects;
/// anything else is treated as a parse failure and degrades to an empty plan.
pub const ORGANIZE_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that organizes notes into an actionable task list.

Given the user's notes, produce a short ordered list of tasks. Respond with ONLY a JSON array of objects of the form {"content": "task text"}. Do not include any other text, markdown, or code fences."#;

/// User prompt wrapping a notes digest for summarization
pub fn summarize_user_prompt(digest: &str) -> String {
    format!("Please summarize the following notes:\n\n{}", digest)
}

/// User prompt wrapping a notes digest for organization
pub fn organize_user_prompt(digest: &str) -> String {
    format!(
        "Please organize the following notes into tasks:\n\n{}",
        digest
    )
}
