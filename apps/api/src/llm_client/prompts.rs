// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting pieces those prompts reuse.

/// Opening line shared by every analyzer system prompt.
pub const ROLE_PREAMBLE: &str = "You are an expert career advisor and technical recruiter. \
    The user message contains the full text of a candidate's resume.";

/// Link format the front-end renders as clickable Markdown.
pub const MARKDOWN_LINK_FORMAT: &str = "Format every result as a Markdown link: \
    [Title - Organization](https://full-url). \
    Never print a bare URL and never invent a URL you did not find in a search result.";

/// Header the front-end looks for when rendering the contacts block.
pub const NETWORKING_CONTACTS_HEADER: &str = "## Networking Contacts";

/// Directive for prompts that must answer from the resume alone.
pub const NO_SEARCH_INSTRUCTION: &str = "Do NOT use web search for this task. \
    Base your answer solely on the resume text provided.";
