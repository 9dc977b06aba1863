// System prompts for the analyzer, keyed by analysis type.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::analysis::models::{AnalysisType, SearchFilters};
use crate::llm_client::prompts::{
    MARKDOWN_LINK_FORMAT, NETWORKING_CONTACTS_HEADER, NO_SEARCH_INSTRUCTION, ROLE_PREAMBLE,
};

/// Header that opens the filter block. Absent when no filter applies.
pub const FILTER_HEADER: &str = "Search filters:";

/// Job search prompt. Replace: {role}, {links}, {contacts_header}
const JOBS_PROMPT_TEMPLATE: &str = r#"{role}

Use Google Search to find approximately 20 current job postings that match the candidate's skills, experience level, and career trajectory.

RULES:
1. Link to the ORIGINAL posting on the hiring company's own careers page or applicant tracking system (Greenhouse, Lever, Workday, Ashby and similar).
2. Do NOT link to job aggregator or job board sites such as Indeed, LinkedIn Jobs, Glassdoor, ZipRecruiter, Monster or SimplyHired.
3. {links}
4. Under each link, add one short line explaining why the role fits this candidate.

After the job list, add a section titled:

{contacts_header}

List 3-5 people (recruiters, hiring managers, or engineers at the companies above) the candidate could reach out to. Format each as a Markdown link to a public profile page, followed by their role."#;

/// Critique prompt. Replace: {role}, {no_search}
const CRITIQUE_PROMPT_TEMPLATE: &str = r#"{role}

{no_search}

Write a structured critique of the resume using exactly these two sections:

### Strengths
- bullet points naming what the resume does well, with a concrete example from the text

### Areas for Improvement
- bullet points naming specific weaknesses, each with an actionable rewrite suggestion

Keep each bullet to one or two sentences. Do not rewrite the whole resume."#;

/// Contacts prompt. Replace: {role}, {links}, {contacts_header}
const CONTACTS_PROMPT_TEMPLATE: &str = r#"{role}

Use Google Search to find 5-10 relevant networking contacts for this candidate: recruiters, hiring managers, team leads, or practitioners in the candidate's field.

Start your answer with the header:

{contacts_header}

For each contact:
- {links}
- Follow the link with their current role and one line on why they are relevant to the candidate."#;

/// Builds the system prompt for an analysis type.
///
/// `jobs` carries both filters, `contacts` carries only the location, and
/// `critique` never carries a filter block.
pub fn build_system_prompt(analysis_type: AnalysisType, filters: &SearchFilters) -> String {
    let (template, applicable) = match analysis_type {
        AnalysisType::Jobs => (JOBS_PROMPT_TEMPLATE, filters.clone()),
        AnalysisType::Contacts => (
            CONTACTS_PROMPT_TEMPLATE,
            SearchFilters {
                location: filters.location.clone(),
                date_posted: None,
            },
        ),
        AnalysisType::Critique => (CRITIQUE_PROMPT_TEMPLATE, SearchFilters::default()),
    };

    let mut prompt = template
        .replace("{role}", ROLE_PREAMBLE)
        .replace("{links}", MARKDOWN_LINK_FORMAT)
        .replace("{contacts_header}", NETWORKING_CONTACTS_HEADER)
        .replace("{no_search}", NO_SEARCH_INSTRUCTION);

    if let Some(clause) = filter_clause(&applicable) {
        prompt.push_str("\n\n");
        prompt.push_str(&clause);
    }

    prompt
}

/// Renders the filter block, or `None` when no filter is set.
fn filter_clause(filters: &SearchFilters) -> Option<String> {
    if filters.is_empty() {
        return None;
    }

    let mut clause = String::from(FILTER_HEADER);
    if let Some(location) = &filters.location {
        clause.push_str(&format!(
            "\n- Location: {location}. Only include results in or near this location."
        ));
    }
    if let Some(date_posted) = &filters.date_posted {
        clause.push_str(&format!(
            "\n- Date posted: {}. Only include postings published in this window.",
            describe_date_posted(date_posted)
        ));
    }
    Some(clause)
}

/// Humanizes well-known date tokens; other values pass through verbatim.
fn describe_date_posted(value: &str) -> String {
    match value.to_ascii_lowercase().as_str() {
        "24h" | "day" | "past24hours" | "past_24_hours" => "within the past 24 hours".to_string(),
        "week" | "7d" | "pastweek" | "past_week" => "within the past week".to_string(),
        "month" | "30d" | "pastmonth" | "past_month" => "within the past month".to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(location: Option<&str>, date_posted: Option<&str>) -> SearchFilters {
        SearchFilters::new(location, date_posted)
    }

    #[test]
    fn test_jobs_prompt_has_type_specific_instructions() {
        let prompt = build_system_prompt(AnalysisType::Jobs, &SearchFilters::default());
        assert!(prompt.contains("approximately 20"));
        assert!(prompt.contains("ORIGINAL posting"));
        assert!(prompt.contains("Indeed"));
        assert!(prompt.contains(NETWORKING_CONTACTS_HEADER));
        assert!(prompt.contains("3-5"));
        assert!(prompt.contains("Markdown link"));
    }

    #[test]
    fn test_critique_prompt_has_sections_and_disables_search() {
        let prompt = build_system_prompt(AnalysisType::Critique, &SearchFilters::default());
        assert!(prompt.contains("### Strengths"));
        assert!(prompt.contains("### Areas for Improvement"));
        assert!(prompt.contains("Do NOT use web search"));
    }

    #[test]
    fn test_contacts_prompt_has_header_and_range() {
        let prompt = build_system_prompt(AnalysisType::Contacts, &SearchFilters::default());
        assert!(prompt.contains("5-10"));
        assert!(prompt.contains(NETWORKING_CONTACTS_HEADER));
        assert!(prompt.contains("Google Search"));
    }

    #[test]
    fn test_no_placeholders_left_unreplaced() {
        for t in [
            AnalysisType::Jobs,
            AnalysisType::Critique,
            AnalysisType::Contacts,
        ] {
            let prompt = build_system_prompt(t, &filters(Some("Seattle"), Some("week")));
            assert!(!prompt.contains('{'), "unreplaced placeholder in {t} prompt");
        }
    }

    #[test]
    fn test_no_filter_clause_when_filters_absent() {
        for t in [
            AnalysisType::Jobs,
            AnalysisType::Critique,
            AnalysisType::Contacts,
        ] {
            let prompt = build_system_prompt(t, &SearchFilters::default());
            assert!(!prompt.contains(FILTER_HEADER), "{t} prompt has filter clause");
        }
    }

    #[test]
    fn test_jobs_prompt_includes_both_filters() {
        let prompt = build_system_prompt(AnalysisType::Jobs, &filters(Some("Seattle"), Some("week")));
        assert!(prompt.contains(FILTER_HEADER));
        assert!(prompt.contains("Location: Seattle"));
        assert!(prompt.contains("Date posted: within the past week"));
    }

    #[test]
    fn test_jobs_prompt_with_date_any_omits_date_clause() {
        let prompt = build_system_prompt(AnalysisType::Jobs, &filters(Some("Seattle"), Some("any")));
        assert!(prompt.contains("Location: Seattle"));
        assert!(!prompt.contains("Date posted"));
    }

    #[test]
    fn test_jobs_prompt_with_only_date() {
        let prompt = build_system_prompt(AnalysisType::Jobs, &filters(None, Some("2024-05-01")));
        assert!(prompt.contains("Date posted: 2024-05-01"));
        assert!(!prompt.contains("Location:"));
    }

    #[test]
    fn test_contacts_prompt_uses_location_only() {
        let prompt =
            build_system_prompt(AnalysisType::Contacts, &filters(Some("Berlin"), Some("month")));
        assert!(prompt.contains("Location: Berlin"));
        assert!(!prompt.contains("Date posted"));

        let prompt = build_system_prompt(AnalysisType::Contacts, &filters(None, Some("month")));
        assert!(!prompt.contains(FILTER_HEADER));
    }

    #[test]
    fn test_critique_prompt_never_has_filters() {
        let prompt =
            build_system_prompt(AnalysisType::Critique, &filters(Some("Seattle"), Some("week")));
        assert!(!prompt.contains(FILTER_HEADER));
        assert!(!prompt.contains("Seattle"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let f = filters(Some("Seattle"), Some("24h"));
        assert_eq!(
            build_system_prompt(AnalysisType::Jobs, &f),
            build_system_prompt(AnalysisType::Jobs, &f)
        );
    }

    #[test]
    fn test_describe_date_posted() {
        assert_eq!(describe_date_posted("24h"), "within the past 24 hours");
        assert_eq!(describe_date_posted("Week"), "within the past week");
        assert_eq!(describe_date_posted("month"), "within the past month");
        assert_eq!(describe_date_posted("last 3 days"), "last 3 days");
    }
}
