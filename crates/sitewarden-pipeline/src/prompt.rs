//! Prompt construction
//!
//! Fixed template embedding the page signals twice: once as the "site
//! information" block (title, URL, domain, element counts) and once as
//! the "content snippet" block (headings, first paragraphs, form
//! labels), followed by the instruction to answer with ONLY a JSON
//! verdict object.

use serde_json::json;
use sitewarden_core::PageSignals;

/// Build the classification prompt for a page snapshot
pub fn build_prompt(signals: &PageSignals) -> String {
    let info = json!({
        "title": signals.title,
        "url": signals.url,
        "domain": signals.domain,
        "formCount": signals.form_count,
        "inputCount": signals.input_count,
        "linkCount": signals.link_count,
    });

    let snippet = json!({
        "headings": signals.headings,
        "firstParagraphs": signals.first_paragraphs,
        "formLabels": signals.form_labels,
    });

    format!(
        r#"You are a cybersecurity assistant. Analyze if this site is suspicious or potentially a scam.

Site information:
{info:#}

Content snippet (important headings, first paragraphs, and form labels):
{snippet:#}

Respond ONLY with JSON:
{{ "is_suspicious": true|false, "reason": "short reason" }}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> PageSignals {
        PageSignals {
            title: "Login".to_string(),
            url: "https://example.com/login".to_string(),
            domain: "example.com".to_string(),
            form_count: 1,
            input_count: 2,
            link_count: 3,
            headings: vec!["Sign in".to_string()],
            first_paragraphs: vec!["Enter credentials".to_string()],
            form_labels: vec!["Password".to_string()],
        }
    }

    #[test]
    fn test_prompt_embeds_both_blocks() {
        let prompt = build_prompt(&signals());

        assert!(prompt.contains("Site information:"));
        assert!(prompt.contains("Content snippet"));
        assert!(prompt.contains(r#""formCount": 1"#));
        assert!(prompt.contains(r#""domain": "example.com""#));
        assert!(prompt.contains(r#""firstParagraphs""#));
        assert!(prompt.contains("Sign in"));
    }

    #[test]
    fn test_prompt_demands_json_only() {
        let prompt = build_prompt(&signals());
        assert!(prompt.contains("Respond ONLY with JSON"));
        assert!(prompt.contains(r#""is_suspicious": true|false"#));
    }

    #[test]
    fn test_empty_signals_still_produce_valid_prompt() {
        let prompt = build_prompt(&PageSignals::default());
        assert!(prompt.contains(r#""formCount": 0"#));
        assert!(prompt.contains("\"headings\": []"));
    }
}
