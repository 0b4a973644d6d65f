//! Defensive verdict parsing
//!
//! Model output is not guaranteed to be pure JSON and may arrive
//! wrapped in prose. Parsing tries the whole string first, then the
//! widest brace-bounded substring, and finally falls back to the safe
//! default. This function never fails.

use regex::Regex;
use serde::Deserialize;
use sitewarden_core::Verdict;
use std::sync::OnceLock;
use tracing::debug;

/// Verdict fields as the model emits them
#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    is_suspicious: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl From<RawVerdict> for Verdict {
    fn from(raw: RawVerdict) -> Self {
        Verdict::from_raw(raw.is_suspicious, raw.reason)
    }
}

/// First `{` through last `}`, prose on either side ignored
fn brace_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("brace-span regex is valid"))
}

/// Extract a structured verdict from unstructured model text
pub fn parse_verdict(raw: &str) -> Verdict {
    if let Ok(parsed) = serde_json::from_str::<RawVerdict>(raw) {
        return parsed.into();
    }

    if let Some(candidate) = brace_span().find(raw) {
        if let Ok(parsed) = serde_json::from_str::<RawVerdict>(candidate.as_str()) {
            return parsed.into();
        }
    }

    debug!("model text not decodable as a verdict, defaulting to safe");
    Verdict::safe()
}
