//! Core types for SiteWarden

use serde::{Deserialize, Serialize};

/// Default reason attached to a clean verdict.
pub const SAFE_REASON: &str = "Looks safe";

/// Default reason attached to a suspicious verdict when the model
/// did not supply one.
pub const SUSPICIOUS_REASON: &str = "This site seems suspicious.";

/// How the user wants suspicious pages handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Display an advisory overlay but keep the page usable
    #[default]
    Warning,
    /// Obstruct page interaction entirely
    Block,
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Block => write!(f, "block"),
        }
    }
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Self::Warning),
            "block" => Ok(Self::Block),
            other => Err(format!("unknown response mode '{}', expected warning or block", other)),
        }
    }
}

/// User preferences read by the analysis pipeline.
///
/// Field names match the legacy key-value storage keys so existing
/// settings files keep deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Trusted domains, most recently added first
    #[serde(rename = "trustedSites", default)]
    pub trusted_sites: Vec<String>,

    /// Response policy for suspicious pages
    #[serde(default)]
    pub mode: ResponseMode,

    /// Whether AI analysis runs at all
    #[serde(rename = "chatAnalysis", default = "default_true")]
    pub chat_analysis: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trusted_sites: Vec::new(),
            mode: ResponseMode::default(),
            chat_analysis: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Fixed-shape snapshot of a page's observable structure.
///
/// Built fresh per analysis, immutable once built, discarded after
/// prompt construction. Serialized keys follow the prompt contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    /// Document title, empty when absent
    pub title: String,

    /// Full page URL
    pub url: String,

    /// Hostname of the page URL, empty when unparseable
    pub domain: String,

    /// Number of `<form>` elements
    pub form_count: usize,

    /// Number of `<input>` elements
    pub input_count: usize,

    /// Number of `<a>` elements
    pub link_count: usize,

    /// Sampled heading texts (trimmed, non-empty)
    pub headings: Vec<String>,

    /// Sampled paragraph texts (trimmed, non-empty)
    pub first_paragraphs: Vec<String>,

    /// Sampled form label texts (trimmed, non-empty)
    pub form_labels: Vec<String>,
}

/// Final classification of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the page looks like a scam/phishing attempt
    pub is_suspicious: bool,

    /// Human-readable reason, always non-empty
    pub reason: String,
}

impl Verdict {
    /// The safe default used whenever no usable model output exists
    pub fn safe() -> Self {
        Self {
            is_suspicious: false,
            reason: SAFE_REASON.to_string(),
        }
    }

    /// Build a verdict from raw model fields, applying default reasons
    /// so that `reason` is never empty.
    pub fn from_raw(is_suspicious: bool, reason: Option<String>) -> Self {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| {
                if is_suspicious {
                    SUSPICIOUS_REASON.to_string()
                } else {
                    SAFE_REASON.to_string()
                }
            });

        Self { is_suspicious, reason }
    }
}

/// Which provider produced a model response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelSource {
    /// On-device inference session
    #[serde(rename = "built-in")]
    BuiltIn,
    /// Remote HTTP language-model endpoint
    #[serde(rename = "cloud")]
    Cloud,
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuiltIn => write!(f, "built-in"),
            Self::Cloud => write!(f, "cloud"),
        }
    }
}

/// Outcome of one logical "ask a language model" operation.
///
/// Invariant (enforced by the constructors): exactly one of
/// `text` (with `success = true`) or `error` (with `success = false`)
/// is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Whether any provider produced usable text
    pub success: bool,

    /// Raw model text on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Provider that answered, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ModelSource>,

    /// Failure description, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelResponse {
    /// Create a successful response
    pub fn success(text: impl Into<String>, source: ModelSource) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            source: Some(source),
            error: None,
        }
    }

    /// Create a failed response
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            source: None,
            error: Some(error.into()),
        }
    }
}

/// Availability of the on-device model capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiStatus {
    /// Whether a built-in (on-device) provider is usable
    #[serde(rename = "isBuiltInAvailable")]
    pub builtin_available: bool,
}

/// Request sent across the privilege boundary to the host process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostRequest {
    /// Ask the model gateway to classify the given prompt
    AskModel {
        /// Full prompt text
        prompt: String,
    },
    /// Query on-device availability
    AiStatus,
}

/// Answer to a [`HostRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostResponse {
    /// Answer to [`HostRequest::AskModel`]
    Model(ModelResponse),
    /// Answer to [`HostRequest::AiStatus`]
    Status(AiStatus),
}
