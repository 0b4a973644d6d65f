//! Error types for SiteWarden

/// Result type alias using SiteWarden's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SiteWarden operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings load/persist errors
    #[error("settings error: {0}")]
    Settings(String),

    /// Page signal collection errors
    #[error("collector error: {0}")]
    Collector(String),

    /// Model provider call failures
    #[error("provider error: {0}")]
    Provider(String),

    /// A provider that is not present or not downloaded
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Verdict parsing errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Host channel errors (closed endpoint, dropped reply)
    #[error("channel error: {0}")]
    Channel(String),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Create a new collector error
    pub fn collector(msg: impl Into<String>) -> Self {
        Self::Collector(msg.into())
    }

    /// Create a new provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new provider-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new channel error
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this failure should trigger fallback to the next provider
    /// rather than aborting the request.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::ProviderUnavailable(_) | Self::Timeout)
    }
}
