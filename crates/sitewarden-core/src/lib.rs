//! SiteWarden Core
//!
//! Core types and error handling shared across SiteWarden components.
//!
//! This crate provides:
//! - User settings and the response-mode policy
//! - The page-signal snapshot shape
//! - Verdict and model-response types with their invariants
//! - Host-boundary request/response messages
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AiStatus, HostRequest, HostResponse, ModelResponse, ModelSource, PageSignals, ResponseMode,
    Settings, Verdict,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        AiStatus, ModelResponse, ModelSource, PageSignals, ResponseMode, Settings, Verdict,
    };
}
