//! SiteWarden Gateway
//!
//! One logical "ask a language model" operation over interchangeable
//! providers with ordered fallback and independent failure isolation.
//!
//! This crate provides:
//! - The [`ModelProvider`] capability interface
//! - A built-in (on-device) provider shim with guarded one-shot
//!   session initialization
//! - A Gemini cloud provider speaking the generateContent contract
//! - The [`ModelGateway`] fallback chain
//! - A host messaging channel with an explicit round-trip timeout

pub mod builtin;
pub mod channel;
pub mod gateway;
pub mod gemini;
pub mod provider;

pub use builtin::{Availability, BuiltinProvider, LocalModel, LocalSession};
pub use channel::{pair, ChannelClient, ChannelServer, DEFAULT_CHANNEL_TIMEOUT};
pub use gateway::ModelGateway;
pub use gemini::{GeminiConfig, GeminiProvider, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use provider::{ModelChannel, ModelProvider};
