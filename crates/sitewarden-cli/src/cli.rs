//! Command-line interface definition

use clap::{Parser, Subcommand};
use sitewarden_core::ResponseMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitewarden")]
#[command(about = "AI-backed scam and phishing analysis for web pages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sitewarden.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a page snapshot and warn or block on a suspicious verdict
    Analyze {
        /// Page URL to fetch and analyze
        #[arg(short, long)]
        url: Option<String>,

        /// Local HTML file to analyze instead of fetching
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Allow fetching from localhost and private networks
        #[arg(long)]
        allow_private: bool,
    },

    /// Manage the trusted-site allowlist
    Trust {
        #[command(subcommand)]
        command: TrustCommands,
    },

    /// Set the response policy for suspicious pages
    Mode {
        /// warning or block
        mode: ResponseMode,
    },

    /// Enable or disable AI analysis
    Ai {
        /// on or off
        #[arg(value_parser = parse_on_off)]
        state: bool,
    },

    /// Show current settings and provider availability
    Status,
}

#[derive(Subcommand, Debug)]
pub enum TrustCommands {
    /// Add a domain to the allowlist (most recent first)
    Add {
        /// Domain to trust, e.g. example.com
        domain: String,
    },

    /// Remove a domain from the allowlist
    Remove {
        /// Domain to stop trusting
        domain: String,
    },

    /// List trusted domains
    List,
}

fn parse_on_off(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "enabled" => Ok(true),
        "off" | "false" | "disabled" => Ok(false),
        other => Err(format!("expected on or off, got '{}'", other)),
    }
}
