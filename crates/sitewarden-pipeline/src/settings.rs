//! File-backed settings store
//!
//! JSON key-value persistence for the trusted-site list, the response
//! mode, and the AI-analysis toggle, using the legacy storage keys
//! (`trustedSites`, `mode`, `chatAnalysis`). Mutations persist
//! immediately. There are no transaction guarantees: the pipeline
//! reads a snapshot and a concurrent user edit may race it.

use parking_lot::RwLock;
use sitewarden_core::{Error, ResponseMode, Result, Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings persistence with an in-memory cache
pub struct SettingsStore {
    path: PathBuf,
    cached: RwLock<Settings>,
}

impl SettingsStore {
    /// Open the store at `path`, loading existing settings or falling
    /// back to defaults when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = Self::load(&path)?;

        Ok(Self {
            path,
            cached: RwLock::new(settings),
        })
    }

    fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)
            .map_err(|e| Error::settings(format!("unreadable settings file: {}", e)))?;
        Ok(settings)
    }

    /// Cheap copy of the current settings for one pipeline run
    pub fn snapshot(&self) -> Settings {
        self.cached.read().clone()
    }

    /// Add a trusted domain at the front of the list (most recent
    /// first), deduplicating any existing entry.
    pub fn add_trusted(&self, domain: &str) -> Result<()> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(Error::settings("trusted domain must not be empty"));
        }

        let mut settings = self.cached.write();
        settings.trusted_sites.retain(|existing| existing != domain);
        settings.trusted_sites.insert(0, domain.to_string());
        self.persist(&settings)?;
        info!(domain, "added trusted site");
        Ok(())
    }

    /// Remove a trusted domain; returns whether it was present
    pub fn remove_trusted(&self, domain: &str) -> Result<bool> {
        let domain = domain.trim();
        let mut settings = self.cached.write();
        let before = settings.trusted_sites.len();
        settings.trusted_sites.retain(|existing| existing != domain);
        let removed = settings.trusted_sites.len() != before;
        if removed {
            self.persist(&settings)?;
            info!(domain, "removed trusted site");
        }
        Ok(removed)
    }

    /// Set the response policy
    pub fn set_mode(&self, mode: ResponseMode) -> Result<()> {
        let mut settings = self.cached.write();
        settings.mode = mode;
        self.persist(&settings)
    }

    /// Enable or disable AI analysis
    pub fn set_chat_analysis(&self, enabled: bool) -> Result<()> {
        let mut settings = self.cached.write();
        settings.chat_analysis = enabled;
        self.persist(&settings)
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
