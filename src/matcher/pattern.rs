//! RegexPattern / PatternSet - user-configured extraction patterns
//!
//! Patterns live in `chrome.storage.sync` on the JS side; this module
//! owns the deserialized shape, the active-subset filtering, and the
//! legacy single-selection migration. The matcher only ever sees the
//! pre-filtered active subset.

use regex::Regex;
use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// A named regular expression the user configured for extraction.
///
/// `created_at` is epoch milliseconds (`Date.now()` on the JS side).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegexPattern {
    pub id: String,
    pub name: String,
    pub regex: String,
    #[serde(default)]
    pub created_at: i64,
}

/// The raw storage shape, every key optional.
///
/// `active_pattern_id` is the pre-multiselect key; when the array key is
/// absent but the legacy key is present, hydration treats it as a
/// one-element active set.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    #[serde(default)]
    pub regex_patterns: Option<Vec<RegexPattern>>,
    #[serde(default)]
    pub active_pattern_ids: Option<Vec<String>>,
    #[serde(default)]
    pub active_pattern_id: Option<String>,
    #[serde(default)]
    pub is_app_enabled: Option<bool>,
}

// ==================== MAIN IMPLEMENTATION ====================

/// PatternSet - the working pattern configuration
///
/// Holds the full pattern list plus the active-id selection and the
/// global enabled flag. Rehydrated in place whenever the storage
/// collaborator pushes a change notification.
#[derive(Clone, Debug)]
pub struct PatternSet {
    patterns: Vec<RegexPattern>,
    active_ids: Vec<String>,
    enabled: bool,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSet {
    /// Create an empty, enabled set (the state before first hydration,
    /// and the fallback when configuration loading fails upstream).
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            active_ids: Vec::new(),
            enabled: true,
        }
    }

    /// Build a set directly from a storage snapshot.
    pub fn from_snapshot(snapshot: StorageSnapshot) -> Self {
        let mut set = Self::new();
        set.hydrate(snapshot);
        set
    }

    /// Replace the working configuration from a storage snapshot.
    ///
    /// Defaults follow the original storage reader: missing patterns mean
    /// an empty list, a missing enabled flag means enabled. An open hover
    /// window is not this module's concern; rehydration never tears
    /// anything down.
    pub fn hydrate(&mut self, snapshot: StorageSnapshot) {
        self.patterns = snapshot.regex_patterns.unwrap_or_default();
        self.active_ids = match (snapshot.active_pattern_ids, snapshot.active_pattern_id) {
            (Some(ids), _) => ids,
            // Migration: old single activePatternId becomes a one-element set
            (None, Some(legacy)) => vec![legacy],
            (None, None) => Vec::new(),
        };
        self.enabled = snapshot.is_app_enabled.unwrap_or(true);
    }

    /// The active subset, in full-list order (not selection order).
    pub fn active_patterns(&self) -> Vec<RegexPattern> {
        self.patterns
            .iter()
            .filter(|p| self.active_ids.iter().any(|id| id == &p.id))
            .cloned()
            .collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_patterns().len()
    }
}

/// Compile check used when the pattern author saves a new pattern.
pub fn validate_regex(source: &str) -> bool {
    Regex::new(source).is_ok()
}
