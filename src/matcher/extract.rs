//! UrlExtractor - ordered regex extraction over link URLs
//!
//! Evaluates the active patterns against a URL in configuration order,
//! find-all per pattern. Value selection per match: a non-empty first
//! capture group wins, otherwise the non-empty full match, otherwise
//! nothing (zero-length full matches are skipped). A malformed pattern
//! never aborts extraction for the others; it is skipped and surfaced
//! as a `CompileFailure`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matcher::pattern::RegexPattern;

// ==================== TYPE DEFINITIONS ====================

/// A single extracted value plus the name of the pattern that produced it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMatch {
    pub value: String,
    pub pattern_name: String,
}

/// A pattern whose source failed to compile during extraction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompileFailure {
    pub pattern_id: String,
    pub pattern_name: String,
    pub regex: String,
    pub error: String,
}

impl std::fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid regex pattern: {} ({})", self.regex, self.error)
    }
}

impl std::error::Error for CompileFailure {}

/// Performance statistics for one extraction call.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    pub elapsed_us: u64,
    pub patterns_evaluated: usize,
    pub patterns_failed: usize,
    pub match_count: usize,
}

/// Full result of one URL evaluation.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Extraction {
    pub matches: Vec<ExtractedMatch>,
    pub failures: Vec<CompileFailure>,
    pub stats: ExtractStats,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Evaluate `patterns` against `url` in order.
///
/// Output groups all matches of pattern k (in left-to-right scan order)
/// before any match of pattern k+1 - grouped by pattern, not interleaved
/// by position. Never panics, regardless of pattern sources. Duplicate
/// values from different patterns are kept as-is.
pub fn extract(url: &str, patterns: &[RegexPattern]) -> Extraction {
    let start = instant::Instant::now();
    let mut matches: Vec<ExtractedMatch> = Vec::new();
    let mut failures: Vec<CompileFailure> = Vec::new();

    for pattern in patterns {
        let re = match Regex::new(&pattern.regex) {
            Ok(re) => re,
            Err(e) => {
                failures.push(CompileFailure {
                    pattern_id: pattern.id.clone(),
                    pattern_name: pattern.name.clone(),
                    regex: pattern.regex.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };
        scan_pattern(&re, url, &pattern.name, &mut matches);
    }

    let stats = ExtractStats {
        elapsed_us: start.elapsed().as_micros() as u64,
        patterns_evaluated: patterns.len(),
        patterns_failed: failures.len(),
        match_count: matches.len(),
    };

    Extraction {
        matches,
        failures,
        stats,
    }
}

/// Convenience wrapper for callers that only need the values.
pub fn extract_matches(url: &str, patterns: &[RegexPattern]) -> Vec<ExtractedMatch> {
    extract(url, patterns).matches
}

/// Find-all scan of one compiled pattern, JS `lastIndex` semantics.
///
/// The cursor resumes at the match end; an empty match advances one
/// character past its position (never splitting a UTF-8 scalar) so the
/// scan terminates for any zero-width-capable pattern.
fn scan_pattern(re: &Regex, url: &str, pattern_name: &str, out: &mut Vec<ExtractedMatch>) {
    let mut at = 0usize;
    while at <= url.len() {
        let Some(caps) = re.captures_at(url, at) else {
            break;
        };
        let Some(full) = caps.get(0) else {
            break;
        };

        // Non-empty group 1 preferred; an empty group counts as absent
        // and falls through to the full match, matching JS truthiness.
        let value = match caps.get(1) {
            Some(group) if !group.as_str().is_empty() => Some(group.as_str()),
            _ if !full.as_str().is_empty() => Some(full.as_str()),
            _ => None,
        };
        if let Some(value) = value {
            out.push(ExtractedMatch {
                value: value.to_string(),
                pattern_name: pattern_name.to_string(),
            });
        }

        let end = full.end();
        if full.start() == end {
            // Empty match: step over one scalar or the scan never advances.
            at = end + url[end..].chars().next().map_or(1, char::len_utf8);
        } else {
            at = end;
        }
    }
}
