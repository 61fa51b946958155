//! WASM bindings for the URL matcher
//!
//! Standalone functions for hosts (the popup, mainly) that need the
//! matcher without driving the full hover engine.

use wasm_bindgen::prelude::*;

use crate::matcher::extract::extract;
use crate::matcher::pattern::{validate_regex, RegexPattern};

/// Evaluate a pattern array against a URL, returning the match array.
///
/// Compile failures are reported to the console and do not abort the
/// remaining patterns.
#[wasm_bindgen(js_name = extractMatches)]
pub fn js_extract_matches(url: &str, patterns: JsValue) -> Result<JsValue, JsValue> {
    let patterns: Vec<RegexPattern> = serde_wasm_bindgen::from_value(patterns)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse patterns: {}", e)))?;

    let extraction = extract(url, &patterns);
    for failure in &extraction.failures {
        web_sys::console::error_1(&failure.to_string().into());
    }

    serde_wasm_bindgen::to_value(&extraction.matches)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize matches: {}", e)))
}

/// Compile check for the pattern editor's save path.
#[wasm_bindgen(js_name = validateRegex)]
pub fn js_validate_regex(source: &str) -> bool {
    validate_regex(source)
}

/// New pattern id: base-36 timestamp plus base-36 random suffix.
#[wasm_bindgen(js_name = generateId)]
pub fn js_generate_id() -> String {
    let timestamp = js_sys::Number::from(js_sys::Date::now())
        .to_string(36)
        .map(String::from)
        .unwrap_or_default();
    let random = js_sys::Number::from(js_sys::Math::random())
        .to_string(36)
        .map(String::from)
        .unwrap_or_default();
    // "0.k3j2f..." - keep the payload after the radix point
    let suffix = random.split('.').nth(1).unwrap_or("");
    format!("{}{}", timestamp, suffix)
}
