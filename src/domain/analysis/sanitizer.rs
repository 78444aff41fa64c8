//! Response sanitization: turns raw model output into a candidate JSON object.
//!
//! Extraction is a best-effort heuristic. It unwraps a code fence that opens
//! the candidate, skips surrounding prose and picks out one balanced object;
//! it never repairs malformed JSON syntax.
//! Broken documents fail to parse later and are retried instead.

use thiserror::Error;

/// Maximum accepted raw response length (512KB).
pub const MAX_RESPONSE_LENGTH: usize = 512 * 1024;

const FENCE: &str = "```";

/// Errors that can occur during sanitization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("no balanced JSON object found in model output")]
    NoJsonFound,

    #[error("response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },
}

/// Extracts a candidate JSON object from model output.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    max_length: usize,
}

impl Default for ResponseSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSanitizer {
    /// Creates a sanitizer with the default length limit.
    pub fn new() -> Self {
        Self {
            max_length: MAX_RESPONSE_LENGTH,
        }
    }

    /// Overrides the maximum accepted response length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Produces the candidate JSON text for `raw`.
    ///
    /// # Steps
    /// 1. Reject oversized output
    /// 2. Drop control characters (newlines and tabs kept)
    /// 3. If a fence opens before the first `{`, look inside it first
    /// 4. Extract the first balanced top-level object and trim it
    pub fn sanitize(&self, raw: &str) -> Result<String, SanitizeError> {
        if raw.len() > self.max_length {
            return Err(SanitizeError::TooLong {
                max: self.max_length,
                actual: raw.len(),
            });
        }

        let cleaned = remove_control_chars(raw);

        fenced_body(&cleaned)
            .and_then(extract_balanced_object)
            .or_else(|| extract_balanced_object(&cleaned))
            .map(|json| json.trim().to_string())
            .ok_or(SanitizeError::NoJsonFound)
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Text following an opening fence and its language tag.
///
/// Only a fence that precedes every `{` counts, so backticks inside JSON
/// strings are never mistaken for one.
fn fenced_body(s: &str) -> Option<&str> {
    let fence = s.find(FENCE)?;
    if s.find('{').is_some_and(|brace| brace < fence) {
        return None;
    }

    let after = &s[fence + FENCE.len()..];
    let tag_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(after.len());
    let body = &after[tag_len..];
    body.trim_start().starts_with('{').then_some(body)
}

/// Finds the first `{` that opens a balanced object and returns that object.
fn extract_balanced_object(s: &str) -> Option<&str> {
    s.char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| balanced_from(s, start))
}

fn balanced_from(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
