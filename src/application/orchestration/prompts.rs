//! Prompt text sent to the model.

use crate::domain::analysis::{MAX_SUMMARY_CHARS, REQUIRED_SOURCE_COUNT};

/// Longest previous output echoed back in a retry, in characters.
const MAX_ECHOED_OUTPUT_CHARS: usize = 24_000;

/// System instruction describing the exact output contract.
pub fn system_prompt() -> String {
    format!(
        r#"You are a startup analyst. Evaluate the business idea you are given and answer with ONE JSON object.

Output rules:
- Return raw JSON only. No markdown, no code fences, no commentary before or after the object.
- Use exactly these top-level keys: validationScore, competitors, priceSuggestions, forecasts, timeline, goToMarket, clients, sources, summary, scoreAnalysis, currency.
- Never use null. Use an empty array or empty string when you have nothing to say.

Schema:
{{
  "validationScore": integer 0-100,
  "competitors": [{{"name": string, "strength": number 0-100, "description": string, "marketShare": number (optional)}}],
  "priceSuggestions": [{{"type": string, "value": number or string such as "$29/month", "description": string, "trend": [{{"period": string, "value": number}}] (optional)}}],
  "forecasts": {{
    "bestCase": {{"revenue": number, "marketShare": number, "customers": integer, "period": string}},
    "worstCase": {{"revenue": number, "marketShare": number, "customers": integer, "period": string}}
  }},
  "timeline": {{"phases": [{{"name": string, "duration": string, "tasks": [string], "risk": string}}], "criticalPath": [string]}},
  "goToMarket": {{"strategy": [string], "channels": [string], "kpis": [string]}},
  "clients": [{{"name": string, "description": string, "size": string}}],
  "sources": [{{"title": string, "relevance": string}}],
  "summary": string,
  "scoreAnalysis": {{
    "category": string,
    "marketPotential": {{"score": number, "analysis": string}},
    "competition": {{"score": number, "analysis": string}},
    "marketSize": {{"score": number, "analysis": string}},
    "timing": {{"score": number, "analysis": string}},
    "recommendations": [string]
  }},
  "currency": ISO 4217 code such as "USD"
}}

Constraints:
- "sources" must contain exactly {sources} entries.
- "summary" must be at most {summary} characters.
- Every monetary figure uses the single currency named in "currency".
- worstCase revenue must not exceed bestCase revenue."#,
        sources = REQUIRED_SOURCE_COUNT,
        summary = MAX_SUMMARY_CHARS,
    )
}

/// User message carrying the idea itself.
pub fn idea_prompt(idea: &str) -> String {
    format!("Business idea:\n{}", idea.trim())
}

/// Previous output, shortened for echoing back to the model.
pub fn echoed_output(raw: &str) -> String {
    if raw.chars().count() <= MAX_ECHOED_OUTPUT_CHARS {
        return raw.to_string();
    }
    raw.chars().take(MAX_ECHOED_OUTPUT_CHARS).collect()
}

/// Corrective message listing what was wrong with the previous answer.
pub fn retry_feedback(issues: &[String]) -> String {
    let listed = issues
        .iter()
        .map(|issue| format!("- {}", issue))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Your previous answer was rejected:\n{}\n\nReturn the complete corrected JSON object only, following every rule of the schema.",
        listed
    )
}
