//! Structured advice parsing.
//!
//! The `/ask` system prompt asks the model for a JSON object with four string
//! fields. Models don't always comply, so every reply goes through
//! [`classify`], which validates the shape and falls back to wrapping the raw
//! text when it doesn't match. Callers always get all four fields.

use serde::{Deserialize, Serialize};

/// Placeholder `reasoning_path` for replies that weren't structured.
pub const FALLBACK_REASONING: &str =
    "The model did not return structured reasoning for this answer.";
/// Placeholder `ethical_check` for replies that weren't structured.
pub const FALLBACK_ETHICAL_CHECK: &str =
    "No structured ethical review was produced for this answer.";
/// Placeholder `self_reflection` for replies that weren't structured.
pub const FALLBACK_SELF_REFLECTION: &str =
    "No structured self-reflection was produced for this answer.";
/// `advice` used when the model returned nothing at all.
pub const EMPTY_REPLY_ADVICE: &str = "The model returned an empty reply.";

/// The four-field answer returned by `/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAdvice {
    pub advice: String,
    pub reasoning_path: String,
    pub ethical_check: String,
    pub self_reflection: String,
}

impl StructuredAdvice {
    /// Wrap unstructured model text, filling the other fields with placeholders.
    pub fn fallback(raw: &str) -> Self {
        let trimmed = raw.trim();
        let advice = if trimmed.is_empty() {
            EMPTY_REPLY_ADVICE.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            advice,
            reasoning_path: FALLBACK_REASONING.to_string(),
            ethical_check: FALLBACK_ETHICAL_CHECK.to_string(),
            self_reflection: FALLBACK_SELF_REFLECTION.to_string(),
        }
    }
}

/// Result of validating a model reply against the advice schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    /// The reply was a JSON object with all four string fields.
    Structured(StructuredAdvice),
    /// The reply didn't match; raw text was wrapped with placeholders.
    Fallback(StructuredAdvice),
}

impl AdviceOutcome {
    pub fn is_structured(&self) -> bool {
        matches!(self, AdviceOutcome::Structured(_))
    }

    pub fn into_advice(self) -> StructuredAdvice {
        match self {
            AdviceOutcome::Structured(a) | AdviceOutcome::Fallback(a) => a,
        }
    }
}

/// Validate `raw` against the advice schema.
pub fn classify(raw: &str) -> AdviceOutcome {
    let body = strip_code_fence(raw.trim());
    match serde_json::from_str::<StructuredAdvice>(body) {
        Ok(advice) => AdviceOutcome::Structured(advice),
        Err(_) => AdviceOutcome::Fallback(StructuredAdvice::fallback(raw)),
    }
}

/// Always produces all four fields, whatever the model sent back.
pub fn normalize(raw: &str) -> StructuredAdvice {
    classify(raw).into_advice()
}

/// Remove one surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Skip the info string (e.g. `json`) on the opening line
    match inner.find('\n') {
        Some(nl) => inner[nl + 1..].trim(),
        None => inner.trim(),
    }
}
