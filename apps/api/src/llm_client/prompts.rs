// Shared prompt constants and prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Evidence-only instruction shared by every extraction prompt.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Base every field ONLY on evidence present in the provided text \
    or search results. Do NOT infer, interpolate, or invent details. \
    If the evidence does not support a field, return the documented sentinel \
    value for it instead of a guess.";
