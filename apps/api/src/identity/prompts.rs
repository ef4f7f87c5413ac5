// LLM prompt constants for the identity sync lookup.

/// System prompt for the identity lookup — auditor persona, JSON-only.
pub const IDENTITY_SYNC_SYSTEM: &str =
    "You are a professional data auditor extracting public profile data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Never guess: when in doubt, refuse the match.";

/// Identity sync prompt template.
/// Replace `{profile_url}` and `{identity_anchor}` before sending.
pub const IDENTITY_SYNC_PROMPT_TEMPLATE: &str = r#"OBJECTIVE: Extract profile data for the individual associated with this EXACT URL: {profile_url}.
IDENTITY ANCHOR (MUST MATCH): {identity_anchor}.

{evidence_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "string",
  "headline": "string",
  "bio": "string",
  "skills": "comma-separated string",
  "matchConfirmed": false
}

STRICT RULES:
1. ONLY extract information visible in search snippets for this specific URL.
2. DO NOT GUESS roles or names if not explicitly found.
3. For any field that is not publicly visible, return "Information not public".
4. CHECK: Does the person match the identity anchor "{identity_anchor}"?
5. Set "matchConfirmed" to true ONLY if you are at least 95% certain the data
   belongs to the provided URL. If there is ANY doubt, set it to false."#;
