// LLM prompt constants for job scouting and market search.

/// Discovery prompt — search-grounded, free text.
/// Replace `{target_count}`, `{role}`, `{skills}` before sending.
pub const SCOUT_DISCOVERY_PROMPT_TEMPLATE: &str = "Find {target_count} current, active job \
openings for {role} that require skills like {skills}. Provide company names and URLs.";

/// System prompt for bundle generation — JSON-only.
pub const SCOUT_BUNDLE_SYSTEM: &str =
    "You are a job-application strategist packaging discovered openings. \
    You MUST respond with valid JSON only — a JSON array of bundle objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT invent openings that are not supported by the search results.";

/// Bundle generation prompt template.
/// Replace `{target_count}`, `{search_results}`, `{discovery_notes}`, `{role}`.
pub const SCOUT_BUNDLE_PROMPT_TEMPLATE: &str = r#"Based on these job search results: {search_results}

Discovery notes:
{discovery_notes}

And the user's target role: {role}

Generate a list of up to {target_count} job application bundles. Return a JSON ARRAY:
[
  {
    "company": "string",
    "role": "string",
    "url": "string",
    "tailoredPitch": "2-3 sentence pitch tailored to this company",
    "matchReason": "1-2 sentences on why this opening fits the user",
    "suggestedAnswers": [
      {"question": "a likely application-form question", "answer": "a suggested answer"}
    ]
  }
]

HARD RULES:
1. Every bundle MUST correspond to an opening present in the search results.
2. Use the URL from the search results — never fabricate one.
3. Keep pitches specific to the company; no boilerplate."#;

/// Market search prompt — search-grounded, free text.
/// Replace `{query}` before sending.
pub const MARKET_SEARCH_PROMPT_TEMPLATE: &str = "Job market trends and openings for: {query}.";
