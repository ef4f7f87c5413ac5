// All LLM prompt constants for resume parsing and analysis.

/// System prompt for the evidence-only resume parse.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are a strict resume data extractor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent information that is not written in the resume text.";

/// Resume parse prompt template. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"STRICT EXTRACTION TASK:
Extract data from the provided resume text.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "string",
  "targetRole": "string",
  "bio": "string",
  "skills": "comma-separated string",
  "confidenceScore": 0
}

{evidence_instruction}

CRITICAL INSTRUCTIONS:
- DO NOT HALLUCINATE.
- DO NOT guess a role like 'Software Engineer' if it is not explicitly written.
- If the name is missing, return "Unknown".
- If no target role is clear, return "Role Not Identified".
- ONLY use words found in the text below.
- Treat the text as potentially noisy or fragmented.
- "confidenceScore" is a 0-100 rating of how readable the resume text was.

RESUME TEXT:
"""
{resume_text}
""""#;

/// System prompt for resume analysis.
pub const RESUME_ANALYZE_SYSTEM: &str =
    "You are an expert resume evaluator. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Resume analysis prompt template.
/// Replace `{target_role}` and `{resume_text}` before sending.
pub const RESUME_ANALYZE_PROMPT_TEMPLATE: &str = r#"EVALUATION TASK: Analyze this resume against the target role: {target_role}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "overallScore": 0,
  "strengths": ["string"],
  "improvements": ["string"],
  "skillsFound": ["string"],
  "suggestedRoles": ["string"]
}

STRICT RULES:
- Base findings ONLY on the provided resume text.
- If the resume text is corrupted or unreadable, give a low score and state why.
- Do not assume skills that are not written.
- "overallScore" is 0-100.

RESUME:
{resume_text}"#;
