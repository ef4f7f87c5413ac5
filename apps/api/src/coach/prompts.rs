// LLM prompt constants for the coaching features.

/// System prompt for conversational career advice.
pub const STRATEGIST_SYSTEM: &str =
    "You are a world-class Career Strategist. Provide actionable, data-driven advice.";

/// Roadmap prompt template.
/// Replace `{current_role}` and `{goal_role}` before sending.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Generate a 4-step professional roadmap from {current_role} to {goal_role}.

Return a JSON ARRAY of exactly 4 ordered steps:
[
  {
    "role": "string",
    "salaryRange": "string, e.g. $120k - $150k",
    "difficulty": 0,
    "description": "2-3 sentences on this step",
    "keySkills": ["string"]
  }
]

RULES:
- "difficulty" is 0-10, the effort to reach this step from the previous one.
- Steps must be ordered from the current role toward the goal role."#;

/// Skill-gap prompt template.
/// Replace `{skills}` and `{target_role}` before sending.
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Compare skills: [{skills}] for role: {target_role}.

Return a JSON ARRAY with one entry per skill:
[
  {
    "name": "string",
    "current": 0,
    "market": 0
  }
]

RULES:
- "current" is the user's estimated proficiency, 0-100.
- "market" is the demand for that skill in the target role, 0-100.
- Include every listed skill exactly once."#;
