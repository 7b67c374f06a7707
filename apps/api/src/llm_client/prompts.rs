// Shared prompt fragments.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the rules every extraction prompt repeats.

/// Output rules appended to every profile extraction prompt.
pub const OUTPUT_RULES: &str = "\
Important notes:
- For dates, use format \"YYYY-MM\" or \"YYYY\" for years only
- Use \"Present\" for current positions
- If information is not available, use empty string or empty array
- Return ONLY valid JSON, no additional text or formatting";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Return only valid JSON without any additional text or formatting.";
