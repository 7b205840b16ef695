const TEXT_SLOT: &str = "{text}";
const SUMMARIES_SLOT: &str = "{summaries}";

pub const FINAL_SUMMARY_WORD_LIMIT: usize = 120;

pub const ANALYSIS_PROMPT: &str = r#"You are a market analysis AI.

Analyze the following market or sales data and return ONLY valid JSON
with the following structure:

{
  "trend": "Positive | Negative | Neutral",
  "drivers": ["driver1", "driver2"],
  "summary": "short summary",
  "risks": ["risk1", "risk2"]
}

Data:
{text}
"#;

pub const CHUNK_PROMPT: &str = r#"You are a market analyst.

Summarize the following text in 3 bullet points:
- Overall market sentiment
- Key sectors
- Important signals

Text:
{text}
"#;

pub const FINAL_PROMPT: &str = r#"You are a senior market strategist.

Based on the summaries below:
1. Identify overall market trend (Bullish / Bearish / Neutral)
2. List top 3 drivers
3. Give a short summary (max 120 words)
4. Mention risks

Return JSON strictly:

{
  "trend": "",
  "drivers": [],
  "summary": "",
  "risks": []
}

Summaries:
{summaries}
"#;

pub fn build_analysis_prompt(text: &str) -> String {
    ANALYSIS_PROMPT.replace(TEXT_SLOT, text)
}

pub fn build_chunk_prompt(chunk: &str) -> String {
    CHUNK_PROMPT.replace(TEXT_SLOT, chunk)
}

pub fn build_final_prompt(summaries: &[String]) -> String {
    FINAL_PROMPT.replace(SUMMARIES_SLOT, &summaries.join("\n\n"))
}
