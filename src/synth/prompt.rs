// src/synth/prompt.rs
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::curate::CurationInput;

/// `[prompt]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub persona: String,
    pub tone: String,
    /// Per-item length, in words the model understands ("5-7 sentences").
    pub target_length: String,
    pub max_items: usize,
    /// Natural-language freshness rule; the core never enforces it.
    pub freshness_cutoff: String,
    /// Plain text and line breaks only.
    pub forbid_markup: bool,
    pub required_sections: Vec<String>,
    pub heading: String,
    pub extra_rules: Vec<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: "an expert technology curator who reads the day's most popular tech stories and explains why they matter".into(),
            tone: "insightful and analytical, never hype".into(),
            target_length: "5-7 sentences".into(),
            max_items: crate::curate::select::DEFAULT_CAP,
            freshness_cutoff: "Only cover items published today; skip anything older.".into(),
            forbid_markup: true,
            required_sections: vec![
                "[Title]".into(),
                "Link".into(),
                "[In-depth analysis]: background, key points, and impact on the industry".into(),
            ],
            heading: "Today's Tech Insight Report".into(),
            extra_rules: Vec::new(),
        }
    }
}

/// Render the full prompt for one run.
pub fn render(cfg: &PromptConfig, input: &CurationInput, date: NaiveDate) -> String {
    let today = date.format("%B %-d, %Y").to_string();
    let n = input.items.min(cfg.max_items.max(1));
    let mut p = String::new();

    let _ = writeln!(p, "Today is {today}. You are {}.", cfg.persona);
    let _ = writeln!(p, "Write in a tone that is {}.", cfg.tone);
    let _ = writeln!(p);
    let _ = writeln!(p, "[Instructions]");
    let _ = writeln!(
        p,
        "1. The source data below holds the top {n} items selected for today. Cover at most {} items.",
        cfg.max_items
    );
    let _ = writeln!(p, "2. For every item use exactly these sections, in order:");
    for section in &cfg.required_sections {
        let _ = writeln!(p, "   - {section}");
    }
    let _ = writeln!(
        p,
        "   Explain each item in about {}; go beyond summary and say why it matters.",
        cfg.target_length
    );
    let _ = writeln!(p, "3. {}", cfg.freshness_cutoff);
    let _ = writeln!(p, "   If nothing qualifies, reply only with: No new items today");
    let _ = writeln!(p);
    let _ = writeln!(p, "[Rules]");
    let _ = writeln!(p, "- Do not include rank signals or popularity scores.");
    let _ = writeln!(
        p,
        "- Give exactly one link per item; prefer the Mirror link when present."
    );
    if cfg.forbid_markup {
        let _ = writeln!(
            p,
            "- Do not use any Markdown syntax (no **bold**, no # headings). Use square brackets [] and line breaks for emphasis."
        );
        let _ = writeln!(
            p,
            "- Output plain text with line breaks only, suitable for an email body."
        );
    }
    for rule in &cfg.extra_rules {
        let _ = writeln!(p, "- {rule}");
    }
    let _ = writeln!(p);
    let _ = writeln!(p, "[Layout]");
    let _ = writeln!(p, "- [{} TOP {n}]", cfg.heading);
    let _ = writeln!(p, "- (as of {today})");
    let _ = writeln!(p);
    let _ = writeln!(p, "[Source data]");
    p.push_str(&input.text);
    p.push('\n');
    p
}
