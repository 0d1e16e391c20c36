// src/curate/digest.rs
use std::fmt::Write as _;

use crate::curate::Candidate;

pub const ITEM_DELIMITER: &str = "\n\n---\n\n";

/// Selected candidates serialized for the synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationInput {
    pub text: String,
    pub items: usize,
}

impl CurationInput {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let text = candidates
            .iter()
            .map(render_item)
            .collect::<Vec<_>>()
            .join(ITEM_DELIMITER);
        Self {
            text,
            items: candidates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}

fn render_item(c: &Candidate) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Title: {}", c.title);
    let _ = writeln!(s, "Source: {}", c.source_url);
    if let Some(mirror) = &c.secondary_url {
        let _ = writeln!(s, "Mirror: {mirror}");
    }
    let _ = writeln!(s, "Category: {}", c.source_tag);
    let _ = writeln!(s, "Rank signal: {}", format_rank(c.rank_signal));
    let _ = write!(s, "Summary: {}", c.content);
    s
}

fn format_rank(r: f64) -> String {
    if r.fract() == 0.0 {
        format!("{r:.0}")
    } else {
        format!("{r:.2}")
    }
}
