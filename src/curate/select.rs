// src/curate/select.rs
//! Ranked selection with optional per-category floors.
//!
//! Two phases:
//! 1. each configured floor reserves up to `min` slots for its category,
//!    picked by rank within that category;
//! 2. remaining slots are filled by global rank.
//!
//! Rank is descending `rank_signal`; the sort is stable, so equal signals
//! (including the all-zero batch) keep input order. A floor its category
//! cannot meet stays unmet; phase 2 still fills to the cap by global rank.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::curate::Candidate;
use crate::ingest::types::Category;

pub const DEFAULT_CAP: usize = 5;
pub const MAX_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFloor {
    pub category: Category,
    pub min: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default = "default_cap")]
    pub cap: usize,
    #[serde(default)]
    pub floors: Vec<CategoryFloor>,
}

fn default_cap() -> usize {
    DEFAULT_CAP
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            floors: Vec::new(),
        }
    }
}

impl SelectionPolicy {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            floors: Vec::new(),
        }
    }

    pub fn with_floor(mut self, category: Category, min: usize) -> Self {
        self.floors.push(CategoryFloor { category, min });
        self
    }
}

/// Signed zero and NaN fold to `0.0` so equal signals compare equal.
fn rank_key(r: f64) -> f64 {
    if r == 0.0 || r.is_nan() {
        0.0
    } else {
        r
    }
}

fn by_rank(a: &Candidate, b: &Candidate) -> Ordering {
    rank_key(b.rank_signal).total_cmp(&rank_key(a.rank_signal))
}

/// Select at most `policy.cap` candidates, returned in rank order.
pub fn select(candidates: &[Candidate], policy: &SelectionPolicy) -> Vec<Candidate> {
    let cap = policy.cap.min(MAX_CAP);
    if cap == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| by_rank(&candidates[a], &candidates[b]));

    let mut taken = vec![false; candidates.len()];
    let mut count = 0usize;

    // Phase 1: floors.
    for floor in &policy.floors {
        let mut reserved = 0usize;
        for &i in &order {
            if count >= cap || reserved >= floor.min {
                break;
            }
            if !taken[i] && candidates[i].source_tag == floor.category {
                taken[i] = true;
                reserved += 1;
                count += 1;
            }
        }
        if reserved < floor.min {
            tracing::debug!(
                category = %floor.category,
                wanted = floor.min,
                got = reserved,
                "category floor unmet"
            );
        }
    }

    // Phase 2: global fill.
    for &i in &order {
        if count >= cap {
            break;
        }
        if !taken[i] {
            taken[i] = true;
            count += 1;
        }
    }

    order
        .into_iter()
        .filter(|&i| taken[i])
        .map(|i| candidates[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Origin;

    fn cand(url: &str, rank: f64, tag: Category) -> Candidate {
        Candidate {
            title: url.to_uppercase(),
            source_url: url.to_string(),
            secondary_url: None,
            content: String::new(),
            rank_signal: rank,
            source_tag: tag,
            origin: Origin {
                query: 0,
                position: 0,
            },
        }
    }

    fn urls(v: &[Candidate]) -> Vec<&str> {
        v.iter().map(|c| c.source_url.as_str()).collect()
    }

    #[test]
    fn zero_cap_selects_nothing() {
        let c = vec![cand("a", 1.0, Category::News)];
        assert!(select(&c, &SelectionPolicy::with_cap(0)).is_empty());
    }

    #[test]
    fn signed_zero_ties_keep_input_order() {
        let c = vec![
            cand("neg", -0.0, Category::News),
            cand("pos", 0.0, Category::News),
            cand("top", 1.0, Category::News),
        ];
        assert_eq!(
            urls(&select(&c, &SelectionPolicy::with_cap(3))),
            vec!["top", "neg", "pos"]
        );
    }

    #[test]
    fn floor_larger_than_cap_is_clamped() {
        let c = vec![
            cand("a", 9.0, Category::Global),
            cand("b", 1.0, Category::Domestic),
            cand("c", 2.0, Category::Domestic),
            cand("d", 3.0, Category::Domestic),
        ];
        let p = SelectionPolicy::with_cap(2).with_floor(Category::Domestic, 3);
        assert_eq!(urls(&select(&c, &p)), vec!["d", "c"]);
    }
}
