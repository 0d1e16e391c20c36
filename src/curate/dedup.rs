// src/curate/dedup.rs
use std::collections::HashSet;

use metrics::counter;
use url::Url;

use crate::curate::Candidate;
use crate::ingest::normalize_text;
use crate::ingest::types::TaggedRecord;

/// Counts from one ingest + dedup pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupReport {
    pub candidates: Vec<Candidate>,
    pub invalid: usize,
    pub duplicates: usize,
}

impl DedupReport {
    /// Filter invalid records, then drop later duplicates.
    pub fn run(records: Vec<TaggedRecord>) -> Self {
        let (valid, invalid) = ingest(records);
        let (candidates, duplicates) = dedup(valid);

        counter!("digest_invalid_total").increment(invalid as u64);
        counter!("digest_dedup_total").increment(duplicates as u64);

        Self {
            candidates,
            invalid,
            duplicates,
        }
    }
}

/// Identifying key for a URL.
///
/// Parseable URLs are compared after `url` normalization (lowercase scheme and
/// host, no fragment) with trailing slashes removed; anything else compares as
/// the trimmed string.
pub fn canonical_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(mut u) => {
            u.set_fragment(None);
            u.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => trimmed.trim_end_matches('/').to_string(),
    }
}

/// Turn tagged records into candidates, in flattening order.
///
/// Records without a source URL violate the candidate invariant and are
/// dropped here, before dedup. Returns `(candidates, dropped)`.
pub fn ingest(mut records: Vec<TaggedRecord>) -> (Vec<Candidate>, usize) {
    records.sort_by_key(|r| r.origin);

    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(records.len());
    for tagged in records {
        let rec = tagged.record;
        let source_url = rec.source_url.trim().to_string();
        if source_url.is_empty() {
            dropped += 1;
            continue;
        }
        out.push(Candidate {
            title: normalize_text(&rec.title),
            source_url,
            secondary_url: rec
                .secondary_url
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            content: normalize_text(&rec.content),
            rank_signal: rec.rank_signal.filter(|r| r.is_finite()).unwrap_or(0.0),
            source_tag: tagged.category,
            origin: tagged.origin,
        });
    }
    (out, dropped)
}

/// Drop candidates whose key was already seen; first occurrence wins.
/// Returns `(kept, duplicates)`.
pub fn dedup(candidates: Vec<Candidate>) -> (Vec<Candidate>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    let mut kept = Vec::with_capacity(candidates.len());
    let mut duplicates = 0usize;

    for c in candidates {
        if !seen.insert(canonical_key(&c.source_url)) {
            duplicates += 1;
            continue;
        }
        kept.push(c);
    }
    (kept, duplicates)
}
