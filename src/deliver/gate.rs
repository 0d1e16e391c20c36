// src/deliver/gate.rs
//! Length-only decision on whether synthesized text is worth sending.

use crate::synth::SynthesisResult;

/// Minimum trimmed length, in characters, of a deliverable result.
pub const MIN_MEANINGFUL_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Deliver,
    Skip { trimmed_chars: usize },
}

/// Pure: counts characters (not bytes) of the trimmed text.
pub fn evaluate(result: &SynthesisResult, min_chars: usize) -> GateDecision {
    let trimmed_chars = result.text().trim().chars().count();
    if trimmed_chars < min_chars {
        GateDecision::Skip { trimmed_chars }
    } else {
        GateDecision::Deliver
    }
}
