use crate::alignment::tiers::select_word_and_phone_tiers;
use crate::config::ReconcilerConfig;
use crate::error::PronunciationError;
use crate::types::{Alignment, IntervalTier, PhonemeInterval, RawInterval, WordInterval};

#[cfg(test)]
mod tests;

/// Picks the word and phone tiers out of an aligner's tier list and nests them.
pub fn reconcile_tiers(
    tiers: &[IntervalTier],
    config: &ReconcilerConfig,
) -> Result<Alignment, PronunciationError> {
    let (word_tier, phone_tier) = select_word_and_phone_tiers(tiers)?;
    Ok(reconcile_intervals(
        &word_tier.intervals,
        &phone_tier.intervals,
        config,
    ))
}

/// Attaches each phone to the word it temporally falls in.
///
/// Both inputs must be sorted by start time. The phone cursor only moves
/// forward: a phone is consumed by the first non-empty word whose end it does
/// not overrun by more than the boundary tolerance, and is never looked at
/// again. Phones inside an empty-label word therefore land in the next real
/// word, and phones after the last word are dropped.
pub fn reconcile_intervals(
    words: &[RawInterval],
    phones: &[RawInterval],
    config: &ReconcilerConfig,
) -> Alignment {
    let tolerance = config.boundary_tolerance_sec;
    let mut out = Vec::with_capacity(words.len());
    let mut phone_idx = 0usize;

    for word in words {
        let label = word.label.trim();
        if label.is_empty() {
            continue;
        }

        let mut phonemes = Vec::new();
        while let Some(phone) = phones.get(phone_idx) {
            if phone.end - word.end > tolerance {
                break;
            }
            let phone_label = phone.label.trim();
            if !phone_label.is_empty() && !config.is_silence(phone_label) {
                phonemes.push(PhonemeInterval {
                    label: phone_label.to_string(),
                    start: phone.start,
                    end: phone.end,
                });
            }
            phone_idx += 1;
        }

        if let Some(prev) = out.last().map(|w: &WordInterval| w.start) {
            if word.start < prev {
                tracing::warn!(
                    word = label,
                    start = word.start,
                    previous_start = prev,
                    "reconcile: word tier is not sorted by start time"
                );
            }
        }

        out.push(WordInterval {
            word: label.to_string(),
            start: word.start,
            end: word.end,
            phonemes,
        });
    }

    let dropped = phones.len() - phone_idx;
    if dropped > 0 {
        tracing::debug!(
            dropped,
            "reconcile: phone intervals past the last word were not attached"
        );
    }

    Alignment { words: out }
}
