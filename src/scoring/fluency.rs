use crate::config::ScoringConfig;
use crate::types::Alignment;

/// Unrounded fluency figures; rounding happens when the report is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFluency {
    /// Phonemes per second over the span from first word start to last word end.
    pub speech_rate: f64,
    pub pause_count: u32,
    pub avg_phoneme_duration: Option<f64>,
}

pub fn compute_fluency(alignment: &Alignment, config: &ScoringConfig) -> RawFluency {
    let (Some(first), Some(last)) = (alignment.words.first(), alignment.words.last()) else {
        return RawFluency {
            speech_rate: 0.0,
            pause_count: 0,
            avg_phoneme_duration: None,
        };
    };

    let total_duration = (last.end - first.start).max(config.min_duration_sec);
    let speech_rate = alignment.phoneme_count() as f64 / total_duration;

    RawFluency {
        speech_rate,
        pause_count: count_pauses(alignment, config.pause_threshold_sec),
        avg_phoneme_duration: mean_phoneme_duration(alignment),
    }
}

/// Gaps between consecutive words strictly longer than `threshold_sec`.
pub fn count_pauses(alignment: &Alignment, threshold_sec: f64) -> u32 {
    let pauses = alignment
        .words
        .windows(2)
        .filter(|pair| pair[1].start - pair[0].end > threshold_sec)
        .count();
    u32::try_from(pauses).unwrap_or(u32::MAX)
}

/// Mean duration of well-formed phonemes, `None` when there are none.
pub fn mean_phoneme_duration(alignment: &Alignment) -> Option<f64> {
    let durations: Vec<f64> = alignment
        .words
        .iter()
        .flat_map(|word| word.phonemes.iter())
        .filter(|phoneme| phoneme.is_well_formed())
        .map(|phoneme| phoneme.duration())
        .collect();
    if durations.is_empty() {
        return None;
    }
    Some(durations.iter().sum::<f64>() / durations.len() as f64)
}
