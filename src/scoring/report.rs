use crate::config::ScoringConfig;
use crate::error::PronunciationError;
use crate::scoring::accuracy::similarity_ratio;
use crate::scoring::diagnostics::positional_discrepancies;
use crate::scoring::fluency::compute_fluency;
use crate::types::{Alignment, FluencyMetrics, ScoreReport, ScoringRequest, WordInterval};

const ACCURACY_DECIMALS: usize = 2;
const SPEECH_RATE_DECIMALS: usize = 2;
const PHONEME_DURATION_DECIMALS: usize = 3;

/// Scores a request received on the scoring boundary.
pub fn score_request(
    request: &ScoringRequest,
    config: &ScoringConfig,
) -> Result<ScoreReport, PronunciationError> {
    let alignment = alignment_from_request(request)?;
    Ok(score_alignment(
        &alignment,
        &request.expected_phonemes,
        config,
    ))
}

/// Rebuilds the nested alignment, rejecting word entries that carry no
/// `phonemes` field at all. An empty list is accepted.
pub fn alignment_from_request(request: &ScoringRequest) -> Result<Alignment, PronunciationError> {
    let words = request
        .alignment
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let phonemes =
                entry
                    .phonemes
                    .clone()
                    .ok_or_else(|| PronunciationError::MalformedAlignment {
                        word: entry.word.clone(),
                        index,
                    })?;
            Ok(WordInterval {
                word: entry.word.clone(),
                start: entry.start,
                end: entry.end,
                phonemes,
            })
        })
        .collect::<Result<Vec<_>, PronunciationError>>()?;
    Ok(Alignment { words })
}

pub fn score_alignment<S: AsRef<str>>(
    alignment: &Alignment,
    expected: &[S],
    config: &ScoringConfig,
) -> ScoreReport {
    let actual = alignment.phoneme_labels();
    let accuracy = similarity_ratio(expected, &actual);
    let fluency = compute_fluency(alignment, config);
    let errors: Vec<String> = positional_discrepancies(expected, &actual)
        .iter()
        .map(ToString::to_string)
        .collect();

    tracing::debug!(
        expected_count = expected.len(),
        actual_count = actual.len(),
        accuracy = format!("{accuracy:.3}"),
        pause_count = fluency.pause_count,
        error_count = errors.len(),
        "scoring: utterance scored"
    );

    ScoreReport {
        accuracy: round_to(accuracy, ACCURACY_DECIMALS),
        fluency: FluencyMetrics {
            speech_rate: round_to(fluency.speech_rate, SPEECH_RATE_DECIMALS),
            pause_count: fluency.pause_count,
            avg_phoneme_duration: fluency
                .avg_phoneme_duration
                .map(|value| round_to(value, PHONEME_DURATION_DECIMALS)),
        },
        errors,
    }
}

/// Rounds the exact decimal value of `value`, not `value * 10^n`.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
