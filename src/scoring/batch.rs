use std::cmp::Ordering;

use serde::Serialize;

use crate::error::PronunciationError;
use crate::types::ScoreReport;

const LOWEST_ACCURACY_TOP_N: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub schema_version: u32,
    pub meta: BatchMeta,
    pub utterances: Vec<UtteranceScore>,
    pub aggregates: BatchAggregates,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMeta {
    pub generated_at: String,
    pub source: String,
    pub utterance_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UtteranceScore {
    pub id: String,
    pub score: ScoreReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAggregates {
    pub count: u32,
    pub accuracy: Option<MetricDistribution>,
    pub speech_rate: Option<MetricDistribution>,
    pub pause_count: Option<MetricDistribution>,
    pub lowest_accuracy: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDistribution {
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub value: f64,
}

pub fn build_batch_report(
    meta: BatchMeta,
    utterances: Vec<UtteranceScore>,
) -> Result<BatchReport, PronunciationError> {
    let aggregates = aggregate_scores(&utterances)?;
    Ok(BatchReport {
        schema_version: 1,
        meta,
        utterances,
        aggregates,
    })
}

pub fn aggregate_scores(
    utterances: &[UtteranceScore],
) -> Result<BatchAggregates, PronunciationError> {
    let accuracy = checked_values(utterances, "accuracy", |u| u.score.accuracy)?;
    let speech_rate = checked_values(utterances, "speech_rate", |u| u.score.fluency.speech_rate)?;
    let pause_count = checked_values(utterances, "pause_count", |u| {
        u.score.fluency.pause_count as f64
    })?;

    Ok(BatchAggregates {
        count: u32::try_from(utterances.len()).unwrap_or(u32::MAX),
        accuracy: distribution_or_none(&accuracy),
        speech_rate: distribution_or_none(&speech_rate),
        pause_count: distribution_or_none(&pause_count),
        lowest_accuracy: lowest_ranked(utterances, LOWEST_ACCURACY_TOP_N),
    })
}

fn checked_values(
    utterances: &[UtteranceScore],
    metric_name: &str,
    metric: impl Fn(&UtteranceScore) -> f64,
) -> Result<Vec<f64>, PronunciationError> {
    utterances
        .iter()
        .map(|utterance| {
            let value = metric(utterance);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(PronunciationError::invalid_input(format!(
                    "metric '{metric_name}' of '{}' is non-finite: {value}",
                    utterance.id
                )))
            }
        })
        .collect()
}

fn lowest_ranked(utterances: &[UtteranceScore], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = utterances
        .iter()
        .map(|utterance| OutlierEntry {
            id: utterance.id.clone(),
            value: utterance.score.accuracy,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.truncate(top_n);
    entries
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: sorted.iter().sum::<f64>() / sorted.len().max(1) as f64,
        p50: interpolated_quantile(&sorted, 0.5)?,
        p90: interpolated_quantile(&sorted, 0.9)?,
    })
}

/// Linear interpolation between the two closest ranks of an ascending slice.
fn interpolated_quantile(sorted_values: &[f64], quantile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let rank = quantile.clamp(0.0, 1.0) * last as f64;
    let below = rank.floor() as usize;
    let above = (below + 1).min(last);
    let fraction = rank - below as f64;
    let low = sorted_values[below];
    Some(low + (sorted_values[above] - low) * fraction)
}
