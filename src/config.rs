use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PronunciationError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// How far (seconds) a phone may end past its word's end and still belong to it.
    pub boundary_tolerance_sec: f64,
    pub silence_labels: Vec<String>,
}

impl ReconcilerConfig {
    pub const DEFAULT_BOUNDARY_TOLERANCE_SEC: f64 = 1e-4;

    pub fn is_silence(&self, label: &str) -> bool {
        self.silence_labels.iter().any(|silence| silence == label)
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            boundary_tolerance_sec: Self::DEFAULT_BOUNDARY_TOLERANCE_SEC,
            silence_labels: vec!["sil".to_string(), "sp".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Inter-word gaps strictly longer than this count as pauses.
    pub pause_threshold_sec: f64,
    /// Floor for the utterance duration used as the speech-rate denominator.
    pub min_duration_sec: f64,
}

impl ScoringConfig {
    pub const DEFAULT_PAUSE_THRESHOLD_SEC: f64 = 0.3;
    pub const DEFAULT_MIN_DURATION_SEC: f64 = 0.001;
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pause_threshold_sec: Self::DEFAULT_PAUSE_THRESHOLD_SEC,
            min_duration_sec: Self::DEFAULT_MIN_DURATION_SEC,
        }
    }
}

/// Settings for the out-of-process forced aligner.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignerToolConfig {
    pub command: String,
    pub dictionary: String,
    pub acoustic_model: String,
    pub output_root: PathBuf,
    pub expected_sample_rate_hz: u32,
}

impl AlignerToolConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;
}

impl Default for AlignerToolConfig {
    fn default() -> Self {
        Self {
            command: "mfa".to_string(),
            dictionary: "english_us_arpa".to_string(),
            acoustic_model: "english_us_arpa".to_string(),
            output_root: PathBuf::from("mfa_outputs"),
            expected_sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub reconciler: ReconcilerConfig,
    pub scoring: ScoringConfig,
    pub aligner: AlignerToolConfig,
    /// CMUdict-style text file or JSON map used for expected phonemes.
    pub dictionary_path: Option<PathBuf>,
}

impl EvaluatorConfig {
    pub fn load(path: &Path) -> Result<Self, PronunciationError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PronunciationError::io("read evaluator config", e))?;
        serde_json::from_str(&data)
            .map_err(|e| PronunciationError::json("parse evaluator config", e))
    }
}
