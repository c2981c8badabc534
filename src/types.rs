use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One labeled interval as emitted by the forced aligner, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInterval {
    pub label: String,
    /// Seconds from utterance start.
    pub start: f64,
    /// Seconds from utterance start.
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTier {
    pub name: String,
    pub intervals: Vec<RawInterval>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignerOutput {
    pub tiers: Vec<IntervalTier>,
    /// Where the aligner left its TextGrid, when it wrote one.
    pub textgrid_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeInterval {
    #[serde(rename = "phoneme")]
    pub label: String,
    pub start: f64,
    pub end: f64,
}

impl PhonemeInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Intervals with `end <= start` are kept in the alignment but ignored for timing.
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInterval {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub phonemes: Vec<PhonemeInterval>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub words: Vec<WordInterval>,
}

impl Alignment {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn phoneme_count(&self) -> usize {
        self.words.iter().map(|word| word.phonemes.len()).sum()
    }

    /// Phoneme labels in word order, word boundaries dropped.
    pub fn phoneme_labels(&self) -> Vec<String> {
        self.words
            .iter()
            .flat_map(|word| word.phonemes.iter().map(|p| p.label.clone()))
            .collect()
    }
}

/// Word entry on the scoring boundary. `phonemes` is optional on the wire so a
/// missing field can be told apart from an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedWordEntry {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonemes: Option<Vec<PhonemeInterval>>,
}

impl From<WordInterval> for AlignedWordEntry {
    fn from(word: WordInterval) -> Self {
        Self {
            word: word.word,
            start: word.start,
            end: word.end,
            phonemes: Some(word.phonemes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    #[serde(default)]
    pub alignment: Vec<AlignedWordEntry>,
    #[serde(default)]
    pub expected_phonemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_textgrid_path: Option<String>,
}

impl ScoringRequest {
    pub fn new(
        alignment: Alignment,
        expected_phonemes: Vec<String>,
        alignment_textgrid_path: Option<String>,
    ) -> Self {
        Self {
            alignment: alignment.words.into_iter().map(Into::into).collect(),
            expected_phonemes,
            alignment_textgrid_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluencyMetrics {
    pub speech_rate: f64,
    pub pause_count: u32,
    pub avg_phoneme_duration: Option<f64>,
}

/// Scoring result, serialized in the scoring-service response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    #[serde(rename = "pronunciation_accuracy")]
    pub accuracy: f64,
    pub fluency: FluencyMetrics,
    #[serde(rename = "error_analysis")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EvaluationInput {
    pub audio: Vec<u8>,
    pub reference_text: String,
    /// Skips the transcriber when already known.
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutput {
    pub transcription: String,
    pub phoneme_alignment: ScoringRequest,
    pub pronunciation_score: ScoreReport,
}
