use std::sync::Arc;
use std::time::Instant;

use crate::alignment::reconcile::reconcile_tiers;
use crate::config::{ReconcilerConfig, ScoringConfig};
use crate::error::PronunciationError;
use crate::lexicon::dictionary::LexiconHandle;
use crate::lexicon::tokenization::expected_phonemes;
use crate::pipeline::traits::{ForcedAlignmentTool, Transcriber};
use crate::scoring::report::score_request;
use crate::types::{EvaluationInput, EvaluationOutput, ScoreReport, ScoringRequest};

/// Audio plus reference text in, scored alignment out.
pub struct PronunciationEvaluator {
    lexicon: Arc<LexiconHandle>,
    aligner: Box<dyn ForcedAlignmentTool>,
    transcriber: Box<dyn Transcriber>,
    reconciler: ReconcilerConfig,
    scoring: ScoringConfig,
}

pub(crate) struct PronunciationEvaluatorParts {
    pub lexicon: Arc<LexiconHandle>,
    pub aligner: Box<dyn ForcedAlignmentTool>,
    pub transcriber: Box<dyn Transcriber>,
    pub reconciler: ReconcilerConfig,
    pub scoring: ScoringConfig,
}

impl PronunciationEvaluator {
    pub(crate) fn from_parts(parts: PronunciationEvaluatorParts) -> Self {
        Self {
            lexicon: parts.lexicon,
            aligner: parts.aligner,
            transcriber: parts.transcriber,
            reconciler: parts.reconciler,
            scoring: parts.scoring,
        }
    }

    pub fn lexicon(&self) -> &Arc<LexiconHandle> {
        &self.lexicon
    }

    pub fn evaluate(&self, input: &EvaluationInput) -> Result<EvaluationOutput, PronunciationError> {
        let started = Instant::now();
        let transcription = self.resolve_transcript(input)?;

        let aligned = self.aligner.align(&input.audio, &transcription)?;
        let alignment = reconcile_tiers(&aligned.tiers, &self.reconciler)?;
        let expected = self.expected_phonemes(&input.reference_text);

        let request = ScoringRequest::new(
            alignment,
            expected,
            aligned
                .textgrid_path
                .map(|path| path.to_string_lossy().into_owned()),
        );
        let score = self.score(&request)?;

        tracing::debug!(
            words = request.alignment.len(),
            expected_phonemes = request.expected_phonemes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evaluator: utterance evaluated"
        );

        Ok(EvaluationOutput {
            transcription,
            phoneme_alignment: request,
            pronunciation_score: score,
        })
    }

    /// Expected phonemes from the lexicon as it is at call time.
    pub fn expected_phonemes(&self, reference_text: &str) -> Vec<String> {
        let dictionary = self.lexicon.snapshot();
        expected_phonemes(reference_text, dictionary.as_ref())
    }

    pub fn score(&self, request: &ScoringRequest) -> Result<ScoreReport, PronunciationError> {
        score_request(request, &self.scoring)
    }

    fn resolve_transcript(&self, input: &EvaluationInput) -> Result<String, PronunciationError> {
        let transcript = match input.transcript.as_deref() {
            Some(known) => known.trim().to_string(),
            None => self
                .transcriber
                .transcribe(&input.audio, &input.reference_text)?,
        };
        if transcript.trim().is_empty() {
            return Err(PronunciationError::invalid_input(
                "transcript is empty; nothing to align",
            ));
        }
        Ok(transcript)
    }
}
