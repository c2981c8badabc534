use crate::error::PronunciationError;
use crate::types::AlignerOutput;

/// Word to phoneme lookup used when deriving expected phonemes.
pub trait PronunciationLexicon: Send + Sync {
    /// Phonemes of the first listed pronunciation of `word` (lowercase).
    fn first_pronunciation(&self, word: &str) -> Option<&[String]>;
}

/// Produces word and phone tiers for an utterance.
pub trait ForcedAlignmentTool: Send + Sync {
    fn align(&self, audio: &[u8], transcript: &str) -> Result<AlignerOutput, PronunciationError>;
}

pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &[u8], reference_text: &str) -> Result<String, PronunciationError>;
}
