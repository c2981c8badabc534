use crate::error::PronunciationError;
use crate::pipeline::traits::Transcriber;

/// Uses the reference text as the transcript the aligner is given.
pub struct ReferenceTextTranscriber;

impl Transcriber for ReferenceTextTranscriber {
    fn transcribe(&self, _audio: &[u8], reference_text: &str) -> Result<String, PronunciationError> {
        let transcript = reference_text.trim();
        if transcript.is_empty() {
            return Err(PronunciationError::invalid_input(
                "reference text is empty; nothing to align against",
            ));
        }
        Ok(transcript.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_text_transcriber_trims() {
        let transcript = ReferenceTextTranscriber
            .transcribe(&[], "  The cat sat.\n")
            .expect("transcript");
        assert_eq!(transcript, "The cat sat.");
    }

    #[test]
    fn reference_text_transcriber_rejects_blank_text() {
        let err = ReferenceTextTranscriber.transcribe(&[], " \t ").unwrap_err();
        assert!(matches!(err, PronunciationError::InvalidInput { .. }));
    }
}
