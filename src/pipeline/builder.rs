use std::sync::Arc;

use crate::config::EvaluatorConfig;
use crate::error::PronunciationError;
use crate::lexicon::dictionary::{LexiconHandle, PronunciationDictionary};
use crate::pipeline::defaults::ReferenceTextTranscriber;
use crate::pipeline::mfa::MfaCommandAligner;
use crate::pipeline::runtime::{PronunciationEvaluator, PronunciationEvaluatorParts};
use crate::pipeline::traits::{ForcedAlignmentTool, Transcriber};

pub struct EvaluatorBuilder {
    config: EvaluatorConfig,
    lexicon: Option<Arc<LexiconHandle>>,
    alignment_tool: Option<Box<dyn ForcedAlignmentTool>>,
    transcriber: Option<Box<dyn Transcriber>>,
}

impl EvaluatorBuilder {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            lexicon: None,
            alignment_tool: None,
            transcriber: None,
        }
    }

    /// Shares an already loaded dictionary, e.g. the process-wide one.
    pub fn with_lexicon(mut self, lexicon: Arc<LexiconHandle>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_alignment_tool(mut self, alignment_tool: Box<dyn ForcedAlignmentTool>) -> Self {
        self.alignment_tool = Some(alignment_tool);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Box<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn build(self) -> Result<PronunciationEvaluator, PronunciationError> {
        let lexicon = match self.lexicon {
            Some(lexicon) => lexicon,
            None => {
                let path = self.config.dictionary_path.as_deref().ok_or_else(|| {
                    PronunciationError::lexicon(
                        "no dictionary_path configured and no lexicon supplied",
                    )
                })?;
                Arc::new(LexiconHandle::new(PronunciationDictionary::load(path)?))
            }
        };

        let aligner_config = self.config.aligner;
        Ok(PronunciationEvaluator::from_parts(PronunciationEvaluatorParts {
            lexicon,
            aligner: self
                .alignment_tool
                .unwrap_or_else(|| Box::new(MfaCommandAligner::new(aligner_config))),
            transcriber: self
                .transcriber
                .unwrap_or_else(|| Box::new(ReferenceTextTranscriber)),
            reconciler: self.config.reconciler,
            scoring: self.config.scoring,
        }))
    }
}
