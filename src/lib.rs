pub mod alignment;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod scoring;
pub mod types;

pub use alignment::reconcile::{reconcile_intervals, reconcile_tiers};
pub use alignment::textgrid_io::read_textgrid;
pub use config::{AlignerToolConfig, EvaluatorConfig, ReconcilerConfig, ScoringConfig};
pub use error::PronunciationError;
pub use lexicon::dictionary::{
    global_lexicon, init_global_lexicon, LexiconHandle, PronunciationDictionary,
};
pub use lexicon::tokenization::{expected_phonemes, tokenize_reference};
pub use pipeline::builder::EvaluatorBuilder;
pub use pipeline::defaults::ReferenceTextTranscriber;
pub use pipeline::mfa::MfaCommandAligner;
pub use pipeline::runtime::PronunciationEvaluator;
pub use pipeline::traits::{ForcedAlignmentTool, PronunciationLexicon, Transcriber};
pub use scoring::accuracy::similarity_ratio;
pub use scoring::batch::{
    aggregate_scores, build_batch_report, BatchAggregates, BatchMeta, BatchReport,
    MetricDistribution, OutlierEntry, UtteranceScore,
};
pub use scoring::diagnostics::{positional_discrepancies, PhonemeDiscrepancy};
pub use scoring::fluency::compute_fluency;
pub use scoring::report::{alignment_from_request, score_alignment, score_request};
pub use types::{
    AlignedWordEntry, AlignerOutput, Alignment, EvaluationInput, EvaluationOutput,
    FluencyMetrics, IntervalTier, PhonemeInterval, RawInterval, ScoreReport, ScoringRequest,
    WordInterval,
};
