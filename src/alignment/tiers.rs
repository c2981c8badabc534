use crate::error::PronunciationError;
use crate::types::IntervalTier;

pub const WORD_TIER_PATTERN: &str = "word";
pub const PHONE_TIER_PATTERN: &str = "phon";

/// First tier whose name contains `pattern`, ignoring case.
pub fn find_tier<'a>(
    tiers: &'a [IntervalTier],
    pattern: &'static str,
) -> Result<&'a IntervalTier, PronunciationError> {
    tiers
        .iter()
        .find(|tier| tier.name.to_lowercase().contains(pattern))
        .ok_or(PronunciationError::TierNotFound { pattern })
}

/// Returns `(word_tier, phone_tier)`. The phone tier is looked up first.
pub fn select_word_and_phone_tiers(
    tiers: &[IntervalTier],
) -> Result<(&IntervalTier, &IntervalTier), PronunciationError> {
    let phone_tier = find_tier(tiers, PHONE_TIER_PATTERN)?;
    let word_tier = find_tier(tiers, WORD_TIER_PATTERN)?;
    Ok((word_tier, phone_tier))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str) -> IntervalTier {
        IntervalTier {
            name: name.to_string(),
            intervals: Vec::new(),
        }
    }

    #[test]
    fn matches_names_case_insensitively_in_any_order() {
        let tiers = vec![tier("Phones"), tier("WORDS")];
        let (words, phones) = select_word_and_phone_tiers(&tiers).expect("both tiers");
        assert_eq!(words.name, "WORDS");
        assert_eq!(phones.name, "Phones");
    }

    #[test]
    fn substring_match_accepts_speaker_prefixed_names() {
        let tiers = vec![tier("spk1 - words"), tier("spk1 - phonemes")];
        let (words, phones) = select_word_and_phone_tiers(&tiers).expect("both tiers");
        assert_eq!(words.name, "spk1 - words");
        assert_eq!(phones.name, "spk1 - phonemes");
    }

    #[test]
    fn missing_phone_tier_is_reported() {
        let tiers = vec![tier("words"), tier("transcript")];
        let err = select_word_and_phone_tiers(&tiers).unwrap_err();
        assert!(matches!(
            err,
            PronunciationError::TierNotFound { pattern: "phon" }
        ));
    }

    #[test]
    fn missing_word_tier_is_reported() {
        let tiers = vec![tier("phones")];
        let err = select_word_and_phone_tiers(&tiers).unwrap_err();
        assert!(matches!(
            err,
            PronunciationError::TierNotFound { pattern: "word" }
        ));
    }
}
