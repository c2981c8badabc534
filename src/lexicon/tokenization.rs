use std::sync::OnceLock;

use regex::Regex;

use crate::pipeline::traits::PronunciationLexicon;

/// Letters, numbers, underscore and apostrophe. Combining marks are left out,
/// so a decomposed accent ends the token (`cafe\u{301}` reads as `cafe`).
fn word_run_pattern() -> &'static Regex {
    static WORD_RUN: OnceLock<Regex> = OnceLock::new();
    WORD_RUN.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}_']+")
            .unwrap_or_else(|err| unreachable!("static word regex: {err}"))
    })
}

/// Lowercased word tokens: runs of letters, digits, underscores and
/// apostrophes, with apostrophes at either end of a run dropped.
pub fn tokenize_reference(text: &str) -> Vec<String> {
    let lowered = text.trim().to_lowercase();
    word_run_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expected phoneme sequence for a reference text.
///
/// Each token contributes the lexicon's first pronunciation variant; tokens the
/// lexicon does not know are skipped and contribute nothing.
pub fn expected_phonemes(reference_text: &str, lexicon: &dyn PronunciationLexicon) -> Vec<String> {
    let mut expected = Vec::new();
    for token in tokenize_reference(reference_text) {
        match lexicon.first_pronunciation(&token) {
            Some(phonemes) => expected.extend(phonemes.iter().cloned()),
            None => tracing::trace!(token = token.as_str(), "lexicon: out-of-vocabulary token"),
        }
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::dictionary::PronunciationDictionary;

    fn sample_dictionary() -> PronunciationDictionary {
        PronunciationDictionary::parse_cmudict(
            "THE  DH AH0\nTHE(2)  DH IY0\nCAT  K AE1 T\nIT'S  IH1 T S\nSAT  S AE1 T\n",
        )
        .expect("parsed")
    }

    #[test]
    fn tokens_are_lowercased_and_punctuation_separated() {
        assert_eq!(
            tokenize_reference("  The cat, sat! "),
            vec!["the", "cat", "sat"]
        );
    }

    #[test]
    fn apostrophes_stay_inside_words_but_not_at_edges() {
        assert_eq!(
            tokenize_reference("It's 'quoted' rock'n'roll"),
            vec!["it's", "quoted", "rock'n'roll"]
        );
    }

    #[test]
    fn digits_and_unicode_letters_form_tokens() {
        assert_eq!(tokenize_reference("Café 42x"), vec!["café", "42x"]);
    }

    #[test]
    fn combining_marks_end_a_token() {
        assert_eq!(
            tokenize_reference("Cafe\u{301} noir"),
            vec!["cafe", "noir"]
        );
    }

    #[test]
    fn apostrophe_only_runs_produce_no_token() {
        assert_eq!(tokenize_reference("'' cat_2 '"), vec!["cat_2"]);
    }

    #[test]
    fn expected_uses_first_variant_in_token_order() {
        let dictionary = sample_dictionary();
        assert_eq!(
            expected_phonemes("The cat sat.", &dictionary),
            vec!["DH", "AH0", "K", "AE1", "T", "S", "AE1", "T"]
        );
    }

    #[test]
    fn out_of_vocabulary_tokens_are_skipped() {
        let dictionary = sample_dictionary();
        assert_eq!(
            expected_phonemes("the zyzzyva cat", &dictionary),
            vec!["DH", "AH0", "K", "AE1", "T"]
        );
    }

    #[test]
    fn contractions_are_looked_up_whole() {
        let dictionary = sample_dictionary();
        assert_eq!(expected_phonemes("It's", &dictionary), vec!["IH1", "T", "S"]);
    }

    #[test]
    fn empty_text_gives_empty_sequence() {
        let dictionary = sample_dictionary();
        assert!(expected_phonemes("  ... ", &dictionary).is_empty());
    }
}
