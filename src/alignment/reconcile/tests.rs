use super::{reconcile_intervals, reconcile_tiers};
use crate::config::ReconcilerConfig;
use crate::error::PronunciationError;
use crate::types::{IntervalTier, RawInterval};

fn iv(label: &str, start: f64, end: f64) -> RawInterval {
    RawInterval {
        label: label.to_string(),
        start,
        end,
    }
}

fn labels(alignment: &crate::types::Alignment, word_idx: usize) -> Vec<&str> {
    alignment.words[word_idx]
        .phonemes
        .iter()
        .map(|p| p.label.as_str())
        .collect()
}

#[test]
fn phones_are_nested_under_their_words() {
    let words = vec![iv("the", 0.0, 0.2), iv("cat", 0.2, 0.6)];
    let phones = vec![
        iv("DH", 0.0, 0.1),
        iv("AH0", 0.1, 0.2),
        iv("K", 0.2, 0.3),
        iv("AE1", 0.3, 0.5),
        iv("T", 0.5, 0.6),
    ];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert_eq!(alignment.words.len(), 2);
    assert_eq!(alignment.words[0].word, "the");
    assert_eq!(labels(&alignment, 0), vec!["DH", "AH0"]);
    assert_eq!(alignment.words[1].word, "cat");
    assert_eq!(labels(&alignment, 1), vec!["K", "AE1", "T"]);
    assert_eq!(alignment.words[1].start, 0.2);
    assert_eq!(alignment.words[1].end, 0.6);
}

#[test]
fn phone_within_tolerance_is_attached() {
    let words = vec![iv("a", 0.0, 0.5), iv("b", 0.5, 1.0)];
    let phones = vec![iv("AH0", 0.0, 0.5 + 0.00005), iv("B", 0.50005, 1.0)];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert_eq!(labels(&alignment, 0), vec!["AH0"]);
    assert_eq!(labels(&alignment, 1), vec!["B"]);
}

#[test]
fn phone_outside_tolerance_moves_to_next_word() {
    let words = vec![iv("a", 0.0, 0.5), iv("b", 0.5, 1.0)];
    let phones = vec![iv("AH0", 0.0, 0.5 + 0.001), iv("B", 0.501, 1.0)];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert!(labels(&alignment, 0).is_empty());
    assert_eq!(labels(&alignment, 1), vec!["AH0", "B"]);
}

#[test]
fn silence_and_empty_phones_are_consumed_but_not_attached() {
    let words = vec![iv("hi", 0.0, 0.6)];
    let phones = vec![
        iv("sil", 0.0, 0.1),
        iv("HH", 0.1, 0.3),
        iv("", 0.3, 0.35),
        iv("sp", 0.35, 0.4),
        iv(" AY1 ", 0.4, 0.6),
    ];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert_eq!(labels(&alignment, 0), vec!["HH", "AY1"]);
}

#[test]
fn empty_words_are_skipped_and_their_phones_flow_to_the_next_word() {
    let words = vec![iv("", 0.0, 0.3), iv("go", 0.3, 0.6), iv("   ", 0.6, 1.0)];
    let phones = vec![
        iv("sil", 0.0, 0.2),
        iv("N", 0.2, 0.3),
        iv("G", 0.3, 0.45),
        iv("OW1", 0.45, 0.6),
        iv("sil", 0.6, 1.0),
    ];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert_eq!(alignment.words.len(), 1);
    assert_eq!(alignment.words[0].word, "go");
    assert_eq!(labels(&alignment, 0), vec!["N", "G", "OW1"]);
}

#[test]
fn whitespace_word_labels_never_appear_anywhere() {
    let words = vec![
        iv(" ", 0.0, 0.1),
        iv("one", 0.1, 0.4),
        iv("\t", 0.4, 0.5),
        iv("two", 0.5, 0.8),
        iv("", 0.8, 1.0),
    ];
    let alignment = reconcile_intervals(&words, &[], &ReconcilerConfig::default());

    let names: Vec<&str> = alignment.words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[test]
fn empty_phone_tier_gives_words_without_phonemes() {
    let words = vec![iv("a", 0.0, 0.2), iv("b", 0.2, 0.4)];
    let alignment = reconcile_intervals(&words, &[], &ReconcilerConfig::default());

    assert_eq!(alignment.words.len(), 2);
    assert!(alignment.words.iter().all(|w| w.phonemes.is_empty()));
}

#[test]
fn empty_word_tier_gives_empty_alignment() {
    let phones = vec![iv("AH0", 0.0, 0.2)];
    let alignment = reconcile_intervals(&[], &phones, &ReconcilerConfig::default());
    assert!(alignment.is_empty());
}

#[test]
fn trailing_phones_after_last_word_are_dropped() {
    let words = vec![iv("a", 0.0, 0.2)];
    let phones = vec![iv("AH0", 0.0, 0.2), iv("T", 0.2, 0.4), iv("S", 0.4, 0.5)];
    let alignment = reconcile_intervals(&words, &phones, &ReconcilerConfig::default());

    assert_eq!(alignment.words.len(), 1);
    assert_eq!(labels(&alignment, 0), vec!["AH0"]);
}

#[test]
fn custom_silence_labels_are_honored() {
    let config = ReconcilerConfig {
        silence_labels: vec!["spn".to_string()],
        ..ReconcilerConfig::default()
    };
    let words = vec![iv("um", 0.0, 0.4)];
    let phones = vec![iv("spn", 0.0, 0.2), iv("sil", 0.2, 0.4)];
    let alignment = reconcile_intervals(&words, &phones, &config);

    assert_eq!(labels(&alignment, 0), vec!["sil"]);
}

#[test]
fn reconcile_tiers_ignores_tier_order_and_extra_tiers() {
    let tiers = vec![
        IntervalTier {
            name: "phones".to_string(),
            intervals: vec![iv("B", 0.0, 0.1), iv("IY1", 0.1, 0.3)],
        },
        IntervalTier {
            name: "transcript".to_string(),
            intervals: vec![iv("be", 0.0, 0.3)],
        },
        IntervalTier {
            name: "words".to_string(),
            intervals: vec![iv("be", 0.0, 0.3)],
        },
    ];
    let alignment = reconcile_tiers(&tiers, &ReconcilerConfig::default()).expect("reconciled");

    assert_eq!(alignment.words.len(), 1);
    assert_eq!(labels(&alignment, 0), vec!["B", "IY1"]);
}

#[test]
fn reconcile_tiers_fails_without_phone_tier() {
    let tiers = vec![IntervalTier {
        name: "words".to_string(),
        intervals: vec![iv("be", 0.0, 0.3)],
    }];
    let err = reconcile_tiers(&tiers, &ReconcilerConfig::default()).unwrap_err();
    assert!(matches!(err, PronunciationError::TierNotFound { .. }));
}
