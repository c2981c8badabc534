use std::fs;
use std::path::Path;

use pronunciation_rs::Alignment;
use textgrid::{Interval, TextGrid, Tier, TierType};

/// Writes the reconciled alignment back out as `words` and `phones` tiers.
pub fn write_alignment_textgrid(path: &Path, alignment: &Alignment) -> Result<(), String> {
    let last_end = alignment
        .words
        .iter()
        .flat_map(|word| {
            std::iter::once(word.end).chain(word.phonemes.iter().map(|phoneme| phoneme.end))
        })
        .fold(0.0f64, f64::max);
    let xmax = if last_end > 0.0 { last_end } else { 1.0 };

    let mut textgrid = TextGrid::new(0.0, xmax).map_err(|err| {
        format!(
            "Failed to build TextGrid structure '{}': {err}",
            path.display()
        )
    })?;

    let words_intervals = ordered_intervals(
        alignment
            .words
            .iter()
            .map(|word| (word.start, word.end, word.word.as_str())),
    );
    let phones_intervals = ordered_intervals(alignment.words.iter().flat_map(|word| {
        word.phonemes
            .iter()
            .map(|phoneme| (phoneme.start, phoneme.end, phoneme.label.as_str()))
    }));

    for (name, intervals) in [("words", words_intervals), ("phones", phones_intervals)] {
        let tier = Tier {
            name: name.to_string(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax,
            intervals,
            points: Vec::new(),
        };
        textgrid.add_tier(tier).map_err(|err| {
            format!(
                "Failed to add {name} tier for '{}': {err}",
                path.display()
            )
        })?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create TextGrid output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    textgrid
        .to_file(path, false)
        .map_err(|err| format!("Failed to write TextGrid '{}': {err}", path.display()))?;
    Ok(())
}

/// Drops empty or overlapping spans so the tier stays monotonic.
fn ordered_intervals<'a>(spans: impl Iterator<Item = (f64, f64, &'a str)>) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut last_end = 0.0f64;
    for (start, end, text) in spans {
        let start = start.max(last_end);
        if end <= start {
            continue;
        }
        intervals.push(Interval {
            xmin: start,
            xmax: end,
            text: text.to_string(),
        });
        last_end = end;
    }
    intervals
}
