use std::fs;
use std::path::Path;

use textgrid::{TextGrid, TierType};

use crate::error::PronunciationError;
use crate::types::{IntervalTier, RawInterval};

/// Reads every interval tier of a TextGrid file.
///
/// The `textgrid` crate is tried first; long-format files it rejects are
/// retried with a line-oriented parser before giving up.
pub fn read_textgrid(path: &Path) -> Result<Vec<IntervalTier>, PronunciationError> {
    match tiers_with_textgrid_crate(path) {
        Ok(tiers) => Ok(tiers),
        Err(crate_err) => {
            tracing::debug!(
                path = %path.display(),
                error = crate_err.as_str(),
                "textgrid: crate parser failed, trying fallback"
            );
            let contents = fs::read_to_string(path)
                .map_err(|e| PronunciationError::io("read TextGrid", e))?;
            parse_interval_tiers_fallback(&contents).map_err(|fallback_err| {
                PronunciationError::textgrid(
                    "parse TextGrid",
                    format!(
                        "'{}': textgrid crate ({crate_err}) and fallback parser ({fallback_err}) both failed",
                        path.display()
                    ),
                )
            })
        }
    }
}

fn tiers_with_textgrid_crate(path: &Path) -> Result<Vec<IntervalTier>, String> {
    let textgrid =
        TextGrid::from_file(path).map_err(|err| format!("textgrid crate parse failed: {err}"))?;

    textgrid
        .tiers
        .iter()
        .filter(|tier| tier.tier_type == TierType::IntervalTier)
        .map(|tier| {
            let intervals = tier
                .intervals
                .iter()
                .map(|interval| {
                    Ok(RawInterval {
                        label: interval.text.clone(),
                        start: checked_seconds(interval.xmin)?,
                        end: checked_seconds(interval.xmax)?,
                    })
                })
                .collect::<Result<Vec<_>, String>>()?;
            Ok(IntervalTier {
                name: tier.name.clone(),
                intervals,
            })
        })
        .collect()
}

/// Long-format TextGrid reader covering `item [n]`, `class`, `name`, `xmin`,
/// `xmax` and `text` assignments. Point tiers are skipped.
pub(crate) fn parse_interval_tiers_fallback(contents: &str) -> Result<Vec<IntervalTier>, String> {
    let mut tiers = Vec::new();
    let mut current: Option<IntervalTier> = None;

    let mut in_item = false;
    let mut item_is_interval_tier = false;
    let mut item_name: Option<String> = None;
    let mut cur_xmin: Option<f64> = None;
    let mut cur_xmax: Option<f64> = None;

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.starts_with("item [") && !line.starts_with("item []") {
            tiers.extend(current.take());
            in_item = true;
            item_is_interval_tier = false;
            item_name = None;
            cur_xmin = None;
            cur_xmax = None;
            continue;
        }

        if !in_item {
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "class") {
            item_is_interval_tier = value.eq_ignore_ascii_case("\"IntervalTier\"");
            open_tier(&mut current, item_is_interval_tier, item_name.as_deref());
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "name") {
            item_name = Some(unquote(value));
            open_tier(&mut current, item_is_interval_tier, item_name.as_deref());
            continue;
        }

        let Some(tier) = current.as_mut() else {
            continue;
        };

        if let Some(value) = parse_assignment_value(line, "xmin") {
            cur_xmin = Some(checked_seconds(parse_number(value, "xmin")?)?);
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "xmax") {
            cur_xmax = Some(checked_seconds(parse_number(value, "xmax")?)?);
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "text") {
            let start = cur_xmin
                .take()
                .ok_or_else(|| format!("missing xmin before text in tier '{}'", tier.name))?;
            let end = cur_xmax
                .take()
                .ok_or_else(|| format!("missing xmax before text in tier '{}'", tier.name))?;
            tier.intervals.push(RawInterval {
                label: unquote(value),
                start,
                end,
            });
        }
    }
    tiers.extend(current);

    if tiers.is_empty() {
        return Err("no interval tiers found".to_string());
    }
    Ok(tiers)
}

fn open_tier(current: &mut Option<IntervalTier>, is_interval_tier: bool, name: Option<&str>) {
    if current.is_some() || !is_interval_tier {
        return;
    }
    if let Some(name) = name {
        *current = Some(IntervalTier {
            name: name.to_string(),
            intervals: Vec::new(),
        });
    }
}

fn checked_seconds(seconds: f64) -> Result<f64, String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid TextGrid timestamp: {seconds}"));
    }
    Ok(seconds)
}

fn parse_assignment_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() == key {
        Some(rhs.trim())
    } else {
        None
    }
}

// TextGrid escapes a literal quote as "".
fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
        .replace("\"\"", "\"")
}

fn parse_number(value: &str, field: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse {field}='{value}': {err}"))
}
