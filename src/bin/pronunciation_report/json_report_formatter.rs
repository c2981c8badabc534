use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

/// Pretty JSON with a trailing newline.
fn render<T: Serialize>(report: &T) -> Result<String, String> {
    let mut json = serde_json::to_string_pretty(report)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    json.push('\n');
    Ok(json)
}

/// Writes the report to `path`, creating missing parent directories.
pub fn write_report<T: Serialize>(path: &Path, report: &T) -> Result<(), String> {
    let json = render(report)?;
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir)
            .map_err(|err| format!("Cannot create '{}': {err}", dir.display()))?;
    }
    fs::write(path, json).map_err(|err| format!("Cannot write '{}': {err}", path.display()))
}

/// Same rendering on stdout, for runs without `--out`.
pub fn print_report<T: Serialize>(report: &T) -> Result<(), String> {
    let json = render(report)?;
    io::stdout()
        .lock()
        .write_all(json.as_bytes())
        .map_err(|err| format!("Cannot write report to stdout: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lands_in_new_nested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("runs").join("today").join("score.json");

        write_report(&path, &serde_json::json!({ "pronunciation_accuracy": 0.8 }))
            .expect("written");

        let written = fs::read_to_string(&path).expect("read back");
        assert!(written.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&written).expect("valid json");
        assert_eq!(value["pronunciation_accuracy"], 0.8);
    }
}
