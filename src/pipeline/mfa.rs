use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::alignment::textgrid_io::read_textgrid;
use crate::config::AlignerToolConfig;
use crate::error::PronunciationError;
use crate::pipeline::traits::ForcedAlignmentTool;
use crate::types::AlignerOutput;

const UTTERANCE_STEM: &str = "utt";
const TEXTGRID_EXTENSION: &str = "TextGrid";

/// Runs a Montreal-Forced-Aligner style command line on a one-utterance corpus.
///
/// The command is invoked as
/// `<command> align <corpus> <dictionary> <acoustic_model> <out_dir> --clean --quiet`.
/// The corpus is temporary; the output directory is kept under
/// `output_root` so the returned TextGrid path stays valid.
pub struct MfaCommandAligner {
    config: AlignerToolConfig,
}

impl MfaCommandAligner {
    pub fn new(config: AlignerToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignerToolConfig {
        &self.config
    }

    fn check_sample_rate(&self, audio: &[u8]) {
        if let Some(actual_rate_hz) = wav_sample_rate_hz(audio) {
            if actual_rate_hz != self.config.expected_sample_rate_hz {
                tracing::warn!(
                    expected_rate_hz = self.config.expected_sample_rate_hz,
                    actual_rate_hz,
                    "aligner expects a specific sample rate; quality may degrade"
                );
            }
        }
    }

    fn write_corpus(&self, corpus: &Path, audio: &[u8], transcript: &str) -> Result<(), PronunciationError> {
        fs::write(corpus.join(format!("{UTTERANCE_STEM}.wav")), audio)
            .map_err(|e| PronunciationError::io("write corpus audio", e))?;
        fs::write(corpus.join(format!("{UTTERANCE_STEM}.lab")), transcript.trim())
            .map_err(|e| PronunciationError::io("write corpus transcript", e))?;
        Ok(())
    }

    fn create_output_dir(&self) -> Result<PathBuf, PronunciationError> {
        fs::create_dir_all(&self.config.output_root)
            .map_err(|e| PronunciationError::io("create aligner output root", e))?;
        let dir = tempfile::Builder::new()
            .prefix("align_")
            .tempdir_in(&self.config.output_root)
            .map_err(|e| PronunciationError::io("create aligner output directory", e))?;
        Ok(dir.keep())
    }

    fn run_command(&self, corpus: &Path, out_dir: &Path) -> Result<(), PronunciationError> {
        let started = Instant::now();
        tracing::info!(
            command = %self.config.command,
            out_dir = %out_dir.display(),
            "aligner: running forced alignment"
        );
        let output = Command::new(&self.config.command)
            .arg("align")
            .arg(corpus)
            .arg(&self.config.dictionary)
            .arg(&self.config.acoustic_model)
            .arg(out_dir)
            .arg("--clean")
            .arg("--quiet")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| PronunciationError::runtime("launch forced aligner", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                command = %self.config.command,
                status = %output.status,
                stderr = %stderr.trim(),
                "aligner: forced alignment failed"
            );
            return Err(PronunciationError::runtime(
                "forced alignment",
                format!("'{}' exited with {}", self.config.command, output.status),
            ));
        }
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aligner: forced alignment finished"
        );
        Ok(())
    }
}

impl ForcedAlignmentTool for MfaCommandAligner {
    fn align(&self, audio: &[u8], transcript: &str) -> Result<AlignerOutput, PronunciationError> {
        self.check_sample_rate(audio);
        let corpus = tempfile::Builder::new()
            .prefix("mfa_corpus_")
            .tempdir()
            .map_err(|e| PronunciationError::io("create aligner corpus", e))?;
        self.write_corpus(corpus.path(), audio, transcript)?;

        let out_dir = self.create_output_dir()?;
        self.run_command(corpus.path(), &out_dir)?;

        let textgrid_path = find_first_textgrid(&out_dir)?.ok_or_else(|| {
            PronunciationError::runtime(
                "forced alignment",
                format!("no TextGrid produced under '{}'", out_dir.display()),
            )
        })?;
        let tiers = read_textgrid(&textgrid_path)?;
        Ok(AlignerOutput {
            tiers,
            textgrid_path: Some(textgrid_path),
        })
    }
}

/// Sample rate from a canonical RIFF/WAVE header, `None` for anything else.
fn wav_sample_rate_hz(audio: &[u8]) -> Option<u32> {
    if audio.len() < 28 || &audio[0..4] != b"RIFF" || &audio[8..12] != b"WAVE" {
        return None;
    }
    let bytes: [u8; 4] = audio[24..28].try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

/// Depth-first search in sorted directory order.
pub(crate) fn find_first_textgrid(dir: &Path) -> Result<Option<PathBuf>, PronunciationError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| PronunciationError::io("list aligner output", e))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PronunciationError::io("list aligner output", e))?;
    entries.sort();

    for path in &entries {
        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == TEXTGRID_EXTENSION)
        {
            return Ok(Some(path.clone()));
        }
    }
    for path in entries.iter().filter(|path| path.is_dir()) {
        if let Some(found) = find_first_textgrid(path)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_FORMAT: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 0.6
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 0.6
        intervals: size = 1
        intervals [1]:
            xmin = 0
            xmax = 0.6
            text = "cat"
    item [2]:
        class = "IntervalTier"
        name = "phones"
        xmin = 0
        xmax = 0.6
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.1
            text = "K"
        intervals [2]:
            xmin = 0.1
            xmax = 0.4
            text = "AE1"
        intervals [3]:
            xmin = 0.4
            xmax = 0.6
            text = "T"
"#;

    #[test]
    fn wav_header_sample_rate() {
        let mut header = Vec::new();
        header.extend_from_slice(b"RIFF");
        header.extend_from_slice(&36u32.to_le_bytes());
        header.extend_from_slice(b"WAVEfmt ");
        header.extend_from_slice(&16u32.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&16_000u32.to_le_bytes());
        assert_eq!(wav_sample_rate_hz(&header), Some(16_000));
        assert_eq!(wav_sample_rate_hz(b"RIFF"), None);
        assert_eq!(wav_sample_rate_hz(&[0u8; 64]), None);
    }

    #[test]
    fn finds_nested_textgrid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("speaker");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(dir.path().join("notes.txt"), "x").expect("write");
        fs::write(nested.join("utt.TextGrid"), LONG_FORMAT).expect("write");

        let found = find_first_textgrid(dir.path()).expect("search");
        assert_eq!(found, Some(nested.join("utt.TextGrid")));
    }

    #[test]
    fn empty_output_has_no_textgrid() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(find_first_textgrid(dir.path()).expect("search"), None);
    }

    #[test]
    fn missing_command_is_a_runtime_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let aligner = MfaCommandAligner::new(AlignerToolConfig {
            command: "pronunciation-rs-no-such-aligner".to_string(),
            output_root: root.path().join("out"),
            ..AlignerToolConfig::default()
        });
        let err = aligner.align(b"RIFF", "cat").unwrap_err();
        assert!(matches!(err, PronunciationError::Runtime { .. }));
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-aligner.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[cfg(unix)]
    #[test]
    fn aligner_reads_textgrid_written_by_command() {
        let root = tempfile::tempdir().expect("tempdir");
        let fixture = root.path().join("fixture.TextGrid");
        fs::write(&fixture, LONG_FORMAT).expect("write fixture");
        // $5 is the output directory.
        let script = write_script(
            root.path(),
            &format!(
                "mkdir -p \"$5/utt\" && cp '{}' \"$5/utt/utt.TextGrid\"",
                fixture.display()
            ),
        );
        let aligner = MfaCommandAligner::new(AlignerToolConfig {
            command: script.to_string_lossy().to_string(),
            output_root: root.path().join("out"),
            ..AlignerToolConfig::default()
        });

        let output = aligner.align(b"RIFF", " the cat ").expect("aligned");
        let names: Vec<&str> = output.tiers.iter().map(|tier| tier.name.as_str()).collect();
        assert_eq!(names, vec!["words", "phones"]);
        let path = output.textgrid_path.expect("textgrid path");
        assert!(path.starts_with(root.path().join("out")));
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_runtime_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let script = write_script(root.path(), "echo 'model not found' >&2\nexit 3");
        let aligner = MfaCommandAligner::new(AlignerToolConfig {
            command: script.to_string_lossy().to_string(),
            output_root: root.path().join("out"),
            ..AlignerToolConfig::default()
        });

        let err = aligner.align(b"RIFF", "cat").unwrap_err();
        match err {
            PronunciationError::Runtime { context, message } => {
                assert_eq!(context, "forced alignment");
                assert!(message.contains("exited"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
