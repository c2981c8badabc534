use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pronunciation_rs::{
    build_batch_report, expected_phonemes, read_textgrid, reconcile_tiers, score_request,
    BatchMeta, EvaluationInput, EvaluationOutput, EvaluatorBuilder, EvaluatorConfig,
    PronunciationDictionary, ScoringRequest, UtteranceScore,
};

#[path = "pronunciation_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "pronunciation_report/text_grid_report_formatter.rs"]
mod text_grid_report_formatter;

#[derive(Debug, Parser)]
#[command(name = "pronunciation_report")]
#[command(about = "Score pronunciation from forced-alignment output")]
struct Args {
    /// JSON evaluator config; defaults apply to missing fields.
    #[arg(long, global = true, env = "PRONUNCIATION_REPORT_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides `dictionary_path` from the config.
    #[arg(long, global = true, env = "PRONUNCIATION_REPORT_DICTIONARY")]
    dictionary: Option<PathBuf>,
    #[arg(long, global = true, env = "PRONUNCIATION_REPORT_OUT")]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a request JSON (`alignment` + `expected_phonemes`).
    Score {
        #[arg(long, env = "PRONUNCIATION_REPORT_REQUEST")]
        request: PathBuf,
    },
    /// Reconcile a TextGrid, derive expected phonemes and score.
    Textgrid {
        #[arg(long, env = "PRONUNCIATION_REPORT_TEXTGRID")]
        textgrid: PathBuf,
        #[arg(long, env = "PRONUNCIATION_REPORT_REFERENCE_TEXT")]
        reference_text: String,
        /// Also write the reconciled alignment as a TextGrid.
        #[arg(long, env = "PRONUNCIATION_REPORT_EXPORT_TEXTGRID")]
        export_textgrid: Option<PathBuf>,
    },
    /// Run the external forced aligner on an audio file and score it.
    Analyze {
        #[arg(long, env = "PRONUNCIATION_REPORT_AUDIO")]
        audio: PathBuf,
        #[arg(long, env = "PRONUNCIATION_REPORT_REFERENCE_TEXT")]
        reference_text: String,
        #[arg(long, env = "PRONUNCIATION_REPORT_TRANSCRIPT")]
        transcript: Option<String>,
    },
    /// Score every `*.json` request in a directory and aggregate.
    Batch {
        #[arg(long, env = "PRONUNCIATION_REPORT_REQUESTS_DIR")]
        requests_dir: PathBuf,
        #[arg(long, env = "PRONUNCIATION_REPORT_LIMIT")]
        limit: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pronunciation_rs=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dictionary) = args.dictionary {
        config.dictionary_path = Some(dictionary);
    }

    match args.command {
        Command::Score { request } => run_score(&config, &request, args.out.as_deref()),
        Command::Textgrid {
            textgrid,
            reference_text,
            export_textgrid,
        } => run_textgrid(
            &config,
            &textgrid,
            &reference_text,
            export_textgrid.as_deref(),
            args.out.as_deref(),
        ),
        Command::Analyze {
            audio,
            reference_text,
            transcript,
        } => run_analyze(config, &audio, reference_text, transcript, args.out.as_deref()),
        Command::Batch {
            requests_dir,
            limit,
        } => run_batch(&config, &requests_dir, limit, args.out),
    }
}

fn load_config(path: Option<&Path>) -> Result<EvaluatorConfig, String> {
    match path {
        Some(path) => {
            require_path_exists(path, "Missing --config path.")?;
            EvaluatorConfig::load(path).map_err(|err| err.to_string())
        }
        None => Ok(EvaluatorConfig::default()),
    }
}

fn run_score(config: &EvaluatorConfig, request_path: &Path, out: Option<&Path>) -> Result<(), String> {
    let request = read_request(request_path)?;
    let report = score_request(&request, &config.scoring)
        .map_err(|err| format!("{}: {err}", request_path.display()))?;
    emit(out, &report)
}

fn run_textgrid(
    config: &EvaluatorConfig,
    textgrid_path: &Path,
    reference_text: &str,
    export_textgrid: Option<&Path>,
    out: Option<&Path>,
) -> Result<(), String> {
    require_path_exists(textgrid_path, "Missing --textgrid path.")?;
    let dictionary = load_dictionary(config)?;

    let tiers = read_textgrid(textgrid_path).map_err(|err| err.to_string())?;
    let alignment = reconcile_tiers(&tiers, &config.reconciler).map_err(|err| err.to_string())?;
    if let Some(export_path) = export_textgrid {
        text_grid_report_formatter::write_alignment_textgrid(export_path, &alignment)?;
    }

    let request = ScoringRequest::new(
        alignment,
        expected_phonemes(reference_text, &dictionary),
        Some(textgrid_path.to_string_lossy().into_owned()),
    );
    let score = score_request(&request, &config.scoring).map_err(|err| err.to_string())?;
    emit(
        out,
        &EvaluationOutput {
            transcription: reference_text.trim().to_string(),
            phoneme_alignment: request,
            pronunciation_score: score,
        },
    )
}

fn run_analyze(
    config: EvaluatorConfig,
    audio_path: &Path,
    reference_text: String,
    transcript: Option<String>,
    out: Option<&Path>,
) -> Result<(), String> {
    require_path_exists(audio_path, "Missing --audio path.")?;
    let audio = fs::read(audio_path)
        .map_err(|err| format!("Failed to read audio '{}': {err}", audio_path.display()))?;

    let evaluator = EvaluatorBuilder::new(config)
        .build()
        .map_err(|err| err.to_string())?;
    let output = evaluator
        .evaluate(&EvaluationInput {
            audio,
            reference_text,
            transcript,
        })
        .map_err(|err| format!("{}: {err}", audio_path.display()))?;
    emit(out, &output)
}

fn run_batch(
    config: &EvaluatorConfig,
    requests_dir: &Path,
    limit: Option<usize>,
    out: Option<PathBuf>,
) -> Result<(), String> {
    require_path_exists(requests_dir, "Missing --requests-dir path.")?;
    let mut request_paths = list_request_files(requests_dir)?;
    if let Some(limit) = limit {
        request_paths.truncate(limit);
    }
    if request_paths.is_empty() {
        return Err(format!(
            "No request JSON files found in '{}'.",
            requests_dir.display()
        ));
    }

    let progress = ProgressBar::new(request_paths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let mut utterances = Vec::with_capacity(request_paths.len());
    for path in &request_paths {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();
        progress.set_message(id.clone());
        let request = read_request(path)?;
        let score = score_request(&request, &config.scoring)
            .map_err(|err| format!("{id}: {err}"))?;
        utterances.push(UtteranceScore { id, score });
        progress.inc(1);
    }
    progress.finish_with_message("done");

    let report = build_batch_report(
        BatchMeta {
            generated_at: Utc::now().to_rfc3339(),
            source: requests_dir.display().to_string(),
            utterance_count: utterances.len(),
        },
        utterances,
    )
    .map_err(|err| err.to_string())?;

    let out_path = out.unwrap_or_else(default_batch_out_path);
    json_report_formatter::write_report(&out_path, &report)?;
    eprintln!("Wrote batch report to {}", out_path.display());
    Ok(())
}

fn default_batch_out_path() -> PathBuf {
    let run_id = Utc::now().format("%Y%m%dT%H%M%SZ");
    PathBuf::from("target")
        .join("pronunciation_reports")
        .join(format!("batch-report-{run_id}.json"))
}

fn list_request_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to list '{}': {err}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("Failed to list '{}': {err}", dir.display()))?
            .path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_request(path: &Path) -> Result<ScoringRequest, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read request '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse request '{}': {err}", path.display()))
}

fn load_dictionary(config: &EvaluatorConfig) -> Result<PronunciationDictionary, String> {
    let path = config
        .dictionary_path
        .as_deref()
        .ok_or_else(|| "A pronunciation dictionary is required (--dictionary).".to_string())?;
    require_path_exists(path, "Missing dictionary path.")?;
    PronunciationDictionary::load(path).map_err(|err| err.to_string())
}

fn emit<T: serde::Serialize>(out: Option<&Path>, report: &T) -> Result<(), String> {
    match out {
        Some(path) => json_report_formatter::write_report(path, report),
        None => json_report_formatter::print_report(report),
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("{message} '{}'", path.display()))
    }
}
