//! CLI tool for translating PowerPoint and Word files in place.

use anyhow::{Context, Result};
use clap::Parser;
use doctrans_core::{
    CancellationToken, DocumentFormat, FailurePolicy, TextTranslator, TranslationReport,
    TranslatorConfig,
};
use doctrans_engine::{extract_segments, DocumentTranslator, TranslateOptions};
use doctrans_openai::OpenAiTranslator;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Translate the text of .pptx and .docx files, keeping their layout.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) (.pptx or .docx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Target language, e.g. "German" or "ja"
    #[arg(short, long)]
    target_language: String,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format tag to use instead of the file extension (pptx, docx)
    #[arg(short, long)]
    format: Option<String>,

    /// JSON file with translator settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name (overrides config and OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL (overrides config and OPENAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Also translate speaker notes
    #[arg(short, long)]
    notes: bool,

    /// Font size in points for translated presentation text
    #[arg(long)]
    font_size: Option<f32>,

    /// Shrink translated presentation text to fit its shape
    #[arg(long)]
    autofit: bool,

    /// Prefix text that failed to translate with a marker
    #[arg(long, num_args = 0..=1, default_missing_value = "[untranslated] ")]
    mark_untranslated: Option<String>,

    /// Write a JSON report of every text unit to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// List the text units without translating (no API key needed)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = dotenv::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }

    if args.dry_run {
        for input_path in &args.input {
            if let Err(e) = list_units(input_path, &args) {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    let client = OpenAiTranslator::new(config).context("Cannot set up the translator")?;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Ctrl-C will not stop translation cleanly: {}", e);
    }
    let mut translator = document_translator(client, &args, token.clone());

    let mut reports = Vec::new();
    for input_path in &args.input {
        if token.is_cancelled() {
            eprintln!("Interrupted; skipping remaining files");
            break;
        }
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &mut translator) {
            Ok((output_path, report)) => {
                eprintln!(
                    "{} -> {} ({} translated, {} failed, {} tokens)",
                    input_path.display(),
                    output_path.display(),
                    report.translated_count(),
                    report.failed_count(),
                    report.tokens
                );
                reports.push(report);
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&reports).context("Failed to encode report")?;
        write_output(report_path, json.as_bytes())?;
    }

    Ok(())
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(args: &Args) -> Result<TranslatorConfig> {
    let mut config = match &args.config {
        Some(path) => TranslatorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => TranslatorConfig::default(),
    };
    config = config.with_process_env();

    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    Ok(config)
}

fn translate_options(args: &Args) -> TranslateOptions {
    TranslateOptions {
        include_notes: args.notes,
        font_size: args.font_size,
        autofit: args.autofit,
        failure_policy: match &args.mark_untranslated {
            Some(marker) => FailurePolicy::Mark(marker.clone()),
            None => FailurePolicy::KeepOriginal,
        },
        ..Default::default()
    }
}

/// Translator for all input files, stopped early through `token`.
fn document_translator<T: TextTranslator>(
    client: T,
    args: &Args,
    token: CancellationToken,
) -> DocumentTranslator<T> {
    DocumentTranslator::new(client, translate_options(args)).with_cancellation(token)
}

/// Format tag from `--format` or the file extension.
fn format_tag(input_path: &Path, args: &Args) -> Result<String> {
    if let Some(tag) = &args.format {
        return Ok(tag.clone());
    }
    input_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No file extension; pass --format"))
}

/// Translate a single file and write the result next to it (or into `-o`).
fn process_file(
    input_path: &Path,
    args: &Args,
    translator: &mut DocumentTranslator<OpenAiTranslator>,
) -> Result<(PathBuf, TranslationReport)> {
    let tag = format_tag(input_path, args)?;
    let format = DocumentFormat::from_tag(&tag)?;
    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units {msg}")
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(
        input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string(),
    );

    let output = translator.translate_with_progress(
        &bytes,
        &tag,
        &args.target_language,
        Box::new(|done: usize, total: usize| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        }),
    )?;
    bar.finish_and_clear();

    if output.report.cancelled {
        log::warn!("{} was only partly translated", input_path.display());
    }

    let output_path = get_output_path(
        input_path,
        args.output.as_ref(),
        &args.target_language,
        format,
    )?;
    write_output(&output_path, &output.bytes)?;

    Ok((output_path, output.report))
}

/// Print every text unit of a file with its location.
fn list_units(input_path: &Path, args: &Args) -> Result<()> {
    let tag = format_tag(input_path, args)?;
    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let segments = extract_segments(&bytes, &tag, args.notes)?;
    if args.verbose {
        eprintln!("{}: {} text units", input_path.display(), segments.len());
    }
    for segment in segments {
        println!("{}\t{}", segment.location, segment.text.replace('\n', "\\n"));
    }
    Ok(())
}

/// Determine the output path for a translated file: `<stem>_<lang>.<ext>`.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    target_language: &str,
    format: DocumentFormat,
) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let language: String = target_language
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let output_filename = format!("{}_{}.{}", stem, language, format.extension());

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctrans_ooxml::Package;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["doctrans", "deck.pptx", "-t", "German"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_output_path() {
        let path = get_output_path(
            Path::new("slides/deck.pptx"),
            None,
            "Brazilian Portuguese",
            DocumentFormat::Pptx,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("slides/deck_Brazilian_Portuguese.pptx"));
    }

    #[test]
    fn test_format_tag_from_extension_or_flag() {
        let plain = args(&[]);
        assert_eq!(format_tag(Path::new("deck.pptx"), &plain).unwrap(), "pptx");
        assert!(format_tag(Path::new("README"), &plain).is_err());

        let forced = args(&["--format", "docx"]);
        assert_eq!(format_tag(Path::new("README"), &forced).unwrap(), "docx");
    }

    #[test]
    fn test_mark_untranslated_flag() {
        assert_eq!(
            translate_options(&args(&[])).failure_policy,
            FailurePolicy::KeepOriginal
        );
        assert_eq!(
            translate_options(&args(&["--mark-untranslated"])).failure_policy,
            FailurePolicy::Mark("[untranslated] ".to_string())
        );
        assert_eq!(
            translate_options(&args(&["--mark-untranslated=[?] "])).failure_policy,
            FailurePolicy::Mark("[?] ".to_string())
        );
    }

    #[test]
    fn test_interrupt_stops_before_first_unit() {
        let mut package = Package::new();
        package.set_part(
            "word/document.xml",
            br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"#.to_vec(),
        );
        let input = package.to_bytes().unwrap();

        let token = CancellationToken::new();
        let mut calls = 0;
        let client = |t: &str, _: &str| -> doctrans_core::Result<String> {
            calls += 1;
            Ok(t.to_uppercase())
        };
        let mut translator = document_translator(client, &args(&[]), token.clone());
        token.cancel();

        let out = translator
            .translate_document_with_report(&input, "docx", "German")
            .unwrap();
        drop(translator);
        assert!(out.report.cancelled);
        assert_eq!(out.bytes, input);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_flags_override_config() {
        let parsed = args(&["--model", "gpt-4o-mini", "--base-url", "http://localhost:1234/v1"]);
        let config = load_config(&parsed).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:1234/v1");
    }
}
