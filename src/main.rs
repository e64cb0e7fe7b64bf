use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::warn;
use voice_clone_lib::models::{GenerationRequest, ScoreResult, StyleProfile};
use voice_clone_lib::services::sample_intake::build_fetch_client;
use voice_clone_lib::services::{
    compute_confidence_score, compute_detection_score, describe_samples, extract_text_from_file,
    parse_style_profile, preview_for_platform, ConfigStore, ContentGenerator, ProviderClient,
    WritingSample,
};

const USAGE: &str = "Usage:
  voice-clone detect <file> [--profile <profile.json>] [--out <json_path>]
  voice-clone confidence <file|url>... [--has-profile]
  voice-clone analyze <file|url>... [--provider <name[:model]>] [--instructions <text>] [--out <profile.json>]
  voice-clone generate --prompt <file> --profile <profile.json> [--provider <name[:model]>] [--platform <name>] [--feedback <text>] [--out <json_path>]
  voice-clone preview <file> [--platform <name>]
  voice-clone check-key <provider>

Notes:
  - Files may be .txt, .pdf or .docx.
  - API keys come from OPENAI_API_KEY / ANTHROPIC_API_KEY or the config file.";

const VALUE_FLAGS: [&str; 7] = [
    "--profile",
    "--out",
    "--prompt",
    "--provider",
    "--platform",
    "--feedback",
    "--instructions",
];

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// Arguments that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.clone());
        }
    }
    out
}

fn read_text(path: &str) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read file failed: {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    Ok(extract_text_from_file(&file_name, &bytes)?)
}

fn load_profile(path: &str) -> Result<StyleProfile> {
    let json = std::fs::read_to_string(path).with_context(|| format!("read profile failed: {}", path))?;
    parse_style_profile(&json).with_context(|| format!("invalid profile: {}", path))
}

fn print_score(title: &str, score: &ScoreResult) {
    println!("{}: {}/100", title, score.total);
    for (metric, points) in &score.breakdown {
        println!("  {:<24} {}", metric, points);
    }
}

fn write_json<T: serde::Serialize>(out_path: Option<String>, value: &T) -> Result<()> {
    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&out_path, json).with_context(|| format!("write output failed: {}", out_path))?;
        println!("Wrote {}", out_path);
    }
    Ok(())
}

fn run_detect(args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let Some(path) = positional.first() else {
        bail!("detect needs a file\n\n{}", USAGE);
    };
    let profile = parse_arg_value(args, "--profile")
        .map(|p| load_profile(&p))
        .transpose()?;

    let text = read_text(path)?;
    let score = compute_detection_score(&text, profile.as_ref());

    println!("File: {}", path);
    println!("Profile: {}", if profile.is_some() { "yes" } else { "no" });
    print_score("Detection score", &score);
    write_json(parse_arg_value(args, "--out"), &score)
}

/// Read files and fetch URLs; anything unreadable or under the word minimum is logged and skipped.
async fn load_samples(sources: &[String]) -> Result<Vec<WritingSample>> {
    let client = build_fetch_client()?;
    let mut samples = Vec::new();
    for source in sources {
        let sample = if source.starts_with("http://") || source.starts_with("https://") {
            WritingSample::from_url(&client, source).await
        } else {
            match std::fs::read(source) {
                Ok(bytes) => WritingSample::from_file(source, &bytes),
                Err(e) => {
                    warn!(source = %source, error = %e, "sample.read_failed");
                    continue;
                }
            }
        };
        match sample {
            Ok(sample) => {
                println!("  {:<6} {:>6} words  {}", sample.source_kind, sample.word_count, source);
                samples.push(sample);
            }
            Err(e) => warn!(source = %source, error = %e, "sample.rejected"),
        }
    }
    println!("Samples accepted: {}/{}", samples.len(), sources.len());
    Ok(samples)
}

/// `--provider`, then the config's default provider, then anthropic.
fn resolve_provider(args: &[String]) -> String {
    match parse_arg_value(args, "--provider") {
        Some(p) => p,
        None => ConfigStore::default_config_dir()
            .map(ConfigStore::new)
            .and_then(|store| store.load().ok())
            .and_then(|config| config.default_provider)
            .unwrap_or_else(|| "anthropic".to_string()),
    }
}

async fn run_confidence(args: &[String]) -> Result<()> {
    let sources = positional_args(args);
    if sources.is_empty() {
        bail!("confidence needs at least one sample\n\n{}", USAGE);
    }
    let has_profile = has_flag(args, "--has-profile");

    let samples = load_samples(&sources).await?;
    let score = compute_confidence_score(&describe_samples(&samples), has_profile);
    print_score("Confidence score", &score);
    write_json(parse_arg_value(args, "--out"), &score)
}

async fn run_analyze(args: &[String]) -> Result<()> {
    let sources = positional_args(args);
    if sources.is_empty() {
        bail!("analyze needs at least one sample\n\n{}", USAGE);
    }
    let samples = load_samples(&sources).await?;
    let instructions = parse_arg_value(args, "--instructions").unwrap_or_default();

    let client = ProviderClient::from_spec(&resolve_provider(args), None)?;
    let generator = ContentGenerator::new(client);
    let analysis = generator.analyze(&samples, &instructions).await?;

    println!(
        "Analyzed {} samples ({} words) with {} ({})",
        analysis.sample_count, analysis.total_words, analysis.usage.provider, analysis.usage.model
    );
    let score = compute_confidence_score(&describe_samples(&samples), true);
    print_score("Confidence score", &score);
    match parse_arg_value(args, "--out") {
        Some(out) => write_json(Some(out), &analysis.profile),
        None => {
            println!("{}", serde_json::to_string_pretty(&analysis.profile)?);
            Ok(())
        }
    }
}

fn run_preview(args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let Some(path) = positional.first() else {
        bail!("preview needs a file\n\n{}", USAGE);
    };
    let platform = parse_arg_value(args, "--platform").unwrap_or_else(|| "twitter".to_string());
    let text = read_text(path)?;
    let preview = preview_for_platform(&platform, text.trim());

    match preview.char_limit {
        Some(limit) => println!("{}: {}/{} characters", preview.platform, preview.char_count, limit),
        None => println!("{}: {} characters (no limit)", preview.platform, preview.char_count),
    }
    println!("Within limit: {}", if preview.is_within_limit { "yes" } else { "no" });
    for part in preview.threads.iter().flatten() {
        println!();
        println!("{}", part);
    }
    Ok(())
}

async fn run_check_key(args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let Some(provider) = positional.first() else {
        bail!("check-key needs a provider\n\n{}", USAGE);
    };
    let client = ProviderClient::from_spec(provider, None)?;
    if client.validate_api_key().await {
        println!("{}: key accepted", client.kind());
        Ok(())
    } else {
        bail!("{}: key rejected", client.kind())
    }
}

async fn run_generate(args: &[String]) -> Result<()> {
    let Some(prompt_path) = parse_arg_value(args, "--prompt") else {
        bail!("generate needs --prompt\n\n{}", USAGE);
    };
    let Some(profile_path) = parse_arg_value(args, "--profile") else {
        bail!("generate needs --profile\n\n{}", USAGE);
    };

    let prompt = std::fs::read_to_string(&prompt_path)
        .with_context(|| format!("read prompt failed: {}", prompt_path))?;
    let profile = load_profile(&profile_path)?;
    let platform = parse_arg_value(args, "--platform").unwrap_or_else(|| "linkedin".to_string());

    let client = ProviderClient::from_spec(&resolve_provider(args), None)?;
    let generator = ContentGenerator::new(client);

    let request = GenerationRequest { platform, prompt };
    let feedback = parse_arg_value(args, "--feedback");
    let content = generator
        .regenerate(&request, feedback.as_deref(), &profile)
        .await?;

    println!("{}", content.content_text);
    println!();
    println!(
        "Provider: {} ({})  tokens in/out: {}/{}",
        content.usage.provider, content.usage.model, content.usage.input_tokens, content.usage.output_tokens
    );
    print_score("Detection score", &content.detection);
    write_json(parse_arg_value(args, "--out"), &content)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    voice_clone_lib::init_logging();

    let rest = &args[2..];
    match args[1].as_str() {
        "detect" => run_detect(rest),
        "confidence" => run_confidence(rest).await,
        "analyze" => run_analyze(rest).await,
        "generate" => run_generate(rest).await,
        "preview" => run_preview(rest),
        "check-key" => run_check_key(rest).await,
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    }
}
