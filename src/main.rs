use anyhow::{Context, Result};
use clap::{Arg, Command};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use pathway_transcript::{Config, FreeTextCourseParser, TranscriptParser};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Pathway Transcript Scanner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract course records from transcript text")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Text file with extracted transcript text (default: stdin)")
                .conflicts_with("input-dir"),
        )
        .arg(
            Arg::new("input-dir")
                .short('d')
                .long("input-dir")
                .value_name("DIR")
                .help("Directory of .txt transcripts to scan"),
        )
        .arg(
            Arg::new("free-text")
                .long("free-text")
                .help("Parse as a pasted course list instead of a registrar transcript")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print JSON output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Run the HTTP API instead of scanning input")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration; a broken file is reported once logging is up
    let loaded = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Initialize logging; stdout carries JSON output so logs go to stderr
    let filter = if matches.get_flag("verbose") {
        "pathway_transcript=debug,tower_http=debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| match &loaded {
            Ok(config) => config.output.log_level.clone(),
            Err(_) => "info".to_string(),
        })
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = loaded.map_err(|e| {
        error!("❌ Failed to load configuration: {:#}", e);
        e
    })?;
    if let Some(port) = matches.get_one::<u16>("port") {
        config.api.port = *port;
    }
    if matches.get_flag("pretty") {
        config.output.pretty_json = true;
    }

    config.validate()?;

    if matches.get_flag("serve") {
        return serve(config).await;
    }

    let free_text = matches.get_flag("free-text");

    if let Some(dir) = matches.get_one::<String>("input-dir") {
        let results = scan_directory(Path::new(dir), &config, free_text)?;
        return print_json(&results, config.output.pretty_json);
    }

    let text = match matches.get_one::<String>("input") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript text from {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript text from stdin")?;
            buffer
        }
    };

    let output = scan_text(&text, &config, free_text)?;
    if output.is_empty() {
        anyhow::bail!("No classes detected in the transcript");
    }
    info!("✅ Detected {} courses", output.len());
    print_json(&output, config.output.pretty_json)
}

/// Parse one document with the selected parser
fn scan_text(text: &str, config: &Config, free_text: bool) -> Result<Vec<serde_json::Value>> {
    let values = if free_text {
        FreeTextCourseParser::new()
            .with_limit(config.parser.free_text_limit)
            .parse(text)
            .into_iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?
    } else {
        TranscriptParser::new()
            .parse(text)
            .into_iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?
    };

    Ok(values)
}

/// Scan every `.txt` file directly inside `dir`
fn scan_directory(
    dir: &Path,
    config: &Config,
    free_text: bool,
) -> Result<BTreeMap<String, Vec<serde_json::Value>>> {
    if !dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", dir.display());
    }

    let mut results = BTreeMap::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path: PathBuf = entry.path().to_path_buf();
        if !path.extension().map_or(false, |ext| ext == "txt") {
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let output = scan_text(&text, config, free_text)?;
        let name = entry.file_name().to_string_lossy().to_string();

        if output.is_empty() {
            warn!("⚠️ No classes detected in {}", name);
        } else {
            info!("📄 {}: {} courses", name, output.len());
        }
        results.insert(name, output);
    }

    Ok(results)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(config: Config) -> Result<()> {
    info!("{}", config.summary());
    pathway_transcript::api::ApiServer::new(std::sync::Arc::new(config))
        .start()
        .await
}

#[cfg(not(feature = "api"))]
async fn serve(_config: Config) -> Result<()> {
    anyhow::bail!("This build has no HTTP API; rebuild with `--features api`")
}
