use crate::config::{Config, load_config};
use crate::convert::{ConvertError, try_json_to_yaml, try_yaml_to_json};
use crate::errors::ChatRelayError;
use crate::redirect::RedirectResolver;
use crate::relay::{Delivery, PasteRelay, route_message};
use crate::utils::http::TextFetcher;
use crate::utils::{base64_decode, base64_encode, flippin_adjective};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::debug;

#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(about = "Outbound-content utilities for chat bots", version)]
pub struct Cli {
    /// Path to config.json (defaults to ~/.chatrelay/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert YAML to JSON (reads stdin when FILE is omitted)
    Yaml2json { file: Option<PathBuf> },
    /// Convert JSON to YAML (reads stdin when FILE is omitted)
    Json2yaml { file: Option<PathBuf> },
    /// Check a message against the line limit; exits 1 when over
    CheckLines { file: Option<PathBuf> },
    /// Upload text to the paste service and print the share link
    Paste { file: Option<PathBuf> },
    /// Print the message inline if it fits, otherwise relay it and print the link
    Share { file: Option<PathBuf> },
    /// Follow a URL's redirects and print the final URL
    Resolve { url: String },
    /// Download a URL and print its body
    Fetch { url: String },
    /// Base64 helpers
    Base64 {
        #[command(subcommand)]
        cmd: Base64Commands,
    },
    /// Print a random adjective
    Adjective,
}

#[derive(Subcommand)]
enum Base64Commands {
    /// Encode UTF-8 text
    Encode { text: String },
    /// Decode to UTF-8 text
    Decode { text: String },
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    execute(cli).await
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Yaml2json { file } => {
            let json = try_yaml_to_json(&read_input(file.as_deref()).await?);
            return Ok(print_converted(json));
        }
        Commands::Json2yaml { file } => {
            let yaml = try_json_to_yaml(&read_input(file.as_deref()).await?);
            return Ok(print_converted(yaml));
        }
        Commands::CheckLines { file } => {
            let config = load(cli.config.as_deref())?;
            let text = read_input(file.as_deref()).await?;
            let limit = config.line_limit()?;
            let ok = limit.is_within_limit(&text);
            println!(
                "{} lines, limit {}: {}",
                crate::lines::line_count(&text),
                limit.effective_limit(&text),
                if ok { "ok" } else { "too long" }
            );
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Paste { file } => {
            let config = load(cli.config.as_deref())?;
            let relay = PasteRelay::from_config(&config)?;
            match relay.submit(&read_input(file.as_deref()).await?).await {
                Some(link) => println!("{}", link),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Share { file } => {
            let config = load(cli.config.as_deref())?;
            let relay = PasteRelay::from_config(&config)?;
            let text = read_input(file.as_deref()).await?;
            match route_message(&text, config.line_limit()?, &relay).await {
                Delivery::Inline(text) => println!("{}", text),
                Delivery::Link(link) => println!("{}", link),
                Delivery::Undeliverable => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Resolve { url } => {
            let config = load(cli.config.as_deref())?;
            let resolver = RedirectResolver::from_config(&config)?;
            match resolver.resolve(&url).await {
                Some(resolved) => println!("{}", resolved),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Fetch { url } => {
            let config = load(cli.config.as_deref())?;
            let body = TextFetcher::from_config(&config)?
                .fetch_text(&url)
                .await;
            if body.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
            print!("{}", body);
        }
        Commands::Base64 { cmd } => match cmd {
            Base64Commands::Encode { text } => println!("{}", base64_encode(&text)),
            Base64Commands::Decode { text } => println!("{}", base64_decode(&text)),
        },
        Commands::Adjective => {
            let mut rng = fastrand::Rng::new();
            println!("{}", flippin_adjective(&mut rng));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_converted(result: Result<String, ConvertError>) -> ExitCode {
    match result {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", ChatRelayError::from(e));
            ExitCode::FAILURE
        }
    }
}

fn load(path: Option<&Path>) -> Result<Config> {
    let config = load_config(path)?;
    debug!("line limit {}", config.max_lines_limit()?);
    Ok(config)
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
