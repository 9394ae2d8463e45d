use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use ai_interpreter::allowlist::DEFAULT_ALLOWLIST_FILE;
use ai_interpreter::formatter::prospect::{build_prospect_prompt, Prospect, Sender};
use ai_interpreter::scrape_check::ScrapeReport;
use ai_interpreter::{AllowList, Backend, Credential, Settings, TextFormatter};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ai-interpreter", version, about = "Polish text with Gemini")]
struct Cli {
    /// Settings file (defaults to ~/.config/ai-interpreter/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite text; prints the original if the service is unavailable
    Format {
        /// Text to format (read from stdin when omitted)
        text: Option<String>,

        /// Formatting instructions for the model
        #[arg(short, long)]
        instructions: Option<String>,
    },
    /// Check a scraper result document
    CheckScrape {
        /// JSON file (read from stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print outreach instructions built from a prospect JSON file
    ProspectPrompt {
        /// Prospect details (companyName, contactName, ...)
        prospect: PathBuf,

        /// Sender details (yourName, yourCompany, ...)
        #[arg(long)]
        sender: Option<PathBuf>,
    },
    /// Check an email address against the allowed list
    CheckEmail {
        email: String,

        /// Used when ALLOWED_EMAILS is not set
        #[arg(long, default_value = DEFAULT_ALLOWLIST_FILE)]
        allowlist: PathBuf,
    },
    /// Show the effective settings
    Config {
        /// Write the settings file with the current values
        #[arg(long)]
        init: bool,
    },
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

/// Split off one trailing `\n` or `\r\n` so piped text round-trips unchanged.
fn split_line_terminator(text: &str) -> (&str, &str) {
    if let Some(body) = text.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = text.strip_suffix('\n') {
        (body, "\n")
    } else {
        (text, "")
    }
}

fn read_json<T: DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&config_path)?;

    match cli.command {
        Command::Format { text, instructions } => {
            let backend = Backend::initialize(&settings, Credential::from_env());
            let formatter = TextFormatter::new(backend);

            match text {
                Some(text) => println!("{}", formatter.format(&text, instructions.as_deref())),
                None => {
                    let input = read_stdin()?;
                    let (body, terminator) = split_line_terminator(&input);
                    print!("{}{}", formatter.format(body, instructions.as_deref()), terminator);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckScrape { file } => {
            let json = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => read_stdin()?,
            };

            let summary = match ScrapeReport::from_json(&json).and_then(|r| r.summarize()) {
                Ok(summary) => summary,
                Err(e) => {
                    eprintln!("[ERROR] {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            println!("[OK] Scraper test successful!");
            println!("   - Site: {}", summary.site);
            println!("   - Items found: {}", summary.item_count);
            match summary.first_title {
                Some(title) => println!("   - First item title: {}...", title),
                None => println!("   - Note: No items found (this is okay for a test)"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::ProspectPrompt { prospect, sender } => {
            let prospect: Prospect = read_json(&prospect)?;
            let sender: Sender = match sender {
                Some(path) => read_json(&path)?,
                None => Sender::default(),
            };
            println!("{}", build_prospect_prompt(&prospect, &sender));
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckEmail { email, allowlist } => {
            match AllowList::load(&allowlist).is_allowed(&email) {
                Ok(true) => {
                    println!("Email address is allowed");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) => {
                    println!("Email address is not in the allowed list");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    eprintln!("[ERROR] {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Config { init } => {
            if init {
                settings.save(&config_path)?;
                info!("Wrote {}", config_path.display());
            }
            println!("# {}", config_path.display());
            print!("{}", settings.to_document());
            Ok(ExitCode::SUCCESS)
        }
    }
}
