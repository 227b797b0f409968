//! Precis CLI - ask an LLM questions and get structured summaries
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::{bail, Context};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use precis::{parse_summary, Config, Summarizer, Summary, Tutor};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_PROMPT: &str =
    "Explain what an embedding is in one short paragraph, like I'm a backend engineer.";

const SAMPLE_NOTES: &str = "
We discussed migrating on-prem workloads to cloud infrastructure.
Security review must be completed before migration.
Ganesh will draft the migration plan by Friday.
Risk: delays if security review is not completed on time.
Open question: which region should host the primary workloads?
";

#[derive(Parser)]
#[command(name = "precis")]
#[command(author, version, about = "Ask an LLM questions and get structured summaries", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a precis.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the tutor a free-text question
    Ask {
        /// Prompt to send (defaults to a short embeddings question)
        prompt: Option<String>,
    },
    /// Summarise text into structured JSON
    Summarise {
        /// Text to summarise (reads stdin when omitted)
        text: Option<String>,
        /// Read the text from a file
        #[arg(long, conflicts_with_all = ["text", "sample"])]
        file: Option<PathBuf>,
        /// Summarise the built-in meeting notes sample
        #[arg(long, conflicts_with = "text")]
        sample: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Validate a captured model reply against the summary schema
    Parse {
        /// Read the reply from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the JSON Schema of the summary
    Schema,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Ask { prompt } => {
            let config = load_config(cli.config.as_deref())?;
            let tutor = Tutor::new(&config)?;

            let answer = tutor.ask(prompt.as_deref().unwrap_or(DEFAULT_PROMPT)).await?;

            println!("🧠 LLM RESPONSE:\n");
            println!("{}", answer);
        }
        Commands::Summarise {
            text,
            file,
            sample,
            format,
        } => {
            // Build the summarizer first so a missing key fails before reading input
            let config = load_config(cli.config.as_deref())?;
            let summarizer = Summarizer::new(&config)?;

            let input = if sample {
                SAMPLE_NOTES.to_string()
            } else {
                read_input(text, file.as_deref())?
            };
            tracing::info!(chars = input.len(), "summarising");

            let summary = summarizer.summarize(&input).await?;
            print_summary(&summary, format)?;
        }
        Commands::Parse { file } => {
            let raw = read_input(None, file.as_deref())?;
            let summary = parse_summary(&raw)?;
            print_summary(&summary, OutputFormat::Json)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&Summary::json_schema())?);
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Logs go to stderr; RUST_LOG takes precedence over -v
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("precis={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Text from the argument, a file, or piped stdin, in that order
fn read_input(text: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("no input given; pass text, --file, or pipe it on stdin");
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf).context("reading stdin")?;
    Ok(buf)
}

fn print_summary(summary: &Summary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            println!("{}", "💡 TL;DR:".bold());
            println!("  {}", summary.tldr);

            print_section("📌 Key Points:", &summary.key_points);
            print_section("✅ Action Items:", &summary.action_items);
            print_section("⚠️  Risks:", &summary.risks);
            print_section("❓ Open Questions:", &summary.open_questions);
        }
    }
    Ok(())
}

fn print_section(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", heading.bold());
    for item in items {
        println!("  • {}", item);
    }
}
