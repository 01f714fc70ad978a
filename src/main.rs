//! symdeps CLI - dependency checker for .ko/.a/.so artifacts

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use symdeps::error::{DepError, FixSuggestion};
use symdeps::report::{self, JsonReport, OutputFormat, ReportOptions};
use symdeps::{ArtifactKind, Config};

#[derive(Parser)]
#[command(name = "symdeps")]
#[command(about = "Infer dependencies between kernel modules and libraries from their symbol tables")]
#[command(version)]
struct Cli {
    /// Artifact type to analyze
    #[arg(value_enum)]
    kind: ArtifactKind,

    /// Directory to scan (recursively)
    path: PathBuf,

    /// Show the symbols behind each dependency
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Maximum concurrent nm invocations
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Per-artifact nm timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// nm binary to use (e.g. riscv64-unknown-linux-musl-nm)
    #[arg(long)]
    nm: Option<String>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config, DepError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut config = config.with_env()?;

    if let Some(jobs) = cli.jobs {
        config.jobs = jobs.max(1);
    }
    if let Some(timeout) = cli.timeout {
        config.extract_timeout_secs = timeout;
    }
    if let Some(nm) = &cli.nm {
        config.nm = nm.clone();
    }

    config.validated()
}

async fn run(cli: Cli) -> Result<(), DepError> {
    let config = load_config(&cli)?;
    let graph = symdeps::analyze(cli.kind, &cli.path, &config).await?;

    match cli.format {
        OutputFormat::Text => {
            let options = ReportOptions {
                verbose: cli.verbose,
                color: !cli.no_color && std::io::stdout().is_terminal(),
                install_prefix: config.install_prefix,
                install_command: config.install_command,
            };
            print!("{}", report::render_text(&graph, cli.kind, &options)?);
        }
        OutputFormat::Json => {
            println!("{}", JsonReport::build(&graph, cli.kind)?.to_json()?);
        }
    }

    Ok(())
}
