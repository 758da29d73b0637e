use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scout::agent::DEFAULT_MAX_ITERATIONS;

mod commands;
mod render;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: RunOptions,

    #[command(subcommand)]
    command: Command,
}

/// Settings shared by both agents
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Model to use. Defaults to GEMINI_MODEL, then gemini-pro, which the Gemini API
    /// has retired; pass a current model such as gemini-2.0-flash
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Upper bound on model turns per question
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// System prompt template file, replacing the built-in one
    #[arg(long, global = true)]
    prompt: Option<PathBuf>,

    /// Print the answer as plain text instead of rendered markdown
    #[arg(long, global = true)]
    plain: bool,

    /// Log each tool call and observation
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Ask about issue tickets, help articles and knowledge base articles
    Service,

    /// Research a topic on Wikipedia and YouTube
    Media,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "scout=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);
    scout::config::load_dotenv();

    match cli.command {
        Command::Service => commands::service::execute(&cli.options).await,
        Command::Media => commands::media::execute(&cli.options).await,
    }
}
