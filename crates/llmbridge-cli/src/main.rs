//! llmbridge CLI — entry point.
//!
//! # Commands
//!
//! - `llmbridge detect MODEL` — print the provider a model name resolves to
//! - `llmbridge generate [-m MODEL] PROMPT` — one-shot generation
//! - `llmbridge status` — show effective configuration and provider status

mod helpers;
mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use llmbridge_core::config::LlmConfig;
use llmbridge_core::types::{Provider, ReasoningLevel};
use llmbridge_providers::{detect_provider, Llm};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// llmbridge — one request/response contract over several LLM APIs
#[derive(Parser)]
#[command(name = "llmbridge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider a model identifier resolves to
    Detect {
        /// Model identifier, e.g. "gpt-4o" or "claude-3-opus"
        model: String,
    },

    /// Generate a completion for a single prompt
    Generate(GenerateArgs),

    /// Show effective configuration and provider status
    Status {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Prompt text
    prompt: String,

    /// Model identifier (overrides the config file)
    #[arg(short, long)]
    model: Option<String>,

    /// Force a provider instead of detecting it from the model name
    #[arg(long)]
    provider: Option<Provider>,

    /// System prompt
    #[arg(long)]
    system: Option<String>,

    #[arg(long)]
    temperature: Option<f64>,

    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    top_p: Option<f64>,

    /// Reasoning effort: none, minimal, low, medium, high
    #[arg(long)]
    reasoning: Option<ReasoningLevel>,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// JSON Schema file; prints the structured output instead of raw text
    #[arg(long)]
    schema: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable backend call tracing
    #[arg(long, default_value_t = false)]
    no_tracing: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { model } => {
            init_logging(false);
            println!("{}", detect_provider(&model));
            Ok(())
        }
        Commands::Generate(args) => {
            init_logging(args.logs);
            run_generate(args).await
        }
        Commands::Status { config } => status::run(config.as_deref()),
    }
}

// ─────────────────────────────────────────────
// Generate command
// ─────────────────────────────────────────────

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let structured = args.schema.is_some();
    let config = build_config(&args)?;
    debug!(model = %config.model, structured, "running generate");

    let llm = Llm::new(config);
    let response = llm
        .generate(args.prompt)
        .await
        .map_err(|e| anyhow!(helpers::describe_error(&e)))?;

    if structured {
        let value = response
            .structured_output
            .unwrap_or_else(|| serde_json::json!({}));
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        helpers::print_response(&response.content);
    }

    Ok(())
}

/// Merge the config file, environment and flags; flags win.
fn build_config(args: &GenerateArgs) -> Result<LlmConfig> {
    let mut config = helpers::base_config(args.config.as_deref());

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(provider) = args.provider {
        config.provider = Some(provider);
    }
    if let Some(system) = &args.system {
        config.system_prompt = Some(system.clone());
    }
    if let Some(temperature) = args.temperature {
        config.temperature = Some(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = Some(max_tokens);
    }
    if let Some(top_p) = args.top_p {
        config.top_p = Some(top_p);
    }
    if let Some(reasoning) = args.reasoning {
        config.reasoning = Some(reasoning);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    if let Some(path) = &args.schema {
        config.schema = Some(helpers::read_schema(path)?);
    }
    if args.no_tracing {
        config.tracing_enabled = Some(false);
    }

    Ok(config)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("llmbridge=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
