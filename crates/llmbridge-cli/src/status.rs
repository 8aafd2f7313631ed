//! `llmbridge status` — show the effective configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use llmbridge_providers::registry::PROVIDERS;
use llmbridge_providers::{AdapterRegistry, ResolvedConfig};

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let resolved = ResolvedConfig::resolve(crate::helpers::base_config(config_path));
    let adapters = AdapterRegistry::default();

    println!();
    println!("{}", "llmbridge status".cyan().bold());
    println!();

    match config_path {
        Some(path) => println!(
            "  {:<14} {} {}",
            "Config:".bold(),
            path.display(),
            if path.exists() {
                "✓".green().to_string()
            } else {
                "(not found)".red().to_string()
            }
        ),
        None => println!("  {:<14} {}", "Config:".bold(), "(defaults)".dimmed()),
    }

    println!("  {:<14} {}", "Model:".bold(), resolved.model());
    println!("  {:<14} {}", "Provider:".bold(), resolved.provider());

    let cfg = resolved.as_config();
    println!(
        "  {:<14} {}",
        "Parameters:".bold(),
        format!(
            "temp: {} | timeout: {}ms | tracing: {}",
            cfg.temperature
                .map(|t| t.to_string())
                .unwrap_or_else(|| "default".to_string()),
            resolved.timeout_ms(),
            resolved.tracing_enabled(),
        )
        .dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let key = if std::env::var(spec.env_key).is_ok_and(|v| !v.is_empty()) {
            format!("{} {}", "✓".green(), spec.env_key)
        } else {
            format!("{}", format!("· {} not set", spec.env_key).dimmed())
        };
        let adapter = if adapters.supports(spec.provider) {
            "available".green().to_string()
        } else {
            "not implemented".yellow().to_string()
        };
        println!("    {:<12} {:<28} {}", spec.display_name, key, adapter);
    }

    println!();

    Ok(())
}
