//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::ProxyConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ProxyConfig>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!("Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result)?;
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args
        .config
        .config
        .as_ref()
        .map(|path| path.display().to_string());

    match config_loader::ConfigLoader::resolve(
        args.config.config.as_deref(),
        &args.config.overrides(),
    ) {
        Ok(config) => {
            let warnings = collect_warnings(args, &config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                config: Some(config),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            config: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(args: &ValidateArgs, config: &ProxyConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let raw = &args.config;

    if let Some(ref value) = raw.buffer_size {
        if value.trim().parse::<usize>().map_or(true, |size| size == 0) {
            warnings.push(format!(
                "METRIC_BUFFER_SIZE '{value}' is not a positive integer - using {}",
                config.buffer_size
            ));
        }
    }

    if let Some(ref value) = raw.serialization {
        if !value.trim().is_empty()
            && contracts::SerializationMode::from_setting(Some(value)).as_setting() != value.trim()
        {
            warnings.push(format!(
                "SERIALIZATION '{value}' is not recognized - using the string batch default"
            ));
        }
    }

    if raw.mirror_url.is_some() && config.mirror_destination().is_none() {
        warnings.push("MIRROR_URL is set but empty - mirroring disabled".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) -> Result<()> {
    let source = result.config_path.as_deref().unwrap_or("environment");
    if result.valid {
        println!("✓ Configuration is valid: {}", source);

        if let Some(ref config) = result.config {
            println!();
            print!("{}", config_loader::ConfigLoader::to_toml(config)?);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
    Ok(())
}
