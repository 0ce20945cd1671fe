use anyhow::Result;
use huddle_config::HuddleConfig;

use crate::cli::ConfigFormat;

const REDACTED: &str = "********";

/// Execute the render-config subcommand
pub fn execute(config: &HuddleConfig, format: ConfigFormat) -> Result<()> {
    print!("{}", render(config, format)?);
    Ok(())
}

/// Serialize the effective configuration, masking the service password
pub fn render(config: &HuddleConfig, format: ConfigFormat) -> Result<String> {
    let mut redacted = config.clone();
    if let Some(service) = redacted.database.service.as_mut() {
        if !service.password.is_empty() {
            service.password = REDACTED.to_string();
        }
    }

    let text = match format {
        ConfigFormat::Toml => toml::to_string_pretty(&redacted)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&redacted)? + "\n",
    };
    Ok(text)
}
