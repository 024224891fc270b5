//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let config_path = Settings::default_config_path();
            set_value(&settings, key, value)?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!("Config saved to {}", config_path.display()));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            // Try to open in editor
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Set a dotted-key configuration value and save the result.
///
/// The updated document is deserialized back into `Settings` before saving,
/// so a typo in the key or an ill-typed value is rejected rather than
/// written out.
fn set_value(settings: &Settings, key: &str, value: &str) -> Result<()> {
    let mut root = toml::Value::try_from(settings)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut parts = key.split('.').peekable();
    let mut current = &mut root;

    while let Some(part) = parts.next() {
        let table = current
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("'{}' is not a configuration section", part))?;

        if parts.peek().is_none() {
            table.insert(part.to_string(), parse_value(value));
            break;
        }

        current = table
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration section: {}", part))?;
    }

    let validated: Settings = root
        .try_into()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    validated.save()?;

    Ok(())
}

/// Interpret a raw CLI value as the closest TOML type.
///
/// Comma-separated values become arrays, so list settings like
/// `captions.languages` can be set from the command line.
fn parse_value(raw: &str) -> toml::Value {
    if raw.contains(',') {
        return toml::Value::Array(
            raw.split(',')
                .map(|v| parse_value(v.trim()))
                .collect(),
        );
    }
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_value("42"), toml::Value::Integer(42));
        assert_eq!(parse_value("0.3"), toml::Value::Float(0.3));
        assert_eq!(
            parse_value("gpt-4o-mini"),
            toml::Value::String("gpt-4o-mini".to_string())
        );
    }

    #[test]
    fn test_parse_value_list() {
        assert_eq!(
            parse_value("en, no"),
            toml::Value::Array(vec![
                toml::Value::String("en".to_string()),
                toml::Value::String("no".to_string()),
            ])
        );
    }
}
