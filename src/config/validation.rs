use crate::config::types::{Config, OutputConfig, ScraperConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Excel rejects sheet names longer than this
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel does not allow in a sheet name
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates listing walk configuration
fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.listing_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing-token cannot be empty".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.workbook_path.is_empty() {
        return Err(ConfigError::Validation(
            "workbook-path cannot be empty".to_string(),
        ));
    }

    if !config.workbook_path.ends_with(".xlsx") {
        return Err(ConfigError::Validation(format!(
            "workbook-path must end in .xlsx, got '{}'",
            config.workbook_path
        )));
    }

    validate_sheet_name(&config.sheet_name)?;

    if let Some(dir) = &config.export_dir {
        if dir.is_empty() {
            return Err(ConfigError::Validation(
                "export-dir cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Checks a worksheet name against Excel's naming rules
fn validate_sheet_name(name: &str) -> ConfigResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SHEET_NAME_LEN {
        return Err(ConfigError::Validation(format!(
            "sheet-name must be 1 to {} characters, got {}",
            MAX_SHEET_NAME_LEN, len
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(ConfigError::Validation(format!(
            "sheet-name '{}' contains forbidden character '{}'",
            name, c
        )));
    }

    Ok(())
}
