use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, ZoneCandidates};
use crate::model::Zone;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_zone_candidates(&config.zones)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.checkpoint_every < 1 {
        return Err(ConfigError::Validation(
            "checkpoint-every must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe-timeout-secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_dir.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint-dir cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Every candidate must be a well-formed zone and at least one must exist
fn validate_zone_candidates(zones: &ZoneCandidates) -> Result<(), ConfigError> {
    if zones.is_empty() {
        return Err(ConfigError::Validation(
            "at least one candidate zone is required".to_string(),
        ));
    }

    for candidate in zones.all() {
        Zone::parse(candidate)
            .map_err(|e| ConfigError::InvalidZone(format!("'{}': {}", candidate, e)))?;
    }

    Ok(())
}
