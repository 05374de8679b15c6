use crate::config::types::{Config, ZoneCandidates};
use crate::config::validation::validate;
use crate::model::Zone;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tld_price_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Base URL: {}", config.crawler.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path`, or the validated defaults when no path is given
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Computes a SHA-256 hash of the effective configuration
///
/// The configuration is re-serialized to TOML first, so defaults that were not
/// written in the file still contribute to the hash.
pub fn compute_config_hash(config: &Config) -> Result<String, ConfigError> {
    let canonical = toml::to_string(config)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: Option<&Path>) -> Result<(Config, String), ConfigError> {
    let config = load_config_or_default(path)?;
    let hash = compute_config_hash(&config)?;
    Ok((config, hash))
}

/// Parses the candidate list into zones, dropping duplicates
///
/// Order follows [`ZoneCandidates::all`]; the first occurrence of a zone wins.
pub fn candidate_zones(candidates: &ZoneCandidates) -> Result<Vec<Zone>, ConfigError> {
    let mut seen = HashSet::new();
    let mut zones = Vec::with_capacity(candidates.len());

    for raw in candidates.all() {
        let zone = Zone::parse(raw)
            .map_err(|e| ConfigError::InvalidZone(format!("'{}': {}", raw, e)))?;
        if seen.insert(zone.clone()) {
            zones.push(zone);
        } else {
            tracing::debug!("Dropping duplicate candidate zone: {}", zone);
        }
    }

    Ok(zones)
}
