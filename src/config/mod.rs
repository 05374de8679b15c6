//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the crawler also runs without a configuration file.
//!
//! # Example
//!
//! ```no_run
//! use tld_price_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Checkpoint every {} zones", config.crawler.checkpoint_every);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, ZoneCandidates};

// Re-export parser functions
pub use parser::{
    candidate_zones, compute_config_hash, load_config, load_config_or_default,
    load_config_with_hash,
};
