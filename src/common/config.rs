//! # Configuration
//!
//! Catalog constants and the optional TOML server configuration.
//!
//! The catalog itself is not configurable: sample size, tag vocabulary,
//! image area and simulated delay are fixed constants. Only the network
//! address of the server can be changed, through a TOML file or the CLI.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

// ============================================================================
// CATALOG CONSTANTS
// ============================================================================

/// Number of generated images present at startup (ids 1..=50)
pub const N_SAMPLE_IMAGES: usize = 50;
/// Rectangles painted on each generated sample image
pub const N_SAMPLE_RECTANGLES: usize = 5;
/// Tags assigned to every image
pub const N_TAGS_PER_IMAGE: usize = 3;
/// Width of the sample image area
pub const IMAGE_AREA_WIDTH: i64 = 120;
/// Height of the sample image area
pub const IMAGE_AREA_HEIGHT: i64 = 120;
/// How long a DELAYED fetch is held back
pub const RESPONSE_DELAY: Duration = Duration::from_secs(3);
/// Size of the tag vocabulary (`tag1`..`tag10`)
pub const TAG_VOCABULARY_SIZE: usize = 10;

/// Build the fixed tag vocabulary: `tag1`, `tag2`, ... `tag10`.
pub fn tag_vocabulary() -> Vec<String> {
    (1..=TAG_VOCABULARY_SIZE).map(|i| format!("tag{}", i)).collect()
}

// ============================================================================
// SERVER CONFIGURATION
// ============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8000";

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete server configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfo,
}

/// Network settings for this server instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Address the HTTP listener binds to (e.g., "127.0.0.1:8000")
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

impl ServerConfig {
    /// Load server configuration from a TOML file.
    ///
    /// # Example
    /// ```ignore
    /// let config = ServerConfig::from_file("config/server.toml")?;
    /// ```
    pub fn from_file(path: &str) -> Result<Self> {
        load_config(path)
    }
}
