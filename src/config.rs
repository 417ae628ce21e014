use crate::domain::MergeMethod;
use crate::error::{HotfixError, Result};
use crate::poll::PollPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "hotfix.toml";

/// File looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".hotfix.toml";

/// Represents the complete configuration for hotfix-propagator.
///
/// Every section is optional; missing values fall back to the defaults the
/// action inputs document.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_hotfix_suffix() -> String {
    "hotfix.1".to_string()
}

fn default_direct_merge_branches() -> Vec<String> {
    vec!["main".to_string(), "release/*".to_string()]
}

fn default_update_then_merge_branches() -> Vec<String> {
    vec!["dev".to_string()]
}

/// Default values for inputs the caller does not supply.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_hotfix_suffix")]
    pub hotfix_suffix: String,

    #[serde(default = "default_direct_merge_branches")]
    pub direct_merge_branches: Vec<String>,

    #[serde(default = "default_update_then_merge_branches")]
    pub update_then_merge_branches: Vec<String>,

    #[serde(default)]
    pub auto_cleanup: bool,

    #[serde(default)]
    pub merge_method: MergeMethod,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            hotfix_suffix: default_hotfix_suffix(),
            direct_merge_branches: default_direct_merge_branches(),
            update_then_merge_branches: default_update_then_merge_branches(),
            auto_cleanup: false,
            merge_method: MergeMethod::default(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_user_agent() -> String {
    "hotfix-propagator".to_string()
}

/// Connection settings for the GitHub API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
            per_page: default_per_page(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_attempts() -> u32 {
    10
}

fn default_delay_ms() -> u64 {
    2000
}

/// Bound on waiting for a PR mergeability verdict.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `hotfix.toml` in current directory
/// 3. `.hotfix.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE);
        if user_path.exists() {
            fs::read_to_string(user_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| HotfixError::config(e.to_string()))
}
