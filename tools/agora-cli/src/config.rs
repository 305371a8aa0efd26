//! CLI configuration.

use std::path::Path;

use agora_commerce::checkout::{CheckoutConfig, ANONYMOUS_CUSTOMER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched for, nearest directory first.
pub const CONFIG_NAMES: [&str; 3] = ["agora.toml", ".agora.toml", "agora.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Payment widget configuration.
    #[serde(default)]
    pub checkout: CheckoutSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Where the cart snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed store, relative to the config file.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".agora".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Payment widget settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSection {
    /// Public client key issued by the payment provider.
    #[serde(default)]
    pub client_key: String,

    /// Storefront origin; redirects go to `{origin}/success` and `{origin}/fail`.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Customer key (default: ANONYMOUS).
    #[serde(default = "default_customer_key")]
    pub customer_key: String,
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_customer_key() -> String {
    ANONYMOUS_CUSTOMER.to_string()
}

impl Default for CheckoutSection {
    fn default() -> Self {
        Self {
            client_key: String::new(),
            origin: default_origin(),
            customer_key: default_customer_key(),
        }
    }
}

impl CheckoutSection {
    /// Widget settings derived from this section.
    pub fn to_checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            customer_key: self.customer_key.clone(),
            ..CheckoutConfig::for_origin(self.client_key.clone(), &self.origin)
        }
    }
}

/// Generate a default agora.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Agora CLI configuration

[storage]
dir = "{dir}"

[checkout]
# client_key = "test_ck_..."
origin = "{origin}"
customer_key = "{customer}"
"#,
        dir = default_storage_dir(),
        origin = default_origin(),
        customer = ANONYMOUS_CUSTOMER,
    )
}
