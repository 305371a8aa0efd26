//! CLI execution context.

use std::path::{Path, PathBuf};

use agora_cache::{Cache, FileStore};
use agora_commerce::cart::{CachePersistence, CartStore};
use anyhow::{Context as _, Result};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Cart store backed by the configured storage directory.
pub type FileCartStore = CartStore<CachePersistence<FileStore>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                if path.exists() {
                    (CliConfig::load(&path)?, Some(path))
                } else {
                    tracing::debug!(path = %path.display(), "config file not found, using defaults");
                    (CliConfig::default(), Some(path))
                }
            }
            None => match Self::find_config(&cwd) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "using config file");
                    (CliConfig::load(&path)?, Some(path))
                }
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Find the nearest config file walking up from `start`.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.is_file())
    }

    /// Directory the storage path is relative to.
    fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd)
    }

    /// Resolved storage directory.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(self.base_dir(), &self.config.storage.dir)
    }

    /// Open the persisted cart.
    pub fn cart_store(&self) -> Result<FileCartStore> {
        let dir = self.storage_dir();
        tracing::debug!(dir = %dir.display(), "opening cart storage");
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        Ok(CartStore::open(CachePersistence::new(cache)))
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
