//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use ritual_bag::catalog::FixtureCatalog;
use ritual_bag::Currency;
use ritual_cache::{BagVault, Cache, SessionId};

use crate::config::{CliConfig, StorageBackend};
use crate::output::Output;

/// Config file names searched from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["ritual.toml", ".ritual.toml", "ritual.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Session whose bag the command works on.
    pub session: SessionId,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, session: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let session = SessionId::new(session.unwrap_or(&config.bag.session));

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
            session,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Currency for bags created by this command.
    pub fn currency(&self) -> Result<Currency> {
        self.config.bag.currency()
    }

    /// Open the bag vault on the configured backend.
    pub fn vault(&self) -> Result<BagVault> {
        let cache = match self.config.storage.backend {
            StorageBackend::File => {
                let dir = self.resolve_config_path(&self.config.storage.dir);
                tracing::debug!(dir = %dir.display(), "opening file store");
                Cache::file(&dir)
                    .with_context(|| format!("Failed to open store at {}", dir.display()))?
            }
            StorageBackend::Memory => Cache::in_memory(),
        };
        Ok(BagVault::new(cache))
    }

    /// Load the catalog fixture named in the config.
    pub fn catalog(&self) -> Result<FixtureCatalog> {
        let Some(fixture) = self.config.catalog.fixture.as_deref() else {
            bail!("No catalog fixture configured; set [catalog] fixture in ritual.toml");
        };
        let path = self.resolve_config_path(fixture);
        FixtureCatalog::load(&path)
            .with_context(|| format!("Failed to load catalog fixture: {}", path.display()))
    }

    /// Resolve a command-line path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve_against(&self.cwd, path)
    }

    /// Resolve a path from the config file relative to the directory that
    /// holds it, so commands run from a subdirectory share one store.
    pub fn resolve_config_path(&self, path: &str) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .map(|p| resolve_against(&self.cwd, &p.to_string_lossy()))
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone());
        resolve_against(&base, path)
    }
}

fn resolve_against(base: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("ritual.toml"),
            "[bag]\ncurrency = \"CHF\"\nsession = \"shop\"\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.bag.session, "shop");
        assert_eq!(path, root.path().join("ritual.toml"));
    }

    #[test]
    fn test_resolve_path() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
            config_path: None,
            session: SessionId::new("default"),
        };
        assert_eq!(ctx.resolve_path("store"), PathBuf::from("/work/store"));
        assert_eq!(ctx.resolve_path("/abs"), PathBuf::from("/abs"));
        assert_eq!(ctx.resolve_config_path("store"), PathBuf::from("/work/store"));
    }

    #[test]
    fn test_config_paths_follow_the_config_file() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/proj/sub/deeper"),
            config_path: Some(PathBuf::from("/proj/ritual.toml")),
            session: SessionId::new("default"),
        };
        assert_eq!(ctx.resolve_config_path(".ritual/store"), PathBuf::from("/proj/.ritual/store"));
        assert_eq!(ctx.resolve_config_path("/abs/catalog.json"), PathBuf::from("/abs/catalog.json"));
        assert_eq!(ctx.resolve_path("script.json"), PathBuf::from("/proj/sub/deeper/script.json"));

        let relative = Context {
            config_path: Some(PathBuf::from("conf/ritual.toml")),
            ..ctx
        };
        assert_eq!(
            relative.resolve_config_path("catalog.json"),
            PathBuf::from("/proj/sub/deeper/conf/catalog.json")
        );
    }

    #[test]
    fn test_catalog_requires_fixture() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
            config_path: None,
            session: SessionId::new("default"),
        };
        assert!(ctx.catalog().is_err());
    }
}
