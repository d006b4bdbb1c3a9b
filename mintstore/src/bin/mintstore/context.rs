use anyhow::{Context, Result};
use mintstore::{ListingDefaults, MarketStore, SeedData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = ".mintstore/config.toml";

/// Store context for mintstore commands
pub struct StoreContext {
    /// Path the configuration was read from (or would be read from)
    pub config_path: PathBuf,
    /// Whether a config file was found at `config_path`
    pub loaded: bool,
    /// Loaded configuration, or defaults
    pub config: MintstoreConfig,
}

/// Configuration stored in .mintstore/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MintstoreConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub listings: ListingDefaults,
}

/// Where the store's starting records come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    #[default]
    Demo,
    Empty,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub seed: SeedSource,
    #[serde(default = "default_seed_file")]
    pub seed_file: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed: SeedSource::default(),
            seed_file: default_seed_file(),
        }
    }
}

fn default_seed_file() -> Option<String> {
    Some("${MINTSTORE_SEED_FILE}".to_string())
}

impl StoreContext {
    /// Load context from `explicit`, or from `.mintstore/config.toml` in the current directory.
    ///
    /// An explicit path must exist; the default path falls back to defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                Self::from_path(path.to_path_buf())
            }
            None => {
                let current_dir = std::env::current_dir()
                    .context("Failed to get current directory")?;
                Self::from_path(current_dir.join(DEFAULT_CONFIG_PATH))
            }
        }
    }

    pub fn from_path(config_path: PathBuf) -> Result<Self> {
        let (config, loaded) = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: MintstoreConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            (config, true)
        } else {
            log::debug!("no config at {}, using defaults", config_path.display());
            (MintstoreConfig::default(), false)
        };

        Ok(Self {
            config_path,
            loaded,
            config,
        })
    }

    /// The seed file path, expanding environment variables.
    ///
    /// Relative paths resolve against the directory holding the config file.
    pub fn seed_file(&self) -> Result<PathBuf> {
        let raw = self
            .config
            .store
            .seed_file
            .as_deref()
            .context("store.seed_file must be set when store.seed = \"file\"")?;
        let expanded = expand_env(raw)?;
        let path = PathBuf::from(expanded);
        if path.is_relative()
            && let Some(base) = self.config_path.parent()
        {
            return Ok(base.join(path));
        }
        Ok(path)
    }

    /// Build the store described by this context.
    pub async fn build_store(&self) -> Result<MarketStore> {
        let store = match self.config.store.seed {
            SeedSource::Demo => MarketStore::demo(),
            SeedSource::Empty => MarketStore::empty(),
            SeedSource::File => {
                let path = self.seed_file()?;
                let seed = SeedData::load(&path)
                    .await
                    .with_context(|| format!("Failed to load seed file {}", path.display()))?;
                MarketStore::from_seed(seed)
                    .with_context(|| format!("Invalid seed file {}", path.display()))?
            }
        };
        Ok(store.with_listing_defaults(self.config.listings))
    }
}

/// Expand `${VAR}` references from the process environment.
pub fn expand_env(value: &str) -> Result<String> {
    expand_with(value, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` references using `lookup`; an unresolved variable is an error.
pub fn expand_with<F>(value: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            anyhow::bail!("Unterminated variable reference in {value:?}");
        };
        let var_name = &after[..end];
        let resolved = lookup(var_name)
            .with_context(|| format!("Environment variable {var_name} not set"))?;
        expanded.push_str(&resolved);
        rest = &after[end + 1..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = MintstoreConfig::default();
        assert_eq!(config.store.seed, SeedSource::Demo);
        assert_eq!(config.listings.trending_limit, 4);
        assert_eq!(config.listings.featured_limit, 8);
    }

    #[test]
    fn test_config_serialization() {
        let config = MintstoreConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("seed = \"demo\""));
        assert!(toml_str.contains("trending_limit"));
        assert!(toml_str.contains("${MINTSTORE_SEED_FILE}"));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[listings]\ntrending_limit = 2\n");
        let ctx = StoreContext::from_path(path).unwrap();
        assert!(ctx.loaded);
        assert_eq!(ctx.config.listings.trending_limit, 2);
        assert_eq!(ctx.config.listings.featured_limit, 8);
        assert_eq!(ctx.config.store.seed, SeedSource::Demo);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StoreContext::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn expansion_replaces_every_reference() {
        let lookup = |name: &str| match name {
            "ROOT" => Some("/data".to_string()),
            "NAME" => Some("seed".to_string()),
            _ => None,
        };
        assert_eq!(
            expand_with("${ROOT}/${NAME}.json", lookup).unwrap(),
            "/data/seed.json"
        );
        assert_eq!(expand_with("plain.json", lookup).unwrap(), "plain.json");
        assert!(expand_with("${MISSING}", lookup).is_err());
        assert!(expand_with("${ROOT", lookup).is_err());
    }

    #[tokio::test]
    async fn file_seed_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let seed = SeedData::demo();
        std::fs::write(
            dir.path().join("market.json"),
            serde_json::to_string(&seed).unwrap(),
        )
        .unwrap();
        let path = write_config(
            dir.path(),
            "[store]\nseed = \"file\"\nseed_file = \"market.json\"\n\n[listings]\nfeatured_limit = 1\n",
        );

        let ctx = StoreContext::from_path(path).unwrap();
        let store = ctx.build_store().await.unwrap();
        let user = store.get_user(2).await.expect("seeded user");
        assert_eq!(user.username, "janesmith");
        assert_eq!(store.listing_defaults().featured_limit, 1);
    }

    #[tokio::test]
    async fn empty_seed_builds_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[store]\nseed = \"empty\"\n");
        let store = StoreContext::from_path(path).unwrap().build_store().await.unwrap();
        assert!(store.get_user(1).await.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn seed_file_expands_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("env-seed.json");
        std::fs::write(&seed_path, r#"{"users": []}"#).unwrap();
        let path = write_config(dir.path(), "[store]\nseed = \"file\"\n");

        let ctx = StoreContext::from_path(path).unwrap();

        // SAFETY: serialized with every other test that touches the environment.
        unsafe { std::env::set_var("MINTSTORE_SEED_FILE", &seed_path) };
        let resolved = ctx.seed_file();
        let built = ctx.build_store().await;
        unsafe { std::env::remove_var("MINTSTORE_SEED_FILE") };

        assert_eq!(resolved.unwrap(), seed_path);
        assert!(built.unwrap().get_user(1).await.is_none());
        assert!(ctx.seed_file().is_err());
    }
}
