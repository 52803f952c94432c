use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Collection names to bind one CRUD adapter each.
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file backing the document store. Empty means in-memory only.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path(), in_memory: false }
    }
}

fn default_store_path() -> String { "data/store.json".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 允许通过环境变量 STORE_PATH 覆盖存储路径
        self.store.normalize_from_env();
        self.store.validate()?;
        self.normalize_models()?;
        Ok(())
    }

    fn normalize_models(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.models.iter_mut() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(anyhow!("models entries must not be empty"));
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(anyhow!("model `{trimmed}` is configured more than once"));
            }
            *name = trimmed.to_string();
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("STORE_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
        self.path = self.path.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if !self.in_memory && self.path.is_empty() {
            return Err(anyhow!("store.path is empty; set it in config.toml, via STORE_PATH, or enable store.in_memory"));
        }
        Ok(())
    }

    /// File path to persist to, or `None` when the store lives in memory only.
    pub fn file_path(&self) -> Option<&str> {
        if self.in_memory { None } else { Some(self.path.as_str()) }
    }
}
