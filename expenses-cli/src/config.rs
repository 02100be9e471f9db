use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_expenses_home;

/// The store refuses pages larger than this
pub const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSection,
    pub ollama: OllamaSection,
    pub eval: EvalSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub base_url: String,
    pub page_limit: u32,
    /// Where `download` writes and `tag-eval`/`summary` read the exported set
    pub export_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    /// Vector length the store accepts for `desc_embedding`
    pub embed_dims: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSection {
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            page_limit: MAX_PAGE_LIMIT,
            export_path: PathBuf::from("data/all.json"),
        }
    }
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_model: "gemma3:4b".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            embed_dims: 768,
        }
    }
}

impl Default for EvalSection {
    fn default() -> Self {
        Self {
            sample_size: 100,
            seed: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.store.page_limit == 0 || self.store.page_limit > MAX_PAGE_LIMIT {
            bail!(
                "store.page_limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
                self.store.page_limit
            );
        }
        if self.ollama.embed_dims == 0 {
            bail!("ollama.embed_dims must be positive");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_expenses_home()?.join("config.toml"))
}

/// Missing file means defaults; a partial file fills the gaps with defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load `explicit` (which must exist) or the default `~/.expenses/config.toml`
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(p) if !p.exists() => bail!("config file not found: {}", p.display()),
        Some(p) => load_config_from(p),
        None => load_config_from(&config_path()?),
    }
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
