//! Layered settings: built-in defaults, then `codeqa.toml`, then environment,
//! then command-line flags. The API key only ever comes from the environment.

use anyhow::{Context, Result};
use clap::ValueEnum;
use codeqa_code_chunker::{ChunkerConfig, ChunkingStrategy};
use codeqa_review::{ModelConfig, ReviewError, API_KEY_ENV};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "codeqa.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub model: ModelSection,
    pub chunker: ChunkerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// 0 disables the timeout
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load `explicit` if given (it must exist), else `codeqa.toml` under
    /// `workdir` when present, else defaults.
    pub fn load(explicit: Option<&Path>, workdir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = workdir.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

/// Flag values that win over every other layer
#[derive(Debug, Default, Clone)]
pub struct ModelOverrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Named chunker setups; a preset replaces the file's `[chunker]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChunkPreset {
    /// Smaller chunks for models with a short context window
    SmallModels,
    /// Plain line-count cuts, no parsing
    Speed,
}

impl ChunkPreset {
    pub fn config(self) -> ChunkerConfig {
        match self {
            Self::SmallModels => ChunkerConfig::for_small_models(),
            Self::Speed => ChunkerConfig::for_speed(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ChunkerOverrides {
    pub preset: Option<ChunkPreset>,
    pub strategy: Option<ChunkingStrategy>,
    pub max_chunk_tokens: Option<usize>,
}

pub fn resolve_model_config<F>(
    file: &ModelSection,
    lookup: F,
    flags: &ModelOverrides,
) -> Result<ModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(API_KEY_ENV)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ReviewError::MissingApiKey)?;

    let mut config = ModelConfig::new(api_key);
    if let Some(model) = &file.model {
        config.model = model.clone();
    }
    if let Some(base_url) = &file.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(temperature) = file.temperature {
        config.temperature = temperature;
    }
    if let Some(max) = file.max_output_tokens {
        config.max_output_tokens = max;
    }
    if let Some(secs) = file.timeout_secs {
        config.request_timeout = timeout(secs);
    }

    let mut config = config
        .with_overrides_from(lookup)
        .context("Invalid model settings in environment")?;

    if let Some(model) = &flags.model {
        config.model = model.clone();
    }
    if let Some(temperature) = flags.temperature {
        config.temperature = temperature;
    }
    if let Some(max) = flags.max_output_tokens {
        config.max_output_tokens = max;
    }
    if let Some(secs) = flags.timeout_secs {
        config.request_timeout = timeout(secs);
    }

    config.validate().context("Invalid model settings")?;
    Ok(config)
}

pub fn resolve_chunker_config(file: &ChunkerConfig, flags: &ChunkerOverrides) -> ChunkerConfig {
    let mut config = flags
        .preset
        .map_or_else(|| file.clone(), ChunkPreset::config);
    if let Some(strategy) = flags.strategy {
        config.strategy = strategy;
    }
    if let Some(max) = flags.max_chunk_tokens {
        config.max_chunk_tokens = max;
    }
    config
}

fn timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to resolve working directory")
}
