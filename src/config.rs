//! Normalizer configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! language = "en"
//! input_case = "cased"          # or "lower_cased"
//! deterministic = true
//! cache_dir = "/var/cache/spokenform"
//! overwrite_cache = false
//! whitelist = "my_whitelist.tsv"
//! lexicon_dir = "tables/en"
//! fallback_weight = 100.0
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// How the classifier treats letter case in lexicon keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCase {
    /// Input is expected in lower case; whitelist keys are folded to match.
    LowerCased,
    /// Input case is kept and matched as written.
    #[default]
    Cased,
}

impl InputCase {
    pub fn as_str(self) -> &'static str {
        match self {
            InputCase::LowerCased => "lower_cased",
            InputCase::Cased => "cased",
        }
    }
}

impl fmt::Display for InputCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Language code of the built-in lexicon.
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub input_case: InputCase,

    /// Compile only the preferred spoken form of each lexicon key.
    #[serde(default = "default_deterministic")]
    pub deterministic: bool,

    /// Directory holding compiled grammar archives. No caching when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Rebuild and rewrite the archive even when a valid one exists.
    #[serde(default)]
    pub overwrite_cache: bool,

    /// TSV file replacing the built-in whitelist table.
    #[serde(default)]
    pub whitelist: Option<PathBuf>,

    /// Directory of TSV tables overriding the built-in ones by name.
    #[serde(default)]
    pub lexicon_dir: Option<PathBuf>,

    /// Bias of the catch-all word category.
    #[serde(default = "default_fallback_weight")]
    pub fallback_weight: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            input_case: InputCase::default(),
            deterministic: default_deterministic(),
            cache_dir: None,
            overwrite_cache: false,
            whitelist: None,
            lexicon_dir: None,
            fallback_weight: default_fallback_weight(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_deterministic() -> bool {
    true
}

fn default_fallback_weight() -> f32 {
    100.0
}

impl NormalizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: NormalizerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(Error::Config("language must not be empty".to_string()));
        }
        if !self.fallback_weight.is_finite() || self.fallback_weight <= 0.0 {
            return Err(Error::Config(format!("fallback_weight must be finite and positive, got {}", self.fallback_weight)));
        }
        Ok(())
    }

    /// Registry key: configurations with equal keys share one normalizer.
    pub(crate) fn registry_key(&self) -> String {
        format!(
            "{}|{}|{}|{:?}|{}|{:?}|{:?}|{}",
            self.language,
            self.input_case,
            self.deterministic,
            self.cache_dir,
            self.overwrite_cache,
            self.whitelist,
            self.lexicon_dir,
            self.fallback_weight.to_bits(),
        )
    }
}
