//! Compiled-graph archives.
//!
//! An archive is a JSON document holding everything an [`Engine`] decodes
//! with: the preprocessing cascade, the sentence graph and the verbalizers.
//! It is named after its [`ArchiveKey`], and its header repeats the key so a
//! renamed or stale file is detected rather than trusted.
//!
//! The cache never affects results. Any missing, unreadable or mismatched
//! archive is reported to the caller, which rebuilds.

use crate::config::{InputCase, NormalizerConfig};
use crate::engine::{CompiledVerbalizer, Engine};
use crate::error::{Error, Result};
use crate::fst::{Alphabet, Fst};
use crate::rewrite::RewriteCascade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Bumped whenever the archive layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Identity of a compiled configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveKey {
    pub language: String,
    pub deterministic: bool,
    pub input_case: InputCase,
    /// Content hash of the lexicon, whitelist included.
    pub lexicon_fingerprint: u64,
    pub fallback_weight: f32,
}

impl ArchiveKey {
    pub fn new(config: &NormalizerConfig, lexicon_fingerprint: u64) -> Self {
        ArchiveKey {
            language: config.language.clone(),
            deterministic: config.deterministic,
            input_case: config.input_case,
            lexicon_fingerprint,
            fallback_weight: config.fallback_weight,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_tn_{}_deterministic_{}_{:016x}_{:08x}_tokenize",
            self.language,
            self.deterministic,
            self.input_case,
            self.lexicon_fingerprint,
            self.fallback_weight.to_bits()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveHeader {
    pub format_version: u32,
    pub crate_version: String,
    pub key: String,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    pub header: ArchiveHeader,
    pub cascade: RewriteCascade,
    /// Named graphs; the sentence graph is stored under `tokenize`.
    pub fsts: BTreeMap<String, Fst>,
    pub verbalizers: BTreeMap<String, CompiledVerbalizer>,
}

const TOKENIZE: &str = "tokenize";

impl Archive {
    pub fn from_engine(key: &ArchiveKey, engine: &Engine) -> Self {
        Archive {
            header: ArchiveHeader {
                format_version: FORMAT_VERSION,
                crate_version: env!("CARGO_PKG_VERSION").to_string(),
                key: key.to_string(),
                built_at: Utc::now(),
            },
            cascade: engine.cascade().clone(),
            fsts: BTreeMap::from([(TOKENIZE.to_string(), engine.tokenizer().clone())]),
            verbalizers: engine.verbalizers().clone(),
        }
    }

    /// Rejects archives written for another key or by another format.
    pub fn validate(&self, key: &ArchiveKey, path: &Path) -> Result<()> {
        let reject = |reason: String| Err(Error::Cache { path: path.to_path_buf(), reason });
        if self.header.format_version != FORMAT_VERSION {
            return reject(format!("format version {} (expected {FORMAT_VERSION})", self.header.format_version));
        }
        if self.header.crate_version != env!("CARGO_PKG_VERSION") {
            return reject(format!("written by version {}", self.header.crate_version));
        }
        if self.header.key != key.to_string() {
            return reject(format!("key {} does not match {key}", self.header.key));
        }
        if !self.fsts.contains_key(TOKENIZE) {
            return reject("no tokenize graph".to_string());
        }
        Ok(())
    }

    pub fn into_engine(mut self, alphabet: Alphabet) -> Result<Engine> {
        let tokenizer = self.fsts.remove(TOKENIZE).unwrap_or_default();
        Engine::from_parts(alphabet, self.cascade, tokenizer, self.verbalizers)
    }
}

pub fn archive_path(dir: &Path, key: &ArchiveKey) -> PathBuf {
    dir.join(key.file_name())
}

/// Reads and validates the archive for `key` in `dir`.
pub fn load(dir: &Path, key: &ArchiveKey) -> Result<Archive> {
    let path = archive_path(dir, key);
    let text = std::fs::read_to_string(&path)
        .map_err(|err| Error::Cache { path: path.clone(), reason: err.to_string() })?;
    let archive: Archive = serde_json::from_str(&text)?;
    archive.validate(key, &path)?;
    Ok(archive)
}

/// Writes `archive` for `key` into `dir`, creating the directory. The file
/// is written under a temporary name and renamed into place.
pub fn save(dir: &Path, key: &ArchiveKey, archive: &Archive) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = archive_path(dir, key);
    let partial = path.with_extension("json.partial");
    std::fs::write(&partial, serde_json::to_vec(archive)?)?;
    std::fs::rename(&partial, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ArchiveKey {
        ArchiveKey::new(&NormalizerConfig::default(), 0xfeed)
    }

    fn tiny_archive(key: &ArchiveKey) -> Archive {
        Archive {
            header: ArchiveHeader {
                format_version: FORMAT_VERSION,
                crate_version: env!("CARGO_PKG_VERSION").to_string(),
                key: key.to_string(),
                built_at: Utc::now(),
            },
            cascade: RewriteCascade::new(Vec::new()),
            fsts: BTreeMap::from([(TOKENIZE.to_string(), Fst::cross("a", "b"))]),
            verbalizers: BTreeMap::new(),
        }
    }

    #[test]
    fn key_names_every_build_input() {
        let name = key().to_string();
        assert!(name.starts_with("en_tn_true_deterministic_cased_"), "{name}");
        assert!(name.ends_with("_tokenize"), "{name}");
        let mut lower = NormalizerConfig::default();
        lower.input_case = InputCase::LowerCased;
        assert_ne!(ArchiveKey::new(&lower, 0xfeed).to_string(), name);
    }

    #[test]
    fn fallback_weight_is_part_of_the_key() {
        let mut heavier = NormalizerConfig::default();
        heavier.fallback_weight += 1.0;
        let other = ArchiveKey::new(&heavier, 0xfeed);
        assert_ne!(other, key());
        assert_eq!(ArchiveKey::new(&NormalizerConfig::default(), 0xfeed), key());
        assert_ne!(other.file_name(), key().file_name());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key = key();
        let path = save(dir.path(), &key, &tiny_archive(&key)).expect("saved");
        assert!(path.exists());
        let restored = load(dir.path(), &key).expect("loaded");
        assert_eq!(restored.fsts[TOKENIZE], Fst::cross("a", "b"));
    }

    #[test]
    fn mismatched_or_corrupt_archives_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key = key();
        assert!(matches!(load(dir.path(), &key), Err(Error::Cache { .. })));

        let mut stale = tiny_archive(&key);
        stale.header.key = "something_else".to_string();
        save(dir.path(), &key, &stale).expect("saved");
        assert!(matches!(load(dir.path(), &key), Err(Error::Cache { .. })));

        std::fs::write(archive_path(dir.path(), &key), "{ not json").expect("write");
        assert!(matches!(load(dir.path(), &key), Err(Error::Json(_))));
    }
}
