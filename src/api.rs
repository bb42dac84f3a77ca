use crate::cache::{self, Archive, ArchiveKey};
use crate::config::NormalizerConfig;
use crate::engine::{BuildMetrics, Engine, RunMetrics};
use crate::error::Result;
use crate::fst::Alphabet;
use crate::grammar::GrammarContext;
use crate::lexicon::Lexicon;
use crate::token::Token;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// One normalizer per configuration, shared by [`normalize`].
static REGISTRY: Lazy<Mutex<HashMap<String, Arc<Normalizer>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Compiled grammars for one configuration.
///
/// Building is the expensive step; a `Normalizer` is immutable afterwards and
/// can be shared across threads.
#[derive(Debug)]
pub struct Normalizer {
    config: NormalizerConfig,
    engine: Engine,
    build: BuildMetrics,
}

/// Result from [`Normalizer::normalize_verbose`].
///
/// This is meant for debugging and performance inspection: it exposes the
/// intermediate forms without dumping the graphs.
#[derive(Debug, Clone)]
pub struct NormalizeDetails {
    /// The input text.
    pub text: String,
    /// Input after the preprocessing cascade.
    pub preprocessed: String,
    /// Tokens picked by the decoder, in input order.
    pub tokens: Vec<Token>,
    /// Final spoken text.
    pub spoken: String,
    /// Timings for this input.
    pub run: RunMetrics,
    /// How the normalizer was built (or restored).
    pub build: BuildMetrics,
}

impl Normalizer {
    /// Loads the lexicon and builds (or restores) every grammar.
    ///
    /// Configuration errors, including a fallback weight that does not
    /// dominate, are returned here and never from [`Normalizer::normalize`].
    pub fn new(config: NormalizerConfig) -> Result<Self> {
        config.validate()?;
        let lexicon = load_lexicon(&config)?;
        let mut alphabet = Alphabet::standard();
        alphabet.extend(lexicon.chars());
        let key = ArchiveKey::new(&config, lexicon.fingerprint());

        let restored = match (&config.cache_dir, config.overwrite_cache) {
            (Some(dir), false) => restore(dir, &key, &alphabet),
            _ => None,
        };
        let (engine, build) = match restored {
            Some(restored) => restored,
            None => {
                let ctx =
                    GrammarContext::new(Arc::new(lexicon), Arc::new(alphabet), config.deterministic, config.input_case);
                let (engine, build) = Engine::build(&ctx, config.fallback_weight)?;
                if let Some(dir) = &config.cache_dir {
                    match cache::save(dir, &key, &Archive::from_engine(&key, &engine)) {
                        Ok(path) => tracing::info!(path = %path.display(), "saved grammar archive"),
                        Err(err) => tracing::warn!(dir = %dir.display(), error = %err, "could not save grammar archive"),
                    }
                }
                (engine, build)
            }
        };

        Ok(Normalizer { config, engine, build })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn build_metrics(&self) -> &BuildMetrics {
        &self.build
    }

    /// Spoken form of `text`.
    ///
    /// # Example
    /// ```no_run
    /// use spokenform::{Normalizer, NormalizerConfig};
    ///
    /// let normalizer = Normalizer::new(NormalizerConfig::default()).unwrap();
    /// assert_eq!(normalizer.normalize("I have $5.").unwrap(), "I have five dollars.");
    /// ```
    pub fn normalize(&self, text: &str) -> Result<String> {
        Ok(self.engine.run(text)?.spoken)
    }

    /// Like [`Normalizer::normalize`], with the intermediate forms and timings.
    pub fn normalize_verbose(&self, text: &str) -> Result<NormalizeDetails> {
        let run = self.engine.run(text)?;
        Ok(NormalizeDetails {
            text: text.to_string(),
            preprocessed: run.preprocessed,
            tokens: run.tokens,
            spoken: run.spoken,
            run: run.metrics,
            build: self.build.clone(),
        })
    }

    /// Preprocesses and classifies `text` without verbalizing it.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        self.engine.tokenize(text)
    }

    pub fn verbalize(&self, tokens: &[Token]) -> Result<String> {
        self.engine.verbalize(tokens)
    }
}

/// Normalizes `text` with the shared normalizer for `config`, building it
/// on first use.
pub fn normalize(text: &str, config: &NormalizerConfig) -> Result<String> {
    normalizer_for(config)?.normalize(text)
}

/// The shared normalizer for `config`. Building happens outside the registry
/// lock; if two threads race, the first one stored wins.
pub fn normalizer_for(config: &NormalizerConfig) -> Result<Arc<Normalizer>> {
    let key = config.registry_key();
    if let Some(found) = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
        return Ok(found.clone());
    }
    let built = Arc::new(Normalizer::new(config.clone())?);
    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(registry.entry(key).or_insert(built).clone())
}

fn load_lexicon(config: &NormalizerConfig) -> Result<Lexicon> {
    let mut lexicon = Lexicon::builtin(&config.language)?;
    if let Some(dir) = &config.lexicon_dir {
        lexicon = lexicon.with_dir(dir)?;
    }
    if let Some(path) = &config.whitelist {
        lexicon = lexicon.with_whitelist_file(path)?;
    }
    Ok(lexicon)
}

fn restore(dir: &Path, key: &ArchiveKey, alphabet: &Alphabet) -> Option<(Engine, BuildMetrics)> {
    let started = Instant::now();
    let path = cache::archive_path(dir, key);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no grammar archive yet");
        return None;
    }
    match cache::load(dir, key).and_then(|archive| archive.into_engine(alphabet.clone())) {
        Ok(engine) => {
            tracing::info!(path = %path.display(), "restored grammars from archive");
            let build = BuildMetrics {
                total: started.elapsed(),
                restored: true,
                sentence_states: engine.tokenizer().num_states(),
                sentence_arcs: engine.tokenizer().num_arcs(),
                ..BuildMetrics::default()
            };
            Some((engine, build))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring grammar archive; rebuilding");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn normalize_uses_the_shared_normalizer() {
        let config = NormalizerConfig::default();
        assert_eq!(normalize("I have $5.", &config).expect("normalizes"), "I have five dollars.");
        let first = normalizer_for(&config).expect("built");
        let second = normalizer_for(&config).expect("built");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn verbose_reports_tokens_and_timings() {
        let normalizer = normalizer_for(&NormalizerConfig::default()).expect("built");
        let details = normalizer.normalize_verbose("call 555-1234").expect("normalizes");
        assert_eq!(details.text, "call 555-1234");
        assert_eq!(details.tokens.len(), 2);
        assert_eq!(details.tokens[1].category, "telephone");
        assert!(details.run.classify <= details.run.total);
        assert!(!details.build.restored);
    }

    #[test]
    fn bad_configuration_fails_to_build() {
        let config = NormalizerConfig { language: "xx".to_string(), ..NormalizerConfig::default() };
        assert!(matches!(normalize("1", &config), Err(Error::UnsupportedLanguage(_))));
    }
}
