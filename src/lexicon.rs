//! Declarative lexical tables.
//!
//! A lexicon is a set of named two-column TSV tables (`key<TAB>spoken form`).
//! A key may repeat on several lines to list alternative spoken forms; the
//! first one listed is the preferred one. Lines starting with `#` are comments.
//!
//! One immutable [`Lexicon`] is built per configuration and shared by every
//! grammar through an `Arc`, so tables are parsed once no matter how many
//! categories read them.
//!
//! The crate ships a small English table set under `data/en/`; a directory of
//! TSV files can replace or extend any of it.

use crate::error::{Error, Result};
use crate::fst::{Fst, Weight};
use std::collections::BTreeMap;
use std::path::Path;

/// Added per position to every spoken form after the first.
const ALTERNATIVE_FORM_PENALTY: f32 = 0.001;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

static EN_TABLES: &[(&str, &str)] = &[
    ("currency", include_str!("../data/en/currency.tsv")),
    ("currency_minor", include_str!("../data/en/currency_minor.tsv")),
    ("digit", include_str!("../data/en/digit.tsv")),
    ("greek", include_str!("../data/en/greek.tsv")),
    ("magnitude", include_str!("../data/en/magnitude.tsv")),
    ("math_idioms", include_str!("../data/en/math_idioms.tsv")),
    ("math_operations", include_str!("../data/en/math_operations.tsv")),
    ("measure_units", include_str!("../data/en/measure_units.tsv")),
    ("measure_units_singular", include_str!("../data/en/measure_units_singular.tsv")),
    ("month", include_str!("../data/en/month.tsv")),
    ("ordinal_exceptions", include_str!("../data/en/ordinal_exceptions.tsv")),
    ("pincode_context", include_str!("../data/en/pincode_context.tsv")),
    ("superscript", include_str!("../data/en/superscript.tsv")),
    ("teen", include_str!("../data/en/teen.tsv")),
    ("ties", include_str!("../data/en/ties.tsv")),
    ("whitelist", include_str!("../data/en/whitelist.tsv")),
    ("words", include_str!("../data/en/words.tsv")),
    ("zero", include_str!("../data/en/zero.tsv")),
];

/// One key with its spoken forms, preferred form first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub key: String,
    pub forms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringTable {
    name: String,
    entries: Vec<Entry>,
}

impl StringTable {
    /// Parses TSV text. Keys keep their first-seen order.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut position: BTreeMap<String, usize> = BTreeMap::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, form)) = line.split_once('\t') else {
                return Err(Error::Lexicon {
                    table: name.to_string(),
                    line: i + 1,
                    reason: "expected `key<TAB>form`".to_string(),
                });
            };
            let (key, form) = (key.trim(), form.trim());
            if key.is_empty() {
                return Err(Error::Lexicon { table: name.to_string(), line: i + 1, reason: "empty key".to_string() });
            }
            match position.get(key) {
                Some(&at) => entries[at].forms.push(form.to_string()),
                None => {
                    position.insert(key.to_string(), entries.len());
                    entries.push(Entry { key: key.to_string(), forms: vec![form.to_string()] });
                }
            }
        }
        Ok(StringTable { name: name.to_string(), entries })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preferred spoken form of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|e| e.key == key).and_then(|e| e.forms.first()).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingEntry { table: self.name.clone(), key: key.to_string() })
    }

    /// Key-to-form transducer. Deterministic mode keeps only the preferred
    /// form; otherwise alternatives follow with a growing penalty.
    pub fn to_fst(&self, deterministic: bool) -> Fst {
        let rows: Vec<(&str, &str, Weight)> = self
            .entries
            .iter()
            .flat_map(|e| {
                let keep = if deterministic { 1 } else { e.forms.len() };
                e.forms.iter().take(keep).enumerate().map(move |(i, form)| {
                    (e.key.as_str(), form.as_str(), Weight::new(ALTERNATIVE_FORM_PENALTY * i as f32))
                })
            })
            .collect();
        Fst::weighted_string_map(rows).optimize()
    }

    /// Acceptor of the keys.
    pub fn keys_fst(&self) -> Fst {
        Fst::union_all(self.entries.iter().map(|e| Fst::accept(&e.key)).collect::<Vec<_>>().iter()).optimize()
    }

    /// Case-folded copy: keys are lower-cased, first occurrence wins.
    pub fn lower_cased(&self) -> StringTable {
        let mut seen = std::collections::BTreeSet::new();
        let entries = self
            .entries
            .iter()
            .filter_map(|e| {
                let key = e.key.to_lowercase();
                seen.insert(key.clone()).then(|| Entry { key, forms: e.forms.clone() })
            })
            .collect();
        StringTable { name: self.name.clone(), entries }
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    language: String,
    tables: BTreeMap<String, StringTable>,
}

impl Lexicon {
    /// The tables compiled into the crate for `language`.
    pub fn builtin(language: &str) -> Result<Self> {
        let sources = match language {
            "en" => EN_TABLES,
            other => return Err(Error::UnsupportedLanguage(other.to_string())),
        };
        let mut tables = BTreeMap::new();
        for (name, text) in sources {
            tables.insert(name.to_string(), StringTable::parse(name, text)?);
        }
        Ok(Lexicon { language: language.to_string(), tables })
    }

    /// An empty lexicon, for building one table by table.
    pub fn empty(language: &str) -> Self {
        Lexicon { language: language.to_string(), tables: BTreeMap::new() }
    }

    /// Adds or replaces the table `name` with parsed `text`.
    pub fn with_table(mut self, name: &str, text: &str) -> Result<Self> {
        self.tables.insert(name.to_string(), StringTable::parse(name, text)?);
        Ok(self)
    }

    /// Adds or replaces one table per `*.tsv` file in `dir`, named after the
    /// file stem.
    pub fn with_dir(mut self, dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "tsv"))
            .collect();
        paths.sort();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else { continue };
            let text = std::fs::read_to_string(&path)?;
            tracing::debug!(table = %name, path = %path.display(), "loaded lexicon table");
            self.tables.insert(name.clone(), StringTable::parse(&name, &text)?);
        }
        Ok(self)
    }

    /// Replaces the `whitelist` table with the file at `path`.
    pub fn with_whitelist_file(self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        self.with_table("whitelist", &text)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn table(&self, name: &str) -> Result<&StringTable> {
        self.tables.get(name).ok_or_else(|| Error::MissingTable(name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &StringTable> {
        self.tables.values()
    }

    /// Every character used in a key or a spoken form, so the alphabet can
    /// cover them.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.tables.values().flat_map(|t| {
            t.entries.iter().flat_map(|e| e.key.chars().chain(e.forms.iter().flat_map(|f| f.chars())))
        })
    }

    /// Content hash identifying these tables in cache keys.
    ///
    /// FNV-1a over the language and every table, stable across processes and
    /// toolchains. Field ends are marked with bytes that never occur in UTF-8.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = Fnv1a::default();
        hash.write(self.language.as_bytes(), 0xff);
        for table in self.tables.values() {
            hash.write(table.name.as_bytes(), 0xfe);
            for entry in &table.entries {
                hash.write(entry.key.as_bytes(), 0xfd);
                for form in &entry.forms {
                    hash.write(form.as_bytes(), 0xfc);
                }
            }
        }
        hash.0
    }
}

struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Fnv1a(FNV_OFFSET)
    }
}

impl Fnv1a {
    fn write(&mut self, bytes: &[u8], end: u8) {
        for &byte in bytes.iter().chain(std::iter::once(&end)) {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_alternatives_and_comments() {
        let table = StringTable::parse("t", "# comment\n0\tzero\n0\toh\n\n1\tone\n").expect("parses");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("0"), Some("zero"));
        assert_eq!(table.entries()[0].forms, vec!["zero".to_string(), "oh".to_string()]);
    }

    #[test]
    fn rejects_lines_without_tab() {
        let err = StringTable::parse("bad", "1 one\n").unwrap_err();
        assert!(matches!(err, Error::Lexicon { line: 1, .. }), "got {err:?}");
    }

    #[test]
    fn every_builtin_key_round_trips() {
        let lexicon = Lexicon::builtin("en").expect("builtin");
        for table in lexicon.tables() {
            let fst = table.to_fst(false);
            for entry in table.entries() {
                let mut produced = fst.paths_for(&entry.key, 16);
                produced.sort();
                let mut expected = entry.forms.clone();
                expected.sort();
                assert_eq!(produced, expected, "table {} key {:?}", table.name(), entry.key);
            }
        }
    }

    #[test]
    fn deterministic_keeps_preferred_form() {
        let lexicon = Lexicon::builtin("en").expect("builtin");
        let zero = lexicon.table("zero").expect("zero").to_fst(true);
        assert_eq!(zero.paths_for("0", 8), vec!["zero".to_string()]);
    }

    #[test]
    fn missing_tables_and_entries_are_errors() {
        let lexicon = Lexicon::builtin("en").expect("builtin");
        assert!(matches!(lexicon.table("nope"), Err(Error::MissingTable(_))));
        let digit = lexicon.table("digit").expect("digit");
        assert!(matches!(digit.require("x"), Err(Error::MissingEntry { .. })));
        assert!(matches!(Lexicon::builtin("xx"), Err(Error::UnsupportedLanguage(_))));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let base = Lexicon::builtin("en").expect("builtin");
        let changed = base.clone().with_table("digit", "1\tONE\n").expect("table");
        assert_eq!(base.fingerprint(), Lexicon::builtin("en").expect("builtin").fingerprint());
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn fingerprint_is_a_fixed_function_of_content() {
        // FNV-1a of "en" ff "t" fe "1" fd "one" fc.
        let lexicon = Lexicon::empty("en").with_table("t", "1\tone\n").expect("table");
        assert_eq!(lexicon.fingerprint(), 0xa8c2_9989_4edd_d07f);
    }

    #[test]
    fn fingerprint_separates_keys_from_forms() {
        let a = Lexicon::empty("en").with_table("t", "ab\tc\n").expect("table");
        let b = Lexicon::empty("en").with_table("t", "a\tbc\n").expect("table");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
