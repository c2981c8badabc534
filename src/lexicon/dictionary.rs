use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::PronunciationError;
use crate::pipeline::traits::PronunciationLexicon;

/// One pronunciation variant: phoneme labels in order.
pub type Pronunciation = Vec<String>;

/// Immutable word → pronunciation-variants mapping. Keys are lowercase and
/// variants keep the order they had in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PronunciationDictionary {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl PronunciationDictionary {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<Pronunciation>)>) -> Self {
        let mut out: HashMap<String, Vec<Pronunciation>> = HashMap::new();
        for (word, variants) in entries {
            out.entry(word.to_lowercase()).or_default().extend(variants);
        }
        Self { entries: out }
    }

    /// Loads a `.json` map or a CMUdict-style text file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, PronunciationError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PronunciationError::io("read pronunciation dictionary", e))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dictionary = if is_json {
            Self::parse_json(&data)?
        } else {
            Self::parse_cmudict(&data)?
        };
        tracing::info!(
            path = %path.display(),
            words = dictionary.len(),
            "loaded pronunciation dictionary"
        );
        Ok(dictionary)
    }

    /// JSON object `word -> [[phoneme, ...], ...]`.
    ///
    /// Keys that differ only in case share one entry. The already-lowercase
    /// key contributes its variants first, the other spellings follow in
    /// byte order.
    pub fn parse_json(data: &str) -> Result<Self, PronunciationError> {
        let raw: BTreeMap<String, Vec<Pronunciation>> = serde_json::from_str(data)
            .map_err(|e| PronunciationError::json("parse pronunciation dictionary", e))?;
        let mut ordered: Vec<(String, Vec<Pronunciation>)> = raw.into_iter().collect();
        ordered.sort_by_cached_key(|(word, _)| *word != word.to_lowercase());
        Ok(Self::from_entries(ordered))
    }

    /// CMUdict text format: `WORD  PH1 PH2 ...`, alternates as `WORD(2)`,
    /// `;;;` comments.
    pub fn parse_cmudict(data: &str) -> Result<Self, PronunciationError> {
        let mut entries: HashMap<String, Vec<Pronunciation>> = HashMap::new();
        for (line_no, raw_line) in data.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(head) = parts.next() else {
                continue;
            };
            let phonemes: Pronunciation = parts.map(str::to_string).collect();
            if phonemes.is_empty() {
                return Err(PronunciationError::lexicon(format!(
                    "line {}: entry '{head}' has no phonemes",
                    line_no + 1
                )));
            }
            entries
                .entry(strip_variant_marker(head).to_lowercase())
                .or_default()
                .push(phonemes);
        }
        Ok(Self { entries })
    }

    pub fn variants(&self, word: &str) -> Option<&[Pronunciation]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronunciationLexicon for PronunciationDictionary {
    fn first_pronunciation(&self, word: &str) -> Option<&[String]> {
        self.variants(word)
            .and_then(|variants| variants.first())
            .map(Vec::as_slice)
    }
}

fn strip_variant_marker(head: &str) -> &str {
    match head.find('(') {
        Some(idx) if idx > 0 && head.ends_with(')') => &head[..idx],
        _ => head,
    }
}

/// Shared read-only dictionary that can be replaced wholesale.
///
/// Lookups run against an `Arc` snapshot, so a `replace` never changes the
/// mapping under an in-flight request.
#[derive(Debug, Default)]
pub struct LexiconHandle {
    current: RwLock<Arc<PronunciationDictionary>>,
}

impl LexiconHandle {
    pub fn new(dictionary: PronunciationDictionary) -> Self {
        Self {
            current: RwLock::new(Arc::new(dictionary)),
        }
    }

    pub fn snapshot(&self) -> Arc<PronunciationDictionary> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Swaps in a new dictionary and returns the previous one.
    pub fn replace(&self, dictionary: PronunciationDictionary) -> Arc<PronunciationDictionary> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(dictionary))
    }
}

static GLOBAL_LEXICON: OnceLock<Arc<LexiconHandle>> = OnceLock::new();

/// Installs the process-wide dictionary. Call once at startup.
pub fn init_global_lexicon(
    dictionary: PronunciationDictionary,
) -> Result<Arc<LexiconHandle>, PronunciationError> {
    let handle = Arc::new(LexiconHandle::new(dictionary));
    GLOBAL_LEXICON
        .set(Arc::clone(&handle))
        .map_err(|_| PronunciationError::lexicon("global dictionary is already initialized"))?;
    Ok(handle)
}

pub fn global_lexicon() -> Result<Arc<LexiconHandle>, PronunciationError> {
    GLOBAL_LEXICON
        .get()
        .cloned()
        .ok_or_else(|| PronunciationError::lexicon("global dictionary has not been initialized"))
}
