use crate::wordbank::LoadError;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Score given to words the table has no entry for.
pub const MISSING_SCORE: f64 = 0.0;

/// Per-word frequency scores with an explicit fallback for unknown words.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: HashMap<String, f64>,
    default_score: f64,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTable {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
            default_score: MISSING_SCORE,
        }
    }

    pub fn with_default_score(mut self, default_score: f64) -> Self {
        self.default_score = default_score;
        self
    }

    pub fn insert(&mut self, word: impl Into<String>, score: f64) {
        self.scores.insert(word.into(), score);
    }

    /// Score for `word`, or the default score when it has no entry.
    pub fn score(&self, word: &str) -> f64 {
        self.scores.get(word).copied().unwrap_or(self.default_score)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.scores.contains_key(word)
    }

    pub fn default_score(&self) -> f64 {
        self.default_score
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Parse a JSON object mapping words to numbers, e.g. `{"crane": 0.8}`.
    ///
    /// Keys are trimmed and lowercased; when two keys fold to the same word
    /// the higher score is kept. Negative or non-finite scores are rejected.
    pub fn from_json_str(data: &str) -> Result<Self, LoadError> {
        let raw: HashMap<String, f64> = serde_json::from_str(data)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: HashMap<String, f64>) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for (word, score) in raw {
            if !score.is_finite() || score < 0.0 {
                return Err(LoadError::InvalidScore { word, score });
            }
            table
                .scores
                .entry(word.trim().to_lowercase())
                .and_modify(|existing| *existing = existing.max(score))
                .or_insert(score);
        }
        Ok(table)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (word, score) in iter {
            table.insert(word, score);
        }
        table
    }
}

pub fn load_scores_from_file<P: AsRef<Path>>(path: P) -> Result<ScoreTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: HashMap<String, f64> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::ScoreFormat {
            path: path.to_path_buf(),
            source,
        })?;
    let table = ScoreTable::from_raw(raw).map_err(|e| e.with_path(path))?;
    log::info!("Loaded {} scores from {}", table.len(), path.display());
    Ok(table)
}
