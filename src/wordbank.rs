use crate::WORD_LENGTH;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WORDS_FILE: &str = "allowed_words.txt";
pub const SCORES_FILE: &str = "freq_map.json";
pub const SOLUTIONS_FILE: &str = "solutions.txt";

const LOCAL_DATA_DIR: &str = "data";
const APP_DIR: &str = "wordler";

/// Failure to read one of the input data files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid score table: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid score table '{}': {source}", .path.display())]
    ScoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("score for '{word}' must be a non-negative number, got {score}")]
    InvalidScore { word: String, score: f64 },
}

impl LoadError {
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            Self::InvalidJson(source) => Self::ScoreFormat {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

/// A word the solver can play: exactly `WORD_LENGTH` lowercase ASCII letters.
pub fn is_valid_word(word: &str) -> bool {
    word.len() == WORD_LENGTH && word.bytes().all(|b| b.is_ascii_lowercase())
}

fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Parse a newline-delimited word list.
///
/// Entries are trimmed and lowercased; anything that is not a valid word is
/// dropped, and repeats keep their first position.
pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    data.lines()
        .map(normalize)
        .filter(|word| is_valid_word(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, LoadError> {
    let path = path.as_ref();
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for line in reader.lines() {
        let word = normalize(&line.map_err(io_err)?);
        if is_valid_word(&word) && seen.insert(word.clone()) {
            words.push(word);
        }
    }
    log::info!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Parse a solutions list: the first token of each line, one run per line.
pub fn load_solutions_from_str(data: &str) -> Vec<String> {
    data.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let word = normalize(line.split_whitespace().next()?);
            if is_valid_word(&word) {
                Some(word)
            } else {
                log::warn!("Skipping solution on line {}: '{word}'", index + 1);
                None
            }
        })
        .collect()
}

pub fn load_solutions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, LoadError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let solutions = load_solutions_from_str(&data);
    log::info!("Loaded {} solutions from {}", solutions.len(), path.display());
    Ok(solutions)
}

/// Where to look for a data file.
///
/// An explicit path always wins. Otherwise `data/<file_name>` in the working
/// directory is used if it exists, then the platform data directory.
pub fn resolve_data_path(explicit: Option<&Path>, file_name: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = Path::new(LOCAL_DATA_DIR).join(file_name);
    if local.exists() {
        return local;
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(file_name))
        .unwrap_or(local)
}
