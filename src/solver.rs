use crate::WORD_LENGTH;
use crate::debug_log;
use crate::scores::ScoreTable;

/// Mark for a single letter position of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// Right letter, right position (green)
    Exact,
    /// Letter is in the word, but not here (yellow)
    Present,
    /// Letter is not in the word, or all its copies are already accounted for
    Absent,
}

impl Feedback {
    /// Parse a single mark: `g`, `y` or `b`, in either case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' => Some(Self::Exact),
            'y' => Some(Self::Present),
            'b' => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Exact => 'g',
            Self::Present => 'y',
            Self::Absent => 'b',
        }
    }
}

/// How the oracle decides between present and absent for a letter that is not
/// an exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleRule {
    /// Each copy of a letter in the solution accounts for at most one mark.
    #[default]
    CountAware,
    /// Any occurrence of the letter in the solution makes the mark present.
    Existence,
}

/// Parse a feedback string such as `"bbgbg"`.
///
/// Returns `None` unless the input is exactly `WORD_LENGTH` recognised marks.
pub fn parse_feedback(input: &str) -> Option<Vec<Feedback>> {
    let feedback: Vec<Feedback> = input.chars().map(Feedback::from_char).collect::<Option<_>>()?;
    (feedback.len() == WORD_LENGTH).then_some(feedback)
}

pub fn feedback_to_string(feedback: &[Feedback]) -> String {
    feedback.iter().map(|f| f.to_char()).collect()
}

/// True when every position is an exact match.
pub fn is_solved(feedback: &[Feedback]) -> bool {
    feedback.len() == WORD_LENGTH && feedback.iter().all(|&f| f == Feedback::Exact)
}

fn letter_count(word: &[u8], letter: u8) -> usize {
    word.iter().filter(|&&c| c == letter).count()
}

fn position_allows(word: &[u8], guess: &[u8], position: usize, mark: Feedback) -> bool {
    let letter = guess[position];
    let at_position = word.get(position) == Some(&letter);
    match mark {
        Feedback::Exact => at_position,
        Feedback::Present => !at_position && word.contains(&letter),
        // Only words with at least as many copies as the guess are ruled out
        Feedback::Absent => {
            !word.contains(&letter) || letter_count(guess, letter) > letter_count(word, letter)
        }
    }
}

/// Narrow `candidates` to the words consistent with `feedback` for `guess`.
///
/// Positions are applied in order, each pass filtering the survivors of the
/// previous one. The input is left untouched and the output keeps its order.
pub fn filter_candidates(candidates: &[String], guess: &str, feedback: &[Feedback]) -> Vec<String> {
    debug_assert_eq!(guess.len(), feedback.len());
    let guess_bytes = guess.as_bytes();

    feedback
        .iter()
        .enumerate()
        .take(guess_bytes.len())
        .fold(candidates.to_vec(), |remaining, (position, &mark)| {
            let narrowed: Vec<String> = remaining
                .into_iter()
                .filter(|word| position_allows(word.as_bytes(), guess_bytes, position, mark))
                .collect();
            debug_log!(
                "filter {guess} position {position} ({:?}): {} candidates left",
                mark,
                narrowed.len()
            );
            narrowed
        })
}

/// Pick the highest scoring candidate.
///
/// Ties go to the earliest word in `candidates`. Words missing from `scores`
/// take the table's default score. Returns `None` when nothing is left.
pub fn select_best_guess<'a>(candidates: &'a [String], scores: &ScoreTable) -> Option<&'a String> {
    let mut best: Option<(&String, f64)> = None;
    for word in candidates {
        let score = scores.score(word);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((word, score)),
        }
    }
    best.map(|(word, _)| word)
}

/// Feedback for `guess` when the secret word is `solution`, using the
/// count-aware rule.
pub fn get_feedback(solution: &str, guess: &str) -> Vec<Feedback> {
    get_feedback_with_rule(solution, guess, OracleRule::CountAware)
}

pub fn get_feedback_with_rule(solution: &str, guess: &str, rule: OracleRule) -> Vec<Feedback> {
    debug_assert_eq!(solution.len(), guess.len());
    let solution = solution.as_bytes();
    let guess = guess.as_bytes();

    match rule {
        OracleRule::CountAware => count_aware_feedback(solution, guess),
        OracleRule::Existence => guess
            .iter()
            .enumerate()
            .map(|(i, g)| {
                if solution.get(i) == Some(g) {
                    Feedback::Exact
                } else if solution.contains(g) {
                    Feedback::Present
                } else {
                    Feedback::Absent
                }
            })
            .collect(),
    }
}

fn count_aware_feedback(solution: &[u8], guess: &[u8]) -> Vec<Feedback> {
    let mut feedback = vec![Feedback::Absent; guess.len()];
    let mut unmatched = [0usize; 256];

    // First pass: exact matches, counting the solution letters left over
    for (i, &s) in solution.iter().enumerate() {
        if guess.get(i) == Some(&s) {
            feedback[i] = Feedback::Exact;
        } else {
            unmatched[s as usize] += 1;
        }
    }
    // Second pass: present marks, left to right, while copies remain
    for (i, &g) in guess.iter().enumerate() {
        if feedback[i] != Feedback::Exact && unmatched[g as usize] > 0 {
            feedback[i] = Feedback::Present;
            unmatched[g as usize] -= 1;
        }
    }
    feedback
}
