//! Batch solving against known solutions.
//!
//! Each solution gets its own session driven by an [`Oracle`]. Runs are
//! independent, so they are spread over the rayon thread pool and only merged
//! once they are all done.

use crate::game_state::{GameInterface, SessionStatus, SolverContext, UserAction, play_session};
use crate::solver::{OracleRule, get_feedback_with_rule};
use rayon::prelude::*;
use serde::Serialize;

/// Rounds within which a solve counts as a win.
pub const DEFAULT_THRESHOLD: usize = 6;

/// Feedback source that knows the answer.
#[derive(Debug, Clone, Copy)]
pub struct Oracle<'s> {
    solution: &'s str,
    rule: OracleRule,
}

impl<'s> Oracle<'s> {
    pub fn new(solution: &'s str, rule: OracleRule) -> Self {
        Self { solution, rule }
    }
}

impl GameInterface for Oracle<'_> {
    fn read_feedback(&mut self, round: usize, guess: &str) -> UserAction {
        let feedback = get_feedback_with_rule(self.solution, guess, self.rule);
        log::trace!("Round {round} for '{}': {guess}", self.solution);
        UserAction::Feedback(feedback)
    }
}

/// Outcome of solving one solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationRun {
    pub solution: String,
    pub solved: bool,
    pub rounds: usize,
    /// Each round as `guess marks`, e.g. `crane bbgbg`
    pub trace: Vec<String>,
}

pub fn simulate(context: &SolverContext, solution: &str, rule: OracleRule) -> SimulationRun {
    let mut oracle = Oracle::new(solution, rule);
    let report = play_session(context, &mut oracle);
    match report.status {
        SessionStatus::Solved => {}
        SessionStatus::Failed => log::error!("Run for '{solution}' stopped on an error after {} rounds", report.rounds()),
        _ => log::warn!("Failed to solve '{solution}' after {} rounds", report.rounds()),
    }
    SimulationRun {
        solution: solution.to_string(),
        solved: report.is_solved(),
        rounds: report.rounds(),
        trace: report.history.iter().map(|round| round.to_string()).collect(),
    }
}

/// Every run of a batch, in solution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub runs: Vec<SimulationRun>,
    pub threshold: usize,
}

/// Aggregate figures of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub solved: usize,
    pub failed: usize,
    pub threshold: usize,
    pub solved_within_threshold: usize,
    pub average_rounds: Option<f64>,
    pub fraction_within_threshold: Option<f64>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.runs.len()
    }

    pub fn solved(&self) -> usize {
        self.runs.iter().filter(|run| run.solved).count()
    }

    pub fn solved_within_threshold(&self) -> usize {
        self.runs
            .iter()
            .filter(|run| run.solved && run.rounds <= self.threshold)
            .count()
    }

    /// Mean rounds over the solved runs; `None` when nothing was solved.
    pub fn average_rounds(&self) -> Option<f64> {
        let solved = self.solved();
        if solved == 0 {
            return None;
        }
        let total_rounds: usize = self.runs.iter().filter(|run| run.solved).map(|run| run.rounds).sum();
        Some(total_rounds as f64 / solved as f64)
    }

    /// Share of all runs solved within the threshold; `None` for an empty batch.
    pub fn fraction_within_threshold(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.solved_within_threshold() as f64 / total as f64),
        }
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total(),
            solved: self.solved(),
            failed: self.total() - self.solved(),
            threshold: self.threshold,
            solved_within_threshold: self.solved_within_threshold(),
            average_rounds: self.average_rounds(),
            fraction_within_threshold: self.fraction_within_threshold(),
        }
    }
}

/// Solve every word in `solutions`, one independent session each.
pub fn run_batch(
    context: &SolverContext,
    solutions: &[String],
    rule: OracleRule,
    threshold: usize,
) -> BatchReport {
    log::info!("Simulating {} solutions ({:?} oracle)", solutions.len(), rule);
    let runs: Vec<SimulationRun> = solutions
        .par_iter()
        .map(|solution| simulate(context, solution, rule))
        .collect();
    BatchReport { runs, threshold }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::ScoreTable;

    fn fixture_context() -> SolverContext {
        let corpus = ["crane", "slate", "plate", "trace"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let scores: ScoreTable = [("crane", 5.0), ("plate", 4.0), ("slate", 3.0), ("trace", 2.0)]
            .into_iter()
            .collect();
        SolverContext::new(corpus, scores, "crane")
    }

    fn solutions(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_oracle_feedback() {
        let mut oracle = Oracle::new("slate", OracleRule::CountAware);
        match oracle.read_feedback(1, "crane") {
            UserAction::Feedback(feedback) => {
                assert_eq!(crate::solver::feedback_to_string(&feedback), "bbgbg");
            }
            other => panic!("Expected feedback, got {other:?}"),
        }
    }

    #[test]
    fn test_simulate_seed_is_solution() {
        let run = simulate(&fixture_context(), "crane", OracleRule::CountAware);
        assert!(run.solved);
        assert_eq!(run.rounds, 1);
        assert_eq!(run.trace, ["crane ggggg"]);
    }

    #[test]
    fn test_simulate_slate() {
        let run = simulate(&fixture_context(), "slate", OracleRule::CountAware);
        assert!(run.solved);
        assert_eq!(run.rounds, 3);
        assert_eq!(run.trace, ["crane bbgbg", "plate bgggg", "slate ggggg"]);
    }

    #[test]
    fn test_simulate_solution_missing_from_corpus() {
        let run = simulate(&fixture_context(), "gloat", OracleRule::CountAware);
        assert!(!run.solved);
        assert!(run.rounds >= 1);
    }

    #[test]
    fn test_run_batch_slate_and_crane() {
        let report = run_batch(
            &fixture_context(),
            &solutions(&["slate", "crane"]),
            OracleRule::CountAware,
            DEFAULT_THRESHOLD,
        );
        assert_eq!(report.runs[0].solution, "slate");
        assert_eq!(report.runs[0].rounds, 3);
        assert_eq!(report.runs[1].solution, "crane");
        assert_eq!(report.runs[1].rounds, 1);

        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.solved, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.solved_within_threshold, 2);
        assert_eq!(summary.average_rounds, Some(2.0));
        assert_eq!(summary.fraction_within_threshold, Some(1.0));
    }

    #[test]
    fn test_run_batch_is_deterministic() {
        let context = fixture_context();
        let list = solutions(&["slate", "plate", "trace", "crane"]);
        let first = run_batch(&context, &list, OracleRule::CountAware, DEFAULT_THRESHOLD);
        let second = run_batch(&context, &list, OracleRule::CountAware, DEFAULT_THRESHOLD);
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_counts() {
        let report = run_batch(
            &fixture_context(),
            &solutions(&["slate", "crane"]),
            OracleRule::CountAware,
            2,
        );
        assert_eq!(report.solved_within_threshold(), 1);
        assert_eq!(report.fraction_within_threshold(), Some(0.5));
    }

    #[test]
    fn test_failed_runs_excluded_from_average() {
        let report = run_batch(
            &fixture_context(),
            &solutions(&["crane", "gloat"]),
            OracleRule::CountAware,
            DEFAULT_THRESHOLD,
        );
        let summary = report.summary();
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.average_rounds, Some(1.0));
        assert_eq!(summary.fraction_within_threshold, Some(0.5));
    }

    #[test]
    fn test_empty_batch() {
        let report = run_batch(&fixture_context(), &[], OracleRule::CountAware, DEFAULT_THRESHOLD);
        assert_eq!(report.total(), 0);
        assert_eq!(report.average_rounds(), None);
        assert_eq!(report.fraction_within_threshold(), None);
    }
}
