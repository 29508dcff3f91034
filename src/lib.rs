// Library interface for wordler
// The binary and the integration tests both go through these modules

pub mod cli;
pub mod game_state;
pub mod logging;
pub mod scores;
pub mod simulation;
pub mod solver;
pub mod wordbank;

/// Number of letters in every word the solver handles.
pub const WORD_LENGTH: usize = 5;

/// Opening guess used when none is configured.
pub const SEED_WORD: &str = "crane";

pub use game_state::{
    GameInterface, Round, RoundOutcome, Session, SessionError, SessionReport, SessionState,
    SessionStatus, SolverContext, UserAction, game_loop, play_session,
};
pub use scores::{ScoreTable, load_scores_from_file};
pub use simulation::{BatchReport, BatchSummary, Oracle, SimulationRun, run_batch, simulate};
pub use solver::{
    Feedback, OracleRule, feedback_to_string, filter_candidates, get_feedback,
    get_feedback_with_rule, is_solved, parse_feedback, select_best_guess,
};
pub use wordbank::{
    LoadError, load_solutions_from_file, load_solutions_from_str, load_wordbank_from_file,
    load_wordbank_from_str,
};
