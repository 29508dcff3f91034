use crate::WORD_LENGTH;
use crate::scores::ScoreTable;
use crate::solver::{Feedback, feedback_to_string, filter_candidates, is_solved, select_best_guess};
use std::fmt;
use thiserror::Error;

/// Read-only inputs shared by every session: the corpus, the score table and
/// the opening guess.
#[derive(Debug, Clone)]
pub struct SolverContext {
    corpus: Vec<String>,
    scores: ScoreTable,
    seed: String,
}

impl SolverContext {
    pub fn new(corpus: Vec<String>, scores: ScoreTable, seed: impl Into<String>) -> Self {
        Self {
            corpus,
            scores,
            seed: seed.into(),
        }
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

/// One played guess and the feedback it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub guess: String,
    pub feedback: Vec<Feedback>,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.guess, feedback_to_string(&self.feedback))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGuess,
    AwaitingFeedback,
    Solved,
    /// No candidate survived the feedback so far
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Solved { rounds: usize },
    NextGuess(String),
    Exhausted { rounds: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no guess to present in state {0:?}")]
    NotAwaitingGuess(SessionState),
    #[error("not expecting feedback in state {0:?}")]
    NotAwaitingFeedback(SessionState),
    #[error("feedback must have {expected} marks, got {found}")]
    FeedbackLength { expected: usize, found: usize },
}

/// State of a single solve: the candidates still in play, the rounds played
/// and the guess waiting to be made.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    context: &'a SolverContext,
    candidates: Vec<String>,
    history: Vec<Round>,
    guess: Option<String>,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(context: &'a SolverContext) -> Self {
        Self {
            context,
            candidates: context.corpus().to_vec(),
            history: Vec::new(),
            guess: Some(context.seed().to_string()),
            state: SessionState::AwaitingGuess,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn history(&self) -> &[Round] {
        &self.history
    }

    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    pub fn into_history(self) -> Vec<Round> {
        self.history
    }

    /// Hand out the pending guess and wait for its feedback.
    pub fn present_guess(&mut self) -> Result<String, SessionError> {
        if self.state != SessionState::AwaitingGuess {
            return Err(SessionError::NotAwaitingGuess(self.state));
        }
        let Some(guess) = self.guess.clone() else {
            return Err(SessionError::NotAwaitingGuess(self.state));
        };
        self.state = SessionState::AwaitingFeedback;
        Ok(guess)
    }

    /// Record feedback for the presented guess and work out what comes next.
    pub fn submit_feedback(&mut self, feedback: &[Feedback]) -> Result<RoundOutcome, SessionError> {
        if self.state != SessionState::AwaitingFeedback {
            return Err(SessionError::NotAwaitingFeedback(self.state));
        }
        if feedback.len() != WORD_LENGTH {
            return Err(SessionError::FeedbackLength {
                expected: WORD_LENGTH,
                found: feedback.len(),
            });
        }
        let Some(guess) = self.guess.take() else {
            return Err(SessionError::NotAwaitingFeedback(self.state));
        };

        let rounds = self.rounds() + 1;
        if is_solved(feedback) {
            self.history.push(Round {
                guess,
                feedback: feedback.to_vec(),
            });
            self.state = SessionState::Solved;
            log::info!("Solved in {rounds} rounds");
            return Ok(RoundOutcome::Solved { rounds });
        }

        self.candidates = filter_candidates(&self.candidates, &guess, feedback);
        self.history.push(Round {
            guess,
            feedback: feedback.to_vec(),
        });
        log::debug!("Round {rounds}: {} candidates remain", self.candidates.len());
        match select_best_guess(&self.candidates, self.context.scores()) {
            Some(next) => {
                let next = next.clone();
                self.guess = Some(next.clone());
                self.state = SessionState::AwaitingGuess;
                Ok(RoundOutcome::NextGuess(next))
            }
            None => {
                self.state = SessionState::Terminated;
                log::info!("No candidates left after {rounds} rounds");
                Ok(RoundOutcome::Exhausted { rounds })
            }
        }
    }
}

/// What a feedback source hands back for a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Feedback(Vec<Feedback>),
    NewGame,
    Exit,
    /// The source broke down and cannot supply any more feedback
    Abort,
}

/// A source of feedback plus optional display hooks.
///
/// The display hooks default to doing nothing so that non-interactive sources
/// only have to answer `read_feedback`.
pub trait GameInterface {
    fn read_feedback(&mut self, round: usize, guess: &str) -> UserAction;

    fn display_candidates(&mut self, _candidates: &[String]) {}

    fn display_solution_found(&mut self, _solution: &str, _rounds: usize) {}

    fn display_no_candidates_message(&mut self) {}

    fn display_new_game_message(&mut self, _word_count: usize) {}

    fn display_exit_message(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Solved,
    Exhausted,
    Exited,
    Restarted,
    /// The session stopped on an error rather than a game outcome
    Failed,
}

/// How a session ended and the rounds it played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub history: Vec<Round>,
}

impl SessionReport {
    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    pub fn is_solved(&self) -> bool {
        self.status == SessionStatus::Solved
    }
}

/// Play one session against `interface` until it is solved, runs out of
/// candidates, or the interface asks to stop.
pub fn play_session<I: GameInterface + ?Sized>(context: &SolverContext, interface: &mut I) -> SessionReport {
    let mut session = Session::new(context);

    let status = loop {
        let guess = match session.present_guess() {
            Ok(guess) => guess,
            Err(e) => {
                log::error!("Session stalled: {e}");
                break SessionStatus::Failed;
            }
        };

        let feedback = match interface.read_feedback(session.rounds() + 1, &guess) {
            UserAction::Feedback(feedback) => feedback,
            UserAction::NewGame => break SessionStatus::Restarted,
            UserAction::Abort => {
                log::error!("Feedback source failed at round {}", session.rounds() + 1);
                break SessionStatus::Failed;
            }
            UserAction::Exit => {
                interface.display_exit_message();
                break SessionStatus::Exited;
            }
        };

        match session.submit_feedback(&feedback) {
            Ok(RoundOutcome::Solved { rounds }) => {
                interface.display_solution_found(&guess, rounds);
                break SessionStatus::Solved;
            }
            Ok(RoundOutcome::NextGuess(_)) => interface.display_candidates(session.candidates()),
            Ok(RoundOutcome::Exhausted { .. }) => {
                interface.display_no_candidates_message();
                break SessionStatus::Exhausted;
            }
            Err(e) => {
                log::error!("Rejected feedback for '{guess}': {e}");
                break SessionStatus::Failed;
            }
        }
    };

    SessionReport {
        status,
        history: session.into_history(),
    }
}

/// Keep playing sessions while the interface asks for a new game.
pub fn game_loop<I: GameInterface + ?Sized>(context: &SolverContext, interface: &mut I) -> SessionReport {
    loop {
        let report = play_session(context, interface);
        if report.status != SessionStatus::Restarted {
            return report;
        }
        log::info!("New game requested after {} rounds", report.rounds());
        interface.display_new_game_message(context.corpus().len());
    }
}
