use crate::SEED_WORD;
use crate::game_state::{GameInterface, UserAction};
use crate::simulation::{BatchReport, DEFAULT_THRESHOLD};
use crate::solver::parse_feedback;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;

const CANDIDATES_SHOWN: usize = 5;

/// Frequency-driven solver for five-letter word guessing games
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Newline-delimited list of allowed words
    #[arg(short = 'w', long = "words", global = true)]
    pub words_path: Option<PathBuf>,

    /// JSON object mapping words to frequency scores
    #[arg(short = 's', long = "scores", global = true)]
    pub scores_path: Option<PathBuf>,

    /// Opening guess
    #[arg(long, default_value = SEED_WORD, global = true)]
    pub seed: String,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Solve a game interactively, typing in the feedback for each guess
    Solve,
    /// Solve every word of a solutions list with generated feedback
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SimulateArgs {
    /// Solutions to play against, first word of each line
    #[arg(long = "solutions")]
    pub solutions_path: Option<PathBuf>,

    /// Rounds within which a solve counts as a win
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Mark a letter present whenever it occurs in the solution, ignoring counts
    #[arg(long)]
    pub lenient_oracle: bool,

    /// Print every round of every run
    #[arg(long)]
    pub trace: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn display_candidates(candidates: &[String]) {
    println!("Possible candidates ({})", candidates.len());
    for word in candidates.iter().take(CANDIDATES_SHOWN) {
        println!("{word}");
    }
    if candidates.len() > CANDIDATES_SHOWN {
        println!("...and {} more", candidates.len() - CANDIDATES_SHOWN);
    }
}

pub fn display_solution_found(solution: &str, rounds: usize) {
    println!("Solved: {solution} in {rounds} guesses.");
}

pub fn display_no_candidates_message() {
    println!("No candidates remain. Check your inputs.");
}

pub fn display_new_game_message(word_count: usize) {
    println!("New game started. Loaded {word_count} words.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

pub fn display_batch_report(report: &BatchReport, trace: bool) {
    if trace {
        for run in &report.runs {
            let status = if run.solved { "solved" } else { "FAILED" };
            println!("{} ({status} in {} guesses)", run.solution, run.rounds);
            for (i, round) in run.trace.iter().enumerate() {
                println!("  {}. {round}", i + 1);
            }
        }
    }

    let summary = report.summary();
    match summary.average_rounds {
        Some(average) => println!("Average number of guesses: {average:.2}"),
        None => println!("Average number of guesses: n/a"),
    }
    println!(
        "Words guessed within {}: {}/{}",
        summary.threshold, summary.solved_within_threshold, summary.total
    );
    if summary.failed > 0 {
        println!("Unsolved: {}", summary.failed);
    }
}

/// Line-oriented feedback entry over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next trimmed, lowercased line, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut input = String::new();
        match self.reader.read_line(&mut input)? {
            0 => Ok(None),
            _ => Ok(Some(input.trim().to_lowercase())),
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_feedback(&mut self, round: usize, guess: &str) -> UserAction {
        println!("\nGuess {round}: {guess}");
        loop {
            println!("Feedback (g/y/b, or 'next' for a new game, 'exit' to quit):");
            let input = match self.read_line() {
                Ok(Some(input)) => input,
                Ok(None) => return UserAction::Exit,
                // read_line has already consumed the bad line
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    println!("Error! Input is not valid text. Feedback must include only g/y/b.");
                    continue;
                }
                Err(e) => {
                    log::error!("Failed to read input: {e}");
                    return UserAction::Abort;
                }
            };
            match input.as_str() {
                "exit" => return UserAction::Exit,
                "next" => return UserAction::NewGame,
                _ => match parse_feedback(&input) {
                    Some(feedback) => return UserAction::Feedback(feedback),
                    None => {
                        println!("Error! Feedback must include only g/y/b and must be 5 letters long.")
                    }
                },
            }
        }
    }

    fn display_candidates(&mut self, candidates: &[String]) {
        display_candidates(candidates);
    }

    fn display_solution_found(&mut self, solution: &str, rounds: usize) {
        display_solution_found(solution, rounds);
    }

    fn display_no_candidates_message(&mut self) {
        display_no_candidates_message();
    }

    fn display_new_game_message(&mut self, word_count: usize) {
        display_new_game_message(word_count);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Feedback;
    use std::io::{BufReader, Cursor, Read};

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed"))
        }
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["wordler"]).unwrap();
        assert_eq!(cli.words_path, None);
        assert_eq!(cli.scores_path, None);
        assert_eq!(cli.seed, "crane");
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parse_cli_paths_and_seed() {
        let cli = Cli::try_parse_from([
            "wordler", "-w", "words.txt", "--scores", "freq.json", "--seed", "slate", "-vv", "solve",
        ])
        .unwrap();
        assert_eq!(cli.words_path, Some(PathBuf::from("words.txt")));
        assert_eq!(cli.scores_path, Some(PathBuf::from("freq.json")));
        assert_eq!(cli.seed, "slate");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Some(Command::Solve));
    }

    #[test]
    fn test_parse_cli_simulate() {
        let cli = Cli::try_parse_from([
            "wordler",
            "simulate",
            "--solutions",
            "solutions.txt",
            "-t",
            "5",
            "--lenient-oracle",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Simulate(args)) => {
                assert_eq!(args.solutions_path, Some(PathBuf::from("solutions.txt")));
                assert_eq!(args.threshold, 5);
                assert!(args.lenient_oracle);
                assert!(args.json);
                assert!(!args.trace);
            }
            other => panic!("Expected simulate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_cli_simulate_defaults() {
        let cli = Cli::try_parse_from(["wordler", "simulate", "--words", "w.txt"]).unwrap();
        assert_eq!(cli.words_path, Some(PathBuf::from("w.txt")));
        match cli.command {
            Some(Command::Simulate(args)) => assert_eq!(args.threshold, DEFAULT_THRESHOLD),
            other => panic!("Expected simulate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["wordler", "play"]).is_err());
    }

    #[test]
    fn test_read_feedback_valid() {
        let mut interface = CliInterface::new(Cursor::new("bbgbg\n"));
        assert_eq!(
            interface.read_feedback(1, "crane"),
            UserAction::Feedback(vec![
                Feedback::Absent,
                Feedback::Absent,
                Feedback::Exact,
                Feedback::Absent,
                Feedback::Exact,
            ])
        );
    }

    #[test]
    fn test_read_feedback_case_and_whitespace() {
        let mut interface = CliInterface::new(Cursor::new("  GYBBG  \n"));
        match interface.read_feedback(1, "crane") {
            UserAction::Feedback(feedback) => {
                assert_eq!(feedback[0], Feedback::Exact);
                assert_eq!(feedback[1], Feedback::Present);
            }
            other => panic!("Expected feedback, got {other:?}"),
        }
    }

    #[test]
    fn test_read_feedback_reprompts_until_valid() {
        let mut interface = CliInterface::new(Cursor::new("ggg\nggggga\nggxgg\n12345\nggggg\n"));
        assert_eq!(
            interface.read_feedback(1, "crane"),
            UserAction::Feedback(vec![Feedback::Exact; 5])
        );
    }

    #[test]
    fn test_read_feedback_commands() {
        let mut interface = CliInterface::new(Cursor::new("NEXT\nexit\n"));
        assert_eq!(interface.read_feedback(1, "crane"), UserAction::NewGame);
        assert_eq!(interface.read_feedback(1, "crane"), UserAction::Exit);
    }

    #[test]
    fn test_read_feedback_end_of_input() {
        let mut interface = CliInterface::new(Cursor::new("bad\n"));
        assert_eq!(interface.read_feedback(1, "crane"), UserAction::Exit);
    }

    #[test]
    fn test_read_feedback_skips_invalid_utf8() {
        let mut interface = CliInterface::new(Cursor::new(b"\xff\xfe\nggggg\n".to_vec()));
        assert_eq!(
            interface.read_feedback(1, "crane"),
            UserAction::Feedback(vec![Feedback::Exact; 5])
        );
    }

    #[test]
    fn test_read_feedback_invalid_utf8_then_end_of_input() {
        let mut interface = CliInterface::new(Cursor::new(b"\xc3\x28\n".to_vec()));
        assert_eq!(interface.read_feedback(1, "crane"), UserAction::Exit);
    }

    #[test]
    fn test_read_feedback_read_error_aborts() {
        let mut interface = CliInterface::new(BufReader::new(BrokenPipe));
        assert_eq!(interface.read_feedback(1, "crane"), UserAction::Abort);
    }
}
