use anyhow::{Context, Result, bail};
use std::io;
use std::process::ExitCode;
use wordler::cli::{CliInterface, Cli, Command, SimulateArgs, display_batch_report, parse_cli};
use wordler::logging::init_logging;
use wordler::wordbank::{
    SCORES_FILE, SOLUTIONS_FILE, WORDS_FILE, is_valid_word, load_solutions_from_file,
    load_wordbank_from_file, resolve_data_path,
};
use wordler::{OracleRule, SessionStatus, SolverContext, game_loop, load_scores_from_file, run_batch};

fn load_context(cli: &Cli) -> Result<SolverContext> {
    let seed = cli.seed.trim().to_lowercase();
    if !is_valid_word(&seed) {
        bail!("seed word '{}' must be 5 letters", cli.seed);
    }
    let words_path = resolve_data_path(cli.words_path.as_deref(), WORDS_FILE);
    let corpus = load_wordbank_from_file(&words_path).context("could not load the word list")?;
    if corpus.is_empty() {
        log::warn!("Word list is empty; only the seed word can be solved");
    }
    let scores_path = resolve_data_path(cli.scores_path.as_deref(), SCORES_FILE);
    let scores = load_scores_from_file(&scores_path).context("could not load the score table")?;
    Ok(SolverContext::new(corpus, scores, seed))
}

fn run_interactive(context: &SolverContext) -> ExitCode {
    println!("Loaded {} words.", context.corpus().len());
    let stdin = io::stdin();
    let mut interface = CliInterface::new(stdin.lock());
    let report = game_loop(context, &mut interface);
    match report.status {
        SessionStatus::Exhausted | SessionStatus::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn run_simulation(context: &SolverContext, args: &SimulateArgs) -> Result<()> {
    let solutions_path = resolve_data_path(args.solutions_path.as_deref(), SOLUTIONS_FILE);
    let solutions = load_solutions_from_file(&solutions_path).context("could not load the solutions list")?;
    let rule = if args.lenient_oracle {
        OracleRule::Existence
    } else {
        OracleRule::CountAware
    };
    let report = run_batch(context, &solutions, rule, args.threshold);
    if args.json {
        let summary = serde_json::to_string_pretty(&report.summary()).context("could not encode the summary")?;
        println!("{summary}");
    } else {
        display_batch_report(&report, args.trace);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let context = match load_context(&cli) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to start: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command.clone().unwrap_or(Command::Solve) {
        Command::Solve => run_interactive(&context),
        Command::Simulate(args) => match run_simulation(&context, &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Simulation failed: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
