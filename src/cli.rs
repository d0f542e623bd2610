use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use quote_check::config::AppConfig;
use quote_check::error::AppError;
use quote_check::telemetry;
use quote_check::workflows::feedback::{write_history_csv, ClientContext, Sentiment};
use quote_check::workflows::quote::{Difficulty, QuoteInput};
use tracing::{info, warn};

use crate::infra::file_session;
use crate::render::{render_checklist, render_history, render_save_outcome, render_snapshot};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "quote-check",
    about = "Check whether an advertising-management fee quote is fair",
    version
)]
struct Cli {
    /// Override the key/value store file (defaults to QUOTE_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Append analytics events as JSON lines to this file instead of the log
    #[arg(long, global = true)]
    events_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the local HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a quote and remember it as the current input
    Evaluate(EvaluateArgs),
    /// List the service checklist and the fee weights behind it
    Checklist,
    /// Capture and inspect micro-feedback
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Difficulty tier (Low, Medium, High)
    #[arg(long)]
    difficulty: Option<String>,
    /// Monthly ad budget
    #[arg(long)]
    budget: Option<f64>,
    /// Quoted management fee in percent
    #[arg(long)]
    fee: Option<f64>,
    /// Checklist item id to include; repeat for several
    #[arg(long = "item")]
    items: Vec<String>,
    /// Start from the stored input and apply only the given overrides
    #[arg(long)]
    amend: bool,
}

#[derive(Subcommand, Debug)]
enum FeedbackCommand {
    /// Save feedback on the current result
    Save(FeedbackSaveArgs),
    /// Show the most recent feedback records
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Write the feedback history as CSV
    Export {
        /// Destination file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Remove the stored feedback history
    Clear,
}

#[derive(Args, Debug)]
struct FeedbackSaveArgs {
    /// helpful or not_sure
    #[arg(long, value_parser = parse_sentiment)]
    sentiment: Option<Sentiment>,
    /// Stated next step, e.g. negotiate or sign_contract
    #[arg(long)]
    action: Option<String>,
}

fn parse_sentiment(raw: &str) -> Result<Sentiment, String> {
    Sentiment::parse(raw).ok_or_else(|| format!("'{raw}' is not one of helpful, not_sure"))
}

/// Client context recorded on feedback saved from the command line.
fn cli_client(store: &Path) -> ClientContext {
    ClientContext {
        source_url: format!("cli://{}", store.display()),
        client_agent: concat!("quote-check-cli/", env!("CARGO_PKG_VERSION")).to_string(),
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.store {
        config.storage.path = path;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args, cli.events_log).await,
        Command::Evaluate(args) => run_evaluate(&config, cli.events_log, args),
        Command::Checklist => {
            let session = file_session(&config, cli.events_log);
            render_checklist(session.evaluator());
            Ok(())
        }
        Command::Feedback { command } => run_feedback(&config, cli.events_log, command),
    }
}

fn run_evaluate(
    config: &AppConfig,
    events_log: Option<PathBuf>,
    args: EvaluateArgs,
) -> Result<(), AppError> {
    let mut session = file_session(config, events_log);
    session.start_form("cli");

    let mut input = if args.amend {
        session.restore()
    } else {
        QuoteInput::default()
    };
    if let Some(raw) = args.difficulty.as_deref() {
        input.difficulty = Difficulty::parse(raw);
        if input.difficulty.is_none() {
            let known: Vec<&str> = Difficulty::ALL.iter().map(Difficulty::label).collect();
            warn!(
                difficulty = raw,
                ?known,
                "unknown difficulty; using fallback adjustment"
            );
        }
    }
    if args.budget.is_some() {
        input.budget = args.budget;
    }
    if args.fee.is_some() {
        input.fee_percent = args.fee;
    }
    for id in args.items {
        if !session.evaluator().checklist().contains(&id) {
            warn!(item = %id, "unknown checklist item ignored");
        }
        input.selected_item_ids.insert(id);
    }

    let snapshot = session.evaluate(input);
    render_snapshot(snapshot);
    Ok(())
}

fn run_feedback(
    config: &AppConfig,
    events_log: Option<PathBuf>,
    command: FeedbackCommand,
) -> Result<(), AppError> {
    let mut session =
        file_session(config, events_log).with_client(cli_client(&config.storage.path));

    match command {
        FeedbackCommand::Save(args) => {
            session.resume();
            if let Some(sentiment) = args.sentiment {
                session.select_sentiment(sentiment);
            }
            if let Some(action) = args.action.as_deref() {
                session.select_action(action);
            }
            let outcome = session.save_feedback()?;
            render_save_outcome(&outcome);
            Ok(())
        }
        FeedbackCommand::List { limit } => {
            let history = session.history();
            render_history(&history, limit);
            Ok(())
        }
        FeedbackCommand::Export { output } => {
            let history = session.history();
            let written = match output {
                Some(path) => {
                    let written = write_history_csv(&history, File::create(&path)?)?;
                    info!(path = %path.display(), written, "feedback history exported");
                    written
                }
                None => write_history_csv(&history, io::stdout().lock())?,
            };
            eprintln!("exported {written} feedback record(s)");
            Ok(())
        }
        FeedbackCommand::Clear => {
            session.store().clear_history()?;
            println!("Feedback history cleared");
            Ok(())
        }
    }
}
