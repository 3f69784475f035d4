//! Command line driver: scan a mail store once and feed it to sa-learn

use anyhow::Context;
use clap::Parser;
use sa_trainer::{
    DEFAULT_SA_LEARN, DEFAULT_SITE_CONFIG, Dispatcher, DryRun, Learner, MailStore, RunSummary,
    SaLearn, cutoff_from_now,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run sa-learn from SpamAssassin against spam and ham messages.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base directory to search under
    #[arg(long = "base_dir")]
    base_dir: PathBuf,

    /// Number of minutes to look back
    #[arg(long)]
    ago: u32,

    /// The folder in each email account where spam is located. Example: .Spam
    #[arg(long = "spam_dir")]
    spam_dir: String,

    /// The folder in each email account where ham is located. Example: .Trash
    #[arg(long = "ham_dir")]
    ham_dir: String,

    /// Path to the sa-learn binary
    #[arg(long = "sa_learn", default_value = DEFAULT_SA_LEARN)]
    sa_learn: PathBuf,

    /// SpamAssassin site configuration directory
    #[arg(long = "siteconfigpath", default_value = DEFAULT_SITE_CONFIG)]
    site_config: PathBuf,

    /// Log what would be learned without running sa-learn
    #[arg(long = "dry_run")]
    dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run<L: Learner>(learner: L, cli: &Cli) -> anyhow::Result<RunSummary> {
    let store = MailStore::new(&cli.base_dir, &cli.spam_dir, &cli.ham_dir);
    let mut dispatcher = Dispatcher::new(learner, cutoff_from_now(cli.ago));

    info!(
        base_dir = %store.base_dir.display(),
        cutoff = %dispatcher.cutoff(),
        "Scanning mail store"
    );

    dispatcher
        .run(&store)
        .with_context(|| format!("scanning {}", store.base_dir.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let summary = if cli.dry_run {
        run(DryRun, &cli)?
    } else {
        run(SaLearn::new(&cli.sa_learn, &cli.site_config), &cli)?
    };

    info!("Done: {summary}");

    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
