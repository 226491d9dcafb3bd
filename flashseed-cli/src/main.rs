//! flashseed CLI - seed a flashcard collection and dump it
//!
//! Runs one connect → write → read → report → release sequence against a
//! Postgres "flashcards" table. With no subcommand it behaves like `seed`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flashseed_core::pipeline::{self, DEFAULT_PROMPT};
use flashseed_core::{config, report, session};
use flashseed_core::{CollectionName, Flashcard, MemoryStore, ReportFormat, StoreConfig};
use tracing::debug;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "flashseed",
    author,
    version,
    about = "Seed a flashcard into Postgres and print the collection",
    long_about = "Insert one prompt into the flashcards collection, read every record back \
                  and print it. The connection is always released, waiting at most the \
                  teardown timeout."
)]
struct Cli {
    /// Config file (default: ~/.flashseed/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Postgres connection string (overrides DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    /// Database user (overrides the user in the URL)
    #[arg(long, global = true, value_name = "NAME")]
    user: Option<String>,

    /// Collection (table) holding the flashcards
    #[arg(long, global = true, value_name = "NAME")]
    collection: Option<String>,

    /// Seconds to wait for the connection to close before abandoning it
    #[arg(long, global = true, value_name = "SECS")]
    teardown_timeout: Option<u64>,

    /// Output format for records
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert one prompt, then print every flashcard
    Seed(SeedArgs),
    /// Print every flashcard
    List,
    /// Set the answer of a flashcard and print it
    Answer(AnswerArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct SeedArgs {
    /// Prompt text to insert
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Answer stored with the new flashcard
    #[arg(long, value_name = "TEXT")]
    answer: Option<String>,

    /// Run against an empty in-memory collection instead of the database
    #[arg(long = "dry-run")]
    dry_run: bool,
}

impl Default for SeedArgs {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_owned(),
            answer: None,
            dry_run: false,
        }
    }
}

#[derive(Parser, Debug)]
struct AnswerArgs {
    /// Flashcard id
    id: i64,

    /// Answer text
    answer: String,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the layered configuration with secrets redacted
    Show,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    config::load_dotenv();

    let store_config = resolve_config(&cli)?;
    debug!(
        store = %store_config.target(),
        collection = %store_config.collection,
        "resolved config"
    );
    let format = ReportFormat::from(cli.format);

    match cli.command.unwrap_or(Commands::Seed(SeedArgs::default())) {
        Commands::Seed(args) if args.dry_run => {
            let store = MemoryStore::new(store_config.collection.clone());
            let SeedArgs { prompt, answer, .. } = args;
            let cards = session::scoped(store, store_config.teardown_timeout(), move |store| {
                Box::pin(async move {
                    pipeline::seed_and_dump(store, &prompt, answer.as_deref()).await
                })
            })
            .await
            .context("dry-run seed failed")?;
            print_cards(&store_config.collection, &cards, format)
        }
        Commands::Seed(args) => {
            let SeedArgs { prompt, answer, .. } = args;
            let cards = session::run(&store_config, move |store| {
                Box::pin(async move {
                    pipeline::seed_and_dump(store, &prompt, answer.as_deref()).await
                })
            })
            .await
            .context("seed failed")?;
            print_cards(&store_config.collection, &cards, format)
        }
        Commands::List => {
            let cards = session::run(&store_config, |store| Box::pin(pipeline::dump(store)))
                .await
                .context("list failed")?;
            print_cards(&store_config.collection, &cards, format)
        }
        Commands::Answer(args) => {
            let AnswerArgs { id, answer } = args;
            let card = session::run(&store_config, move |store| {
                Box::pin(async move { pipeline::answer(store, id, &answer).await })
            })
            .await
            .context("answer failed")?;
            print_cards(&store_config.collection, &[card], format)
        }
        Commands::Config(args) => match args.command {
            ConfigCommand::Show => {
                let rendered = store_config.to_redacted_toml()?;
                print!("{}", rendered);
                Ok(())
            }
        },
    }
}

/// Defaults < config file < environment < command-line flags
fn resolve_config(cli: &Cli) -> Result<StoreConfig> {
    let mut store_config =
        StoreConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(url) = &cli.database_url {
        store_config.database_url = url.clone();
    }
    if let Some(user) = &cli.user {
        store_config.username = Some(user.clone());
    }
    if let Some(collection) = &cli.collection {
        store_config.collection =
            CollectionName::new(collection).context("invalid --collection")?;
    }
    if let Some(secs) = cli.teardown_timeout {
        store_config.teardown_timeout_secs = secs;
    }

    Ok(store_config)
}

fn print_cards(
    collection: &CollectionName,
    cards: &[Flashcard],
    format: ReportFormat,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render(collection, cards, format, &mut out).context("failed to write report")?;
    out.flush()?;
    Ok(())
}
