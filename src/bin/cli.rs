//! CLI binary for cf-roster.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cf_client::CodeforcesClient;
use cf_roster::{
    IndividualPatch, NewIndividual, RecordLocks, RecordStore, ReminderDispatcher, RosterConfig,
    SqliteRecordStore, SyncOrchestrator, TracingSender,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Keep a roster of people in step with their Codeforces activity.
#[derive(Parser)]
#[command(name = "cf-roster", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync every individual in the roster. Ctrl+C stops scheduling new syncs.
    SyncAll,

    /// Sync one individual by id.
    Sync { id: String },

    /// List individuals due for an inactivity reminder.
    Due {
        /// Override the configured inactivity window.
        #[arg(long)]
        window_days: Option<u32>,
    },

    /// Send reminders to every due individual (delivery is logged only).
    Remind,

    /// Print every stored record.
    List,

    /// Enroll a new individual and run their first sync.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        handle: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Edit an individual. Changing the handle triggers a resync.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        handle: Option<String>,
        /// Pass an empty string to clear.
        #[arg(long)]
        phone: Option<String>,
        /// Stop sending inactivity reminders to this individual.
        #[arg(long, conflicts_with = "enable_reminders")]
        disable_reminders: bool,
        /// Resume inactivity reminders.
        #[arg(long)]
        enable_reminders: bool,
    },

    /// Remove an individual by id.
    Remove { id: String },
}

/// Compact row for the `due` listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueEntry<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    codeforces_handle: &'a str,
    reminder_emails_sent: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cf_roster=info,cf_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => RosterConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RosterConfig::load_or_default(&RosterConfig::default_config_path())?,
    };
    if let Command::Due {
        window_days: Some(days),
    } = cli.command
    {
        config.reminders.window_days = days;
    }
    config.validate()?;

    let db_path = config.database_path();
    let store: Arc<dyn RecordStore> = Arc::new(
        SqliteRecordStore::open(&db_path)
            .with_context(|| format!("opening roster database {}", db_path.display()))?,
    );
    let locks = Arc::new(RecordLocks::new());

    match cli.command {
        Command::SyncAll => {
            let orchestrator = orchestrator(&config, store, locks)?;
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, finishing in-flight syncs");
                    on_signal.cancel();
                }
            });
            let report = orchestrator.sync_all(&cancel).await?;
            print_json(&report.summary())
        }
        Command::Sync { id } => {
            let orchestrator = orchestrator(&config, store, locks)?;
            let record = orchestrator.sync_one(&id).await?;
            print_json(&record)
        }
        Command::Due { .. } => {
            let dispatcher = dispatcher(&config, store, locks);
            let due = dispatcher.due(Utc::now()).await?;
            let rows: Vec<DueEntry<'_>> = due
                .iter()
                .map(|r| DueEntry {
                    id: &r.id,
                    name: &r.name,
                    email: &r.email,
                    codeforces_handle: &r.codeforces_handle,
                    reminder_emails_sent: r.reminder_emails_sent,
                })
                .collect();
            print_json(&rows)
        }
        Command::Remind => {
            let report = dispatcher(&config, store, locks).run(Utc::now()).await?;
            print_json(&report)
        }
        Command::List => print_json(&store.get_all().await?),
        Command::Add {
            name,
            email,
            handle,
            phone,
        } => {
            let orchestrator = orchestrator(&config, store, locks)?;
            let record = orchestrator
                .enroll(NewIndividual {
                    name,
                    email,
                    phone_number: phone,
                    codeforces_handle: handle,
                })
                .await?;
            print_json(&record)
        }
        Command::Edit {
            id,
            name,
            email,
            handle,
            phone,
            disable_reminders,
            enable_reminders,
        } => {
            let patch = IndividualPatch {
                name,
                email,
                phone_number: phone,
                codeforces_handle: handle,
                disable_email_reminders: match (disable_reminders, enable_reminders) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field to edit");
            }
            let orchestrator = orchestrator(&config, store, locks)?;
            let record = orchestrator.update(&id, patch).await?;
            print_json(&record)
        }
        Command::Remove { id } => {
            let orchestrator = orchestrator(&config, store, locks)?;
            orchestrator.remove(&id).await?;
            print_json(&serde_json::json!({ "removed": id }))
        }
    }
}

fn orchestrator(
    config: &RosterConfig,
    store: Arc<dyn RecordStore>,
    locks: Arc<RecordLocks>,
) -> anyhow::Result<SyncOrchestrator<CodeforcesClient>> {
    let client = CodeforcesClient::new(config.client.clone())?;
    Ok(SyncOrchestrator::new(client, store)
        .with_max_concurrency(config.sync.max_concurrency)
        .with_locks(locks))
}

fn dispatcher(
    config: &RosterConfig,
    store: Arc<dyn RecordStore>,
    locks: Arc<RecordLocks>,
) -> ReminderDispatcher {
    ReminderDispatcher::new(
        store,
        Arc::new(TracingSender),
        config.reminders.clone(),
        locks,
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
