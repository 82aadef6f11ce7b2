//! Command surface for the competition tracker.
//!
//! Host programs should embed behavior through:
//! - [`run_cli`] for full parsed CLI execution.
//! - [`run_command`] for direct [`Command`] execution against an existing
//!   [`CompetitionStore`].
//!
//! The store is snapshotted to a JSON file between invocations; real
//! persistence is out of scope for this surface.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dayrival_core::{parse_iso_date, CompetitionId, CompetitionStore, EventKind};
use dayrival_provider::{
    summarize_competition, GeminiClient, LlmClient, LlmConfig, MockLlmClient,
};
use time::{Date, OffsetDateTime};
use ulid::Ulid;

#[derive(Debug, Parser)]
#[command(name = "dayrival")]
#[command(about = "Bedtime and wake-up competition tracker")]
pub struct Cli {
    #[arg(long, default_value = "./dayrival.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a competition between two participants.
    Start(StartArgs),
    /// Record one bedtime or wake-up result for a participant.
    Record(RecordArgs),
    /// Settle a competition once its end date has passed.
    End(EndArgs),
    /// Print one competition as JSON.
    Show(ShowArgs),
    /// Print every competition as JSON.
    List,
    /// Generate and validate a model-written summary.
    Summarize(SummarizeArgs),
}

#[derive(Debug, Args)]
pub struct StartArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    challenger: String,
    #[arg(long)]
    start_date: String,
    #[arg(long)]
    end_date: String,
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    event: EventArg,
    #[arg(long)]
    result: ResultArg,
}

#[derive(Debug, Args)]
pub struct EndArgs {
    #[arg(long)]
    id: String,
    /// Evaluation date, defaulting to today (UTC).
    #[arg(long)]
    as_of: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    id: String,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[arg(long)]
    id: String,
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,
    /// Override the configured model id.
    #[arg(long)]
    model: Option<String>,
    /// Use the offline mock client instead of the model endpoint.
    #[arg(long)]
    mock: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventArg {
    Bedtime,
    Wakeup,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResultArg {
    Met,
    Missed,
}

/// Executes the parsed top-level CLI command graph.
///
/// # Errors
/// Returns an error when the store snapshot cannot be read or written, or
/// when the requested command fails.
pub fn run_cli(cli: Cli) -> Result<()> {
    let mut store = load_store(&cli.store)?;
    let mutated = run_command(cli.command, &mut store)?;
    if mutated {
        save_store(&cli.store, &store)?;
    }
    Ok(())
}

/// Executes a parsed command against an existing store handle, returning
/// whether the store was mutated.
///
/// # Errors
/// Returns an error when validation, settlement, or summarization fails.
pub fn run_command(command: Command, store: &mut CompetitionStore) -> Result<bool> {
    match command {
        Command::Start(args) => {
            let id = store.start_competition(
                &args.user,
                &args.challenger,
                parse_iso_date(&args.start_date)?,
                parse_iso_date(&args.end_date)?,
            )?;
            let competition = store
                .get(id)
                .ok_or_else(|| anyhow!("competition {id} vanished after insert"))?;
            println!("{}", serde_json::to_string_pretty(competition)?);
            Ok(true)
        }
        Command::Record(args) => {
            let date = parse_iso_date(&args.date)?;
            let kind = match args.event {
                EventArg::Bedtime => EventKind::Bedtime,
                EventArg::Wakeup => EventKind::Wakeup,
            };
            let success = matches!(args.result, ResultArg::Met);
            store.record_stat(&args.user, date, kind, success)?;

            let stat = store
                .iter()
                .flat_map(|competition| competition.daily_stats.iter())
                .find(|stat| stat.user == args.user && stat.date == date)
                .ok_or_else(|| anyhow!("recorded stat not found after write"))?;
            println!("{}", serde_json::to_string_pretty(stat)?);
            Ok(true)
        }
        Command::End(args) => {
            let id = parse_competition_id(&args.id)?;
            let as_of = match args.as_of.as_deref() {
                Some(raw) => parse_iso_date(raw)?,
                None => today_utc(),
            };
            let message = store.end_competition(id, as_of)?;
            println!("{message}");
            Ok(true)
        }
        Command::Show(args) => {
            let id = parse_competition_id(&args.id)?;
            let competition = store
                .get(id)
                .ok_or_else(|| anyhow!("unknown competition: {id}"))?;
            println!("{}", serde_json::to_string_pretty(competition)?);
            Ok(false)
        }
        Command::List => {
            let competitions: Vec<_> = store.iter().collect();
            println!("{}", serde_json::to_string_pretty(&competitions)?);
            Ok(false)
        }
        Command::Summarize(args) => {
            let id = parse_competition_id(&args.id)?;
            let client: Box<dyn LlmClient> = if args.mock {
                let competition = store
                    .get(id)
                    .ok_or_else(|| anyhow!("unknown competition: {id}"))?;
                Box::new(MockLlmClient::faithful(competition)?)
            } else {
                let mut config = LlmConfig::load(&args.config)?;
                if args.model.is_some() {
                    config.model_id = args.model;
                }
                Box::new(GeminiClient::from_config(&config))
            };

            let competition = store
                .get_mut(id)
                .ok_or_else(|| anyhow!("unknown competition: {id}"))?;
            let rendered = summarize_competition(client.as_ref(), competition)?;
            println!("{rendered}");
            Ok(true)
        }
    }
}

fn parse_competition_id(raw: &str) -> Result<CompetitionId> {
    let ulid = Ulid::from_string(raw)
        .map_err(|err| anyhow!("invalid competition id '{raw}': {err}"))?;
    Ok(CompetitionId(ulid))
}

fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

fn load_store(path: &Path) -> Result<CompetitionStore> {
    if !path.exists() {
        return Ok(CompetitionStore::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read store snapshot {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(CompetitionStore::new());
    }
    let store: CompetitionStore = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse store snapshot {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        competitions = store.len(),
        "loaded store snapshot"
    );
    Ok(store)
}

fn save_store(path: &Path, store: &CompetitionStore) -> Result<()> {
    let encoded = serde_json::to_string_pretty(store)?;
    std::fs::write(path, encoded)
        .with_context(|| format!("failed to write store snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved store snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn must<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("test failure: {err}"),
        }
    }

    fn execute_cli(args: Vec<String>) -> Result<()> {
        let cli = Cli::try_parse_from(args)?;
        run_cli(cli)
    }

    fn cli_args(store_path: &Path, rest: &[&str]) -> Vec<String> {
        let mut args = vec![
            "dayrival".to_string(),
            "--store".to_string(),
            store_path.display().to_string(),
        ];
        args.extend(rest.iter().map(ToString::to_string));
        args
    }

    fn temp_store_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "dayrival-cli-{label}-{}-{}.json",
            std::process::id(),
            line!()
        ))
    }

    fn only_competition_id(store_path: &Path) -> String {
        let store = must(load_store(store_path));
        let competition = match store.iter().next() {
            Some(competition) => competition,
            None => panic!("store holds no competitions"),
        };
        competition.id.to_string()
    }

    #[test]
    fn start_record_end_round_trip_through_the_snapshot() {
        let store_path = temp_store_path("round-trip");
        let _ = fs::remove_file(&store_path);

        must(execute_cli(cli_args(
            &store_path,
            &[
                "start",
                "--user",
                "Alice",
                "--challenger",
                "Bob",
                "--start-date",
                "2025-05-05",
                "--end-date",
                "2025-05-06",
            ],
        )));
        let id = only_competition_id(&store_path);

        for (user, event, result) in [
            ("Alice", "bedtime", "met"),
            ("Alice", "wakeup", "met"),
            ("Bob", "bedtime", "missed"),
        ] {
            must(execute_cli(cli_args(
                &store_path,
                &[
                    "record",
                    "--user",
                    user,
                    "--date",
                    "2025-05-05",
                    "--event",
                    event,
                    "--result",
                    result,
                ],
            )));
        }

        must(execute_cli(cli_args(
            &store_path,
            &["end", "--id", &id, "--as-of", "2025-05-07"],
        )));

        let store = must(load_store(&store_path));
        let competition = match store.iter().next() {
            Some(competition) => competition,
            None => panic!("store holds no competitions"),
        };
        assert_eq!(competition.outcome, "Alice wins! (2 to -1)");
        assert_eq!(competition.daily_stats.len(), 2);

        let _ = fs::remove_file(&store_path);
    }

    #[test]
    fn summarize_with_mock_client_persists_a_summary() {
        let store_path = temp_store_path("summarize");
        let _ = fs::remove_file(&store_path);

        must(execute_cli(cli_args(
            &store_path,
            &[
                "start",
                "--user",
                "Alice",
                "--challenger",
                "Bob",
                "--start-date",
                "2025-05-05",
                "--end-date",
                "2025-05-05",
            ],
        )));
        let id = only_competition_id(&store_path);

        must(execute_cli(cli_args(
            &store_path,
            &[
                "record",
                "--user",
                "Alice",
                "--date",
                "2025-05-05",
                "--event",
                "bedtime",
                "--result",
                "met",
            ],
        )));

        must(execute_cli(cli_args(
            &store_path,
            &["summarize", "--id", &id, "--mock"],
        )));

        let store = must(load_store(&store_path));
        let competition = match store.iter().next() {
            Some(competition) => competition,
            None => panic!("store holds no competitions"),
        };
        assert!(competition.summary.contains("Winner: Alice"));

        let _ = fs::remove_file(&store_path);
    }

    #[test]
    fn record_rejects_unknown_event_kind_at_parse_time() {
        let store_path = temp_store_path("bad-event");
        let result = execute_cli(cli_args(
            &store_path,
            &[
                "record",
                "--user",
                "Alice",
                "--date",
                "2025-05-05",
                "--event",
                "nap",
                "--result",
                "met",
            ],
        ));
        assert!(result.is_err());
    }

    #[test]
    fn end_rejects_garbage_dates_and_ids() {
        let store_path = temp_store_path("bad-end");
        let bad_id = execute_cli(cli_args(
            &store_path,
            &["end", "--id", "not-a-ulid", "--as-of", "2025-05-07"],
        ));
        assert!(bad_id.is_err());

        let id = Ulid::new().to_string();
        let bad_date = execute_cli(cli_args(
            &store_path,
            &["end", "--id", &id, "--as-of", "May 7th"],
        ));
        assert!(bad_date.is_err());
    }

    #[test]
    fn show_unknown_competition_fails() {
        let store_path = temp_store_path("show-missing");
        let id = Ulid::new().to_string();
        let result = execute_cli(cli_args(&store_path, &["show", "--id", &id]));
        assert!(result.is_err());
    }

    #[test]
    fn overlapping_start_fails_without_clobbering_the_snapshot() {
        let store_path = temp_store_path("overlap");
        let _ = fs::remove_file(&store_path);

        must(execute_cli(cli_args(
            &store_path,
            &[
                "start",
                "--user",
                "Alice",
                "--challenger",
                "Bob",
                "--start-date",
                "2025-05-05",
                "--end-date",
                "2025-05-09",
            ],
        )));

        let result = execute_cli(cli_args(
            &store_path,
            &[
                "start",
                "--user",
                "Alice",
                "--challenger",
                "Cara",
                "--start-date",
                "2025-05-07",
                "--end-date",
                "2025-05-12",
            ],
        ));
        assert!(result.is_err());

        let store = must(load_store(&store_path));
        assert_eq!(store.len(), 1);

        let _ = fs::remove_file(&store_path);
    }
}
