//! Terminal front end for the to-do store.
//!
//! # Responsibility
//! - Translate command-line input into store intents.
//! - Redraw the list whenever the store reports a change.
//!
//! The view never edits items itself; it only dispatches `TodoIntent`s.

use clap::{Parser, Subcommand};
use log::{debug, error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{
    core_version, default_log_level, init_logging, sample_todos, RecordShape, SlotRepository,
    SqliteSlotRepository, StoreChange, StoreConfig, TodoIntent, TodoItem, TodoStore,
    DEFAULT_SLOT_NAME,
};
use uuid::Uuid;

const DEFAULT_DB_FILE_NAME: &str = "todo.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Single-list to-do manager")]
struct Cli {
    /// SQLite file holding the persisted list.
    #[arg(long, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Key-value slot the list is stored under.
    #[arg(long, default_value = DEFAULT_SLOT_NAME)]
    slot: String,

    /// Record shape: minimal, tracked or timestamped.
    #[arg(long, default_value_t = RecordShape::Timestamped)]
    shape: RecordShape,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current list.
    List,
    /// Append an item.
    Add { text: String },
    /// Flip the done flag of the item with this id.
    Toggle { id: Uuid },
    /// Remove the items at these zero-based positions.
    Delete {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Walk through the seed list in memory without touching the database.
    Demo,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("todo: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("todo: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let intent = match cli.command {
        Command::Version => {
            println!("todo_core version={}", core_version());
            return Ok(());
        }
        Command::Demo => {
            run_demo();
            return Ok(());
        }
        Command::List => None,
        Command::Add { text } => Some(TodoIntent::Add(text)),
        Command::Toggle { id } => Some(TodoIntent::ToggleDone(id)),
        Command::Delete { positions } => Some(TodoIntent::Delete(positions)),
    };

    let conn = open_db(&cli.db)
        .map_err(|err| format!("failed to open database `{}`: {err}", cli.db.display()))?;
    let repo = SqliteSlotRepository::new(&conn);
    let config = StoreConfig {
        slot_name: cli.slot,
        shape: cli.shape,
    };
    let mut store = TodoStore::open(repo, config);
    match intent {
        Some(intent) => {
            apply_intent(&mut store, intent);
        }
        None => render(store.items()),
    }
    Ok(())
}

/// Dispatches one intent and redraws through the store subscription.
///
/// Intents the store ignores (blank text, unknown id, positions past the end)
/// are not errors; the unchanged list is shown instead.
fn apply_intent<R: SlotRepository>(store: &mut TodoStore<R>, intent: TodoIntent) -> bool {
    let name = intent_name(&intent);
    let subscription = store.subscribe(redraw);
    let changed = store.dispatch(intent);
    store.unsubscribe(subscription);

    if changed {
        info!("event=cli_dispatch module=cli status=ok intent={name}");
    } else {
        debug!("event=cli_dispatch module=cli status=skipped intent={name}");
        render(store.items());
    }
    changed
}

fn run_demo() {
    let mut store = TodoStore::ephemeral(sample_todos());
    store.subscribe(redraw);

    render(store.items());
    println!();
    let Some(id) = store.add("  물 마시기  ") else {
        return;
    };
    println!();
    store.dispatch(TodoIntent::ToggleDone(id));
    println!();
    store.dispatch(TodoIntent::Delete(vec![1]));
}

fn redraw(change: &StoreChange, items: &[TodoItem]) {
    match change {
        StoreChange::Loaded { count } => println!("loaded {count} item(s)"),
        StoreChange::Added { id } => println!("added {id}"),
        StoreChange::Toggled { id, is_done } => {
            println!("{} {id}", if *is_done { "done" } else { "reopened" })
        }
        StoreChange::Deleted { ids } => println!("deleted {} item(s)", ids.len()),
    }
    render(items);
}

fn render(items: &[TodoItem]) {
    if items.is_empty() {
        println!("(no items)");
        return;
    }
    for (position, item) in items.iter().enumerate() {
        let mark = if item.is_done { "x" } else { " " };
        match item.created_at_label() {
            Some(label) => println!(
                "{position:>3} [{mark}] {}  ({label})  {}",
                item.content, item.id
            ),
            None => println!("{position:>3} [{mark}] {}  {}", item.content, item.id),
        }
    }
}

fn intent_name(intent: &TodoIntent) -> &'static str {
    match intent {
        TodoIntent::Add(_) => "add",
        TodoIntent::ToggleDone(_) => "toggle",
        TodoIntent::Delete(_) => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_intent, Cli, Command};
    use clap::{CommandFactory, Parser};
    use todo_core::{MemorySlotRepository, RecordShape, StoreConfig, TodoIntent, TodoStore};
    use uuid::Uuid;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delete_accepts_multiple_positions() {
        let cli = Cli::try_parse_from(["todo", "--shape", "tracked", "delete", "0", "2"]).unwrap();
        assert_eq!(cli.shape, RecordShape::Tracked);
        match cli.command {
            Command::Delete { positions } => assert_eq!(positions, vec![0, 2]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn toggle_rejects_non_uuid_ids() {
        assert!(Cli::try_parse_from(["todo", "toggle", "3"]).is_err());
    }

    #[test]
    fn ignored_intents_leave_store_untouched_without_failing() {
        let repo = MemorySlotRepository::new();
        let mut store = TodoStore::open(&repo, StoreConfig::default());
        assert!(apply_intent(&mut store, TodoIntent::Add("keep".to_string())));

        assert!(!apply_intent(&mut store, TodoIntent::Add("   ".to_string())));
        assert!(!apply_intent(&mut store, TodoIntent::ToggleDone(Uuid::nil())));
        assert!(!apply_intent(&mut store, TodoIntent::Delete(vec![99])));

        assert_eq!(store.len(), 1);
        assert!(!store.items()[0].is_done);
    }

    #[test]
    fn ignored_commands_on_file_database_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("todo.db");
        let db = db.to_str().unwrap();

        for args in [
            vec!["todo", "--db", db, "add", "   "],
            vec!["todo", "--db", db, "toggle", "00000000-0000-0000-0000-000000000000"],
            vec!["todo", "--db", db, "delete", "5"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(super::run(cli), Ok(()));
        }
    }
}
