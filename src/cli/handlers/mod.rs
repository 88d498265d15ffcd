use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::audit_log::{AuditEvent, AuditLog, read_entries};
use crate::io::config_io::{DataPaths, read_config_or_default, resolve_data_dir};
use crate::io::task_store::TaskStore;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let paths = load_paths(cli.dir.as_deref())?;

    match cli.command {
        None => Err("no subcommand given (run `focus` without one to open the widget)".into()),
        Some(cmd) => match cmd {
            Commands::Add(args) => cmd_add(&paths, args, json),
            Commands::List => cmd_list(&paths, json),
            Commands::Log(args) => cmd_log(&paths, args, json),
        },
    }
}

/// Resolve file locations from -C and focus.toml. A broken config is a
/// warning; the defaults are used instead.
fn load_paths(dir: Option<&str>) -> Result<DataPaths, Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(dir)?;
    if !data_dir.is_dir() {
        return Err(format!("not a directory: {}", data_dir.display()).into());
    }
    let (config, config_error) = read_config_or_default(&data_dir);
    if let Some(e) = config_error {
        eprintln!("warning: {}; using defaults", e);
    }
    Ok(DataPaths::resolve(&data_dir, &config))
}

/// Open the task document, warning about a malformed one or skipped blanks
fn open_store(paths: &DataPaths) -> TaskStore {
    let mut store = TaskStore::open(paths.tasks.clone());
    if let Some(e) = store.take_load_error() {
        eprintln!("warning: {}; treating the task list as empty", e);
    }
    if let Some(warning) = store.blank_entries_warning() {
        eprintln!("warning: {}", warning);
    }
    store
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(paths: &DataPaths, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let task = Task::new(&args.task)?;
    let mut store = open_store(paths);
    store.add(task.clone())?;
    AuditLog::new(paths.log.clone()).record(AuditEvent::TaskAdded, Some(task.label()));

    if json {
        let out = AddedJson {
            added: task,
            count: store.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("New task '{}' has been added!", task);
    }
    Ok(())
}

fn cmd_list(paths: &DataPaths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(paths);

    if json {
        let out = TaskListJson {
            file: paths.tasks.display().to_string(),
            count: store.len(),
            tasks: store.tasks().to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_listing(store.tasks()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_log(paths: &DataPaths, args: LogArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let entries = read_entries(&paths.log, args.limit);

    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if entries.is_empty() {
        println!("no log entries");
    } else {
        for entry in &entries {
            println!("{}", entry.to_line());
        }
    }
    Ok(())
}
