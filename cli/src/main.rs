mod list;
mod tui;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use clap::Parser;
use mapty_core::{
    expand_key, parse_args, parse_number, validate, DeletePolicy, FileStorage, LatLng,
    TrackerConfig, Workout, WorkoutStore, WorkoutType,
};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "mapty.log";

#[derive(Parser)]
#[command(name = "mapty")]
#[command(about = "Log runs and rides on a map", long_about = None)]
struct Cli {
    /// Where workouts and the log file are kept (default: ~/.mapty)
    #[arg(long, global = true, env = "MAPTY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Your position as "lat,lng"; without it the map cannot be opened
    #[arg(long, global = true, env = "MAPTY_POSITION", allow_hyphen_values = true)]
    position: Option<LatLng>,

    /// What deleting a workout does to saved data: repersist or clear-all
    #[arg(long, global = true, env = "MAPTY_DELETE_POLICY", default_value_t = DeletePolicy::Repersist)]
    delete_policy: DeletePolicy,

    /// Zoom level used when the map opens and when jumping to a workout
    #[arg(long, global = true, default_value_t = mapty_core::config::DEFAULT_ZOOM_LEVEL)]
    zoom: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log a workout (usage: add running distance:5 duration:25 cadence:180 at:39,-12)
    Add {
        /// Workout type followed by key:value fields
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List saved workouts
    List,
    /// Discard all saved workouts
    Reset,
    /// Open the Terminal User Interface
    Tui,
}

impl Cli {
    fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            zoom_level: self.zoom,
            delete_policy: self.delete_policy,
            ..TrackerConfig::default()
        }
    }
}

fn init_logging(data_dir: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE_NAME))?;
    let filter =
        EnvFilter::try_from_env("MAPTY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = FileStorage::new(cli.data_dir.clone())?;
    init_logging(storage.base_dir())?;

    let config = cli.tracker_config();

    match cli.command {
        Some(Commands::Add { args }) => {
            if args.is_empty() {
                println!("Error: Workout type is required.");
                return Ok(());
            }
            let mut store = WorkoutStore::with_key(storage, config.storage_key.clone());
            store.load_from_persistent();

            match build_workout(&args) {
                Ok(workout) => {
                    println!("Workout added: {} (ID: {})", workout.label(), workout.id());
                    println!("  At: {}", workout.coords());
                    store.add(workout);
                    store.persist()?;
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        Some(Commands::List) => {
            let mut store = WorkoutStore::with_key(storage, config.storage_key.clone());
            store.load_from_persistent();
            list::show_workouts(store.workouts());
        }
        Some(Commands::Reset) => {
            let mut store = WorkoutStore::with_key(storage, config.storage_key.clone());
            let _restart = store.reset()?;
            println!("All workouts discarded.");
        }
        Some(Commands::Tui) | None => {
            tui::run(storage, config, cli.position)?;
        }
    }
    Ok(())
}

/// Same rules as the form: validated, then placed at `at:`.
fn build_workout(args: &[String]) -> Result<Workout> {
    let known_keys = vec!["distance", "duration", "cadence", "elevation", "at"];

    let parsed = parse_args(args);
    let workout_type: WorkoutType = parsed.positional.parse()?;

    let mut fields = HashMap::new();
    for (key, value) in parsed.metadata {
        let full_key = expand_key(&key, &known_keys)?;
        fields.insert(full_key, value);
    }

    let at: LatLng = fields
        .get("at")
        .ok_or_else(|| anyhow!("Position is required (at:lat,lng)"))?
        .parse()?;

    let number = |key: &str| parse_number(fields.get(key).map(String::as_str).unwrap_or(""));
    let type_specific = match workout_type {
        WorkoutType::Running => number("cadence"),
        WorkoutType::Cycling => number("elevation"),
    };
    let submission = validate(workout_type, number("distance"), number("duration"), type_specific)?;

    Ok(Workout::new(at, submission.distance, submission.duration, submission.measure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapty_core::WorkoutKind;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_running_with_prefixes() {
        let w = build_workout(&args(&["run", "dis:5", "du:25", "c:180", "at:39,-12"])).unwrap();
        assert_eq!(w.kind(), &WorkoutKind::Running { cadence: 180.0, pace: 5.0 });
        assert_eq!(w.coords(), LatLng::new(39.0, -12.0));
    }

    #[test]
    fn test_build_cycling_defaults_elevation_to_zero() {
        let w = build_workout(&args(&["cycling", "distance:10", "duration:30", "at:0,0"])).unwrap();
        assert_eq!(w.kind(), &WorkoutKind::Cycling { elevation_gain: 0.0, speed: 20.0 });
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let err = build_workout(&args(&["running", "distance:-1", "duration:25", "cadence:180", "at:1,1"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Inputs have to be positive number");

        assert!(build_workout(&args(&["running", "distance:5", "duration:25", "cadence:180"])).is_err());
        assert!(build_workout(&args(&["swim", "distance:5", "duration:25", "at:1,1"])).is_err());
        assert!(build_workout(&args(&["running", "d:5", "at:1,1"])).is_err());
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "mapty", "--position", "39,-12", "--delete-policy", "clear-all", "--zoom", "10", "list",
        ])
        .unwrap();
        assert_eq!(cli.position, Some(LatLng::new(39.0, -12.0)));
        let config = cli.tracker_config();
        assert_eq!(config.delete_policy, DeletePolicy::ClearAll);
        assert_eq!(config.zoom_level, 10);
        assert!(matches!(cli.command, Some(Commands::List)));
    }
}
