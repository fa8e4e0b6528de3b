/// Action Replay — applies a JSON world-action batch against a logging scene.
///
/// Usage: action_replay <actions.json> [--door <id>]... [--drone <id>]...
///
/// With no `--door`/`--drone` flags every id is accepted. Once any door or
/// drone is declared, actions targeting undeclared ids fail like a missing
/// scene entity would. Set `RUST_LOG=debug` to see handler traces.

use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use world_text::core::diagnostics::TracingSink;
use world_text::core::dispatcher::ActionDispatcher;
use world_text::core::effects::{HandlerError, NodeAnimation, WorldEffects};
use world_text::schema::action::ActionRecord;

/// Scene stand-in that logs every effect instead of playing it.
#[derive(Default)]
struct LoggingScene {
    doors: Vec<String>,
    drones: Vec<String>,
}

fn check_known(kind: &'static str, known: &[String], id: &str) -> Result<(), HandlerError> {
    if known.is_empty() || known.iter().any(|k| k == id) {
        Ok(())
    } else {
        Err(HandlerError::EntityNotFound {
            kind,
            id: id.to_string(),
        })
    }
}

impl WorldEffects for LoggingScene {
    fn open_door(&mut self, id: &str) -> Result<(), HandlerError> {
        check_known("door", &self.doors, id)?;
        tracing::info!(door_id = id, "Door opened");
        Ok(())
    }

    fn animate_nodes(&mut self, animation: &NodeAnimation) -> Result<(), HandlerError> {
        tracing::info!(
            enabled = ?animation.enabled,
            skipped = ?animation.skipped,
            "Nodes animated"
        );
        Ok(())
    }

    fn drone_fall(&mut self, id: &str) -> Result<(), HandlerError> {
        check_known("drone", &self.drones, id)?;
        tracing::info!(drone_id = id, "Drone fell");
        Ok(())
    }
}

fn print_usage() {
    println!("Usage: action_replay <actions.json> [--door <id>]... [--drone <id>]...");
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        process::exit(0);
    }

    let actions_path = &args[1];
    let mut scene = LoggingScene::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--door" if i + 1 < args.len() => {
                i += 1;
                scene.doors.push(args[i].clone());
            }
            "--drone" if i + 1 < args.len() => {
                i += 1;
                scene.drones.push(args[i].clone());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let contents = match std::fs::read_to_string(actions_path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("ERROR: Failed to read '{}': {}", actions_path, e);
            process::exit(1);
        }
    };

    let batch = match ActionRecord::batch_from_json(&contents) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("ERROR: Failed to parse action batch: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(actions = batch.len(), path = %actions_path, "Replaying batch");

    let mut dispatcher = ActionDispatcher::with_builtin_handlers(scene).with_sink(TracingSink);
    let report = dispatcher.apply(&batch);

    println!(
        "\nSummary: {} of {} actions handled, {} diagnostics",
        report.handled,
        batch.len(),
        report.diagnostics.len()
    );
    for diagnostic in &report.diagnostics {
        println!("WARNING: {}", diagnostic);
    }

    if !report.is_clean() {
        process::exit(2);
    }
}
