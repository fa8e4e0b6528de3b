/// Station demo — a puzzle is solved and the station reacts.
///
/// Builds English and Arabic packs in memory, resolves the intro text in both,
/// then applies the world actions a passing run returns.
///
/// Run with: cargo run --example station_demo

use world_text::core::dispatcher::ActionDispatcher;
use world_text::core::effects::{HandlerError, NodeAnimation, WorldEffects};
use world_text::core::resolver::{MemoryPackLoader, TextResolver, TextVars};
use world_text::schema::action::ActionRecord;
use world_text::schema::language_pack::LanguagePack;

/// Prints effects to stdout in place of a real scene.
struct ConsoleScene {
    text: TextResolver,
}

impl WorldEffects for ConsoleScene {
    fn open_door(&mut self, id: &str) -> Result<(), HandlerError> {
        let line = self
            .text
            .resolve_with("world.door.opened", &TextVars::new().with("id", id));
        println!("  [door] {}", line);
        Ok(())
    }

    fn animate_nodes(&mut self, animation: &NodeAnimation) -> Result<(), HandlerError> {
        println!(
            "  [nodes] lit: {:?}, skipped: {:?}",
            animation.enabled, animation.skipped
        );
        Ok(())
    }

    fn drone_fall(&mut self, id: &str) -> Result<(), HandlerError> {
        let line = self
            .text
            .resolve_with("world.drone.down", &TextVars::new().with("id", id));
        println!("  [drone] {}", line);
        Ok(())
    }
}

fn main() {
    // --- Language packs ---
    let en = LanguagePack::builder("en")
        .entry("puzzle.intro", "Clean the signal, {player}.")
        .entry("world.door.opened", "Door {id} slides open.")
        .entry("world.drone.down", "Drone {id} drops out of the sky.")
        .build()
        .expect("Failed to build English pack");
    let ar = LanguagePack::builder("ar")
        .rtl(true)
        .entry("puzzle.intro", "نظّف الإشارة يا {player}.")
        .build()
        .expect("Failed to build Arabic pack");
    let loader = MemoryPackLoader::new().with_pack(en).with_pack(ar);

    // --- Text in both languages ---
    for language in ["en", "ar"] {
        let text = TextResolver::new(language, &loader).expect("Failed to load packs");
        let intro = text.resolve_with("puzzle.intro", &TextVars::new().with("player", "Ada"));
        println!("{} (rtl: {}): {}", language, text.is_rtl(), intro);
    }

    // --- World actions from a passing run ---
    let batch = ActionRecord::batch_from_json(
        r#"[
            {"type": "open_door", "params": {"id": "D-02"}},
            {"type": "animate_nodes", "params": {"enabled": "N-1,N-2", "skipped": "N-3"}},
            {"type": "confetti"},
            {"type": "drone_fall"}
        ]"#,
    )
    .expect("Failed to parse action batch");

    let text = TextResolver::new("ar", &loader).expect("Failed to load packs");
    println!("\nApplying {} world actions:", batch.len());
    let mut dispatcher = ActionDispatcher::with_builtin_handlers(ConsoleScene { text });
    let report = dispatcher.apply(&batch);

    println!("\nHandled {} of {}", report.handled, batch.len());
    for diagnostic in &report.diagnostics {
        println!("  warning: {}", diagnostic);
    }
}
