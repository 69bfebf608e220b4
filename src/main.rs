//! Rocket Notes entry point
//!
//! Native builds run a headless scripted flight through the built-in level
//! (rendering and keyboard capture live in the browser adapter), then try to
//! open the notes overlay at the end.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rocket_notes::platform::init_logging;
    use rocket_notes::Settings;

    init_logging();
    log::info!("Rocket Notes (native, headless) starting...");

    let settings = Settings::load();
    if let Err(e) = headless::run(&settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM builds are driven by the browser adapter; this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rocket_notes::persistence::JsonFileNoteStore;
    use rocket_notes::sim::{GameEvent, Level, LevelError, MoveIntent, Runner, TickInput};
    use rocket_notes::{NotesError, NotesOverlay, OverlayView, Settings};

    #[derive(Debug, thiserror::Error)]
    pub enum RunError {
        #[error("failed to read level {path}: {source}")]
        ReadLevel {
            path: std::path::PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error(transparent)]
        Level(#[from] LevelError),
        #[error(transparent)]
        Notes(#[from] NotesError),
    }

    /// Route from spawn to the trigger cell in the built-in layout:
    /// east along row 1, then south down column 9.
    const ROUTE: [(fn() -> MoveIntent, u32); 2] = [(MoveIntent::right, 150), (MoveIntent::down, 120)];

    pub fn run(settings: &Settings) -> Result<(), RunError> {
        let options = settings.level_options();
        let level = match &settings.level_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| RunError::ReadLevel {
                    path: path.clone(),
                    source,
                })?;
                Level::parse_str(&text, &options)?
            }
            None => Level::default_layout(&options)?,
        };

        let mut runner = Runner::new(&level, settings);
        let gate = runner.gate();
        let frame_dt = runner.tick_dt();

        let mut picked = 0;
        let mut resets = 0;
        for (intent, frames) in ROUTE {
            let input = TickInput { intent: intent() };
            for _ in 0..frames {
                for event in runner.frame(frame_dt, &input) {
                    match event {
                        GameEvent::CollectiblePicked { .. } => picked += 1,
                        GameEvent::PlayerReset => resets += 1,
                        GameEvent::GateChanged { open } => {
                            log::info!("Notes {}", if open { "available" } else { "locked" });
                        }
                        GameEvent::EnemyBounced { .. } => {}
                    }
                }
            }
        }

        let state = runner.state();
        log::info!(
            "Flight over after {} ticks: at {:?}, {} collected ({} left), {} resets",
            state.time_ticks,
            state.player.pos,
            picked,
            state.registry.remaining_collectibles(),
            resets
        );

        let store = JsonFileNoteStore::open(&settings.notes_path).map_err(NotesError::from)?;
        log::debug!("Note store at {}", store.path().display());
        let mut overlay = NotesOverlay::new();
        match overlay.open(&gate, &store) {
            Ok(OverlayView::PasswordSetup) => log::info!("Notes open: choose a password"),
            Ok(OverlayView::PasswordEntry) => log::info!("Notes open: enter your password"),
            Ok(view) => log::info!("Notes open: {:?}", view),
            Err(NotesError::GateClosed) => log::info!("Notes stay locked: not at the trigger"),
            Err(e) => return Err(e.into()),
        }
        overlay.close();

        Ok(())
    }
}
