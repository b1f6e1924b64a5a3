//! Basket Run entry point
//!
//! Loads settings, starts the session driver and runs the terminal front
//! end: stdin lines become commands, updates are printed as they arrive.

use std::env;
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use basket_run::game::Game;
use basket_run::highscores::unix_millis;
use basket_run::persistence::JsonFileStore;
use basket_run::platform::{render_snapshot, render_update, spawn_driver};
use basket_run::settings::Settings;
use basket_run::sim::LayoutPool;

/// Environment variable naming the settings file
const SETTINGS_ENV: &str = "BASKET_RUN_SETTINGS";
const SETTINGS_FILE: &str = "basket-run.json";

fn layout_pool(settings: &Settings) -> LayoutPool {
    match &settings.maps_dir {
        Some(dir) => LayoutPool::from_dir(dir).unwrap_or_else(|e| {
            log::warn!("Falling back to built-in layouts: {e}");
            LayoutPool::builtin()
        }),
        None => LayoutPool::builtin(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Basket Run starting...");

    run().inspect_err(|e| log::error!("Basket Run failed: {e}"))
}

fn run() -> Result<(), Box<dyn Error>> {
    let settings_path = env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&settings_path);
    log::info!(
        "Difficulty {}, patrol period {} ms",
        settings.difficulty.as_str(),
        settings.timing().patrol_period_ms
    );

    let pool = layout_pool(&settings);
    let store = JsonFileStore::new(
        &settings.leaderboard_path,
        settings.effective_leaderboard_capacity(),
    );
    let seed = settings.seed.unwrap_or_else(unix_millis);

    let epoch = Instant::now();
    let game = Game::new(settings, pool, store, seed, 0)?;
    println!("w/a/s/d + Enter to move, n new game, l high scores, q quit");
    println!("{}", render_snapshot(&game.state().snapshot()));

    let driver = spawn_driver(game, epoch)?;

    let printer = {
        let updates = driver.updates().clone();
        thread::Builder::new()
            .name("printer".to_string())
            .spawn(move || {
                for update in updates.iter() {
                    if let Some(text) = render_update(&update, unix_millis()) {
                        println!("{text}");
                    }
                }
            })?
    };

    // Each line is applied before the next is read, so the driver decides
    // from the live session whether it is a name or a string of keys
    for line in io::stdin().lock().lines() {
        if !driver.send_line(&line?) {
            break;
        }
    }

    driver.shutdown();
    if printer.join().is_err() {
        log::error!("Printer thread panicked");
    }
    log::info!("Goodbye");
    Ok(())
}
