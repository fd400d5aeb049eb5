//! Restaurant Roulette
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the last session from disk (or starts fresh), then either
//! serves the HTTP API until Ctrl+C or plays a single round on the
//! terminal.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use roulette::config::{self, AppConfig};
use roulette::dashboard::{self, RouletteState};
use roulette::random::SeededRandom;
use roulette::session::RouletteSession;
use roulette::storage;
use roulette::types::Location;
use roulette::venues::VenueFinder;

const BANNER: &str = r#"
 ___        _   _     _   _
| _ \___ _  _| |___| |_| |_ ___
|   / _ \ || | / -_)  _|  _/ -_)
|_|_\___/\_,_|_\___|\__|\__\___|

  Restaurant Roulette
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("ROULETTE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = AppConfig::load_or_default(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        config = %config_path,
        default_city = %cfg.session.default_city,
        pace = cfg.wheel.animation_pace,
        api = cfg.dashboard.enabled,
        "Roulette starting up"
    );

    // -- Build the session -----------------------------------------------

    let finder = Arc::new(VenueFinder::from_config(
        &cfg.providers,
        Box::new(SeededRandom::from_config(cfg.wheel.seed)),
    )?);
    let mut session = RouletteSession::new(
        &cfg,
        finder,
        Box::new(SeededRandom::from_config(cfg.wheel.seed)),
    );

    let state_file = cfg.session.state_file.as_deref();
    if let Some(path) = state_file {
        match storage::load_snapshot(Some(path)) {
            Ok(Some(snapshot)) => session.restore(snapshot)?,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable session snapshot"),
        }
    }

    if let Some(location) = location_from_env() {
        session.set_location(Some(location))?;
    }

    if cfg.dashboard.enabled {
        run_api(&cfg, session).await
    } else {
        play_once(session, state_file).await
    }
}

/// Serve the API until Ctrl+C, then write a final snapshot.
async fn run_api(cfg: &config::AppConfig, session: RouletteSession) -> Result<()> {
    let state = Arc::new(RouletteState::new(session, cfg.session.state_file.clone()));

    let server = dashboard::serve(state.clone(), &cfg.dashboard.host, cfg.dashboard.port);
    let shutdown = tokio::signal::ctrl_c();

    tokio::select! {
        result = server => {
            if let Err(e) = &result {
                error!(error = %e, "API server stopped");
            }
            result?;
        }
        _ = shutdown => {
            info!("Shutdown signal received.");
        }
    }

    if let Some(path) = &cfg.session.state_file {
        let session = state.session.lock().await;
        storage::save_snapshot(&session.snapshot(), Some(path))?;
    }
    info!("Roulette shut down cleanly.");
    Ok(())
}

/// Spin cuisine, fetch, spin restaurant, spin dish, print the picks.
async fn play_once(mut session: RouletteSession, state_file: Option<&str>) -> Result<()> {
    let location = session.search_location();
    info!(%location, "Playing a round. Press Ctrl+C to stop.");

    let round = tokio::select! {
        round = session.play_round() => round?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
            return Ok(());
        }
    };

    println!("Cuisine:    {}", round.cuisine.winner.label);
    match &round.restaurant {
        Some(pick) => println!("Restaurant: {}", pick.winner.item),
        None => println!("Restaurant: nothing found near {location}"),
    }
    if let Some(dish) = session.spin_dish().await? {
        println!("Order:      {} {}", dish.winner.item.emoji, dish.winner.item.name);
    }

    if let Some(path) = state_file {
        if let Err(e) = storage::save_snapshot(&session.snapshot(), Some(path)) {
            error!(error = %e, "Failed to save session snapshot");
        }
    }
    Ok(())
}

/// `ROULETTE_LAT`/`ROULETTE_LNG` or `ROULETTE_CITY`, if set.
fn location_from_env() -> Option<Location> {
    let lat = std::env::var("ROULETTE_LAT").ok().and_then(|v| v.parse().ok());
    let lng = std::env::var("ROULETTE_LNG").ok().and_then(|v| v.parse().ok());
    if let (Some(lat), Some(lng)) = (lat, lng) {
        return Some(Location::coordinates(lat, lng));
    }
    std::env::var("ROULETTE_CITY")
        .ok()
        .filter(|c| !c.trim().is_empty())
        .map(Location::city)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roulette=info"));

    let json_logging = std::env::var("ROULETTE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
