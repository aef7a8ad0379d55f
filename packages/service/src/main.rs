use std::io;

use pedagogy_service::config::Config;
use pedagogy_service::logging::init_tracing;
use pedagogy_service::serve;
use pedagogy_service::state::AppState;

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize");
            std::process::exit(1);
        }
    };

    tracing::info!("pedagogy-service reading requests from stdin");
    let stdin = io::stdin();
    match serve(&state, stdin.lock(), io::stdout().lock()) {
        Ok(handled) => tracing::info!(handled, "input closed, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "serve loop failed");
            std::process::exit(1);
        }
    }
}
