pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod services;
pub mod state;

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::ServiceError;
use crate::state::AppState;

pub fn create_state() -> Result<AppState, ServiceError> {
    AppState::new(Config::from_env())
}

/// Serve JSON-lines requests until `input` is exhausted. Blank lines are
/// skipped; each other line yields exactly one response line.
pub fn serve<R: BufRead, W: Write>(state: &AppState, input: R, mut output: W) -> Result<u64, ServiceError> {
    let mut handled = 0u64;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = protocol::handle_line(state, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }
    Ok(handled)
}
