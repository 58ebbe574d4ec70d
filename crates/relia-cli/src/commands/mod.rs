pub mod calc;
pub mod config;
pub mod inspect;

use anyhow::Result;
use relia_core::Diagnostics;
use relia_io::Settings;
use std::path::Path;
use tracing::debug;

/// Settings from `--config`, or the built-in defaults.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            Ok(Settings::load(path)?)
        }
        None => Ok(Settings::default()),
    }
}

/// Warning count followed by one line per issue, on stderr.
pub fn print_warnings(diagnostics: &Diagnostics) {
    if diagnostics.has_warnings() {
        eprint!("{diagnostics}");
    }
}
