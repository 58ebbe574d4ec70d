//! # relia-io: workbook input, settings and result tables
//!
//! - [`settings`]: TOML/JSON run settings (constants, sheet names, output
//!   path, column mappings)
//! - [`loader`]: CSV workbook → validated [`relia_core::Topology`]
//! - [`laying`]: conductor-model text → cable/overhead mix
//! - [`writer`]: detail and summary tables plus `summary.json`
//!
//! ```no_run
//! use relia_io::{load, settings::Settings, writer::write_report};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = Path::new("test_data/feeder_demo");
//! let settings = Settings::default();
//! let loaded = load(input, &settings)?;
//! let report = relia_algo::analyze(&loaded.topology, &settings.constants()?)?;
//! write_report(&report, &settings.output_dir(input))?;
//! # Ok(())
//! # }
//! ```

pub mod field_map;
pub mod laying;
pub mod loader;
pub mod settings;
pub mod writer;

pub use loader::{load_workbook, LoadResult};
pub use settings::Settings;

use relia_core::ReliaResult;
use std::path::Path;

/// Load a workbook using the sheet names and mappings from `settings`.
pub fn load(workbook: &Path, settings: &Settings) -> ReliaResult<LoadResult> {
    load_workbook(workbook, &settings.input, &settings.field_mappings)
}
