//! Run settings: constants, sheet names, output location and field mappings.
//!
//! Settings files are TOML (`.toml`) or JSON (`.json`). Every section is
//! optional. An omitted `[constants]` table means the built-in field values;
//! a present one is validated strictly, with no per-key fallback.

use crate::field_map::FieldMappings;
use relia_core::{RawConstants, ReliaError, ReliaResult, ReliabilityConstants, ScheduledOutages};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Suffix of the default output directory, appended to the input stem
pub const OUTPUT_DIR_SUFFIX: &str = "_可靠性计算结果";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constants: Option<RawConstants>,
    pub input: InputSettings,
    pub output: OutputSettings,
    pub field_mappings: FieldMappings,
}

/// Sheet names inside the input workbook, and columns a workbook may omit
///
/// The sequence and upstream-switch columns are required unless one of the
/// `assume_*` flags declares them absent. A flagged column is never read and
/// each sheet loaded under the assumption records an `input` warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputSettings {
    #[serde(default = "default_main_sheet")]
    pub main_sheet: String,
    #[serde(default = "default_branch_sheet")]
    pub branch_sheet: String,
    /// Take `sequence` from 1-based row order (per branch on the branch sheet)
    pub assume_row_order: bool,
    /// Treat every row as starting at a switch
    pub assume_switch_per_row: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            main_sheet: default_main_sheet(),
            branch_sheet: default_branch_sheet(),
            assume_row_order: false,
            assume_switch_per_row: false,
        }
    }
}

fn default_main_sheet() -> String {
    "主线".to_string()
}

fn default_branch_sheet() -> String {
    "分支".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Output directory; derived from the input name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings, choosing the parser from the file extension.
    pub fn load(path: &Path) -> ReliaResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("reading settings {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => serde_json::from_str(&text)
                .map_err(|e| ReliaError::Parse(format!("{}: {e}", path.display()))),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => toml::from_str(&text)
                .map_err(|e| ReliaError::Parse(format!("{}: {e}", path.display()))),
            _ => Err(ReliaError::configuration(
                "settings",
                format!(
                    "unsupported settings format {} (expected .toml or .json)",
                    path.display()
                ),
            )),
        }
    }

    /// Validated constants, or the built-in defaults when none were given.
    pub fn constants(&self) -> ReliaResult<ReliabilityConstants> {
        match &self.constants {
            None => Ok(ReliabilityConstants::default()),
            Some(raw) => ReliabilityConstants::from_raw(raw),
        }
    }

    /// Output directory for a given input workbook.
    pub fn output_dir(&self, input: &Path) -> PathBuf {
        if let Some(path) = &self.output.path {
            return path.clone();
        }
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "feeder".to_string());
        let name = format!("{stem}{OUTPUT_DIR_SUFFIX}");
        match input.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Commented TOML settings file with every default spelled out.
pub fn template() -> String {
    let c = ReliabilityConstants::default();
    let s = ScheduledOutages::default();
    let main = crate::field_map::MainFieldMap::default();
    let branch = crate::field_map::BranchFieldMap::default();
    format!(
        r#"# relia run settings

[constants]
# Fault repair time (min) when no remote switch clears the fault
repair_minutes = {repair}
# Outage duration (min) when the clearing switch is remote-operable
remote_switching_minutes = {remote}
reporting_period_minutes = {period}

# Faults per km per year
[constants.failure_rate]
cable = {cable}
overhead = {overhead}

# Uncomment to include pre-arranged (maintenance) outages
# [constants.scheduled]
# duration_minutes = {sched_duration}
# [constants.scheduled.rate]
# cable = {sched_cable}
# overhead = {sched_overhead}

[input]
main_sheet = "主线"
branch_sheet = "分支"
# Only for workbooks without a sequence column: use row order instead
# assume_row_order = true
# Only for workbooks without a switch column: every row starts at a switch
# assume_switch_per_row = true

[output]
# path = "results"

[field_mappings.main]
id = "{m_id}"
sequence = "{m_seq}"
length_km = "{m_len}"
customers = "{m_cust}"
line_model = "{m_model}"
upstream_switch = "{m_sw}"
remote_operable = "{m_remote}"

[field_mappings.branch]
id = "{b_id}"
sequence = "{b_seq}"
branch_id = "{b_branch}"
attach_to = "{b_attach}"
length_km = "{b_len}"
customers = "{b_cust}"
line_model = "{b_model}"
upstream_switch = "{b_sw}"
remote_operable = "{b_remote}"
"#,
        repair = c.repair_time.value(),
        remote = c.remote_switching_time.value(),
        period = c.reporting_period.value(),
        cable = c.failure_rates.cable,
        overhead = c.failure_rates.overhead,
        sched_duration = s.duration.value(),
        sched_cable = s.rates.cable,
        sched_overhead = s.rates.overhead,
        m_id = main.id,
        m_seq = main.sequence,
        m_len = main.length_km,
        m_cust = main.customers,
        m_model = main.line_model,
        m_sw = main.upstream_switch,
        m_remote = main.remote_operable,
        b_id = branch.id,
        b_seq = branch.sequence,
        b_branch = branch.branch_id,
        b_attach = branch.attach_to,
        b_len = branch.length_km,
        b_cust = branch.customers,
        b_model = branch.line_model,
        b_sw = branch.upstream_switch,
        b_remote = branch.remote_operable,
    )
}
