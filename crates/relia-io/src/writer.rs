//! Result tables.
//!
//! Three CSV tables are written in a fixed order (main-line detail, branch
//! detail, summary), followed by `summary.json` carrying the full report.

use anyhow::{Context, Result};
use relia_algo::{DetailRow, IndexSummary, ReliabilityReport};
use std::path::{Path, PathBuf};
use tracing::info;

pub const MAIN_DETAIL_FILE: &str = "主线分段明细.csv";
pub const BRANCH_DETAIL_FILE: &str = "分支分段明细.csv";
pub const SUMMARY_FILE: &str = "指标汇总.csv";
pub const SUMMARY_JSON_FILE: &str = "summary.json";

const DETAIL_COLUMNS: [&str; 19] = [
    "序号",
    "长度(km)",
    "用户数量(台)",
    "电缆占比",
    "架空占比",
    "敷设方式",
    "起点有无开关",
    "起点是否自动化",
    "故障率(次/km·年)",
    "故障频率(次/年)",
    "停电用户数",
    "停电持续时间(min)",
    "停电时户数(户·min/年)",
    "停电户次(户次/年)",
    "预安排频率(次/年)",
    "预安排停电时户数(户·min/年)",
    "预安排停电户次(户次/年)",
    "SAIDI贡献(min/户·年)",
    "SAIFI贡献(次/户·年)",
];

const SUMMARY_COLUMNS: [&str; 15] = [
    "范围",
    "分段数",
    "总长度(km)",
    "直供用户数",
    "总用户数",
    "故障频率(次/年)",
    "预安排频率(次/年)",
    "SAIDI_f(min/户·年)",
    "SAIDI_s(min/户·年)",
    "SAIDI(min/户·年)",
    "SAIFI_f(次/户·年)",
    "SAIFI_s(次/户·年)",
    "SAIFI(次/户·年)",
    "ASAI",
    "统计期(min)",
];

/// Paths of everything [`write_report`] produced, in write order
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub main_line: PathBuf,
    pub branches: PathBuf,
    pub summary: PathBuf,
    pub json: PathBuf,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "是"
    } else {
        "否"
    }
}

fn detail_record(row: &DetailRow, with_branch: bool) -> Vec<String> {
    let mut record = vec![row.segment_id.to_string()];
    if with_branch {
        record.push(
            row.branch_id
                .as_ref()
                .map(|b| b.to_string())
                .unwrap_or_default(),
        );
    }
    record.extend([
        row.sequence_index.to_string(),
        row.length.value().to_string(),
        row.customers.to_string(),
        row.laying.cable_share().to_string(),
        row.laying.overhead_share().to_string(),
        row.laying.describe(),
        yes_no(row.has_upstream_switch).to_string(),
        yes_no(row.switch_operable_remotely).to_string(),
        row.failure_rate.to_string(),
        row.frequency.to_string(),
        row.zone_customers.to_string(),
        row.duration.value().to_string(),
        row.customer_interruption_minutes.to_string(),
        row.customer_interruptions.to_string(),
        row.scheduled_frequency.to_string(),
        row.scheduled_customer_interruption_minutes.to_string(),
        row.scheduled_customer_interruptions.to_string(),
        row.saidi_contribution.to_string(),
        row.saifi_contribution.to_string(),
    ]);
    record
}

/// Write one detail table. Branch tables carry the extra branch-id column.
pub fn write_detail_table(path: &Path, rows: &[DetailRow], with_branch: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    let mut header = vec![if with_branch { "分支分段" } else { "线路分段" }];
    if with_branch {
        header.push("所属分支");
    }
    header.extend(DETAIL_COLUMNS);
    wtr.write_record(&header).context("writing CSV header")?;

    for row in rows {
        wtr.write_record(detail_record(row, with_branch))
            .with_context(|| format!("writing detail row for {}", row.segment_id))?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

pub fn write_summary_table(path: &Path, summaries: &[IndexSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;
    wtr.write_record(SUMMARY_COLUMNS)
        .context("writing CSV header")?;

    for s in summaries {
        wtr.write_record([
            s.scope.label().to_string(),
            s.segments.to_string(),
            s.total_length.value().to_string(),
            s.served_customers.to_string(),
            s.total_customers.to_string(),
            s.fault_frequency.to_string(),
            s.scheduled_frequency.to_string(),
            s.saidi_fault.to_string(),
            s.saidi_scheduled.to_string(),
            s.saidi.to_string(),
            s.saifi_fault.to_string(),
            s.saifi_scheduled.to_string(),
            s.saifi.to_string(),
            s.asai.to_string(),
            s.reporting_period.value().to_string(),
        ])
        .with_context(|| format!("writing summary row {}", s.scope.label()))?;
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Write all result files into `dir`, creating it if needed.
pub fn write_report(report: &ReliabilityReport, dir: &Path) -> Result<WrittenFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let files = WrittenFiles {
        main_line: dir.join(MAIN_DETAIL_FILE),
        branches: dir.join(BRANCH_DETAIL_FILE),
        summary: dir.join(SUMMARY_FILE),
        json: dir.join(SUMMARY_JSON_FILE),
    };

    write_detail_table(&files.main_line, &report.main_line, false)?;
    write_detail_table(&files.branches, &report.branches, true)?;
    write_summary_table(&files.summary, &report.summaries)?;

    let json = serde_json::to_string_pretty(report).context("serializing report to JSON")?;
    std::fs::write(&files.json, json)
        .with_context(|| format!("writing JSON to {}", files.json.display()))?;

    info!(dir = %dir.display(), "results written");
    Ok(files)
}
