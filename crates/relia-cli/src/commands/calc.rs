use super::{load_settings, print_warnings};
use anyhow::{Context, Result};
use relia_algo::{analyze, ReliabilityReport};
use relia_io::writer::write_report;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;
use tracing::info;

pub fn handle(input: &Path, output: Option<&Path>, config: Option<&Path>, json: bool) -> Result<()> {
    let settings = load_settings(config)?;
    let constants = settings.constants()?;

    info!(input = %input.display(), "loading workbook");
    let loaded = relia_io::load(input, &settings)?;
    let report = analyze(&loaded.topology, &constants)?;

    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => settings.output_dir(input),
    };
    write_report(&report, &dir)?;

    if json {
        let text = serde_json::to_string_pretty(&report.summaries)
            .context("serializing summary to JSON")?;
        println!("{text}");
    } else {
        print_summary(&report)?;
        println!("\nResults written to {}", dir.display());
    }

    let mut diagnostics = loaded.diagnostics;
    diagnostics.merge(report.diagnostics);
    print_warnings(&diagnostics);
    Ok(())
}

fn print_summary(report: &ReliabilityReport) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(
        writer,
        "SCOPE\tSEGMENTS\tLENGTH (km)\tCUSTOMERS\tSAIDI (min)\tSAIFI\tASAI"
    )?;
    for s in &report.summaries {
        writeln!(
            writer,
            "{}\t{}\t{:.3}\t{}\t{:.4}\t{:.6}\t{:.8}",
            s.scope.label(),
            s.segments,
            s.total_length.value(),
            s.served_customers,
            s.saidi,
            s.saifi,
            s.asai,
        )?;
    }
    writer.flush()?;
    Ok(())
}
