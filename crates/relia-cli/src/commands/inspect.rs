//! Feeder structure statistics without running the calculation.

use super::{load_settings, print_warnings};
use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;

pub fn handle(input: &Path, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config)?;
    let loaded = relia_io::load(input, &settings)?;
    let topology = &loaded.topology;
    let stats = topology.stats();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "Feeder: {}", input.display())?;
    writeln!(writer, "  Trunk segments:\t{}", stats.trunk_segments)?;
    writeln!(writer, "  Trunk length:\t{}", stats.trunk_length)?;
    writeln!(writer, "  Trunk customers:\t{}", stats.trunk_customers)?;
    writeln!(writer, "  Branches:\t{}", stats.branch_count)?;
    writeln!(writer, "  Branch segments:\t{}", stats.branch_segments)?;
    writeln!(writer, "  Branch length:\t{}", stats.branch_length)?;
    writeln!(writer, "  Branch customers:\t{}", stats.branch_customers)?;
    writeln!(writer, "  Total customers:\t{}", stats.total_customers)?;
    writeln!(
        writer,
        "  Switches:\t{} ({} remote)",
        stats.switches, stats.remote_switches
    )?;
    writer.flush()?;

    if !topology.branches().is_empty() {
        let mut writer = TabWriter::new(io::stdout());
        writeln!(writer, "\nBRANCH\tATTACHED TO\tSEGMENTS\tCUSTOMERS")?;
        for line in topology.branches() {
            let attach = topology.segment(topology.trunk()[line.attach_to]);
            let customers: u64 = line
                .segments
                .iter()
                .map(|&i| topology.segment(i).customer_count as u64)
                .sum();
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                line.id,
                attach.id,
                line.segments.len(),
                customers
            )?;
        }
        writer.flush()?;
    }

    print_warnings(&loaded.diagnostics);
    Ok(())
}
