//! # relia-algo: supply-reliability indices for a radial feeder
//!
//! The pipeline runs in three stages over a validated [`Topology`]:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Fault isolation | [`isolation`] | interrupted set + outage duration per segment |
//! | Segment assessment | [`assessment`] | frequency, customer interruptions, customer minutes |
//! | Aggregation | [`indices`] | detail tables, SAIDI / SAIFI / ASAI summary rows |
//!
//! Isolation and assessment are independent per segment and run on the rayon
//! pool when the `parallel` feature is on. Results are collected in canonical
//! order and summed sequentially, so both builds produce identical numbers.
//!
//! ## Example
//!
//! ```rust
//! use relia_algo::analyze;
//! use relia_core::{ReliabilityConstants, Segment, Topology};
//!
//! let topology = Topology::build(vec![
//!     Segment::trunk("T1", 1).with_length(1.0).with_customers(10),
//!     Segment::trunk("T2", 2).with_length(2.0).with_customers(20),
//! ])
//! .unwrap();
//!
//! let report = analyze(&topology, &ReliabilityConstants::default()).unwrap();
//! assert!(report.saidi() > 0.0);
//! assert!(report.asai() < 1.0);
//! ```

pub mod assessment;
pub mod indices;
pub mod isolation;

pub use assessment::{assess, event_frequency, Contribution, SegmentAssessment};
pub use indices::{aggregate, DetailRow, IndexSummary, ReliabilityReport, SummaryScope};
pub use isolation::{resolve, IsolationZone};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use relia_core::{ReliaResult, ReliabilityConstants, Topology};
use tracing::{debug, info};

fn assess_one(
    topology: &Topology,
    idx: usize,
    constants: &ReliabilityConstants,
) -> SegmentAssessment {
    let zone = resolve(topology, idx, constants);
    assess(topology.segment(idx), &zone, constants)
}

/// Assess every segment, returned in canonical segment order.
pub fn assess_all(topology: &Topology, constants: &ReliabilityConstants) -> Vec<SegmentAssessment> {
    #[cfg(feature = "parallel")]
    {
        (0..topology.len())
            .into_par_iter()
            .map(|idx| assess_one(topology, idx, constants))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..topology.len())
            .map(|idx| assess_one(topology, idx, constants))
            .collect()
    }
}

/// Run isolation, assessment and aggregation over a validated topology.
pub fn analyze(
    topology: &Topology,
    constants: &ReliabilityConstants,
) -> ReliaResult<ReliabilityReport> {
    debug!(
        segments = topology.len(),
        branches = topology.branches().len(),
        customers = topology.total_customer_count(),
        "assessing feeder"
    );
    let assessments = assess_all(topology, constants);
    let report = aggregate(topology, &assessments, constants)?;
    info!(
        saidi = report.saidi(),
        saifi = report.saifi(),
        asai = report.asai(),
        "reliability indices computed"
    );
    Ok(report)
}
