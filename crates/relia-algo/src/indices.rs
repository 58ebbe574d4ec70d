//! Feeder-wide SAIDI / SAIFI / ASAI and the output tables.
//!
//! All per-segment contributions are divided by the same denominator, the
//! feeder's total customer count (trunk + branches). The main-line and branch
//! summary rows attribute contributions by *fault location*, so
//! `main + branch = feeder` holds for SAIDI and SAIFI.
//!
//! ASAI is clamped into `[0, 1]`. A value outside that range means the
//! outage minutes exceed the reporting period, so the constants or input
//! are inconsistent. Clamping is reported as a warning.

use crate::assessment::SegmentAssessment;
use relia_core::{
    BranchId, Diagnostics, Kilometers, LayingMix, Minutes, Position, ReliaError, ReliaResult,
    ReliabilityConstants, SegmentId, Topology,
};
use serde::Serialize;
use tracing::warn;

/// Which part of the feeder a summary row covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryScope {
    /// Faults on trunk segments
    MainLine,
    /// Faults on branch segments
    Branch,
    Feeder,
}

impl SummaryScope {
    /// Row label in the summary table.
    pub fn label(self) -> &'static str {
        match self {
            SummaryScope::MainLine => "主线",
            SummaryScope::Branch => "分支",
            SummaryScope::Feeder => "全线路",
        }
    }
}

/// One row of a segment detail table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub segment_id: SegmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    pub sequence_index: u32,
    pub length: Kilometers,
    pub customers: u64,
    pub laying: LayingMix,
    pub has_upstream_switch: bool,
    pub switch_operable_remotely: bool,
    pub failure_rate: f64,
    pub frequency: f64,
    pub zone_customers: u64,
    pub duration: Minutes,
    pub customer_interruption_minutes: f64,
    pub customer_interruptions: f64,
    pub scheduled_frequency: f64,
    pub scheduled_customer_interruption_minutes: f64,
    pub scheduled_customer_interruptions: f64,
    /// Share of feeder SAIDI (min / customer / period), faults + scheduled
    pub saidi_contribution: f64,
    /// Share of feeder SAIFI (interruptions / customer / period), faults + scheduled
    pub saifi_contribution: f64,
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub scope: SummaryScope,
    pub segments: usize,
    pub total_length: Kilometers,
    /// Customers served directly by the segments in scope
    pub served_customers: u64,
    /// Denominator used for every row: all feeder customers
    pub total_customers: u64,
    pub fault_frequency: f64,
    pub scheduled_frequency: f64,
    pub saidi_fault: f64,
    pub saidi_scheduled: f64,
    pub saidi: f64,
    pub saifi_fault: f64,
    pub saifi_scheduled: f64,
    pub saifi: f64,
    pub asai: f64,
    pub reporting_period: Minutes,
}

/// Complete result of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityReport {
    /// Trunk segments by sequence index
    pub main_line: Vec<DetailRow>,
    /// Branch segments grouped by branch id, then sequence index
    pub branches: Vec<DetailRow>,
    /// Main line, branch and feeder rows, in that order
    pub summaries: Vec<IndexSummary>,
    pub diagnostics: Diagnostics,
}

impl ReliabilityReport {
    pub fn summary(&self, scope: SummaryScope) -> Option<&IndexSummary> {
        self.summaries.iter().find(|s| s.scope == scope)
    }

    /// Feeder-wide row; always present in a report built by [`aggregate`].
    pub fn feeder(&self) -> &IndexSummary {
        &self.summaries[self.summaries.len() - 1]
    }

    pub fn saidi(&self) -> f64 {
        self.feeder().saidi
    }

    pub fn saifi(&self) -> f64 {
        self.feeder().saifi
    }

    pub fn asai(&self) -> f64 {
        self.feeder().asai
    }
}

#[derive(Default)]
struct Accumulator {
    segments: usize,
    length: Kilometers,
    served: u64,
    fault_frequency: f64,
    scheduled_frequency: f64,
    fault_cim: f64,
    scheduled_cim: f64,
    fault_ci: f64,
    scheduled_ci: f64,
}

impl Accumulator {
    fn add(&mut self, length: Kilometers, served: u64, a: &SegmentAssessment) {
        self.segments += 1;
        self.length = self.length + length;
        self.served += served;
        self.fault_frequency += a.fault.frequency;
        self.scheduled_frequency += a.scheduled.frequency;
        self.fault_cim += a.fault.customer_interruption_minutes;
        self.scheduled_cim += a.scheduled.customer_interruption_minutes;
        self.fault_ci += a.fault.customer_interruptions;
        self.scheduled_ci += a.scheduled.customer_interruptions;
    }

    fn merge(&self, other: &Accumulator) -> Accumulator {
        Accumulator {
            segments: self.segments + other.segments,
            length: self.length + other.length,
            served: self.served + other.served,
            fault_frequency: self.fault_frequency + other.fault_frequency,
            scheduled_frequency: self.scheduled_frequency + other.scheduled_frequency,
            fault_cim: self.fault_cim + other.fault_cim,
            scheduled_cim: self.scheduled_cim + other.scheduled_cim,
            fault_ci: self.fault_ci + other.fault_ci,
            scheduled_ci: self.scheduled_ci + other.scheduled_ci,
        }
    }

    fn summarize(
        &self,
        scope: SummaryScope,
        total_customers: u64,
        period: Minutes,
        diagnostics: &mut Diagnostics,
    ) -> IndexSummary {
        let n = total_customers as f64;
        let saidi_fault = self.fault_cim / n;
        let saidi_scheduled = self.scheduled_cim / n;
        let saidi = saidi_fault + saidi_scheduled;
        let saifi_fault = self.fault_ci / n;
        let saifi_scheduled = self.scheduled_ci / n;

        IndexSummary {
            scope,
            segments: self.segments,
            total_length: self.length,
            served_customers: self.served,
            total_customers,
            fault_frequency: self.fault_frequency,
            scheduled_frequency: self.scheduled_frequency,
            saidi_fault,
            saidi_scheduled,
            saidi,
            saifi_fault,
            saifi_scheduled,
            saifi: saifi_fault + saifi_scheduled,
            asai: availability(saidi, period, scope, diagnostics),
            reporting_period: period,
        }
    }
}

/// `1 − SAIDI / period`, clamped into `[0, 1]` with a warning when it had to be.
pub fn availability(
    saidi: f64,
    period: Minutes,
    scope: SummaryScope,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let raw = 1.0 - saidi / period.value();
    if (0.0..=1.0).contains(&raw) {
        return raw;
    }
    let message = format!(
        "ASAI {raw:.6} outside [0, 1] (SAIDI {saidi:.4} min vs period {:.0} min); clamped",
        period.value()
    );
    warn!(scope = scope.label(), "{}", message);
    diagnostics.add_warning_with_entity("index", &message, scope.label());
    raw.clamp(0.0, 1.0)
}

/// Sum per-segment assessments into detail tables and summary rows.
///
/// `assessments` must hold one entry per topology segment in canonical order,
/// as produced by [`crate::assess_all`]. Fails with
/// [`ReliaError::DegenerateInput`] when the feeder serves no customers.
pub fn aggregate(
    topology: &Topology,
    assessments: &[SegmentAssessment],
    constants: &ReliabilityConstants,
) -> ReliaResult<ReliabilityReport> {
    let total_customers = topology.total_customer_count();
    if total_customers == 0 {
        return Err(ReliaError::DegenerateInput(format!(
            "feeder serves no customers across {} segments; SAIDI/SAIFI are undefined",
            topology.len()
        )));
    }
    debug_assert_eq!(assessments.len(), topology.len());

    let n = total_customers as f64;
    let mut main_line = Vec::with_capacity(topology.trunk().len());
    let mut branches = Vec::with_capacity(topology.len() - topology.trunk().len());
    let mut main_acc = Accumulator::default();
    let mut branch_acc = Accumulator::default();

    for a in assessments {
        let seg = topology.segment(a.index);
        let served = seg.customer_count as u64;
        let row = DetailRow {
            segment_id: seg.id.clone(),
            branch_id: seg.branch_id().cloned(),
            sequence_index: seg.sequence_index,
            length: seg.length,
            customers: served,
            laying: seg.laying,
            has_upstream_switch: seg.has_upstream_switch,
            switch_operable_remotely: seg.switch_operable_remotely,
            failure_rate: a.failure_rate,
            frequency: a.fault.frequency,
            zone_customers: a.zone_customers,
            duration: a.duration,
            customer_interruption_minutes: a.fault.customer_interruption_minutes,
            customer_interruptions: a.fault.customer_interruptions,
            scheduled_frequency: a.scheduled.frequency,
            scheduled_customer_interruption_minutes: a.scheduled.customer_interruption_minutes,
            scheduled_customer_interruptions: a.scheduled.customer_interruptions,
            saidi_contribution: a.total_customer_interruption_minutes() / n,
            saifi_contribution: a.total_customer_interruptions() / n,
        };
        match topology.position(a.index) {
            Position::Trunk(_) => {
                main_acc.add(seg.length, served, a);
                main_line.push(row);
            }
            Position::Branch { .. } => {
                branch_acc.add(seg.length, served, a);
                branches.push(row);
            }
        }
    }

    let period = constants.reporting_period;
    let mut diagnostics = Diagnostics::new();
    let summaries = vec![
        main_acc.summarize(SummaryScope::MainLine, total_customers, period, &mut diagnostics),
        branch_acc.summarize(SummaryScope::Branch, total_customers, period, &mut diagnostics),
        main_acc.merge(&branch_acc).summarize(
            SummaryScope::Feeder,
            total_customers,
            period,
            &mut diagnostics,
        ),
    ];

    Ok(ReliabilityReport {
        main_line,
        branches,
        summaries,
        diagnostics,
    })
}
