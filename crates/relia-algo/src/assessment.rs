//! Per-segment fault frequency and customer-interruption contributions.
//!
//! Each assessment is a pure function of one segment, its isolation zone and
//! the constants. Nothing is shared or mutated, so segments can be assessed
//! in any order or in parallel.
//!
//! - frequency = length × failure rate (share-weighted over the laying mix)
//! - customer interruptions = frequency × zone customers
//! - customer-interruption minutes = customer interruptions × duration
//!
//! Scheduled outages, when configured, use the same zone with their own
//! rate and duration.

use crate::isolation::IsolationZone;
use relia_core::{FailureRates, Minutes, ReliabilityConstants, Segment};
use serde::Serialize;

/// Expected events per year on a segment for a given per-km rate table.
pub fn event_frequency(segment: &Segment, rates: &FailureRates) -> f64 {
    segment.length.value() * rates.weighted(&segment.laying)
}

/// Contribution of one event class (faults or scheduled outages)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Contribution {
    /// Events per year
    pub frequency: f64,
    /// Customer interruptions per year
    pub customer_interruptions: f64,
    /// Customer-interruption minutes per year
    pub customer_interruption_minutes: f64,
}

impl Contribution {
    fn new(frequency: f64, zone_customers: u64, duration: Minutes) -> Self {
        let customer_interruptions = frequency * zone_customers as f64;
        Self {
            frequency,
            customer_interruptions,
            customer_interruption_minutes: customer_interruptions * duration.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAssessment {
    /// Canonical segment index
    pub index: usize,
    /// Share-weighted failure rate, faults / (km·yr)
    pub failure_rate: f64,
    pub zone_customers: u64,
    pub duration: Minutes,
    pub fault: Contribution,
    /// All zeros when scheduled outages are not configured
    pub scheduled: Contribution,
}

impl SegmentAssessment {
    pub fn total_customer_interruptions(&self) -> f64 {
        self.fault.customer_interruptions + self.scheduled.customer_interruptions
    }

    pub fn total_customer_interruption_minutes(&self) -> f64 {
        self.fault.customer_interruption_minutes + self.scheduled.customer_interruption_minutes
    }
}

pub fn assess(
    segment: &Segment,
    zone: &IsolationZone,
    constants: &ReliabilityConstants,
) -> SegmentAssessment {
    let failure_rate = constants.failure_rates.weighted(&segment.laying);
    let fault = Contribution::new(
        segment.length.value() * failure_rate,
        zone.customers,
        zone.duration,
    );
    let scheduled = constants
        .scheduled
        .map(|s| {
            Contribution::new(
                event_frequency(segment, &s.rates),
                zone.customers,
                s.duration,
            )
        })
        .unwrap_or_default();

    SegmentAssessment {
        index: zone.faulted,
        failure_rate,
        zone_customers: zone.customers,
        duration: zone.duration,
        fault,
        scheduled,
    }
}
