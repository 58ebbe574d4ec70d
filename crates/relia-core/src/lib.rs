//! # relia-core: feeder model for supply-reliability studies
//!
//! Data structures shared by the relia crates:
//!
//! - [`Segment`]: one conductor section with its length, laying mix,
//!   directly served customers and upstream switching device
//! - [`Topology`]: a single trunk with branches hanging off trunk segments,
//!   built and validated once, read-only afterwards
//! - [`ReliabilityConstants`]: failure-rate coefficients and outage
//!   durations, validated once
//! - [`ReliaError`] / [`Diagnostics`]: fatal errors and non-fatal warnings
//!
//! ## Quick Start
//!
//! ```rust
//! use relia_core::*;
//!
//! let topology = Topology::build(vec![
//!     Segment::trunk("T1", 1).with_length(1.0).with_customers(10),
//!     Segment::trunk("T2", 2)
//!         .with_length(2.0)
//!         .with_customers(20)
//!         .with_upstream_switch(false),
//!     Segment::branch("B1-1", "B1", 1)
//!         .attached_to("T1")
//!         .with_laying(LayingMethod::Cable)
//!         .with_customers(5),
//! ])
//! .unwrap();
//!
//! assert_eq!(topology.total_customer_count(), 35);
//! assert_eq!(topology.branches_at(0).len(), 1);
//! ```

pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod segment;
pub mod topology;
pub mod units;

pub use constants::{
    FailureRates, RawConstants, RawFailureRates, RawScheduled, ReliabilityConstants,
    ScheduledOutages,
};
pub use diagnostics::{DiagnosticIssue, Diagnostics};
pub use error::{ReliaError, ReliaResult};
pub use segment::{BranchId, LayingMethod, LayingMix, Placement, Segment, SegmentId, SegmentKind};
pub use topology::{BranchLine, Position, Topology, TopologyStats};
pub use units::{Kilometers, Minutes};
