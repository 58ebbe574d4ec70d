//! Fault isolation zones.
//!
//! For every segment S this module answers two questions:
//!
//! - **Who loses supply** when S faults: S itself, everything downstream of S
//!   on its own line, and (for trunk faults) every branch hanging off the
//!   swept trunk stretch, each stopped by the first downstream switch.
//! - **For how long**: the remote-switching time when the switch clearing the
//!   fault can be operated remotely, the repair time otherwise.
//!
//! # Boundary convention
//!
//! A segment with `has_upstream_switch = true` is a boundary: the switch sits
//! at its upstream end, so the boundary segment itself stays energized and
//! the zone is everything *before* it. On the faulted line the search starts
//! just after the fault (a segment's own switch never isolates it from
//! itself); on a branch swept by a trunk fault it starts at the branch root,
//! so a root switch keeps the whole branch in service.
//!
//! # Clearing switch
//!
//! The switch that must operate to clear S is the nearest one at or upstream
//! of S, walking toward the source: up the branch, then up the trunk from the
//! attachment point. No such switch means the crew repairs without any
//! switching benefit and the repair time applies.

use relia_core::{Minutes, Position, ReliabilityConstants, Topology};

/// Interrupted set and outage duration for a fault on one segment
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationZone {
    /// Canonical index of the faulted segment
    pub faulted: usize,
    /// Canonical indices of interrupted segments, in traversal order
    /// (faulted line first, then each swept branch)
    pub members: Vec<usize>,
    /// Sum of `customer_count` over `members`
    pub customers: u64,
    /// Segment whose upstream switch clears the fault, if any
    pub clearing_switch: Option<usize>,
    pub duration: Minutes,
}

/// First position at or after `from` whose segment has an upstream switch,
/// or `line.len()` when the line runs out first.
///
/// The returned position is exclusive: an isolation zone covers `start..boundary`.
pub fn isolation_boundary(topology: &Topology, line: &[usize], from: usize) -> usize {
    line.iter()
        .skip(from)
        .position(|&idx| topology.segment(idx).has_upstream_switch)
        .map_or(line.len(), |offset| from + offset)
}

/// Nearest switch at or upstream of a segment, walking toward the source.
pub fn clearing_switch(topology: &Topology, idx: usize) -> Option<usize> {
    let has_switch = |i: &&usize| topology.segment(**i).has_upstream_switch;
    let trunk = topology.trunk();
    match topology.position(idx) {
        Position::Trunk(pos) => trunk[..=pos].iter().rev().find(has_switch).copied(),
        Position::Branch { line, pos } => {
            let branch = &topology.branches()[line];
            branch.segments[..=pos]
                .iter()
                .rev()
                .find(has_switch)
                .or_else(|| trunk[..=branch.attach_to].iter().rev().find(has_switch))
                .copied()
        }
    }
}

/// Resolve the isolation zone and outage duration for a fault on `idx`.
pub fn resolve(
    topology: &Topology,
    idx: usize,
    constants: &ReliabilityConstants,
) -> IsolationZone {
    let mut members = Vec::new();
    match topology.position(idx) {
        Position::Trunk(pos) => {
            let trunk = topology.trunk();
            let end = isolation_boundary(topology, trunk, pos + 1);
            for p in pos..end {
                members.push(trunk[p]);
                for &line in topology.branches_at(p) {
                    let segments = &topology.branches()[line].segments;
                    let stop = isolation_boundary(topology, segments, 0);
                    members.extend_from_slice(&segments[..stop]);
                }
            }
        }
        Position::Branch { line, pos } => {
            let segments = &topology.branches()[line].segments;
            let end = isolation_boundary(topology, segments, pos + 1);
            members.extend_from_slice(&segments[pos..end]);
        }
    }

    let customers = members
        .iter()
        .map(|&i| topology.segment(i).customer_count as u64)
        .sum();

    let clearing = clearing_switch(topology, idx);
    let duration = match clearing {
        Some(i) if topology.segment(i).switch_operable_remotely => constants.remote_switching_time,
        _ => constants.repair_time,
    };

    IsolationZone {
        faulted: idx,
        members,
        customers,
        clearing_switch: clearing,
        duration,
    }
}
