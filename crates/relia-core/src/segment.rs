//! Line segment records.
//!
//! A [`Segment`] is the smallest accounting unit of a feeder: a stretch of
//! conductor between two structural points. Segments carry no behaviour;
//! [`crate::topology::Topology`] orders them and the algorithms read them.

use crate::units::Kilometers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment identifier, stable for the whole run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Branch (lateral) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Trunk,
    Branch,
}

/// How the conductor is laid; selects the failure-rate coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayingMethod {
    Cable,
    Overhead,
}

impl LayingMethod {
    pub const ALL: [LayingMethod; 2] = [LayingMethod::Cable, LayingMethod::Overhead];

    /// Configuration key for this method.
    pub fn as_str(self) -> &'static str {
        match self {
            LayingMethod::Cable => "cable",
            LayingMethod::Overhead => "overhead",
        }
    }
}

impl fmt::Display for LayingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length shares of cable and overhead conductor within one segment.
///
/// Shares are non-negative and sum to 1. A segment built entirely one way is
/// the pure mix returned by [`LayingMix::pure`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayingMix {
    cable: f64,
    overhead: f64,
}

impl LayingMix {
    pub fn pure(method: LayingMethod) -> Self {
        match method {
            LayingMethod::Cable => Self {
                cable: 1.0,
                overhead: 0.0,
            },
            LayingMethod::Overhead => Self {
                cable: 0.0,
                overhead: 1.0,
            },
        }
    }

    /// Normalize raw weights into shares.
    ///
    /// Returns `None` when the weights are negative, non-finite, or sum to zero.
    pub fn from_weights(cable: f64, overhead: f64) -> Option<Self> {
        if !(cable.is_finite() && overhead.is_finite()) || cable < 0.0 || overhead < 0.0 {
            return None;
        }
        let total = cable + overhead;
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            cable: cable / total,
            overhead: overhead / total,
        })
    }

    pub fn cable_share(&self) -> f64 {
        self.cable
    }

    pub fn overhead_share(&self) -> f64 {
        self.overhead
    }

    pub fn share(&self, method: LayingMethod) -> f64 {
        match method {
            LayingMethod::Cable => self.cable,
            LayingMethod::Overhead => self.overhead,
        }
    }

    /// The method covering the larger share; ties go to overhead.
    pub fn dominant(&self) -> LayingMethod {
        if self.cable > self.overhead {
            LayingMethod::Cable
        } else {
            LayingMethod::Overhead
        }
    }

    /// Share description used in the detail tables, e.g. `电缆50.0%+架空50.0%`.
    pub fn describe(&self) -> String {
        format!(
            "电缆{:.1}%+架空{:.1}%",
            self.cable * 100.0,
            self.overhead * 100.0
        )
    }
}

impl From<LayingMethod> for LayingMix {
    fn from(method: LayingMethod) -> Self {
        LayingMix::pure(method)
    }
}

/// Where a segment sits: on the trunk, or on a named branch.
///
/// `attach_to` names the trunk segment whose downstream node feeds the
/// branch root. Only one member of a branch needs to carry it; members that
/// do must all agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    Trunk,
    Branch {
        branch: BranchId,
        attach_to: Option<SegmentId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub placement: Placement,
    /// Position along its own line; ordering key, need not be contiguous
    pub sequence_index: u32,
    pub length: Kilometers,
    pub laying: LayingMix,
    /// Customers served directly by this segment. Signed so that negative
    /// counts reaching the builder are reported instead of wrapping.
    pub customer_count: i64,
    /// A sectionalizing device sits immediately upstream of this segment
    pub has_upstream_switch: bool,
    /// The upstream device can be operated remotely
    pub switch_operable_remotely: bool,
}

impl Segment {
    /// A trunk segment with no length, no customers, overhead conductor and no switch.
    pub fn trunk(id: impl Into<String>, sequence_index: u32) -> Self {
        Self::with_placement(id, Placement::Trunk, sequence_index)
    }

    /// A branch segment with the same defaults as [`Segment::trunk`].
    pub fn branch(id: impl Into<String>, branch: impl Into<String>, sequence_index: u32) -> Self {
        Self::with_placement(
            id,
            Placement::Branch {
                branch: BranchId::new(branch),
                attach_to: None,
            },
            sequence_index,
        )
    }

    fn with_placement(id: impl Into<String>, placement: Placement, sequence_index: u32) -> Self {
        Self {
            id: SegmentId::new(id),
            placement,
            sequence_index,
            length: Kilometers(0.0),
            laying: LayingMix::pure(LayingMethod::Overhead),
            customer_count: 0,
            has_upstream_switch: false,
            switch_operable_remotely: false,
        }
    }

    pub fn with_length(mut self, km: f64) -> Self {
        self.length = Kilometers(km);
        self
    }

    pub fn with_customers(mut self, customers: i64) -> Self {
        self.customer_count = customers;
        self
    }

    pub fn with_laying(mut self, laying: impl Into<LayingMix>) -> Self {
        self.laying = laying.into();
        self
    }

    /// Put a sectionalizing switch immediately upstream of this segment.
    pub fn with_upstream_switch(mut self, remote: bool) -> Self {
        self.has_upstream_switch = true;
        self.switch_operable_remotely = remote;
        self
    }

    /// Record the trunk segment this branch segment hangs off. No-op on trunk segments.
    pub fn attached_to(mut self, trunk_segment: impl Into<String>) -> Self {
        if let Placement::Branch { attach_to, .. } = &mut self.placement {
            *attach_to = Some(SegmentId::new(trunk_segment));
        }
        self
    }

    pub fn kind(&self) -> SegmentKind {
        match self.placement {
            Placement::Trunk => SegmentKind::Trunk,
            Placement::Branch { .. } => SegmentKind::Branch,
        }
    }

    pub fn branch_id(&self) -> Option<&BranchId> {
        match &self.placement {
            Placement::Trunk => None,
            Placement::Branch { branch, .. } => Some(branch),
        }
    }

    pub fn attach_to(&self) -> Option<&SegmentId> {
        match &self.placement {
            Placement::Trunk => None,
            Placement::Branch { attach_to, .. } => attach_to.as_ref(),
        }
    }

    /// Dominant laying method of the segment's conductor.
    pub fn laying_method(&self) -> LayingMethod {
        self.laying.dominant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let seg = Segment::trunk("T1", 1);
        assert_eq!(seg.kind(), SegmentKind::Trunk);
        assert_eq!(seg.branch_id(), None);
        assert_eq!(seg.laying_method(), LayingMethod::Overhead);
        assert!(!seg.has_upstream_switch);
        assert!(!seg.switch_operable_remotely);
    }

    #[test]
    fn test_branch_attachment() {
        let seg = Segment::branch("B1-1", "B1", 1).attached_to("T2");
        assert_eq!(seg.kind(), SegmentKind::Branch);
        assert_eq!(seg.branch_id().map(BranchId::as_str), Some("B1"));
        assert_eq!(seg.attach_to().map(SegmentId::as_str), Some("T2"));

        // trunk segments ignore attachment
        let trunk = Segment::trunk("T1", 1).attached_to("T0");
        assert_eq!(trunk.attach_to(), None);
    }

    #[test]
    fn test_mix_normalization() {
        let mix = LayingMix::from_weights(0.25, 0.75).unwrap();
        assert!((mix.cable_share() - 0.25).abs() < 1e-12);
        assert_eq!(mix.dominant(), LayingMethod::Overhead);

        let mix = LayingMix::from_weights(3.0, 1.0).unwrap();
        assert!((mix.cable_share() - 0.75).abs() < 1e-12);
        assert_eq!(mix.dominant(), LayingMethod::Cable);
        assert_eq!(mix.describe(), "电缆75.0%+架空25.0%");
    }

    #[test]
    fn test_mix_rejects_degenerate_weights() {
        assert!(LayingMix::from_weights(0.0, 0.0).is_none());
        assert!(LayingMix::from_weights(-1.0, 2.0).is_none());
        assert!(LayingMix::from_weights(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn test_switch_builder() {
        let seg = Segment::trunk("T2", 2).with_upstream_switch(true);
        assert!(seg.has_upstream_switch);
        assert!(seg.switch_operable_remotely);
    }
}
