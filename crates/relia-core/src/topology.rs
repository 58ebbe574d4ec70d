//! Trunk-with-branches feeder topology.
//!
//! [`Topology::build`] turns a flat list of segment records into an ordered
//! trunk plus branches hanging off trunk segments. The result owns its
//! segments in canonical order:
//!
//! 1. trunk segments by `sequence_index`
//! 2. branch segments grouped by branch id (lexical order), each group by
//!    `sequence_index`
//!
//! Everything else is index-based: lines are `Vec<usize>` into that
//! canonical vector and a map resolves segment ids to indices. The topology is
//! never mutated after construction.
//!
//! Only structure is validated here. No reliability arithmetic happens.

use crate::error::{ReliaError, ReliaResult};
use crate::segment::{BranchId, Placement, Segment, SegmentId};
use crate::units::Kilometers;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Location of a segment within the feeder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Index along the trunk
    Trunk(usize),
    /// Branch number (index into [`Topology::branches`]) and index along it
    Branch { line: usize, pos: usize },
}

/// One lateral, in sequence order
#[derive(Debug, Clone)]
pub struct BranchLine {
    pub id: BranchId,
    /// Trunk position of the segment feeding the branch root
    pub attach_to: usize,
    /// Canonical segment indices, upstream first
    pub segments: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Topology {
    segments: Vec<Segment>,
    positions: Vec<Position>,
    trunk: Vec<usize>,
    branches: Vec<BranchLine>,
    /// Per trunk position, the branches attached there
    attached: Vec<Vec<usize>>,
    index: HashMap<SegmentId, usize>,
    total_customers: u64,
}

impl Topology {
    /// Build and validate a topology from unordered segment records.
    ///
    /// Fails with [`ReliaError::Structural`] when a length is negative or not
    /// finite, a customer count is negative, an id or a
    /// `(kind, branch, sequence_index)` key repeats, or a branch has no,
    /// conflicting, or non-trunk attachment points.
    pub fn build(segments: Vec<Segment>) -> ReliaResult<Self> {
        let mut seen: HashSet<&SegmentId> = HashSet::with_capacity(segments.len());
        for seg in &segments {
            check_attributes(seg)?;
            if !seen.insert(&seg.id) {
                return Err(ReliaError::structural(
                    format!("segment {}", seg.id),
                    "duplicate segment id",
                ));
            }
        }

        let mut trunk_group = Vec::new();
        let mut branch_groups: BTreeMap<BranchId, Vec<Segment>> = BTreeMap::new();
        for seg in segments {
            match &seg.placement {
                Placement::Trunk => trunk_group.push(seg),
                Placement::Branch { branch, .. } => {
                    branch_groups.entry(branch.clone()).or_default().push(seg)
                }
            }
        }

        sort_line(&mut trunk_group, "trunk")?;
        let trunk_ids: HashMap<SegmentId, usize> = trunk_group
            .iter()
            .enumerate()
            .map(|(pos, seg)| (seg.id.clone(), pos))
            .collect();

        let mut ordered: Vec<Segment> = Vec::new();
        let mut positions = Vec::new();
        let trunk: Vec<usize> = (0..trunk_group.len()).collect();
        for (pos, seg) in trunk_group.into_iter().enumerate() {
            positions.push(Position::Trunk(pos));
            ordered.push(seg);
        }

        let mut attached = vec![Vec::new(); trunk.len()];
        let mut branches = Vec::with_capacity(branch_groups.len());
        for (line, (branch_id, mut group)) in branch_groups.into_iter().enumerate() {
            sort_line(&mut group, &format!("branch {branch_id}"))?;
            let attach_to = resolve_attachment(&branch_id, &group, &trunk_ids)?;
            attached[attach_to].push(line);

            let mut members = Vec::with_capacity(group.len());
            for (pos, seg) in group.into_iter().enumerate() {
                members.push(ordered.len());
                positions.push(Position::Branch { line, pos });
                ordered.push(seg);
            }
            branches.push(BranchLine {
                id: branch_id,
                attach_to,
                segments: members,
            });
        }

        let index = ordered
            .iter()
            .enumerate()
            .map(|(i, seg)| (seg.id.clone(), i))
            .collect();
        // customer counts were checked non-negative above
        let total_customers = ordered.iter().map(|s| s.customer_count as u64).sum();

        Ok(Self {
            segments: ordered,
            positions,
            trunk,
            branches,
            attached,
            index,
            total_customers,
        })
    }

    /// All segments in canonical order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, idx: usize) -> &Segment {
        &self.segments[idx]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Canonical indices of the trunk, upstream first.
    pub fn trunk(&self) -> &[usize] {
        &self.trunk
    }

    pub fn branches(&self) -> &[BranchLine] {
        &self.branches
    }

    /// Branch numbers attached at the given trunk position.
    pub fn branches_at(&self, trunk_pos: usize) -> &[usize] {
        &self.attached[trunk_pos]
    }

    pub fn position(&self, idx: usize) -> Position {
        self.positions[idx]
    }

    /// The ordered line (trunk or branch) that contains a position.
    pub fn line(&self, position: Position) -> &[usize] {
        match position {
            Position::Trunk(_) => &self.trunk,
            Position::Branch { line, .. } => &self.branches[line].segments,
        }
    }

    pub fn index_of(&self, id: &SegmentId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Sum of `customer_count` over trunk and branch segments.
    pub fn total_customer_count(&self) -> u64 {
        self.total_customers
    }

    pub fn stats(&self) -> TopologyStats {
        let mut stats = TopologyStats {
            trunk_segments: self.trunk.len(),
            branch_count: self.branches.len(),
            branch_segments: self.segments.len() - self.trunk.len(),
            total_customers: self.total_customers,
            ..TopologyStats::default()
        };
        for (idx, seg) in self.segments.iter().enumerate() {
            let on_trunk = matches!(self.positions[idx], Position::Trunk(_));
            let customers = seg.customer_count as u64;
            if on_trunk {
                stats.trunk_length = stats.trunk_length + seg.length;
                stats.trunk_customers += customers;
            } else {
                stats.branch_length = stats.branch_length + seg.length;
                stats.branch_customers += customers;
            }
            if seg.has_upstream_switch {
                stats.switches += 1;
                if seg.switch_operable_remotely {
                    stats.remote_switches += 1;
                }
            }
        }
        stats
    }
}

/// Summary counts reported by `relia inspect`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologyStats {
    pub trunk_segments: usize,
    pub branch_count: usize,
    pub branch_segments: usize,
    pub trunk_length: Kilometers,
    pub branch_length: Kilometers,
    pub trunk_customers: u64,
    pub branch_customers: u64,
    pub total_customers: u64,
    pub switches: usize,
    pub remote_switches: usize,
}

fn check_attributes(seg: &Segment) -> ReliaResult<()> {
    if !seg.length.is_finite() || seg.length.is_sign_negative() {
        return Err(ReliaError::structural(
            format!("segment {}", seg.id),
            format!("length_km must be a non-negative number, got {}", seg.length.value()),
        ));
    }
    if seg.customer_count < 0 {
        return Err(ReliaError::structural(
            format!("segment {}", seg.id),
            format!("customer_count must be non-negative, got {}", seg.customer_count),
        ));
    }
    Ok(())
}

/// Sort by sequence index and reject repeated keys.
fn sort_line(line: &mut [Segment], label: &str) -> ReliaResult<()> {
    line.sort_by_key(|s| s.sequence_index);
    for pair in line.windows(2) {
        if pair[0].sequence_index == pair[1].sequence_index {
            return Err(ReliaError::structural(
                label,
                format!(
                    "duplicate sequence_index {} (segments {} and {})",
                    pair[0].sequence_index, pair[0].id, pair[1].id
                ),
            ));
        }
    }
    Ok(())
}

fn resolve_attachment(
    branch: &BranchId,
    group: &[Segment],
    trunk_ids: &HashMap<SegmentId, usize>,
) -> ReliaResult<usize> {
    let subject = format!("branch {branch}");
    let mut target: Option<&SegmentId> = None;
    for seg in group {
        if let Some(parent) = seg.attach_to() {
            match target {
                Some(existing) if existing != parent => {
                    return Err(ReliaError::structural(
                        subject,
                        format!(
                            "conflicting attachment points {existing} and {parent} (segment {})",
                            seg.id
                        ),
                    ));
                }
                _ => target = Some(parent),
            }
        }
    }

    let parent = target
        .ok_or_else(|| ReliaError::structural(&subject, "no attachment trunk segment given"))?;
    if group.iter().any(|s| &s.id == parent) {
        return Err(ReliaError::structural(
            subject,
            format!("attaches to its own segment {parent}"),
        ));
    }
    trunk_ids.get(parent).copied().ok_or_else(|| {
        ReliaError::structural(
            subject,
            format!("attachment point {parent} is not a trunk segment"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentKind;

    fn sample() -> Vec<Segment> {
        vec![
            Segment::trunk("T2", 20).with_customers(20).with_length(2.0),
            Segment::branch("B1-2", "B1", 2).with_customers(3),
            Segment::trunk("T1", 10).with_customers(10).with_length(1.0),
            Segment::branch("B1-1", "B1", 1)
                .attached_to("T1")
                .with_customers(4),
            Segment::branch("A1", "A", 1).attached_to("T2").with_customers(1),
        ]
    }

    #[test]
    fn test_canonical_order() {
        let topo = Topology::build(sample()).unwrap();
        let ids: Vec<&str> = topo.segments().iter().map(|s| s.id.as_str()).collect();
        // trunk by sequence, then branch "A" before "B1"
        assert_eq!(ids, vec!["T1", "T2", "A1", "B1-1", "B1-2"]);
        assert_eq!(topo.trunk(), &[0, 1]);
        assert_eq!(topo.branches()[0].id.as_str(), "A");
        assert_eq!(topo.branches()[1].segments, vec![3, 4]);
    }

    #[test]
    fn test_attachment_resolution() {
        let topo = Topology::build(sample()).unwrap();
        assert_eq!(topo.branches_at(0), &[1]); // B1 hangs off T1
        assert_eq!(topo.branches_at(1), &[0]); // A hangs off T2
        assert_eq!(topo.branches()[1].attach_to, 0);
        assert_eq!(
            topo.position(topo.index_of(&SegmentId::new("B1-2")).unwrap()),
            Position::Branch { line: 1, pos: 1 }
        );
    }

    #[test]
    fn test_customer_conservation() {
        let topo = Topology::build(sample()).unwrap();
        let direct: i64 = sample().iter().map(|s| s.customer_count).sum();
        assert_eq!(topo.total_customer_count(), direct as u64);
        assert_eq!(topo.total_customer_count(), 38);
    }

    #[test]
    fn test_stats() {
        let mut segs = sample();
        segs[0] = segs[0].clone().with_upstream_switch(true);
        let topo = Topology::build(segs).unwrap();
        let stats = topo.stats();
        assert_eq!(stats.trunk_segments, 2);
        assert_eq!(stats.branch_count, 2);
        assert_eq!(stats.branch_segments, 3);
        assert_eq!(stats.trunk_length, Kilometers(3.0));
        assert_eq!(stats.trunk_customers, 30);
        assert_eq!(stats.branch_customers, 8);
        assert_eq!(stats.switches, 1);
        assert_eq!(stats.remote_switches, 1);
    }

    #[test]
    fn test_dangling_branch_reference() {
        let segs = vec![
            Segment::trunk("T1", 1),
            Segment::branch("B1-1", "B1", 1).attached_to("T9"),
        ];
        let err = Topology::build(segs).unwrap_err();
        assert_eq!(err.kind(), "StructuralError");
        assert!(err.to_string().contains("T9"));
    }

    #[test]
    fn test_missing_attachment() {
        let segs = vec![Segment::trunk("T1", 1), Segment::branch("B1-1", "B1", 1)];
        assert!(matches!(
            Topology::build(segs),
            Err(ReliaError::Structural { ref subject, .. }) if subject == "branch B1"
        ));
    }

    #[test]
    fn test_conflicting_attachment() {
        let segs = vec![
            Segment::trunk("T1", 1),
            Segment::trunk("T2", 2),
            Segment::branch("B1-1", "B1", 1).attached_to("T1"),
            Segment::branch("B1-2", "B1", 2).attached_to("T2"),
        ];
        let err = Topology::build(segs).unwrap_err();
        assert!(err.to_string().contains("conflicting"));
    }

    #[test]
    fn test_attachment_to_branch_segment() {
        let segs = vec![
            Segment::trunk("T1", 1),
            Segment::branch("B1-1", "B1", 1).attached_to("T1"),
            Segment::branch("B2-1", "B2", 1).attached_to("B1-1"),
        ];
        let err = Topology::build(segs).unwrap_err();
        assert!(err.to_string().contains("not a trunk segment"));
    }

    #[test]
    fn test_duplicate_sequence_within_branch() {
        let segs = vec![
            Segment::trunk("T1", 1),
            Segment::branch("B1-1", "B1", 1).attached_to("T1"),
            Segment::branch("B1-x", "B1", 1),
        ];
        let err = Topology::build(segs).unwrap_err();
        assert!(err.to_string().contains("duplicate sequence_index 1"));
    }

    #[test]
    fn test_same_sequence_on_different_lines_is_fine() {
        let segs = vec![
            Segment::trunk("T1", 1),
            Segment::branch("B1-1", "B1", 1).attached_to("T1"),
            Segment::branch("B2-1", "B2", 1).attached_to("T1"),
        ];
        let topo = Topology::build(segs).unwrap();
        assert_eq!(topo.branches_at(0), &[0, 1]);
    }

    #[test]
    fn test_duplicate_id() {
        let segs = vec![Segment::trunk("T1", 1), Segment::trunk("T1", 2)];
        assert!(Topology::build(segs)
            .unwrap_err()
            .to_string()
            .contains("duplicate segment id"));
    }

    #[test]
    fn test_negative_attributes() {
        let segs = vec![Segment::trunk("T1", 1).with_length(-0.5)];
        assert_eq!(Topology::build(segs).unwrap_err().kind(), "StructuralError");

        let segs = vec![Segment::trunk("T1", 1).with_customers(-2)];
        assert_eq!(Topology::build(segs).unwrap_err().kind(), "StructuralError");

        let segs = vec![Segment::trunk("T1", 1).with_length(f64::NAN)];
        assert!(Topology::build(segs).is_err());
    }

    #[test]
    fn test_sorting_ignores_input_order() {
        let mut reversed = sample();
        reversed.reverse();
        let a = Topology::build(sample()).unwrap();
        let b = Topology::build(reversed).unwrap();
        let ids = |t: &Topology| -> Vec<String> {
            t.segments().iter().map(|s| s.id.to_string()).collect()
        };
        assert_eq!(ids(&a), ids(&b));
        assert!(a
            .segments()
            .iter()
            .take(2)
            .all(|s| s.kind() == SegmentKind::Trunk));
    }

    #[test]
    fn test_empty_topology_builds() {
        let topo = Topology::build(Vec::new()).unwrap();
        assert!(topo.is_empty());
        assert_eq!(topo.total_customer_count(), 0);
    }
}
