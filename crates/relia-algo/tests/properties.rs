//! Property-based checks on random feeders

use proptest::prelude::*;
use relia_algo::{analyze, ReliabilityReport, SummaryScope};
use relia_core::{Minutes, ReliabilityConstants, Segment, Topology};

/// (length km, customers, has switch, remote)
type Spec = (f64, i64, bool, bool);

fn segment_spec() -> impl Strategy<Value = Spec> {
    (0.0..5.0f64, 1i64..50, any::<bool>(), any::<bool>())
}

fn with_switch(seg: Segment, spec: &Spec) -> Segment {
    if spec.2 {
        seg.with_upstream_switch(spec.3)
    } else {
        seg
    }
}

fn build(trunk: &[Spec], branch: &[Spec], attach: usize) -> Topology {
    let mut segments = Vec::new();
    for (i, s) in trunk.iter().enumerate() {
        let seg = Segment::trunk(format!("T{}", i + 1), i as u32 + 1)
            .with_length(s.0)
            .with_customers(s.1);
        segments.push(with_switch(seg, s));
    }
    for (i, s) in branch.iter().enumerate() {
        let mut seg = Segment::branch(format!("B{}", i + 1), "B", i as u32 + 1)
            .with_length(s.0)
            .with_customers(s.1);
        if i == 0 {
            seg = seg.attached_to(format!("T{}", attach % trunk.len() + 1));
        }
        segments.push(with_switch(seg, s));
    }
    Topology::build(segments).unwrap()
}

fn run(topology: &Topology, constants: &ReliabilityConstants) -> ReliabilityReport {
    analyze(topology, constants).unwrap()
}

proptest! {
    #[test]
    fn prop_indices_bounded(
        trunk in prop::collection::vec(segment_spec(), 1..8),
        branch in prop::collection::vec(segment_spec(), 0..5),
        attach in 0usize..8,
    ) {
        let report = run(&build(&trunk, &branch, attach), &ReliabilityConstants::default());
        prop_assert!(report.saidi() >= 0.0);
        prop_assert!(report.saifi() >= 0.0);
        prop_assert!((0.0..=1.0).contains(&report.asai()));
    }

    #[test]
    fn prop_scopes_sum_to_feeder(
        trunk in prop::collection::vec(segment_spec(), 1..8),
        branch in prop::collection::vec(segment_spec(), 0..5),
        attach in 0usize..8,
    ) {
        let report = run(&build(&trunk, &branch, attach), &ReliabilityConstants::default());
        let main = report.summary(SummaryScope::MainLine).unwrap();
        let br = report.summary(SummaryScope::Branch).unwrap();
        let tol = 1e-9 * report.saidi().max(1.0);
        prop_assert!((main.saidi + br.saidi - report.saidi()).abs() < tol);
        prop_assert!((main.saifi + br.saifi - report.saifi()).abs() < 1e-9 * report.saifi().max(1.0));
    }

    #[test]
    fn prop_longer_segment_never_improves_saidi(
        trunk in prop::collection::vec(segment_spec(), 1..8),
        branch in prop::collection::vec(segment_spec(), 0..5),
        attach in 0usize..8,
        pick in 0usize..13,
        extra in 0.0..3.0f64,
    ) {
        let constants = ReliabilityConstants::default();
        let before = run(&build(&trunk, &branch, attach), &constants);

        let (mut trunk, mut branch) = (trunk, branch);
        let total = trunk.len() + branch.len();
        let k = pick % total;
        if k < trunk.len() {
            trunk[k].0 += extra;
        } else {
            branch[k - trunk.len()].0 += extra;
        }
        let after = run(&build(&trunk, &branch, attach), &constants);
        prop_assert!(after.saidi() >= before.saidi() - 1e-9 * before.saidi().max(1.0));
        prop_assert!(after.saifi() >= before.saifi() - 1e-9 * before.saifi().max(1.0));
    }

    #[test]
    fn prop_added_switch_never_widens_zones(
        trunk in prop::collection::vec(segment_spec(), 1..8),
        branch in prop::collection::vec(segment_spec(), 0..5),
        attach in 0usize..8,
        pick in 0usize..13,
    ) {
        let constants = ReliabilityConstants::default();
        let before = run(&build(&trunk, &branch, attach), &constants);

        let (mut trunk, mut branch) = (trunk, branch);
        let total = trunk.len() + branch.len();
        let k = pick % total;
        let target = if k < trunk.len() { &mut trunk[k] } else { &mut branch[k - trunk.len()] };
        // a remote switch also never lengthens the outage it clears
        target.2 = true;
        target.3 = true;
        let after = run(&build(&trunk, &branch, attach), &constants);

        for (b, a) in before.main_line.iter().chain(&before.branches)
            .zip(after.main_line.iter().chain(&after.branches))
        {
            prop_assert!(a.zone_customers <= b.zone_customers);
        }
        prop_assert!(after.saifi() <= before.saifi() + 1e-9 * before.saifi().max(1.0));
        prop_assert!(after.saidi() <= before.saidi() + 1e-9 * before.saidi().max(1.0));
    }

    #[test]
    fn prop_faster_remote_switching_never_hurts(
        trunk in prop::collection::vec(segment_spec(), 1..8),
        branch in prop::collection::vec(segment_spec(), 0..5),
        attach in 0usize..8,
        minutes in 0.0..60.0f64,
        cut in 0.0..1.0f64,
    ) {
        let topology = build(&trunk, &branch, attach);
        let slow = ReliabilityConstants {
            remote_switching_time: Minutes(minutes),
            ..ReliabilityConstants::default()
        };
        let fast = ReliabilityConstants {
            remote_switching_time: Minutes(minutes * cut),
            ..ReliabilityConstants::default()
        };
        let slow = run(&topology, &slow);
        let fast = run(&topology, &fast);
        prop_assert!(fast.saidi() <= slow.saidi() + 1e-9 * slow.saidi().max(1.0));
        prop_assert!((fast.saifi() - slow.saifi()).abs() < 1e-12 * slow.saifi().max(1.0));
    }
}
