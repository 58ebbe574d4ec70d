//! Laying method from the conductor model text.
//!
//! A cell may hold a single model (`JKLYJ-240`) or a weighted mix, one entry
//! per line:
//!
//! ```text
//! PD_JKLYJ-300: 50.00%
//! PD_VLY-8.7/10-3×300: 50.00%
//! ```
//!
//! `JK` marks an insulated overhead conductor; every other model is treated
//! as cable. Entries without a weight count as 1.

use relia_core::{LayingMethod, LayingMix};

/// Laying method of a single conductor model name.
pub fn classify(model: &str) -> LayingMethod {
    let upper = model.to_uppercase();
    if upper.contains("JK") || upper.contains("OVERHEAD") || model.contains("架空") {
        LayingMethod::Overhead
    } else {
        LayingMethod::Cable
    }
}

fn parse_weight(text: &str) -> Option<f64> {
    let text = text.trim().trim_end_matches(['%', '％']).trim();
    text.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

/// Parse a line-model cell into a laying mix.
///
/// Returns `None` when no usable entry remains (blank cell, only `None`
/// placeholders, or all weights zero); callers fall back to overhead.
pub fn parse_line_model(text: &str) -> Option<LayingMix> {
    let mut cable = 0.0;
    let mut overhead = 0.0;

    for entry in text.lines().map(str::trim).filter(|e| !e.is_empty()) {
        let (name, weight) = match entry.rsplit_once([':', '：']) {
            Some((name, weight)) => match parse_weight(weight) {
                Some(w) => (name.trim(), w),
                None => (entry, 1.0),
            },
            None => (entry, 1.0),
        };
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            continue;
        }
        match classify(name) {
            LayingMethod::Cable => cable += weight,
            LayingMethod::Overhead => overhead += weight,
        }
    }

    LayingMix::from_weights(cable, overhead)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("JKLYJ-240"), LayingMethod::Overhead);
        assert_eq!(classify("pd_jklyj-300"), LayingMethod::Overhead);
        assert_eq!(classify("架空"), LayingMethod::Overhead);
        assert_eq!(classify("Overhead"), LayingMethod::Overhead);
        assert_eq!(classify("YJV22-3×300"), LayingMethod::Cable);
        assert_eq!(classify("电缆"), LayingMethod::Cable);
        assert_eq!(classify("cable"), LayingMethod::Cable);
    }

    #[test]
    fn test_single_model() {
        let mix = parse_line_model("JKLYJ-240").unwrap();
        assert_eq!(mix, LayingMix::pure(LayingMethod::Overhead));
        let mix = parse_line_model("YJV22-3×300").unwrap();
        assert_eq!(mix, LayingMix::pure(LayingMethod::Cable));
    }

    #[test]
    fn test_weighted_mix() {
        let mix = parse_line_model("PD_JKLYJ-300: 25.00%\nPD_VLY-8.7/10-3×300: 75.00%").unwrap();
        assert!((mix.overhead_share() - 0.25).abs() < 1e-12);
        assert!((mix.cable_share() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_none_entries_ignored() {
        let mix = parse_line_model("None: 40%\nYJV22-3×300: 60%").unwrap();
        assert_eq!(mix, LayingMix::pure(LayingMethod::Cable));
        assert!(parse_line_model("None").is_none());
        assert!(parse_line_model("  \n ").is_none());
        assert!(parse_line_model("").is_none());
    }

    #[test]
    fn test_unweighted_entries_count_once() {
        let mix = parse_line_model("JKLYJ-240\nYJV22-3×300").unwrap();
        assert!((mix.cable_share() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weights_fall_back() {
        assert!(parse_line_model("JKLYJ-240: 0%").is_none());
    }
}
