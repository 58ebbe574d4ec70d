//! Reliability constants consumed by the calculation.
//!
//! Settings files deserialize into [`RawConstants`], where every key is
//! optional so that a missing key can be reported by name.
//! [`ReliabilityConstants::from_raw`] validates once and produces the typed,
//! immutable set the algorithms read. Nothing downstream looks a coefficient
//! up by string.

use crate::error::{ReliaError, ReliaResult};
use crate::segment::{LayingMethod, LayingMix};
use crate::units::Minutes;
use serde::{Deserialize, Serialize};

/// Per-kilometre annual event rates keyed by laying method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailureRates {
    pub cable: f64,
    pub overhead: f64,
}

impl FailureRates {
    pub fn rate(&self, method: LayingMethod) -> f64 {
        match method {
            LayingMethod::Cable => self.cable,
            LayingMethod::Overhead => self.overhead,
        }
    }

    /// Share-weighted rate for a mixed segment.
    pub fn weighted(&self, mix: &LayingMix) -> f64 {
        LayingMethod::ALL
            .iter()
            .map(|&m| mix.share(m) * self.rate(m))
            .sum()
    }
}

/// Pre-arranged (maintenance) outage parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledOutages {
    pub rates: FailureRates,
    pub duration: Minutes,
}

/// Validated constants shared read-only by every phase of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityConstants {
    pub failure_rates: FailureRates,
    pub repair_time: Minutes,
    pub remote_switching_time: Minutes,
    pub reporting_period: Minutes,
    pub scheduled: Option<ScheduledOutages>,
}

pub const DEFAULT_CABLE_FAILURE_RATE: f64 = 0.09282879;
pub const DEFAULT_OVERHEAD_FAILURE_RATE: f64 = 0.15337829;
pub const DEFAULT_REPAIR_HOURS: f64 = 3.073;
pub const DEFAULT_REMOTE_SWITCHING_HOURS: f64 = 0.557;
pub const DEFAULT_SCHEDULED_CABLE_RATE: f64 = 0.0221;
pub const DEFAULT_SCHEDULED_OVERHEAD_RATE: f64 = 0.0656;
pub const DEFAULT_SCHEDULED_HOURS: f64 = 5.475;

impl Default for ScheduledOutages {
    fn default() -> Self {
        Self {
            rates: FailureRates {
                cable: DEFAULT_SCHEDULED_CABLE_RATE,
                overhead: DEFAULT_SCHEDULED_OVERHEAD_RATE,
            },
            duration: Minutes::from_hours(DEFAULT_SCHEDULED_HOURS),
        }
    }
}

impl Default for ReliabilityConstants {
    fn default() -> Self {
        Self {
            failure_rates: FailureRates {
                cable: DEFAULT_CABLE_FAILURE_RATE,
                overhead: DEFAULT_OVERHEAD_FAILURE_RATE,
            },
            repair_time: Minutes::from_hours(DEFAULT_REPAIR_HOURS),
            remote_switching_time: Minutes::from_hours(DEFAULT_REMOTE_SWITCHING_HOURS),
            reporting_period: Minutes::YEAR,
            scheduled: None,
        }
    }
}

impl ReliabilityConstants {
    /// Validate a raw constants table.
    ///
    /// Every rate and duration must be present, finite and non-negative; the
    /// reporting period may be omitted (one year) but must be positive.
    /// Remote switching may not take longer than a repair. The `scheduled`
    /// table is optional, but when present it must be complete.
    pub fn from_raw(raw: &RawConstants) -> ReliaResult<Self> {
        let failure_rates = validate_rates(raw.failure_rate.as_ref(), "failure_rate")?;
        let repair_time = Minutes(require(raw.repair_minutes, "repair_minutes")?);
        let remote_switching_time = Minutes(require(
            raw.remote_switching_minutes,
            "remote_switching_minutes",
        )?);
        if remote_switching_time > repair_time {
            return Err(ReliaError::configuration(
                "remote_switching_minutes",
                format!(
                    "{} exceeds repair_minutes {}",
                    remote_switching_time.value(),
                    repair_time.value()
                ),
            ));
        }

        let reporting_period = match raw.reporting_period_minutes {
            None => Minutes::YEAR,
            Some(v) if v.is_finite() && v > 0.0 => Minutes(v),
            Some(v) => {
                return Err(ReliaError::configuration(
                    "reporting_period_minutes",
                    format!("must be a positive number, got {v}"),
                ))
            }
        };

        let scheduled = match &raw.scheduled {
            None => None,
            Some(s) => Some(ScheduledOutages {
                rates: validate_rates(s.rate.as_ref(), "scheduled.rate")?,
                duration: Minutes(require(s.duration_minutes, "scheduled.duration_minutes")?),
            }),
        };

        Ok(Self {
            failure_rates,
            repair_time,
            remote_switching_time,
            reporting_period,
            scheduled,
        })
    }

    /// Raw form with every key filled in, used for settings templates.
    pub fn to_raw(&self) -> RawConstants {
        RawConstants {
            failure_rate: Some(RawFailureRates::from(self.failure_rates)),
            repair_minutes: Some(self.repair_time.value()),
            remote_switching_minutes: Some(self.remote_switching_time.value()),
            reporting_period_minutes: Some(self.reporting_period.value()),
            scheduled: self.scheduled.map(|s| RawScheduled {
                rate: Some(RawFailureRates::from(s.rates)),
                duration_minutes: Some(s.duration.value()),
            }),
        }
    }

    pub fn with_scheduled(mut self, scheduled: ScheduledOutages) -> Self {
        self.scheduled = Some(scheduled);
        self
    }
}

fn require(value: Option<f64>, key: &str) -> ReliaResult<f64> {
    match value {
        None => Err(ReliaError::configuration(key, "required constant is missing")),
        Some(v) if !v.is_finite() => Err(ReliaError::configuration(
            key,
            format!("must be finite, got {v}"),
        )),
        Some(v) if v < 0.0 => Err(ReliaError::configuration(
            key,
            format!("must be non-negative, got {v}"),
        )),
        Some(v) => Ok(v),
    }
}

fn validate_rates(raw: Option<&RawFailureRates>, prefix: &str) -> ReliaResult<FailureRates> {
    let raw = raw.ok_or_else(|| {
        ReliaError::configuration(prefix, "required coefficient table is missing")
    })?;
    let lookup = |method: LayingMethod| match method {
        LayingMethod::Cable => raw.cable,
        LayingMethod::Overhead => raw.overhead,
    };
    let key = |method: LayingMethod| format!("{prefix}.{}", method.as_str());

    Ok(FailureRates {
        cable: require(lookup(LayingMethod::Cable), &key(LayingMethod::Cable))?,
        overhead: require(lookup(LayingMethod::Overhead), &key(LayingMethod::Overhead))?,
    })
}

/// Unvalidated constants as they appear in a settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConstants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_rate: Option<RawFailureRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_switching_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<RawScheduled>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFailureRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhead: Option<f64>,
}

impl From<FailureRates> for RawFailureRates {
    fn from(rates: FailureRates) -> Self {
        Self {
            cable: Some(rates.cable),
            overhead: Some(rates.overhead),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScheduled {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RawFailureRates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}
