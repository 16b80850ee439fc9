use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for every host requirement range.
pub const RANGE_LIMIT: u32 = 10_000;

/// Inclusive `min..=max` amount, both ends within `0..=RANGE_LIMIT`.
///
/// A bound of zero means "unconstrained" when the requirement is rendered
/// for submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct IntervalRange {
    min: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawRange {
    #[serde(default)]
    min: u32,
    #[serde(default)]
    max: u32,
}

impl TryFrom<RawRange> for IntervalRange {
    type Error = SettingsError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        IntervalRange::new(raw.min, raw.max)
    }
}

impl IntervalRange {
    pub fn new(min: u32, max: u32) -> Result<Self, SettingsError> {
        for value in [min, max] {
            if value > RANGE_LIMIT {
                return Err(SettingsError::RangeOutOfBounds {
                    value,
                    limit: RANGE_LIMIT,
                });
            }
        }
        if min > max {
            return Err(SettingsError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// True when neither bound constrains the worker.
    pub fn is_unbounded(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

/// Constraints a worker host must satisfy to pick up the job.
///
/// Everything but `run_on_all_worker_nodes` is only meaningful (and only
/// editable) when that flag is off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostRequirements {
    pub run_on_all_worker_nodes: bool,
    pub operating_system: String,
    pub cpu_architecture: String,
    /// vCPU count.
    pub cpus: IntervalRange,
    /// Memory in GiB.
    pub memory: IntervalRange,
    /// GPU memory in GiB.
    pub gpu_memory: IntervalRange,
    /// Scratch space in GiB.
    pub scratch_space: IntervalRange,
}

impl Default for HostRequirements {
    fn default() -> Self {
        Self {
            run_on_all_worker_nodes: true,
            operating_system: String::new(),
            cpu_architecture: String::new(),
            cpus: IntervalRange::default(),
            memory: IntervalRange::default(),
            gpu_memory: IntervalRange::default(),
            scratch_space: IntervalRange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_out_of_bounds_and_inverted() {
        assert!(IntervalRange::new(0, RANGE_LIMIT).is_ok());
        assert_eq!(
            IntervalRange::new(0, RANGE_LIMIT + 1),
            Err(SettingsError::RangeOutOfBounds {
                value: RANGE_LIMIT + 1,
                limit: RANGE_LIMIT
            })
        );
        assert_eq!(
            IntervalRange::new(8, 4),
            Err(SettingsError::InvertedRange { min: 8, max: 4 })
        );
    }

    #[test]
    fn range_is_validated_on_deserialize() {
        let ok: IntervalRange = serde_json::from_str(r#"{"min": 2, "max": 16}"#).unwrap();
        assert_eq!((ok.min(), ok.max()), (2, 16));

        let inverted = serde_json::from_str::<IntervalRange>(r#"{"min": 16, "max": 2}"#);
        assert!(inverted.is_err());
    }
}
