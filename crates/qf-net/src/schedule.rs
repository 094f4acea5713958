//! Piecewise-linear forcing schedules.

use qf_core::errors::{ErrorInfo, QfError};
use serde::{Deserialize, Serialize};

/// Linear ramp `offset + slope * (t - start)` active on `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First time at which the segment applies.
    pub start: f64,
    /// Exclusive end; open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Value at `start`.
    #[serde(default)]
    pub offset: f64,
    /// Rate of change per unit time.
    #[serde(default)]
    pub slope: f64,
}

impl Segment {
    /// Constant value over `[start, end)`.
    pub fn constant(start: f64, end: Option<f64>, value: f64) -> Self {
        Self {
            start,
            end,
            offset: value,
            slope: 0.0,
        }
    }

    /// Whether `t` falls inside the segment.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && self.end.map_or(true, |end| t < end)
    }

    /// Value of the ramp at `t`, ignoring the bounds.
    pub fn value(&self, t: f64) -> f64 {
        self.offset + self.slope * (t - self.start)
    }
}

/// Ordered list of segments; the first segment containing `t` wins and the
/// schedule is zero outside all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    segments: Vec<Segment>,
}

impl Schedule {
    /// Builds a schedule, rejecting empty or reversed segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, QfError> {
        let schedule = Self { segments };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Checks every segment bound.
    pub fn validate(&self) -> Result<(), QfError> {
        for (index, segment) in self.segments.iter().enumerate() {
            let reversed = segment.end.map_or(false, |end| !(end > segment.start));
            if !segment.start.is_finite() || reversed {
                return Err(QfError::Network(
                    ErrorInfo::new("invalid-segment", "segment must have start < end")
                        .with_context("segment", index)
                        .with_context("start", segment.start),
                ));
            }
        }
        Ok(())
    }

    /// Segments in evaluation order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Schedule value at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        self.segments
            .iter()
            .find(|segment| segment.contains(t))
            .map_or(0.0, |segment| segment.value(t))
    }
}

impl From<Vec<Segment>> for Schedule {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}
