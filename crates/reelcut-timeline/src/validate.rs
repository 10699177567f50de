//! Time-range validation applied at the store's add/update boundary.

use reelcut_core::{RangePolicy, ReelcutError, Result, TimeSpan};

/// Applies a [`RangePolicy`] to requested spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValidator {
    pub policy: RangePolicy,
    /// Timeline duration used by [`RangePolicy::Clamp`]; ignored when unknown or 0.
    pub upper_bound: Option<f64>,
}

impl RangeValidator {
    pub fn new(policy: RangePolicy) -> Self {
        Self {
            policy,
            upper_bound: None,
        }
    }

    /// Check `requested` and return the span to store.
    ///
    /// Non-finite ends are rejected under every policy.
    pub fn check(&self, requested: TimeSpan) -> Result<TimeSpan> {
        let invalid = || ReelcutError::InvalidRange {
            start: requested.start,
            end: requested.end,
        };

        if !requested.start.is_finite() || !requested.end.is_finite() {
            return Err(invalid());
        }

        let span = match self.policy {
            RangePolicy::Permit => return Ok(requested),
            RangePolicy::Reject => requested,
            RangePolicy::Swap => requested.ordered(),
            RangePolicy::Clamp => {
                let upper = self
                    .upper_bound
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .unwrap_or(f64::INFINITY);
                TimeSpan::new(
                    requested.start.clamp(0.0, upper),
                    requested.end.clamp(0.0, upper),
                )
            }
        };

        if span.is_well_formed() {
            Ok(span)
        } else {
            Err(invalid())
        }
    }
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self::new(RangePolicy::Reject)
    }
}
