//! Duration distributions used for arrivals and service times.
//!
//! Every stochastic duration in the model is a `Dist` so it can be set from
//! JSON and replaced by `Dist::Fixed` in tests that need exact timing.
//!
//! ```json
//! { "kind": "uniform", "low": 1.0, "high": 10.0 }
//! { "kind": "triangular", "low": 2.0, "high": 5.0, "mode": 4.0 }
//! { "kind": "choice", "values": [30.0, 45.0, 90.0, 120.0] }
//! { "kind": "fixed", "value": 25.0 }
//! ```

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::Triangular;

use crate::{CoreError, CoreResult, SimRng};

/// A non-negative duration distribution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dist {
    /// Always `value`.
    Fixed { value: f64 },
    /// Continuous uniform on `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Triangular on `[low, high]` peaking at `mode`.
    Triangular { low: f64, high: f64, mode: f64 },
    /// One of `values`, each equally likely.
    Choice { values: Vec<f64> },
}

impl Dist {
    pub fn fixed(value: f64) -> Dist {
        Dist::Fixed { value }
    }

    pub fn uniform(low: f64, high: f64) -> Dist {
        Dist::Uniform { low, high }
    }

    pub fn triangular(low: f64, high: f64, mode: f64) -> Dist {
        Dist::Triangular { low, high, mode }
    }

    pub fn choice(values: impl Into<Vec<f64>>) -> Dist {
        Dist::Choice { values: values.into() }
    }

    /// Check the parameters; `name` identifies the config field in errors.
    pub fn validate(&self, name: &'static str) -> CoreResult<()> {
        let bad = |reason: String| Err(CoreError::Distribution { name, reason });
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        match self {
            Dist::Fixed { value } => {
                if !non_negative(*value) {
                    return bad(format!("value {value} must be finite and >= 0"));
                }
            }
            Dist::Uniform { low, high } => {
                if !non_negative(*low) || !non_negative(*high) || low > high {
                    return bad(format!("need 0 <= low <= high, got [{low}, {high}]"));
                }
            }
            Dist::Triangular { low, high, mode } => {
                if !non_negative(*low) || !(low < high) || !(*low..=*high).contains(mode) {
                    return bad(format!(
                        "need 0 <= low <= mode <= high and low < high, got ({low}, {high}, {mode})"
                    ));
                }
            }
            Dist::Choice { values } => {
                if values.is_empty() {
                    return bad("choice needs at least one value".into());
                }
                if let Some(v) = values.iter().find(|v| !non_negative(**v)) {
                    return bad(format!("value {v} must be finite and >= 0"));
                }
            }
        }
        Ok(())
    }

    /// Draw one duration.
    ///
    /// Parameters are assumed valid (see [`validate`](Self::validate));
    /// degenerate inputs fall back to the nearest sensible constant rather
    /// than panicking mid-run.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match self {
            Dist::Fixed { value } => *value,
            Dist::Uniform { low, high } => {
                if low >= high {
                    *low
                } else {
                    rng.inner().gen_range(*low..=*high)
                }
            }
            Dist::Triangular { low, high, mode } => match Triangular::new(*low, *high, *mode) {
                Ok(tri) => rng.inner().sample(tri),
                Err(_) => *mode,
            },
            Dist::Choice { values } => values.choose(rng.inner()).copied().unwrap_or(0.0),
        }
    }

    /// Arithmetic mean of the distribution.
    pub fn mean(&self) -> f64 {
        match self {
            Dist::Fixed { value } => *value,
            Dist::Uniform { low, high } => (low + high) / 2.0,
            Dist::Triangular { low, high, mode } => (low + high + mode) / 3.0,
            Dist::Choice { values } if values.is_empty() => 0.0,
            Dist::Choice { values } => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}
