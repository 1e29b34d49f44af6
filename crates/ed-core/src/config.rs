//! Top-level simulation configuration.
//!
//! Defaults reproduce the reference call-centre model: 40 ambulances,
//! 10 call-takers, 2 secondary triage clinicians, 1 reassessment clinician,
//! calls every Uniform[1, 2] minutes, a 1000-minute horizon.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "staffing": { "ambulances": 25 }, "teal_closure_probability": 0.35 }
//! ```

use std::path::Path;

use crate::{CoreError, CoreResult, Dist, TriageColour, WeightedTable};

// ── Staffing ──────────────────────────────────────────────────────────────────

/// Worker pool sizes.  Fixed for the lifetime of a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Staffing {
    pub ambulances:   usize,
    pub call_takers:  usize,
    /// Secondary triage clinicians.
    pub stcs:         usize,
    pub reassessors:  usize,
}

impl Default for Staffing {
    fn default() -> Self {
        Self {
            ambulances:  40,
            call_takers: 10,
            stcs:        2,
            reassessors: 1,
        }
    }
}

// ── TriageWeights ─────────────────────────────────────────────────────────────

/// Relative weights of the call-taker's colour draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TriageWeights {
    pub purple: f64,
    pub red:    f64,
    pub orange: f64,
    pub yellow: f64,
    pub teal:   f64,
}

impl Default for TriageWeights {
    fn default() -> Self {
        Self { purple: 10.0, red: 20.0, orange: 30.0, yellow: 30.0, teal: 10.0 }
    }
}

impl TriageWeights {
    /// Weight of a single colour.
    pub fn weight(&self, colour: TriageColour) -> f64 {
        match colour {
            TriageColour::Purple => self.purple,
            TriageColour::Red    => self.red,
            TriageColour::Orange => self.orange,
            TriageColour::Yellow => self.yellow,
            TriageColour::Teal   => self.teal,
        }
    }

    /// Every call gets `colour`.
    pub fn only(colour: TriageColour) -> Self {
        let mut w = Self { purple: 0.0, red: 0.0, orange: 0.0, yellow: 0.0, teal: 0.0 };
        match colour {
            TriageColour::Purple => w.purple = 1.0,
            TriageColour::Red    => w.red = 1.0,
            TriageColour::Orange => w.orange = 1.0,
            TriageColour::Yellow => w.yellow = 1.0,
            TriageColour::Teal   => w.teal = 1.0,
        }
        w
    }

    /// Build the sampling table used by call-takers.
    pub fn table(&self) -> CoreResult<WeightedTable<TriageColour>> {
        WeightedTable::new(TriageColour::ALL.iter().map(|&c| (c, self.weight(c))))
    }
}

// ── RuralScreening ────────────────────────────────────────────────────────────

/// Post-triage screening of rural/remote calls.
///
/// When enabled, a call created with the rural/remote flag whose assigned
/// colour is in `screen_colours` is diverted to `teal` with probability
/// `teal_probability`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuralScreening {
    pub enabled:          bool,
    /// Probability that a newly created call is rural/remote.
    pub rural_fraction:   f64,
    pub teal_probability: f64,
    pub screen_colours:   Vec<TriageColour>,
}

impl Default for RuralScreening {
    fn default() -> Self {
        Self {
            enabled:          false,
            rural_fraction:   0.0,
            teal_probability: 0.0,
            screen_colours:   vec![TriageColour::Orange, TriageColour::Yellow],
        }
    }
}

// ── DispatchConfig ────────────────────────────────────────────────────────────

/// Every tunable of a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub staffing: Staffing,

    /// Time between consecutive call arrivals.
    pub interarrival: Dist,

    /// Call-taker handling time per call.
    pub call_taker_service: Dist,

    pub triage_weights: TriageWeights,

    /// Secondary triage clinician assessment time.
    pub stc_service: Dist,

    /// Longest a teal call waits for a clinician before bouncing to yellow.
    pub teal_max_wait: f64,

    /// Probability that a clinician-assessed teal call is closed outright.
    pub teal_closure_probability: f64,

    /// Ambulance job duration for purple and red calls.
    pub ambulance_high_acuity: Dist,

    /// Ambulance job duration for orange and yellow calls.
    pub ambulance_low_acuity: Dist,

    /// Time a dispatch-queued call waits before it is put up for review.
    pub reassessment_timeframe: f64,

    /// Reassessment clinician review time.
    pub reassessment_service: Dist,

    /// Probability that a review cancels the call.
    pub reassessment_cancel_probability: f64,

    pub rural_screening: RuralScreening,

    /// When the rural screening condition does not apply, replace the
    /// call-taker's colour with a second independent draw.
    pub double_draw: bool,

    /// Give calls reclassified to yellow (teal bounce or clinician deferral)
    /// a reassessment timer, like directly triaged yellow calls.
    pub reassess_reclassified_yellow: bool,

    /// Simulated time at which the run halts.
    pub horizon: f64,

    /// Interval between observer snapshots; `0` disables snapshots.
    pub snapshot_interval: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            staffing:                        Staffing::default(),
            interarrival:                    Dist::uniform(1.0, 2.0),
            call_taker_service:              Dist::uniform(1.0, 10.0),
            triage_weights:                  TriageWeights::default(),
            stc_service:                     Dist::fixed(25.0),
            teal_max_wait:                   30.0,
            teal_closure_probability:        0.2,
            ambulance_high_acuity:           Dist::fixed(90.0),
            ambulance_low_acuity:            Dist::choice([30.0, 45.0, 90.0, 120.0]),
            reassessment_timeframe:          30.0,
            reassessment_service:            Dist::triangular(2.0, 5.0, 4.0),
            reassessment_cancel_probability: 0.05,
            rural_screening:                 RuralScreening::default(),
            double_draw:                     false,
            reassess_reclassified_yellow:    false,
            horizon:                         1_000.0,
            snapshot_interval:               10.0,
            seed:                            42,
        }
    }
}

impl DispatchConfig {
    /// The busier deployment: arrivals every Uniform[0.8, 2] minutes.
    pub fn high_demand() -> Self {
        Self {
            interarrival: Dist::uniform(0.8, 2.0),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Ambulance job duration for a dispatchable colour.
    pub fn ambulance_service(&self, colour: TriageColour) -> &Dist {
        match colour {
            TriageColour::Purple | TriageColour::Red => &self.ambulance_high_acuity,
            _ => &self.ambulance_low_acuity,
        }
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        self.interarrival.validate("interarrival")?;
        self.call_taker_service.validate("call_taker_service")?;
        self.stc_service.validate("stc_service")?;
        self.ambulance_high_acuity.validate("ambulance_high_acuity")?;
        self.ambulance_low_acuity.validate("ambulance_low_acuity")?;
        self.reassessment_service.validate("reassessment_service")?;

        if self.interarrival.mean() <= 0.0 {
            return Err(CoreError::Config(
                "interarrival must have a positive mean or arrivals never advance the clock".into(),
            ));
        }
        if self.reassessment_timeframe <= 0.0 || !self.reassessment_timeframe.is_finite() {
            return Err(CoreError::Config(format!(
                "reassessment_timeframe must be > 0, got {}",
                self.reassessment_timeframe
            )));
        }
        check_non_negative("teal_max_wait", self.teal_max_wait)?;
        check_non_negative("horizon", self.horizon)?;
        check_non_negative("snapshot_interval", self.snapshot_interval)?;
        check_probability("teal_closure_probability", self.teal_closure_probability)?;
        check_probability("reassessment_cancel_probability", self.reassessment_cancel_probability)?;
        check_probability("rural_screening.rural_fraction", self.rural_screening.rural_fraction)?;
        check_probability("rural_screening.teal_probability", self.rural_screening.teal_probability)?;

        self.triage_weights.table()?;
        Ok(())
    }
}

fn check_non_negative(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be finite and >= 0, got {v}")))
    }
}

fn check_probability(name: &str, p: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be in [0, 1], got {p}")))
    }
}
