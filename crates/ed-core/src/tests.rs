//! Unit tests for ed-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CallId, ProcessId};

    #[test]
    fn index_roundtrip() {
        let id = CallId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(CallId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display() {
        assert_eq!(ProcessId(7).to_string(), "ProcessId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn orders_numerically() {
        assert!(SimTime::new(1.5) < SimTime::new(2.0));
        assert_eq!(SimTime::new(3.0), SimTime::from(3.0));
        assert_eq!(SimTime::ZERO.max(SimTime::new(0.25)), SimTime::new(0.25));
    }

    #[test]
    fn after_and_since() {
        let t = SimTime::new(10.0).after(2.5);
        assert_eq!(t.as_f64(), 12.5);
        assert_eq!(t.since(SimTime::new(10.0)), 2.5);
        assert_eq!(SimTime::new(1.0).since(t), 0.0);
    }

    #[test]
    fn negative_duration_does_not_rewind() {
        let t = SimTime::new(5.0).after(-3.0);
        assert_eq!(t.as_f64(), 5.0);
    }
}

#[cfg(test)]
mod colour {
    use crate::TriageColour;

    #[test]
    fn dispatch_priority_is_purple_first() {
        assert_eq!(TriageColour::DISPATCH_PRIORITY[0], TriageColour::Purple);
        for (rank, c) in TriageColour::DISPATCH_PRIORITY.iter().enumerate() {
            assert_eq!(c.priority_rank(), Some(rank));
            assert!(c.is_dispatchable());
        }
        assert!(!TriageColour::Teal.is_dispatchable());
        assert_eq!(TriageColour::Teal.priority_rank(), None);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&TriageColour::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
        let back: TriageColour = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(back, TriageColour::Teal);
    }
}

#[cfg(test)]
mod dist {
    use crate::{Dist, SimRng};

    #[test]
    fn fixed_is_constant() {
        let mut rng = SimRng::new(1);
        let d = Dist::fixed(25.0);
        assert!((0..10).all(|_| d.sample(&mut rng) == 25.0));
    }

    #[test]
    fn uniform_stays_in_bounds() {
        let mut rng = SimRng::new(2);
        let d = Dist::uniform(1.0, 10.0);
        for _ in 0..1_000 {
            let x = d.sample(&mut rng);
            assert!((1.0..=10.0).contains(&x), "got {x}");
        }
    }

    #[test]
    fn triangular_stays_in_bounds() {
        let mut rng = SimRng::new(3);
        let d = Dist::triangular(2.0, 5.0, 4.0);
        let mut sum = 0.0;
        for _ in 0..2_000 {
            let x = d.sample(&mut rng);
            assert!((2.0..=5.0).contains(&x), "got {x}");
            sum += x;
        }
        let mean = sum / 2_000.0;
        assert!((mean - d.mean()).abs() < 0.1, "mean {mean}");
    }

    #[test]
    fn choice_draws_only_listed_values() {
        let mut rng = SimRng::new(4);
        let d = Dist::choice([30.0, 45.0, 90.0, 120.0]);
        for _ in 0..200 {
            let x = d.sample(&mut rng);
            assert!([30.0, 45.0, 90.0, 120.0].contains(&x));
        }
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        assert!(Dist::uniform(5.0, 1.0).validate("x").is_err());
        assert!(Dist::fixed(-1.0).validate("x").is_err());
        assert!(Dist::triangular(2.0, 5.0, 6.0).validate("x").is_err());
        assert!(Dist::triangular(2.0, 2.0, 2.0).validate("x").is_err());
        assert!(Dist::choice(Vec::new()).validate("x").is_err());
        assert!(Dist::uniform(1.0, 1.0).validate("x").is_ok());
    }

    #[test]
    fn json_tagged_form() {
        let d: Dist = serde_json::from_str(r#"{"kind":"uniform","low":0.8,"high":2.0}"#).unwrap();
        assert_eq!(d, Dist::uniform(0.8, 2.0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, TriageColour, TriageWeights, WeightedTable};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        let xs: Vec<bool> = (0..64).map(|_| a.gen_bool(0.5)).collect();
        let ys: Vec<bool> = (0..64).map(|_| b.gen_bool(0.5)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(5);
        assert!((0..100).all(|_| rng.gen_bool(1.0)));
        assert!((0..100).all(|_| !rng.gen_bool(0.0)));
        // Out-of-range probabilities are clamped rather than panicking.
        assert!(rng.gen_bool(7.0));
    }

    #[test]
    fn zero_weight_never_drawn() {
        let table = TriageWeights::only(TriageColour::Red).table().unwrap();
        let mut rng = SimRng::new(6);
        assert!((0..500).all(|_| table.pick(&mut rng) == TriageColour::Red));
    }

    #[test]
    fn weights_roughly_respected() {
        let table = WeightedTable::new([("a", 1.0), ("b", 3.0)]).unwrap();
        let mut rng = SimRng::new(7);
        let n = 8_000;
        let bs = (0..n).filter(|_| table.pick(&mut rng) == "b").count();
        let frac = bs as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.03, "frac {frac}");
    }

    #[test]
    fn all_zero_weights_rejected() {
        assert!(WeightedTable::new([(1u8, 0.0), (2u8, 0.0)]).is_err());
        assert!(WeightedTable::new([(1u8, -1.0)]).is_err());
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{DispatchConfig, Dist, TriageColour};

    #[test]
    fn defaults_are_valid() {
        DispatchConfig::default().validate().unwrap();
        DispatchConfig::high_demand().validate().unwrap();
    }

    #[test]
    fn defaults_match_reference_model() {
        let c = DispatchConfig::default();
        assert_eq!(c.staffing.ambulances, 40);
        assert_eq!(c.staffing.call_takers, 10);
        assert_eq!(c.staffing.stcs, 2);
        assert_eq!(c.staffing.reassessors, 1);
        assert_eq!(c.teal_max_wait, 30.0);
        assert_eq!(c.reassessment_timeframe, 30.0);
        assert_eq!(c.teal_closure_probability, 0.2);
        assert_eq!(c.triage_weights.weight(TriageColour::Orange), 30.0);
        assert_eq!(c.ambulance_service(TriageColour::Red), &Dist::fixed(90.0));
        assert_eq!(c.ambulance_service(TriageColour::Yellow), &Dist::choice([30.0, 45.0, 90.0, 120.0]));
        assert_eq!(DispatchConfig::high_demand().interarrival, Dist::uniform(0.8, 2.0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = DispatchConfig::from_json_str(
            r#"{ "staffing": { "ambulances": 3 }, "teal_closure_probability": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(c.staffing.ambulances, 3);
        assert_eq!(c.staffing.call_takers, 10);
        assert_eq!(c.teal_closure_probability, 0.5);
        assert_eq!(c.horizon, 1_000.0);
    }

    #[test]
    fn invalid_probability_rejected() {
        let err = DispatchConfig::from_json_str(r#"{ "teal_closure_probability": 1.5 }"#);
        assert!(err.is_err());
    }

    #[test]
    fn zero_timeframe_rejected() {
        let c = DispatchConfig { reassessment_timeframe: 0.0, ..DispatchConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_interarrival_rejected() {
        let c = DispatchConfig { interarrival: Dist::fixed(0.0), ..DispatchConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{ "horizon": 250.0, "seed": 7 }}"#).unwrap();
        let c = DispatchConfig::from_json_path(f.path()).unwrap();
        assert_eq!(c.horizon, 250.0);
        assert_eq!(c.seed, 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DispatchConfig::from_json_path(std::path::Path::new("/nonexistent/ed.json"));
        assert!(matches!(err, Err(crate::CoreError::Io(_))));
    }
}
