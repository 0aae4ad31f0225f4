//! Property-based tests for the fatigue curve and the break orchestrator.
//!
//! Invariants:
//! - The fatigue value never leaves [0, 100]
//! - Severity is a monotonic step function of the value
//! - Recovery outruns accumulation only at high fatigue
//! - At most one break task is pending at a time

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use strainwatch_core::breaks::{BreakConfig, BreakOrchestrator};
use strainwatch_core::fatigue::{FatigueConfig, SeverityThresholds};
use strainwatch_core::{BreakTaskResult, BreakTaskType, FatigueEngine, TriggerReason};

// ============================================================================
// Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Increase { seconds: f64, media: bool },
    Decrease { seconds: f64, multiplier: f64 },
    Credit(f64),
    Weight(f64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5.0f64..600.0, any::<bool>()).prop_map(|(seconds, media)| Op::Increase { seconds, media }),
        (-5.0f64..600.0, 0.0f64..3.0).prop_map(|(seconds, multiplier)| Op::Decrease {
            seconds,
            multiplier
        }),
        (-10.0f64..50.0).prop_map(Op::Credit),
        (-1.0f64..6.0).prop_map(Op::Weight),
    ]
}

fn arb_task_type() -> impl Strategy<Value = BreakTaskType> {
    prop_oneof![
        Just(BreakTaskType::Eye),
        Just(BreakTaskType::Breath),
        Just(BreakTaskType::Mobility),
        Just(BreakTaskType::Stretch),
    ]
}

fn arb_result() -> impl Strategy<Value = BreakTaskResult> {
    prop_oneof![
        Just(BreakTaskResult::Completed),
        Just(BreakTaskResult::Snoozed),
        Just(BreakTaskResult::Skipped),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn value_stays_clamped(ops in prop::collection::vec(arb_op(), 1..200)) {
        let mut engine = FatigueEngine::default();
        for op in ops {
            match op {
                Op::Increase { seconds, media } => { engine.increase_fatigue(seconds, media, None); }
                Op::Decrease { seconds, multiplier } => { engine.decrease_fatigue(seconds, multiplier, None); }
                Op::Credit(c) => { engine.apply_recovery_credit(c); }
                Op::Weight(w) => engine.set_load_weight(w),
            }
            prop_assert!((0.0..=100.0).contains(&engine.value()));
            prop_assert!(engine.slope().is_finite());
        }
    }

    #[test]
    fn severity_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let thresholds = SeverityThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(thresholds.classify(lo) <= thresholds.classify(hi));
    }

    #[test]
    fn engine_severity_matches_value(ops in prop::collection::vec(arb_op(), 1..100)) {
        let mut engine = FatigueEngine::new(FatigueConfig::default(), SeverityThresholds::default());
        for op in ops {
            if let Op::Increase { seconds, media } = op {
                engine.increase_fatigue(seconds, media, None);
            }
            prop_assert_eq!(engine.severity(), engine.thresholds().classify(engine.value()));
        }
    }

    #[test]
    fn recovery_outruns_accumulation_only_when_high(value in 0.0f64..95.0) {
        prop_assume!((value - 100.0 / 3.0).abs() > 0.5);

        let mut up = FatigueEngine::default();
        up.restore(value);
        let gained = up.increase_fatigue(1.0, false, None);

        let mut down = FatigueEngine::default();
        down.restore(value);
        let lost = -down.decrease_fatigue(1.0, 1.0, None);

        if value > 100.0 / 3.0 {
            prop_assert!(lost > gained, "v={value}: lost {lost} <= gained {gained}");
        } else {
            prop_assert!(lost < gained, "v={value}: lost {lost} >= gained {gained}");
        }
    }

    #[test]
    fn at_most_one_pending_task(
        steps in prop::collection::vec((arb_task_type(), arb_result(), any::<bool>()), 1..60)
    ) {
        let mut orch = BreakOrchestrator::new(BreakConfig::default());
        let mut engine = FatigueEngine::default();
        let mut now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        for (task_type, result, settle) in steps {
            let had_pending = orch.pending().is_some();
            let created = orch.generate_task(task_type, TriggerReason::Manual, 50.0, now);
            prop_assert!(!(had_pending && created.is_some()));
            prop_assert!(orch.pending().is_some());

            if settle {
                let id = orch.pending().map(|t| t.id.clone()).unwrap();
                let settled = orch.settle_task(&id, result, &mut engine, now).unwrap();
                prop_assert_eq!(settled.result, result);
                prop_assert!(orch.pending().is_none());
            }
            prop_assert!(orch.history().all(|t| !t.is_pending()));
            now += Duration::seconds(30);
        }
    }
}
