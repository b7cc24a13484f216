//! End-to-end scenarios over the reference machine model

use std::sync::Arc;

use vigilar::alert::is_alerting;
use vigilar::artifacts::{reference, DecoderPolicy};
use vigilar::monitor::{LoopControl, LoopState, MonitoringLoop, RecordingSink};
use vigilar::schema::{
    AIR_TEMPERATURE, PROCESS_TEMPERATURE, ROTATIONAL_SPEED, TOOL_WEAR, TORQUE,
};
use vigilar::{Error, InferencePipeline, Reading, Result, Verdict};

fn pipeline() -> InferencePipeline {
    let artifacts = reference::reference_documents()
        .into_artifacts(&DecoderPolicy::default())
        .expect("reference artifacts should assemble");
    InferencePipeline::new(Arc::new(artifacts))
}

fn reading(torque: f32, wear: f32) -> Reading {
    Reading::new()
        .with(AIR_TEMPERATURE, 300.0f32)
        .with(PROCESS_TEMPERATURE, 310.0f32)
        .with(ROTATIONAL_SPEED, 1500.0f32)
        .with(TORQUE, torque)
        .with(TOOL_WEAR, wear)
}

#[test]
fn test_scenario_low_stress_is_normal_without_attribution() {
    let pipeline = pipeline();
    let diagnosis = pipeline.diagnose(&reading(40.0, 50.0)).expect("valid reading");

    assert_eq!(diagnosis.verdict, Verdict::Normal);
    assert!(diagnosis.causes.is_none());
    assert!(diagnosis.contributions.is_none());
    assert_eq!(diagnosis.alerting_features().count(), 0);
}

#[test]
fn test_scenario_high_torque_and_wear_is_explained_failure() {
    let pipeline = pipeline();
    let diagnosis = pipeline.diagnose(&reading(240.0, 590.0)).expect("valid reading");

    assert!(diagnosis.verdict.is_failure());
    let causes = diagnosis.causes.as_ref().expect("failure should be explained");
    assert_eq!(causes.len(), 3);
    assert!(causes[0].feature == TORQUE || causes[0].feature == TOOL_WEAR);
    assert!(causes.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(causes.iter().all(|c| c.score >= 0.0));

    assert!(is_alerting(TORQUE, 240.0));
    assert!(is_alerting(TOOL_WEAR, 590.0));
    let alerting: Vec<&str> = diagnosis.alerting_features().collect();
    assert_eq!(alerting, vec![TORQUE, TOOL_WEAR]);
}

#[test]
fn test_scenario_extra_key_is_rejected_one_shot() {
    let pipeline = pipeline();
    let err = pipeline.infer(&reading(40.0, 50.0).with("Humidity", 45.0f32)).unwrap_err();
    match err {
        Error::SchemaMismatch { missing, extra } => {
            assert!(missing.is_empty());
            assert_eq!(extra, vec!["Humidity".to_string()]);
        }
        other => panic!("Expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_scenario_extra_key_skips_one_cycle_in_monitoring() {
    let mut script = vec![
        reading(240.0, 590.0),
        reading(40.0, 50.0).with("Humidity", 45.0f32),
        reading(40.0, 50.0),
    ]
    .into_iter();
    let source = move || -> Result<Reading> {
        script.next().ok_or_else(|| Error::Source("script exhausted".into()))
    };

    let mut sink = RecordingSink::new();
    let summary = MonitoringLoop::new(pipeline(), source, &mut sink)
        .with_interval(std::time::Duration::ZERO)
        .run(&LoopControl::new().with_max_cycles(3));

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.presented, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(sink.skipped, vec![(2, LoopState::Inferring, "E100")]);
    assert!(sink.presented[0].1.verdict.is_failure());
    assert_eq!(sink.presented[1].0, 3);
    assert_eq!(sink.presented[1].1.verdict, Verdict::Normal);
}

#[test]
fn test_inference_is_deterministic_across_threads() {
    let pipeline = pipeline();
    let expected = pipeline.infer(&reading(240.0, 590.0)).expect("valid reading");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let pipeline = pipeline.clone();
            let expected = &expected;
            scope.spawn(move || {
                let inference = pipeline.infer(&reading(240.0, 590.0)).expect("valid reading");
                assert_eq!(&inference, expected);
            });
        }
    });
}
