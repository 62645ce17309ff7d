//! Non-finite and degenerate inputs must fail loudly, never leak into results

use pid_step_response::controller::Controller;
use pid_step_response::input::parse_gains;
use pid_step_response::simulation::MeasurementNoise;
use pid_step_response::{
    PidController, PidState, SimError, SimulationConfig, SimulationRequest, StepMetrics,
};

#[test]
fn nan_gain_is_a_computation_fault() {
    let err = SimulationRequest::new(PidController::new(1.0, f64::NAN, 0.0))
        .run()
        .unwrap_err();
    assert!(matches!(err, SimError::ComputationFault { step: 0, .. }), "{err:?}");
}

#[test]
fn infinite_gain_is_a_computation_fault() {
    let err = SimulationRequest::new(PidController::new(0.0, 0.0, f64::INFINITY))
        .run()
        .unwrap_err();
    assert!(matches!(err, SimError::ComputationFault { .. }), "{err:?}");
}

#[test]
fn non_finite_error_does_not_touch_state() {
    let pid = PidController::new(1.0, 1.0, 1.0);
    let (_, state) = pid.update(PidState::default(), 0.5, 0.01).unwrap();
    assert!(pid.update(state, f64::NEG_INFINITY, 0.01).is_err());
    // The caller still holds the last good state and can continue from it.
    assert!(pid.update(state, 0.5, 0.01).is_ok());
}

#[test]
fn vanishing_dt_is_guarded() {
    let pid = PidController::new(0.0, 0.0, 1.0);
    let (u, _) = pid.update(PidState::default(), 1.0, 0.0).unwrap();
    assert!(u.is_finite());
    assert_eq!(u, 100.0);
}

#[test]
fn zero_ki_with_anti_windup_is_not_an_error() {
    let mut pid = PidController::new(1.0, 0.0, 0.0);
    pid.set_anti_windup(true);
    assert!(SimulationRequest::new(pid).run().is_ok());
}

#[test]
fn text_gains_are_rejected_before_simulating() {
    match parse_gains("2.0", "one", "0.5") {
        Err(SimError::InvalidInput { field, value }) => {
            assert_eq!(field, "ki");
            assert_eq!(value, "one");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn invalid_horizon_is_rejected_up_front() {
    let request = SimulationRequest {
        controller: PidController::new(1.0, 0.0, 0.0),
        config: SimulationConfig { dt: -0.01, ..Default::default() },
    };
    assert!(matches!(request.run(), Err(SimError::InvalidConfig(_))));

    let request = SimulationRequest {
        controller: PidController::new(1.0, 0.0, 0.0),
        config: SimulationConfig {
            noise: Some(MeasurementNoise::new(-1.0, 0)),
            ..Default::default()
        },
    };
    assert!(matches!(request.run(), Err(SimError::InvalidConfig(_))));
}

#[test]
fn metrics_on_short_runs_are_rejected() {
    let result = SimulationRequest {
        controller: PidController::new(1.0, 0.0, 0.0),
        config: SimulationConfig { steps: 9, ..Default::default() },
    }
    .run()
    .unwrap();

    assert!(matches!(
        StepMetrics::analyze(result.time(), result.output_after()),
        Err(SimError::InsufficientSamples { required: 10, actual: 9 })
    ));
}
