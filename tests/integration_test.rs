//! Integration tests for the PID step-response simulator

use approx::assert_relative_eq;
use pid_step_response::export::{export_csv, import_csv, read_csv, to_csv_string};
use pid_step_response::threaded_impl::spawn_simulation;
use pid_step_response::{
    simulate, PidController, PidGains, SimulationConfig, SimulationRequest, StepMetrics,
};

fn run_with(pid: PidController) -> pid_step_response::SimulationResult {
    SimulationRequest::new(pid).run().expect("simulation should succeed")
}

// ============================================================================
// OPEN LOOP TESTS
// ============================================================================

#[test]
fn test_open_loop_is_gain_independent() {
    let baseline = simulate(PidGains::new(0.0, 0.0, 0.0)).unwrap();

    for gains in [
        PidGains::new(1.0, 0.0, 0.0),
        PidGains::new(10.0, 5.0, 2.0),
        PidGains::new(-3.0, 0.5, 0.0),
    ] {
        let other = simulate(gains).unwrap();
        assert_eq!(baseline.output_before(), other.output_before());
    }
}

#[test]
fn test_open_loop_ramps_without_bound() {
    // 4/(s^2 + 2s) under a unit step has no steady state: it ramps at 2 units/s.
    let result = simulate(PidGains::new(1.0, 0.0, 0.0)).unwrap();
    let open = result.output_before();
    assert!(open.windows(2).all(|w| w[1] >= w[0]));
    assert!(open[open.len() - 1] > 30.0);
}

// ============================================================================
// CLOSED LOOP TESTS
// ============================================================================

#[test]
fn test_zero_gains_leave_plant_at_rest() {
    let result = simulate(PidGains::new(0.0, 0.0, 0.0)).unwrap();

    assert!(result.control_signal().iter().all(|&u| u == 0.0));
    assert!(result.output_after().iter().all(|&y| y == 0.0));

    let m = StepMetrics::analyze(result.time(), result.output_after()).unwrap();
    assert_eq!(m.steady_state_error, 1.0);
    assert_eq!(m.rise_time, result.time()[result.len() - 1]);
    assert_eq!(m.overshoot_percent, 0.0);
}

#[test]
fn test_control_signal_respects_limits() {
    for gains in [
        PidGains::new(500.0, 0.0, 0.0),
        PidGains::new(10.0, 200.0, 50.0),
        PidGains::new(-500.0, -10.0, -5.0),
    ] {
        let result = simulate(gains).unwrap();
        assert!(
            result.control_signal().iter().all(|u| u.abs() <= 100.0),
            "limits violated for {gains:?}"
        );
    }
}

#[test]
fn test_custom_limits_are_honoured() {
    let mut pid = PidController::new(50.0, 5.0, 1.0);
    pid.set_limits(-2.0, 3.0).unwrap();
    let result = run_with(pid);
    assert!(result.control_signal().iter().all(|&u| (-2.0..=3.0).contains(&u)));
    assert!(result.control_signal().iter().any(|&u| u == 3.0));
}

#[test]
fn test_pi_control_removes_steady_state_error() {
    let result = simulate(PidGains::new(2.0, 1.0, 0.5)).unwrap();
    let m = StepMetrics::analyze(result.time(), result.output_after()).unwrap();

    assert!(m.steady_state_error < 0.02, "{m:?}");
    assert!(m.rise_time < 5.0, "{m:?}");
    assert!(m.settling_time < 20.0, "{m:?}");
}

#[test]
fn test_higher_proportional_gain_rises_faster() {
    let slow = simulate(PidGains::new(0.5, 0.0, 0.0)).unwrap();
    let fast = simulate(PidGains::new(5.0, 0.0, 0.0)).unwrap();

    let slow_m = StepMetrics::analyze(slow.time(), slow.output_after()).unwrap();
    let fast_m = StepMetrics::analyze(fast.time(), fast.output_after()).unwrap();
    assert!(fast_m.rise_time < slow_m.rise_time);
    assert!(fast_m.overshoot_percent > slow_m.overshoot_percent);
}

#[test]
fn test_anti_windup_bounds_integral_contribution() {
    // Actuator far too weak to reach the set-point: the error never vanishes.
    let mut pid = PidController::new(0.0, 3.0, 0.0);
    pid.set_limits(-0.0, 0.001).unwrap();
    let (lo, hi) = pid.integral_bounds().unwrap();
    assert!(3.0 * hi <= 0.001 + 1e-15);
    assert!(3.0 * lo >= -1e-15);

    let result = run_with(pid);
    assert!(result.control_signal().iter().all(|&u| u <= 0.001));
}

#[test]
fn test_anti_windup_shortens_recovery() {
    let mut clamped = PidController::new(1.0, 20.0, 0.0);
    clamped.set_limits(-0.5, 0.5).unwrap();
    let mut unclamped = clamped.clone();
    unclamped.set_anti_windup(false);

    let with = run_with(clamped);
    let without = run_with(unclamped);

    let m_with = StepMetrics::analyze(with.time(), with.output_after()).unwrap();
    let m_without = StepMetrics::analyze(without.time(), without.output_after()).unwrap();
    assert!(m_with.overshoot_percent < m_without.overshoot_percent);
}

// ============================================================================
// DETERMINISM TESTS
// ============================================================================

#[test]
fn test_identical_gains_give_bit_identical_results() {
    let a = simulate(PidGains::new(3.0, 1.5, 0.7)).unwrap();
    let b = simulate(PidGains::new(3.0, 1.5, 0.7)).unwrap();

    for (x, y) in [
        (a.time(), b.time()),
        (a.output_before(), b.output_before()),
        (a.output_after(), b.output_after()),
        (a.control_signal(), b.control_signal()),
    ] {
        assert!(x.iter().zip(y).all(|(p, q)| p.to_bits() == q.to_bits()));
    }
}

#[test]
fn test_threaded_run_matches_inline_run() {
    let pid = PidController::new(4.0, 1.0, 0.25);
    let inline = run_with(pid.clone());
    let threaded = spawn_simulation(SimulationRequest::new(pid)).unwrap().wait().unwrap();
    assert_eq!(inline, threaded);
}

#[test]
fn test_shorter_horizon_is_a_prefix() {
    let pid = PidController::new(2.0, 1.0, 0.5);
    let full = run_with(pid.clone());
    let short = SimulationRequest {
        controller: pid,
        config: SimulationConfig { steps: 300, ..Default::default() },
    }
    .run()
    .unwrap();

    assert_eq!(short.len(), 300);
    assert_eq!(short.output_after(), &full.output_after()[..300]);
}

// ============================================================================
// CSV TESTS
// ============================================================================

#[test]
fn test_csv_round_trip_within_rounding() {
    let original = simulate(PidGains::new(2.0, 1.0, 0.5)).unwrap();
    let parsed = read_csv(to_csv_string(&original).unwrap().as_bytes()).unwrap();

    assert_eq!(parsed.len(), original.len());
    for i in 0..original.len() {
        assert_relative_eq!(parsed.time()[i], original.time()[i], epsilon = 1e-4);
        assert_relative_eq!(parsed.output_before()[i], original.output_before()[i], epsilon = 1e-6);
        assert_relative_eq!(parsed.output_after()[i], original.output_after()[i], epsilon = 1e-6);
        assert_relative_eq!(parsed.control_signal()[i], original.control_signal()[i], epsilon = 1e-6);
    }
}

#[test]
fn test_csv_file_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pid_data.csv");
    let original = simulate(PidGains::new(1.0, 0.0, 0.0)).unwrap();

    export_csv(&original, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Time,Before_PID,After_PID,Control_Signal"));
    assert_eq!(lines.next(), Some("0.0000,0.000000,0.000000,1.000000"));
    assert_eq!(text.lines().count(), original.len() + 1);
    assert!(text.ends_with('\n'));

    let imported = import_csv(&path).unwrap();
    assert_eq!(imported.len(), original.len());
}

// ============================================================================
// TUNING TESTS
// ============================================================================

#[test]
fn test_pole_placement_tuning_produces_stable_loop() {
    let pid = PidController::from_specifications(0.8, 2.0).unwrap();
    let result = run_with(pid);
    let m = StepMetrics::analyze(result.time(), result.output_after()).unwrap();
    assert!(m.steady_state_error < 0.05, "{m:?}");
}
