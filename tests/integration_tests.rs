//! Integration tests for the motor neuron simulation engine

use motoneuron_sim::model::{Currents, MotoneuronRhs, NAI_REST, V_REST};
use motoneuron_sim::prelude::*;

fn extract(trajectory: &Trajectory, pulse: &StepPulse) -> FeatureSummary {
    FeatureExtractor::default().extract(
        trajectory.times(),
        &trajectory.voltage(),
        StimulusWindow::from(pulse),
    )
}

/// Test that the documented resting state is a fixed point of the
/// integrated system
#[test]
fn test_resting_state_is_stable() {
    let sim = Simulation::new(Parameters::default(), SimulationConfig::new(2000.0)).unwrap();
    let trajectory = sim.run(&0.0).unwrap();

    let last = trajectory.last_state().unwrap();
    assert!(
        (last.v - V_REST).abs() < 1e-6,
        "voltage drifted from rest: {} mV",
        last.v
    );
    assert!(
        (last.nai - NAI_REST).abs() < 1e-9,
        "sodium drifted from rest: {} M",
        last.nai
    );
}

/// Test the closed-form current balances at the documented rest
#[test]
fn test_rest_current_balances() {
    let params = Parameters::default();
    let rhs = MotoneuronRhs::new(params, &0.0);
    let currents: Currents = rhs.currents(&State::resting());

    // sodium balance: channel influx matches 3x pump extrusion
    assert!(currents.sodium_flux().abs() < 1e-9);
    // voltage balance: all currents sum to zero
    assert!(currents.total().abs() < 1e-9);
    // and the pump itself sits at its calibrated resting value
    assert!((currents.pump - 3.5845).abs() < 1e-3);
}

/// End-to-end scenario: engaged pump (naih = 0.040 M), 50 pA step on
/// [1000, 6000] ms of an 8000 ms run
#[test]
fn test_engaged_pump_scenario() {
    let mut params = Parameters::default();
    params.pump.na_half = 0.040;

    let sim = Simulation::new(params, SimulationConfig::new(8000.0)).unwrap();
    let pulse = StepPulse::new(50.0, 1000.0, 5000.0);
    let trajectory = sim.run(&pulse).unwrap();
    let features = extract(&trajectory, &pulse);

    assert!(
        features.spike_count >= 10,
        "expected a sustained train, got {} spikes",
        features.spike_count
    );

    let delay = features.delay_to_first_spike.expect("train should have a first spike");
    assert!(delay > 0.0 && delay < 100.0, "delay {} ms", delay);

    // the engaged pump silences the train well before the stimulus ends
    let integrity = features.spiking_integrity.expect("integrity defined when spikes exist");
    assert!(
        integrity > 0.0 && integrity < 50.0,
        "expected pump-terminated train, integrity {}%",
        integrity
    );

    // the train decelerates as sodium loads the pump
    assert!(features.initial_firing_rate > features.final_firing_rate);
    let slope = features.adaptation_slope.expect("long train supports adaptation windows");
    assert!(slope > 0.0, "adaptation slope {}", slope);

    // hyperpolarizing AHP after stimulus offset
    let ahp = features.ahp_amplitude.expect("post-stimulus window exists");
    assert!(ahp < -1.0, "AHP amplitude {} mV", ahp);
    let trough = features.mean_trough_voltage.expect("AHP trough exists");
    assert!(trough < -75.0, "mean trough {} mV", trough);
    // recovery is slow at this pump setting; 75% is out of reach within
    // the horizon
    assert!(features.ahp_recovery_75.is_none());

    // sodium loads during the stimulus
    let sodium = trajectory.sodium();
    assert!(sodium.last().unwrap() > &(NAI_REST - 1e-3));
    let nai_max = sodium.iter().cloned().fold(f64::MIN, f64::max);
    assert!(nai_max > 0.045, "sodium never accumulated: max {} M", nai_max);
}

/// Test that gating variables stay in [0, 1] and voltage stays in a sane
/// band across a spiking run
#[test]
fn test_gates_bounded_during_spiking() {
    let mut params = Parameters::default();
    params.pump.na_half = 0.040;

    let sim = Simulation::new(params, SimulationConfig::new(3000.0)).unwrap();
    let pulse = StepPulse::new(50.0, 1000.0, 2000.0);
    let trajectory = sim.run(&pulse).unwrap();

    for z in trajectory.states() {
        for g in 1..=7 {
            assert!(
                z[g] >= -1e-9 && z[g] <= 1.0 + 1e-9,
                "gate {} left [0,1]: {}",
                g,
                z[g]
            );
        }
    }

    let voltage = trajectory.voltage();
    let v_min = voltage.iter().cloned().fold(f64::MAX, f64::min);
    let v_max = voltage.iter().cloned().fold(f64::MIN, f64::max);
    assert!(v_min > -95.0, "voltage floor {}", v_min);
    assert!(v_max < 40.0, "voltage ceiling {}", v_max);
    assert!(v_max > -25.0, "run never spiked, ceiling {}", v_max);
}

/// Default pump half-activation also fires under a 50 pA step
#[test]
fn test_default_configuration_fires() {
    let sim = Simulation::new(Parameters::default(), SimulationConfig::new(8000.0)).unwrap();
    let pulse = StepPulse::new(50.0, 1000.0, 5000.0);
    let trajectory = sim.run(&pulse).unwrap();
    let features = extract(&trajectory, &pulse);

    assert!(features.spike_count >= 5);
    assert!(features.ahp_amplitude.unwrap() < -1.0);
}

/// Conservation sanity: without the pump there is no extrusion, so
/// sodium can only accumulate
#[test]
fn test_pump_off_sodium_accumulates_monotonically() {
    let sim = Simulation::new(Parameters::pump_free(), SimulationConfig::new(8000.0)).unwrap();
    let pulse = StepPulse::new(15.0, 1000.0, 5000.0);
    let trajectory = sim.run(&pulse).unwrap();

    let sodium = trajectory.sodium();
    for pair in sodium.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "sodium decreased without a pump: {} -> {}",
            pair[0],
            pair[1]
        );
    }
    assert!(
        sodium.last().unwrap() - sodium.first().unwrap() > 0.005,
        "expected substantial accumulation"
    );
}

/// Boundary: with sodium dynamics off the concentration is bit-exact
/// constant no matter how hard the cell is driven
#[test]
fn test_fixed_sodium_holds_concentration() {
    let sim = Simulation::new(Parameters::fixed_sodium(), SimulationConfig::new(1500.0)).unwrap();
    let pulse = StepPulse::new(60.0, 100.0, 1300.0);
    let trajectory = sim.run(&pulse).unwrap();

    assert!(trajectory.sodium().iter().all(|&nai| nai == NAI_REST));

    // the drive itself still works
    let features = extract(&trajectory, &pulse);
    assert!(features.spike_count > 0);
}

/// Determinism: identical configuration gives identical trajectories
#[test]
fn test_runs_are_deterministic() {
    let mut params = Parameters::default();
    params.pump.na_half = 0.040;
    let pulse = StepPulse::new(50.0, 500.0, 800.0);

    let sim = Simulation::new(params, SimulationConfig::new(1500.0)).unwrap();
    let first = sim.run(&pulse).unwrap();
    let second = sim.run(&pulse).unwrap();

    assert_eq!(first, second);
}

/// Solver cross-check: the adaptive solver and the fine-step RK4
/// reference agree on a short spiking segment
#[test]
fn test_dopri5_matches_rk4_reference() {
    let mut params = Parameters::default();
    params.pump.na_half = 0.040;
    let pulse = StepPulse::new(50.0, 1000.0, 5000.0);

    let adaptive = Simulation::new(params.clone(), SimulationConfig::new(1200.0))
        .unwrap()
        .run(&pulse)
        .unwrap();
    let reference = Simulation::new(
        params,
        SimulationConfig::new(1200.0).with_solver(SolverKind::Rk4),
    )
    .unwrap()
    .run(&pulse)
    .unwrap();

    assert_eq!(adaptive.times(), reference.times());

    let fa = extract(&adaptive, &pulse);
    let fr = extract(&reference, &pulse);
    assert_eq!(fa.spike_count, fr.spike_count);
    let (da, dr) = (
        fa.delay_to_first_spike.unwrap(),
        fr.delay_to_first_spike.unwrap(),
    );
    assert!((da - dr).abs() < 0.2, "first spikes at {} vs {}", da, dr);

    let dv_max = adaptive
        .voltage()
        .iter()
        .zip(reference.voltage())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(dv_max < 1.0, "solvers disagree by {} mV", dv_max);
}

/// Divergence reporting: sodium driven to zero fails the run with the
/// offending sample, never a clamp
#[test]
fn test_sodium_depletion_is_reported() {
    let mut params = Parameters::default();
    params.pump.na_half = 1e-6; // pump at half drive even with no sodium

    let sim = Simulation::new(params, SimulationConfig::new(5.0)).unwrap();
    let mut initial = State::resting();
    initial.nai = 1e-6;

    match sim.run_from(&initial, &0.0) {
        Err(motoneuron_sim::Error::Diverged { time, sodium, .. }) => {
            assert!(time > 0.0);
            assert!(sodium <= 0.0, "reported Nai {}", sodium);
        }
        other => panic!("expected divergence, got {:?}", other.map(|t| t.len())),
    }
}

/// Divergence reporting: runaway hyperpolarization beyond the voltage
/// bound fails the run
#[test]
fn test_voltage_bound_is_reported() {
    let mut params = Parameters::default();
    params.pump.i_max = 1e5;

    let sim = Simulation::new(params, SimulationConfig::new(10.0)).unwrap();
    match sim.run(&0.0) {
        Err(motoneuron_sim::Error::Diverged { voltage, .. }) => {
            assert!(voltage < -500.0, "reported V {}", voltage);
        }
        other => panic!("expected divergence, got {:?}", other.map(|t| t.len())),
    }
}

/// Configuration errors are rejected before any integration happens
#[test]
fn test_invalid_configurations_rejected() {
    let mut params = Parameters::default();
    params.nat.g_max = -1.0;
    assert!(matches!(
        Simulation::new(params, SimulationConfig::new(10.0)),
        Err(motoneuron_sim::Error::Config(_))
    ));

    let mut params = Parameters::default();
    params.pump.na_slope = 0.0;
    assert!(matches!(
        Simulation::new(params, SimulationConfig::new(10.0)),
        Err(motoneuron_sim::Error::Config(_))
    ));

    let mut config = SimulationConfig::new(10.0);
    config.ode.max_step = config.ode.min_step / 2.0;
    assert!(matches!(
        Simulation::new(Parameters::default(), config),
        Err(motoneuron_sim::Error::Config(_))
    ));
}

/// A parameter sweep carries per-point results, including features for
/// every quiet subthreshold point
#[test]
fn test_amplitude_sweep_end_to_end() {
    let sweep = Sweep::new(SweepParameter::StimulusAmplitude, 0.0, 1.0, 2);
    let points = sweep
        .run(
            &Parameters::default(),
            &SimulationConfig::new(100.0),
            &StepPulse::new(0.0, 20.0, 50.0),
        )
        .unwrap();

    assert_eq!(points.len(), 2);
    for point in points {
        let features = point.features.expect("subthreshold run should succeed");
        assert_eq!(features.spike_count, 0);
        assert_eq!(features.delay_to_first_spike, None);
    }
}
