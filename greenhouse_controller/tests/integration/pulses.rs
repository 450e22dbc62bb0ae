//! At most one actuator is mid-pulse at any time.

use super::*;

/// Replay the line history and return the largest number of lines that
/// were high at once.
fn max_concurrent(hw: &SimulationHandles) -> usize {
    let mut on = [false; 3];
    let mut max = 0;
    for event in hw.outputs.events() {
        on[event.actuator.index()] = event.on;
        max = max.max(on.iter().filter(|&&o| o).count());
    }
    max
}

fn all_conditions_hold(lock: PulseLock) {
    let mut config = fast_config();
    config.actuation.pulse_lock = lock;
    let rig = Running::start(&config, [2000, 100, 100]);

    assert!(wait_until(Duration::from_secs(3), || {
        Actuator::ALL
            .iter()
            .all(|&a| rig.hw.outputs.rising_edges(a) >= 2)
    }));
    let hw = rig.stop();
    assert_eq!(max_concurrent(&hw), 1);
}

#[test]
fn hold_mode_serializes_pulses() {
    all_conditions_hold(PulseLock::Hold);
}

#[test]
fn release_mode_serializes_pulses() {
    all_conditions_hold(PulseLock::Release);
}

#[test]
fn each_pulse_lasts_configured_duration() {
    let rig = Running::start(&fast_config(), [2000, 3000, 3000]);
    assert!(wait_until(Duration::from_secs(2), || {
        rig.hw.outputs.rising_edges(Actuator::Heater) >= 2
    }));
    let hw = rig.stop();

    let events: Vec<_> = hw
        .outputs
        .events()
        .into_iter()
        .filter(|e| e.actuator == Actuator::Heater)
        .collect();
    for pair in events.windows(2).filter(|p| p[0].on && !p[1].on) {
        assert!(pair[1].at.duration_since(pair[0].at) >= Duration::from_millis(30));
    }
}

#[test]
fn double_raise_before_controller_runs_pulses_once() {
    use greenhouse_controller::actuation::Controller;
    use greenhouse_controller::env::SharedEnvironment;
    use greenhouse_controller::signal::Signal;
    use greenhouse_hal::drivers::simulation::OutputLatch;
    use parking_lot::Mutex;
    use std::sync::Arc;

    let env = Arc::new(SharedEnvironment::new([1600, 1000, 1000]));
    env.lock().set_reading(SensorChannel::Temperature, 1650);
    let latch = Arc::new(OutputLatch::new());
    let controller = Controller::new(
        Actuator::Heater,
        Duration::from_millis(20),
        PulseLock::Hold,
        Arc::clone(&env),
        latch.clone(),
        Arc::new(MonotonicClock::new()),
        Arc::new(Mutex::new(())),
    );

    let signal = Arc::new(Signal::new());
    assert!(signal.raise());
    assert!(!signal.raise());

    let runner = {
        let signal = Arc::clone(&signal);
        thread::spawn(move || controller.run(&signal))
    };
    assert!(wait_until(Duration::from_secs(2), || {
        latch.rising_edges(Actuator::Heater) == 1 && !latch.is_on(Actuator::Heater)
    }));
    // Give a second, absorbed token every chance to fire.
    thread::sleep(Duration::from_millis(100));
    signal.close();
    runner.join().unwrap();

    assert_eq!(latch.rising_edges(Actuator::Heater), 1);
    assert!(!signal.is_pending());
    assert!(!env.is_locked());
}
