//! Threshold crossing drives the matching actuator.

use super::*;

#[test]
fn heater_fires_above_threshold() {
    let rig = Running::start(&fast_config(), [1650, 3000, 3000]);

    assert!(wait_until(Duration::from_secs(2), || {
        rig.hw.outputs.rising_edges(Actuator::Heater) > 0
    }));
    assert_eq!(rig.hw.outputs.rising_edges(Actuator::Sprinkler), 0);
    assert_eq!(rig.hw.outputs.rising_edges(Actuator::Light), 0);

    let hw = rig.stop();
    assert!(!hw.outputs.is_on(Actuator::Heater));
}

#[test]
fn heater_stays_off_below_threshold() {
    let rig = Running::start(&fast_config(), [1500, 3000, 3000]);
    thread::sleep(Duration::from_millis(200));
    assert_eq!(rig.hw.outputs.rising_edges(Actuator::Heater), 0);
    rig.stop();
}

#[test]
fn oversized_sprinkler_threshold_is_clamped_and_still_fires() {
    let mut config = fast_config();
    config.sprinkler.threshold = 5000;
    let rig = Running::start(&config, [1000, 4000, 3000]);

    assert_eq!(
        rig.greenhouse
            .environment()
            .snapshot()
            .threshold(Actuator::Sprinkler),
        ADC_MAX
    );
    assert!(wait_until(Duration::from_secs(2), || {
        rig.hw.outputs.rising_edges(Actuator::Sprinkler) > 0
    }));
    rig.stop();
}

#[test]
fn readings_are_published_to_the_environment() {
    let rig = Running::start(&fast_config(), [1234, 2345, 3456]);
    let env = rig.greenhouse.environment();
    assert!(wait_until(Duration::from_secs(2), || {
        env.snapshot().readings() == [1234, 2345, 3456]
    }));
    rig.stop();
}

#[test]
fn lowered_threshold_takes_effect_while_running() {
    let rig = Running::start(&fast_config(), [1500, 3000, 3000]);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(rig.hw.outputs.rising_edges(Actuator::Heater), 0);

    rig.greenhouse
        .environment()
        .lock()
        .set_threshold(Actuator::Heater, 1400);
    assert!(wait_until(Duration::from_secs(2), || {
        rig.hw.outputs.rising_edges(Actuator::Heater) > 0
    }));
    rig.stop();
}
