//! Startup and shutdown of the thread set.

use super::*;
use std::sync::atomic::Ordering;

#[test]
fn starts_fixed_thread_set() {
    let rig = Running::start(&fast_config(), IDLE);
    assert_eq!(rig.greenhouse.thread_count(), 10);
    assert!(rig.greenhouse.is_running());
    rig.stop();
}

#[test]
fn shutdown_leaves_outputs_low() {
    let rig = Running::start(&fast_config(), [2000, 100, 100]);
    assert!(wait_until(Duration::from_secs(2), || {
        !rig.hw.outputs.events().is_empty()
    }));
    rig.hw.serial.clone().unwrap().inject(b"CMD:HEATER:ON\n");

    let hw = rig.stop();
    for actuator in Actuator::ALL {
        assert!(!hw.outputs.is_on(actuator));
    }
}

#[test]
fn cleared_flag_releases_wait() {
    let rig = Running::start(&fast_config(), IDLE);
    let flag = rig.greenhouse.running_flag();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        flag.store(false, Ordering::SeqCst);
    });

    let started = Instant::now();
    rig.greenhouse.wait();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!rig.greenhouse.is_running());
    stopper.join().unwrap();
    rig.stop();
}

#[test]
fn invalid_config_is_rejected_before_spawning() {
    let mut config = fast_config();
    config.timing.sample_period_ms = 0;

    let mut driver = SimulationDriver::new();
    driver.init(&config).unwrap();
    let peripherals = driver.take_peripherals().unwrap();
    let err = Greenhouse::start(&config, peripherals).err().unwrap();
    assert!(err.to_string().contains("sample_period_ms"));
}

#[test]
fn starts_from_config_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[shared]
service_name = "greenhouse-test"

[timing]
sample_period_ms = 5
monitor_period_ms = 5

[heater]
threshold = 1200
pulse_ms = 20

[sprinkler]
threshold = 100
pulse_ms = 20

[light]
threshold = 100
pulse_ms = 20
"#
    )
    .unwrap();

    let config = GreenhouseConfig::load(file.path()).unwrap();
    let rig = Running::start(&config, [1300, 4000, 4000]);
    assert_eq!(
        rig.greenhouse.environment().snapshot().threshold(Actuator::Heater),
        1200
    );
    assert!(wait_until(Duration::from_secs(2), || {
        rig.hw.outputs.rising_edges(Actuator::Heater) > 0
    }));
    rig.stop();
}

#[test]
fn dropping_without_shutdown_joins_threads_and_releases_outputs() {
    let rig = Running::start(&fast_config(), IDLE);
    let env = rig.greenhouse.environment();
    let port = rig.hw.serial.clone().unwrap();
    port.inject(b"CMD:HEATER:ON LIGHT:ON\n");
    assert!(wait_until(Duration::from_secs(1), || {
        rig.hw.outputs.is_on(Actuator::Heater) && rig.hw.outputs.is_on(Actuator::Light)
    }));

    let hw = rig.hw.clone();
    drop(rig);
    assert_eq!(std::sync::Arc::strong_count(&env), 1);
    for actuator in Actuator::ALL {
        assert!(!hw.outputs.is_on(actuator));
    }
}
