//! Simulation driver lifecycle tests through the registry.

use greenhouse_common::prelude::*;
use greenhouse_hal::DriverRegistry;
use greenhouse_hal::drivers::simulation::{PlantMode, SimulationDriver};

#[test]
fn test_registry_creates_named_drivers() {
    let registry = DriverRegistry::with_builtin_drivers();
    let driver = registry.create_driver("simulation").expect("simulation driver");
    assert_eq!(driver.name(), "simulation");
    assert!(!driver.version().is_empty());

    let stdio = registry
        .create_driver("simulation-stdio")
        .expect("stdio driver");
    assert_eq!(stdio.name(), "simulation-stdio");

    assert!(matches!(
        registry.create_driver("stm32"),
        Err(HalError::DriverNotFound(_))
    ));
}

#[test]
fn test_boxed_driver_full_lifecycle() {
    let registry = DriverRegistry::with_builtin_drivers();
    let mut driver = registry.create_driver("simulation").expect("driver");
    let config = GreenhouseConfig::default();

    driver.init(&config).expect("init");
    let mut peripherals = driver.take_peripherals().expect("peripherals");

    for channel in SensorChannel::ALL {
        assert!(peripherals.sensors.convert(channel) <= 4095);
    }

    // Idle joystick reports every line released.
    let port = peripherals.input.read_port();
    assert_eq!(Buttons::from_port(port, &config.joystick), Buttons::empty());

    peripherals.outputs.set(Actuator::Sprinkler, true);
    assert!(peripherals.outputs.is_on(Actuator::Sprinkler));

    driver.shutdown().expect("shutdown");
    assert!(!peripherals.outputs.is_on(Actuator::Sprinkler));
}

#[test]
fn test_handles_drive_the_simulated_hardware() {
    let mut driver = SimulationDriver::new().plant(PlantMode::Fixed([1650, 2000, 4000]));
    driver.init(&GreenhouseConfig::default()).expect("init");
    let handles = driver.handles().expect("handles after init");
    let mut peripherals = driver.take_peripherals().expect("peripherals");

    handles.plant.set(SensorChannel::Temperature, 1700);
    assert_eq!(peripherals.sensors.convert(SensorChannel::Temperature), 1700);

    let serial = handles.serial.expect("loopback serial");
    serial.inject(b"CMD:HEATER_ON\n");
    let mut received = Vec::new();
    while let Some(b) = peripherals.serial_rx.read_byte() {
        received.push(b);
    }
    assert_eq!(received, b"CMD:HEATER_ON\n");

    peripherals.serial_tx.write_bytes(b"TEMP:1700|MOIST:2000|LIGHT:4000\n");
    assert_eq!(serial.take_lines(), vec!["TEMP:1700|MOIST:2000|LIGHT:4000"]);

    peripherals.display.draw_string(0, 0, "Greenhouse Menu");
    assert_eq!(handles.display.row_text(0), "Greenhouse Menu");

    peripherals.outputs.set(Actuator::Light, true);
    assert_eq!(handles.outputs.rising_edges(Actuator::Light), 1);
}
