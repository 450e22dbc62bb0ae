//! Periodic telemetry over the serial port.

use super::*;
use greenhouse_controller::telemetry::TelemetryFrame;

#[test]
fn telemetry_lines_carry_current_readings() {
    let rig = Running::start(&fast_config(), [1650, 2048, 12]);
    let port = rig.hw.serial.clone().unwrap();

    let mut lines = Vec::new();
    assert!(wait_until(Duration::from_secs(2), || {
        lines.extend(port.take_lines());
        lines
            .iter()
            .filter_map(|l| TelemetryFrame::parse(l))
            .any(|f| f.temperature == 1650 && f.moisture == 2048 && f.light == 12)
    }));
    rig.stop();

    // Every complete line is well formed.
    for line in &lines {
        assert!(TelemetryFrame::parse(line).is_some(), "malformed line {line:?}");
    }
}

#[test]
fn telemetry_follows_plant_changes() {
    let rig = Running::start(&fast_config(), IDLE);
    let port = rig.hw.serial.clone().unwrap();

    rig.hw.plant.set(SensorChannel::Moisture, 2500);
    assert!(wait_until(Duration::from_secs(2), || {
        port.take_lines()
            .iter()
            .filter_map(|l| TelemetryFrame::parse(l))
            .any(|f| f.moisture == 2500)
    }));
    rig.stop();
}
