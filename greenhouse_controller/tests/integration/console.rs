//! Console thread against the recorded display.

use super::*;

#[test]
fn menu_is_drawn_and_navigable() {
    let rig = Running::start(&fast_config(), IDLE);
    let display = rig.hw.display.clone();

    assert!(wait_until(Duration::from_secs(1), || {
        display.row_text(0) == "Greenhouse Menu"
    }));
    assert_eq!(display.row_text(2), "> Show Sensors Data");

    rig.hw.joystick.tap(Buttons::DOWN, 2);
    assert!(wait_until(Duration::from_secs(1), || {
        display.row_text(3) == "> Manual Control"
    }));
    assert_eq!(display.row_text(2), "Show Sensors Data");
    rig.stop();
}

#[test]
fn sensor_view_shows_live_readings() {
    let rig = Running::start(&fast_config(), [1650, 3000, 3000]);
    let display = rig.hw.display.clone();
    assert!(wait_until(Duration::from_secs(1), || {
        display.row_text(0) == "Greenhouse Menu"
    }));

    rig.hw.joystick.tap(Buttons::CENTER, 2);
    assert!(wait_until(Duration::from_secs(1), || {
        display.row_text(4) == "Temp: 1650"
    }));
    assert_eq!(display.row_text(1), "Display sensor Data");
    rig.stop();
}
