//! Serial overrides reach the output lines.

use super::*;

fn serial(rig: &Running) -> greenhouse_hal::drivers::simulation::SerialHandle {
    rig.hw.serial.clone().unwrap()
}

#[test]
fn command_switches_outputs() {
    let rig = Running::start(&fast_config(), IDLE);
    let port = serial(&rig);

    port.inject(b"CMD:HEATER:ON\n");
    assert!(wait_until(Duration::from_secs(1), || {
        rig.hw.outputs.is_on(Actuator::Heater)
    }));

    port.inject(b"CMD:LIGHT:ON\nCMD:HEATER:OFF\n");
    assert!(wait_until(Duration::from_secs(1), || {
        rig.hw.outputs.is_on(Actuator::Light) && !rig.hw.outputs.is_on(Actuator::Heater)
    }));
    assert!(!rig.hw.outputs.is_on(Actuator::Sprinkler));
    rig.stop();
}

#[test]
fn off_wins_when_both_tokens_present() {
    let rig = Running::start(&fast_config(), IDLE);
    let port = serial(&rig);

    port.inject(b"CMD:SPRINKLER:ON SPRINKLER:OFF\n");
    assert!(wait_until(Duration::from_secs(1), || port.unread() == 0));
    thread::sleep(Duration::from_millis(20));
    assert!(!rig.hw.outputs.is_on(Actuator::Sprinkler));
    assert_eq!(rig.hw.outputs.rising_edges(Actuator::Sprinkler), 1);
    rig.stop();
}

#[test]
fn unprefixed_lines_are_ignored() {
    let rig = Running::start(&fast_config(), IDLE);
    let port = serial(&rig);

    port.inject(b"HEATER:ON\nxCMD:LIGHT:ON\n");
    assert!(wait_until(Duration::from_secs(1), || port.unread() == 0));
    thread::sleep(Duration::from_millis(20));
    assert!(rig.hw.outputs.events().is_empty());
    rig.stop();
}

#[test]
fn line_split_across_reads_is_reassembled() {
    let rig = Running::start(&fast_config(), IDLE);
    let port = serial(&rig);

    port.inject(b"CMD:LIG");
    thread::sleep(Duration::from_millis(30));
    assert!(!rig.hw.outputs.is_on(Actuator::Light));
    port.inject(b"HT:ON\n");
    assert!(wait_until(Duration::from_secs(1), || {
        rig.hw.outputs.is_on(Actuator::Light)
    }));
    rig.stop();
}
