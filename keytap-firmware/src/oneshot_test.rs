extern crate std;

use super::*;

#[test]
fn take_once() {
    let mut oneshot = OneShotState::default();
    assert_eq!(oneshot.take(), None);

    oneshot.start(0x02, Time16(120));
    assert!(oneshot.is_armed());
    assert_eq!(oneshot.time(), Time16(120));

    assert_eq!(oneshot.take(), Some(0x02));
    assert_eq!(oneshot.take(), None);
    assert!(!oneshot.is_ready());
    assert_eq!(oneshot.mods(), 0x02);
}

#[test]
fn cancel() {
    let mut oneshot = OneShotState::default();
    oneshot.start(0x20, Time16(5));
    oneshot.cancel();

    assert_eq!(oneshot, OneShotState::default());
    assert_eq!(oneshot.take(), None);
}

#[test]
fn disabled_survives_arming() {
    let mut oneshot = OneShotState::default();
    oneshot.toggle();
    assert!(oneshot.is_disabled());

    oneshot.start(0x01, Time16(0));
    assert!(oneshot.is_ready());
    assert!(!oneshot.is_armed());
    assert_eq!(oneshot.take(), None);

    oneshot.cancel();
    assert!(oneshot.is_disabled());

    oneshot.toggle();
    oneshot.start(0x01, Time16(0));
    assert_eq!(oneshot.take(), Some(0x01));
}
