extern crate std;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use keytap_common::action::{Trigger, ACTION_TRANSPARENT as TRNS};

use crate::{
    event::TapState,
    host::{HostEvent, NoHooks, ReportChannel, ReportHost},
    keymap::StaticKeymap,
};

use super::*;

const OVL_ON: u16 = Action::OverlayOp(0, LayerOpcode::On(Trigger::Press)).encode();
const OVL_RESET: u16 = Action::OverlayOp(0, LayerOpcode::Reset(Trigger::Release)).encode();
const SET3: u16 = Action::LayerOp(3, LayerOpcode::Set(Trigger::Both)).encode();
const OFF3: u16 = Action::LayerOp(3, LayerOpcode::Off(Trigger::Release)).encode();

const KEYMAP: [[[u16; 4]; 1]; 1] = [[[OVL_ON, OVL_RESET, SET3, OFF3]]];
const OVERLAYS: [[[u16; 4]; 1]; 1] = [[[TRNS, TRNS, 0x04, TRNS]]];

macro_rules! setup {
    ($config:expr, $d:ident, $host:ident, $channel:ident, $keymap:ident) => {
        let $channel = ReportChannel::<NoopRawMutex, 16>::default();
        let mut $host = ReportHost::new(&$channel);
        let $keymap = StaticKeymap::new(&KEYMAP).with_overlays(&OVERLAYS);
        let mut $d = ActionDispatcher::new($config, 0);
    };
}

fn record(col: u8, pressed: bool, count: u8) -> KeyRecord {
    let key = KeyPosition::new(0, col);
    KeyRecord::with_tap(KeyEvent::new(key, pressed, Default::default()), TapState::new(count))
}

#[test]
fn oneshot_consumed_by_register_code() {
    setup!(Config::default(), d, host, channel, keymap);
    let _ = &keymap;

    d.oneshot.start(0x20, Default::default());
    d.register_code(&mut host, 0x04);
    d.register_code(&mut host, 0x05);
    d.register_code(&mut host, 0xe0);
    d.unregister_code(&mut host, 0xe0);
    d.register_code(&mut host, 0);

    assert_eq!(channel.try_receive(), Some(HostEvent::Modifiers(0x20)));
    assert_eq!(channel.try_receive(), Some(HostEvent::Key(0x04, true)));
    assert_eq!(channel.try_receive(), Some(HostEvent::Modifiers(0)));
    assert_eq!(channel.try_receive(), Some(HostEvent::Key(0x05, true)));
    assert_eq!(channel.try_receive(), Some(HostEvent::Modifiers(0x01)));
    assert_eq!(channel.try_receive(), Some(HostEvent::Modifiers(0)));
    assert_eq!(channel.try_receive(), None);
}

#[test]
fn overlay_on_and_reset() {
    setup!(Config::default(), d, host, channel, keymap);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(0, true, 0), false);
    assert_eq!(d.layers().overlay_mask(), 1);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(2, true, 0), false);
    assert_eq!(channel.try_receive(), Some(HostEvent::Key(0x04, true)));
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(2, false, 0), false);
    assert_eq!(channel.try_receive(), Some(HostEvent::Key(0x04, false)));

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(1, true, 0), false);
    assert_eq!(d.layers().overlay_mask(), 1);
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(1, false, 0), false);
    assert_eq!(d.layers().overlay_mask(), 0);
    assert_eq!(d.layers().default_layer(), 0);
}

#[test]
fn overlays_disabled() {
    let config = Config {
        overlays: false,
        ..Config::default()
    };
    setup!(config, d, host, channel, keymap);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(0, true, 0), false);
    assert_eq!(d.layers().overlay_mask(), 0);

    d.layers_mut().on(LayerTarget::Overlay, 0);
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(2, true, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b1000);
    assert_eq!(channel.try_receive(), None);
}

#[test]
fn set_and_off() {
    setup!(Config::default(), d, host, channel, keymap);
    d.layers_mut().on(LayerTarget::Keymap, 1);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(2, true, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b1000);

    host.register_key(0x10);
    let _ = channel.try_receive();
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(3, true, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b1000);
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(3, false, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0);
    assert_eq!(channel.try_receive(), Some(HostEvent::ClearKeys));

    d.layers_mut().on(LayerTarget::Keymap, 5);
    d.reset();
    assert_eq!(*d.layers(), LayerState::new(0));
}

#[test]
fn tap_key_detection() {
    setup!(Config::default(), d, host, channel, keymap);
    let _ = (&mut host, &channel);

    assert!(!d.is_tap_key(&keymap, KeyPosition::new(0, 0)));
    assert!(!d.is_tap_key(&keymap, KeyPosition::none()));
    assert_eq!(
        d.resolve(&keymap, KeyPosition::new(0, 3)),
        Ok(Action::LayerOp(3, LayerOpcode::Off(Trigger::Release)))
    );
}

#[test]
fn off_while_held_and_set_while_held() {
    const OFF_ON: u16 = Action::LayerOp(1, LayerOpcode::OffOn).encode();
    const SET_CLEAR: u16 = Action::LayerOp(2, LayerOpcode::SetClear).encode();
    const MOMENTARY: [[[u16; 2]; 1]; 1] = [[[OFF_ON, SET_CLEAR]]];

    let channel = ReportChannel::<NoopRawMutex, 16>::default();
    let mut host = ReportHost::new(&channel);
    let keymap = StaticKeymap::new(&MOMENTARY);
    let mut d = ActionDispatcher::new(Config::default(), 0);
    d.layers_mut().set_mask(LayerTarget::Keymap, 0b1010);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(0, true, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b1000);
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(0, false, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b1010);

    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(1, true, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0b0100);
    d.dispatch(&keymap, &mut host, &mut NoHooks, &mut record(1, false, 0), false);
    assert_eq!(d.layers().keymap_mask(), 0);
    assert_eq!(channel.try_receive(), None);
}
