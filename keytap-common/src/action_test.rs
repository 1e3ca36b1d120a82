use super::*;
use crate::keycodes::modifier_bits::*;

#[test]
fn keys_and_mods() {
    assert_eq!(Action::decode(0x0000), Ok(Action::NoAction));
    assert_eq!(Action::decode(0x0001), Ok(Action::Transparent));
    assert_eq!(Action::decode(0x0004), Ok(Action::Key(0x04)));
    assert_eq!(
        Action::decode(0x0204),
        Ok(Action::KeyWithMods(Mods::left(LEFT_SHIFT), 0x04))
    );
    assert_eq!(
        Action::decode(0x1200),
        Ok(Action::KeyWithMods(Mods::right(0x2), 0))
    );
    assert_eq!(Action::decode(0x1000), Ok(Action::NoAction));
    assert_eq!(Action::Key(0x01).encode(), ACTION_NO);
    assert_eq!(Action::Key(0x03).encode(), ACTION_NO);
    assert_eq!(Action::Key(0x04).encode(), 0x0004);
    assert_eq!(Mods::right(0x2).hid_bits(), RIGHT_SHIFT);
    assert_eq!(Mods::left(0x12).hid_bits(), LEFT_SHIFT);
}

#[test]
fn mods_tap() {
    assert_eq!(
        Action::decode(0x2200),
        Ok(Action::oneshot_mods(Mods::left(LEFT_SHIFT)))
    );
    assert_eq!(
        Action::decode(0x3129),
        Ok(Action::mods_tap_key(Mods::right(0x1), 0x29))
    );
    assert_eq!(Action::oneshot_mods(Mods::right(0x8)).encode(), 0x3800);
}

#[test]
fn usage() {
    assert_eq!(
        Action::decode(0x40e9),
        Ok(Action::Usage(UsagePage::System, 0xe9))
    );
    assert_eq!(
        Action::decode(0x47ff),
        Ok(Action::Usage(UsagePage::Consumer, 0x3ff))
    );
    assert_eq!(Action::decode(0x4800), Err(UnknownAction(0x4800)));
    assert_eq!(Action::Usage(UsagePage::Consumer, 0xcd).encode(), 0x44cd);
}

#[test]
fn layer_opcodes() {
    let cases = [
        (0x8301, Action::LayerOp(3, LayerOpcode::Reset(Trigger::Press))),
        (0x8229, Action::layer_tap_key(2, 0x29)),
        (0x81f0, Action::LayerOp(1, LayerOpcode::TapToggle)),
        (0x81f3, Action::LayerOp(1, LayerOpcode::Invert(Trigger::Both))),
        (0x8ff4, Action::momentary_layer(15)),
        (0x81f5, Action::LayerOp(1, LayerOpcode::On(Trigger::Press))),
        (0x81fa, Action::LayerOp(1, LayerOpcode::Off(Trigger::Release))),
        (0x81ff, Action::LayerOp(1, LayerOpcode::Set(Trigger::Both))),
        (0x92f4, Action::OverlayOp(2, LayerOpcode::OnOff)),
        (0x81f8, Action::LayerOp(1, LayerOpcode::OffOn)),
        (0x93fc, Action::OverlayOp(3, LayerOpcode::SetClear)),
    ];

    for (code, action) in cases {
        assert_eq!(Action::decode(code), Ok(action), "decode {code:04x}");
        assert_eq!(action.encode(), code, "encode {action:?}");
    }
}

#[test]
fn reserved_codes() {
    for code in [0x6000, 0x7123, 0xa000, 0xb0f4, 0xd001, 0x8100, 0x0002, 0x0003, 0x1001, 0x0201] {
        assert_eq!(Action::decode(code), Err(UnknownAction(code)), "{code:04x}");
    }
}

#[test]
fn extensions() {
    assert_eq!(
        Action::decode(0xc105),
        Ok(Action::Macro { id: 5, opt: OPT_TAP })
    );
    assert_eq!(Action::decode(0xe002), Ok(Action::Command { id: 2, opt: 0 }));
    assert_eq!(
        Action::decode(0xf17f),
        Ok(Action::Function { id: 0x7f, opt: 1 })
    );
}

#[test]
fn tap_capable() {
    assert!(Action::oneshot_mods(Mods::left(1)).is_tap_capable());
    assert!(Action::layer_tap_key(1, 0x2c).is_tap_capable());
    assert!(Action::LayerOp(1, LayerOpcode::TapToggle).is_tap_capable());
    assert!(Action::Function { id: 1, opt: OPT_TAP }.is_tap_capable());
    assert!(!Action::Function { id: 1, opt: 0 }.is_tap_capable());
    assert!(!Action::momentary_layer(1).is_tap_capable());
    assert!(!Action::Key(4).is_tap_capable());
    assert!(!Action::Command { id: 1, opt: OPT_TAP }.is_tap_capable());
}
