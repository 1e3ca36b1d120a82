use super::*;

#[test]
fn mnemonics() {
    assert_eq!(key_code("z"), Some(0x1d));
    assert_eq!(key_code("1"), Some(0x1e));
    assert_eq!(key_code("0"), Some(0x27));
    assert_eq!(key_code("f1"), Some(0x3a));
    assert_eq!(key_code("f10"), Some(0x43));
    assert_eq!(key_code("f12"), Some(0x45));
    assert_eq!(key_code("f13"), None);
    assert_eq!(key_code("rightgui"), Some(0xe7));
    assert_eq!(key_code("mouse1"), Some(0xf4));
    assert_eq!(key_code("A"), None);
}

#[test]
fn ranges() {
    assert!(key_range::is_key(key_range::BASIC_A));
    assert!(!key_range::is_key(key_range::ROLL_OVER));
    assert!(key_range::is_modifier(0xe1));
    assert!(!key_range::is_key(0xe1));
    assert_eq!(key_range::modifier_bit(0xe5), modifier_bits::RIGHT_SHIFT);
    assert!(key_range::is_mouse(0xf4));
}
