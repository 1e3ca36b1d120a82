pub mod key_range {
    pub const NO: u8 = 0x00;
    pub const ROLL_OVER: u8 = 0x01;

    pub const BASIC_MIN: u8 = 0x04;
    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;
    pub const BASIC_F1: u8 = 0x3a;
    pub const BASIC_MAX: u8 = 0xa4;

    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;

    pub const MOUSE_MIN: u8 = 0xf0;
    pub const MOUSE_MAX: u8 = 0xff;

    pub const fn is_key(code: u8) -> bool {
        code >= BASIC_MIN && code <= BASIC_MAX
    }

    pub const fn is_modifier(code: u8) -> bool {
        code >= MODIFIER_MIN && code <= MODIFIER_MAX
    }

    pub const fn is_mouse(code: u8) -> bool {
        code >= MOUSE_MIN
    }

    /// The HID modifier byte bit for a modifier keycode.
    pub const fn modifier_bit(code: u8) -> u8 {
        1 << (code & 7)
    }
}

pub mod modifier_bits {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_GUI: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_GUI: u8 = 0x80;
}

/// Look up a keycode by its lowercase mnemonic. Single letters and digits map to their keys.
///
/// # Example
///
/// ```
/// use keytap_common::keycodes::key_code;
/// assert_eq!(key_code("a"), Some(0x04));
/// assert_eq!(key_code("leftshift"), Some(0xe1));
/// assert_eq!(key_code("nope"), None);
/// ```
pub fn key_code(name: &str) -> Option<u8> {
    use key_range::*;

    match name.as_bytes() {
        [c @ b'a'..=b'z'] => return Some(BASIC_A + (c - b'a')),
        [b'0'] => return Some(BASIC_0),
        [c @ b'1'..=b'9'] => return Some(BASIC_1 + (c - b'1')),
        [b'f', d @ b'1'..=b'9'] => return Some(BASIC_F1 + (d - b'1')),
        [b'f', b'1', d @ b'0'..=b'2'] => return Some(BASIC_F1 + 9 + (d - b'0')),
        _ => {}
    }

    Some(match name {
        "noop" => NO,
        "enter" | "return" => 0x28,
        "esc" | "escape" => 0x29,
        "bksp" | "backspace" => 0x2a,
        "tab" => 0x2b,
        "space" | "spc" => 0x2c,
        "minus" | "-" => 0x2d,
        "equal" | "=" => 0x2e,
        "capslock" => 0x39,
        "right" => 0x4f,
        "left" => 0x50,
        "down" => 0x51,
        "up" => 0x52,
        "leftctrl" | "lc" => 0xe0,
        "leftshift" | "ls" => 0xe1,
        "leftalt" | "la" => 0xe2,
        "leftgui" | "lg" => 0xe3,
        "rightctrl" | "rc" => 0xe4,
        "rightshift" | "rs" => 0xe5,
        "rightalt" | "ra" => 0xe6,
        "rightgui" | "rg" => 0xe7,
        "mouseup" => 0xf0,
        "mousedown" => 0xf1,
        "mouseleft" => 0xf2,
        "mouseright" => 0xf3,
        "mouse1" => 0xf4,
        "mouse2" => 0xf5,
        "mouse3" => 0xf6,
        "mouse4" => 0xf7,
        "mouse5" => 0xf8,
        "wheelup" => 0xf9,
        "wheeldown" => 0xfa,
        _ => return None,
    })
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
