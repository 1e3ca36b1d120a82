pub const TAPPING_TERM: u16 = 0;
pub const TAPPING_TOGGLE: u16 = 1;
pub const FEATURE_FLAGS: u16 = 2;

pub const TAPPING_TERM_DEFAULT: u16 = 200;
pub const TAPPING_TOGGLE_DEFAULT: u16 = 5;

/// Bits of the [FEATURE_FLAGS] global. A clear bit disables the feature.
pub mod feature {
    pub const ONESHOT: u16 = 1;
    pub const OVERLAYS: u16 = 2;
    pub const MOUSEKEYS: u16 = 4;

    pub const ALL: u16 = ONESHOT | OVERLAYS | MOUSEKEYS;
}
