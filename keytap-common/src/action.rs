//! The 16 bit action code stored in keymap tables.
//!
//! ```text
//! Keys and modifiers
//! 0000|0000|0000 0000   No action
//! 0000|0000|0000 0001   Transparent
//! 0000|0000| keycode    Key (0x04 and up; 0x02 and 0x03 are reserved)
//! 000r|mods| keycode    Key with left (r=0) or right (r=1) mods; keycode 0 is mods only
//! 001r|mods|0000 0000   Mods when held, one-shot mods when tapped
//! 001r|mods| keycode    Mods when held, keycode when tapped
//!
//! Other usages
//! 0100|pp| usage(10)    pp=00 System control, pp=01 Consumer, 10/11 reserved
//! 0101|0000| keycode    Mouse key
//!
//! Layer (1000) and overlay (1001) masks, LLLL is the layer number
//! 100t|LLLL|0000 00xx   Reset: default layer := L (overlay: clear mask); 0000 0000 is reserved
//! 100t|LLLL| keycode    Momentary layer when held, keycode when tapped (0x04..=0xef)
//! 100t|LLLL|1111 0000   Momentary layer, toggled after the tap toggle count
//! 100t|LLLL|1111 00xx   Invert bit L
//! 100t|LLLL|1111 0100   On while held, off when released
//! 100t|LLLL|1111 01xx   On bit L
//! 100t|LLLL|1111 1000   Off while held, on when released
//! 100t|LLLL|1111 10xx   Off bit L
//! 100t|LLLL|1111 1100   Set mask while held, clear mask when released
//! 100t|LLLL|1111 11xx   Set mask := 1 << L
//! xx: 01 on press, 10 on release, 11 on both. 00 selects the held forms listed above.
//!
//! Extensions
//! 1100|opt | id(8)      Macro
//! 1110|opt | id(8)      Command
//! 1111|opt | id(8)      Function
//! opt bit 0 marks a macro or function as tap capable.
//! ```
//!
//! Tags 0110, 0111, 1010, 1011 and 1101 are reserved.

use crate::keycodes::key_range::{BASIC_MIN, NO};

pub const ACTION_NO: u16 = 0x0000;
pub const ACTION_TRANSPARENT: u16 = 0x0001;

pub mod kind {
    pub const LMODS: u16 = 0b0000;
    pub const RMODS: u16 = 0b0001;
    pub const LMODS_TAP: u16 = 0b0010;
    pub const RMODS_TAP: u16 = 0b0011;
    pub const USAGE: u16 = 0b0100;
    pub const MOUSEKEY: u16 = 0b0101;
    pub const LAYER: u16 = 0b1000;
    pub const OVERLAY: u16 = 0b1001;
    pub const MACRO: u16 = 0b1100;
    pub const COMMAND: u16 = 0b1110;
    pub const FUNCTION: u16 = 0b1111;
}

/// Low byte values of layer and overlay actions.
pub mod layer_code {
    pub const RESET: u8 = 0x00;
    pub const TAP_KEY_MIN: u8 = 0x04;
    pub const TAP_KEY_MAX: u8 = 0xef;
    pub const TAP_TOGGLE: u8 = 0xf0;
    pub const INVERT: u8 = 0xf0;
    pub const ON_OFF: u8 = 0xf4;
    pub const ON: u8 = 0xf4;
    pub const OFF_ON: u8 = 0xf8;
    pub const OFF: u8 = 0xf8;
    pub const SET_CLEAR: u8 = 0xfc;
    pub const SET: u8 = 0xfc;
}

/// `opt` bit for macros and functions that take part in tapping.
pub const OPT_TAP: u8 = 0x1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownAction(pub u16);

/// Four modifier bits (ctrl, shift, alt, gui) on either the left or right hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mods {
    bits: u8,
    right: bool,
}
impl Mods {
    pub const fn left(bits: u8) -> Self {
        Self {
            bits: bits & 0xf,
            right: false,
        }
    }

    pub const fn right(bits: u8) -> Self {
        Self {
            bits: bits & 0xf,
            right: true,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn is_right(&self) -> bool {
        self.right
    }

    pub const fn nibble(&self) -> u8 {
        self.bits
    }

    /// Modifier byte as used in a HID keyboard report.
    pub const fn hid_bits(&self) -> u8 {
        if self.right {
            self.bits << 4
        } else {
            self.bits
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsagePage {
    System = 0,
    Consumer = 1,
}

/// Which edge of a key event a layer operation fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Press = 1,
    Release = 2,
    Both = 3,
}
impl Trigger {
    const fn from_bits(xx: u8) -> Option<Self> {
        match xx & 3 {
            1 => Some(Self::Press),
            2 => Some(Self::Release),
            3 => Some(Self::Both),
            _ => None,
        }
    }

    pub const fn fires(&self, pressed: bool) -> bool {
        match self {
            Self::Press => pressed,
            Self::Release => !pressed,
            Self::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerOpcode {
    Reset(Trigger),
    TapKey(u8),
    TapToggle,
    Invert(Trigger),
    OnOff,
    On(Trigger),
    OffOn,
    Off(Trigger),
    SetClear,
    Set(Trigger),
}
impl LayerOpcode {
    const fn decode(code: u8) -> Option<Self> {
        use layer_code::*;
        Some(match code {
            0x00..=0x03 => match Trigger::from_bits(code) {
                Some(t) => Self::Reset(t),
                None => return None,
            },
            TAP_KEY_MIN..=TAP_KEY_MAX => Self::TapKey(code),
            TAP_TOGGLE => Self::TapToggle,
            ON_OFF => Self::OnOff,
            OFF_ON => Self::OffOn,
            SET_CLEAR => Self::SetClear,
            _ => match (code & 0xfc, Trigger::from_bits(code)) {
                (INVERT, Some(t)) => Self::Invert(t),
                (ON, Some(t)) => Self::On(t),
                (OFF, Some(t)) => Self::Off(t),
                (SET, Some(t)) => Self::Set(t),
                _ => return None,
            },
        })
    }

    const fn encode(&self) -> u8 {
        use layer_code::*;
        match self {
            Self::Reset(t) => RESET | *t as u8,
            Self::TapKey(code) => *code,
            Self::TapToggle => TAP_TOGGLE,
            Self::Invert(t) => INVERT | *t as u8,
            Self::OnOff => ON_OFF,
            Self::OffOn => OFF_ON,
            Self::SetClear => SET_CLEAR,
            Self::On(t) => ON | *t as u8,
            Self::Off(t) => OFF | *t as u8,
            Self::Set(t) => SET | *t as u8,
        }
    }

    pub const fn is_tap_capable(&self) -> bool {
        matches!(self, Self::TapKey(_) | Self::TapToggle)
    }
}

/// What a `ModsOneShotOrTap` action does when tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModsTap {
    OneShot,
    Key(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    NoAction,
    Transparent,
    Key(u8),
    KeyWithMods(Mods, u8),
    ModsOneShotOrTap(Mods, ModsTap),
    Usage(UsagePage, u16),
    MouseKey(u8),
    LayerOp(u8, LayerOpcode),
    OverlayOp(u8, LayerOpcode),
    Macro { id: u8, opt: u8 },
    Command { id: u8, opt: u8 },
    Function { id: u8, opt: u8 },
}

impl Action {
    pub const fn decode(code: u16) -> Result<Self, UnknownAction> {
        let tag = code >> 12;
        let nibble = ((code >> 8) & 0xf) as u8;
        let low = code as u8;

        Ok(match tag {
            kind::LMODS | kind::RMODS => {
                let mods = if tag == kind::RMODS {
                    Mods::right(nibble)
                } else {
                    Mods::left(nibble)
                };
                if low != NO && low < BASIC_MIN {
                    if code != ACTION_TRANSPARENT {
                        return Err(UnknownAction(code));
                    }
                    Self::Transparent
                } else if nibble != 0 {
                    Self::KeyWithMods(mods, low)
                } else if low == NO {
                    Self::NoAction
                } else {
                    Self::Key(low)
                }
            }
            kind::LMODS_TAP | kind::RMODS_TAP => {
                let mods = if tag == kind::RMODS_TAP {
                    Mods::right(nibble)
                } else {
                    Mods::left(nibble)
                };
                Self::ModsOneShotOrTap(
                    mods,
                    if low == 0 {
                        ModsTap::OneShot
                    } else {
                        ModsTap::Key(low)
                    },
                )
            }
            kind::USAGE => {
                let usage = code & 0x3ff;
                match (code >> 10) & 3 {
                    0 => Self::Usage(UsagePage::System, usage),
                    1 => Self::Usage(UsagePage::Consumer, usage),
                    _ => return Err(UnknownAction(code)),
                }
            }
            kind::MOUSEKEY => Self::MouseKey(low),
            kind::LAYER | kind::OVERLAY => match LayerOpcode::decode(low) {
                Some(op) if tag == kind::LAYER => Self::LayerOp(nibble, op),
                Some(op) => Self::OverlayOp(nibble, op),
                None => return Err(UnknownAction(code)),
            },
            kind::MACRO => Self::Macro {
                id: low,
                opt: nibble,
            },
            kind::COMMAND => Self::Command {
                id: low,
                opt: nibble,
            },
            kind::FUNCTION => Self::Function {
                id: low,
                opt: nibble,
            },
            _ => return Err(UnknownAction(code)),
        })
    }

    /// The canonical code for this action. `Action::decode(a.encode()) == Ok(a)` for every action
    /// whose fields are in range. `Key` codes below 0x04 are not keys and encode as no action.
    pub const fn encode(&self) -> u16 {
        const fn act(kind: u16, nibble: u8, low: u8) -> u16 {
            kind << 12 | ((nibble as u16 & 0xf) << 8) | low as u16
        }

        const fn mods_kind(left: u16, mods: &Mods) -> u16 {
            if mods.is_right() {
                left | 1
            } else {
                left
            }
        }

        match self {
            Self::NoAction => ACTION_NO,
            Self::Transparent => ACTION_TRANSPARENT,
            Self::Key(code) if *code < BASIC_MIN => ACTION_NO,
            Self::Key(code) => *code as u16,
            Self::KeyWithMods(mods, code) => act(mods_kind(kind::LMODS, mods), mods.nibble(), *code),
            Self::ModsOneShotOrTap(mods, tap) => act(
                mods_kind(kind::LMODS_TAP, mods),
                mods.nibble(),
                match tap {
                    ModsTap::OneShot => 0,
                    ModsTap::Key(code) => *code,
                },
            ),
            Self::Usage(page, usage) => kind::USAGE << 12 | (*page as u16) << 10 | (*usage & 0x3ff),
            Self::MouseKey(code) => act(kind::MOUSEKEY, 0, *code),
            Self::LayerOp(layer, op) => act(kind::LAYER, *layer, op.encode()),
            Self::OverlayOp(layer, op) => act(kind::OVERLAY, *layer, op.encode()),
            Self::Macro { id, opt } => act(kind::MACRO, *opt, *id),
            Self::Command { id, opt } => act(kind::COMMAND, *opt, *id),
            Self::Function { id, opt } => act(kind::FUNCTION, *opt, *id),
        }
    }

    /// Keys whose meaning depends on tap versus hold and so must go through tapping.
    pub const fn is_tap_capable(&self) -> bool {
        match self {
            Self::ModsOneShotOrTap(..) => true,
            Self::LayerOp(_, op) | Self::OverlayOp(_, op) => op.is_tap_capable(),
            Self::Macro { opt, .. } | Self::Function { opt, .. } => *opt & OPT_TAP != 0,
            _ => false,
        }
    }

    pub const fn momentary_layer(layer: u8) -> Self {
        Self::LayerOp(layer, LayerOpcode::OnOff)
    }

    pub const fn layer_tap_key(layer: u8, code: u8) -> Self {
        Self::LayerOp(layer, LayerOpcode::TapKey(code))
    }

    pub const fn mods_tap_key(mods: Mods, code: u8) -> Self {
        Self::ModsOneShotOrTap(mods, ModsTap::Key(code))
    }

    pub const fn oneshot_mods(mods: Mods) -> Self {
        Self::ModsOneShotOrTap(mods, ModsTap::OneShot)
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod test;
