use keytap_common::globals::{self, feature};

use crate::keymap::LoadError;

/// Runtime settings of the core. Optional behaviours are switched here rather than by build
/// features so one build serves every keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Longest press, and longest gap between sequential taps, that still counts as a tap (ms).
    pub tapping_term: u16,
    /// Tap count that toggles a tap-toggle layer or disables one-shot modifiers.
    pub tapping_toggle: u8,
    pub oneshot: bool,
    pub overlays: bool,
    pub mousekeys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tapping_term: globals::TAPPING_TERM_DEFAULT,
            tapping_toggle: globals::TAPPING_TOGGLE_DEFAULT as u8,
            oneshot: true,
            overlays: true,
            mousekeys: true,
        }
    }
}

impl Config {
    /// Apply one global setting from a keymap image.
    pub fn apply_global(&mut self, id: u16, value: u16) -> Result<(), LoadError> {
        match id {
            globals::TAPPING_TERM if value != 0 => {
                self.tapping_term = value;
            }
            globals::TAPPING_TOGGLE if (2..=15).contains(&value) => {
                self.tapping_toggle = value as u8;
            }
            globals::FEATURE_FLAGS if value & !feature::ALL == 0 => {
                self.oneshot = value & feature::ONESHOT != 0;
                self.overlays = value & feature::OVERLAYS != 0;
                self.mousekeys = value & feature::MOUSEKEYS != 0;
            }
            _ => {
                crate::warn!("invalid global {} = {}", id, value);
                return Err(LoadError::Corrupt);
            }
        }
        Ok(())
    }

    pub fn feature_flags(&self) -> u16 {
        let mut flags = 0;
        if self.oneshot {
            flags |= feature::ONESHOT;
        }
        if self.overlays {
            flags |= feature::OVERLAYS;
        }
        if self.mousekeys {
            flags |= feature::MOUSEKEYS;
        }
        flags
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod test;
