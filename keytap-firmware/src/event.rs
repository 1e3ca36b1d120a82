use keytap_common::timer::Time16;

/// Matrix location of a key switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPosition {
    row: u8,
    col: u8,
}
impl KeyPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The reserved position carried by the no-event sentinel.
    pub const fn none() -> Self {
        Self {
            row: 0xff,
            col: 0xff,
        }
    }

    pub const fn is_none(&self) -> bool {
        self.row == 0xff && self.col == 0xff
    }

    pub const fn row(&self) -> usize {
        self.row as usize
    }

    pub const fn column(&self) -> usize {
        self.col as usize
    }

    /// Packed form used by sparse keymap layers.
    pub const fn as_code(&self) -> u16 {
        (self.row as u16) << 8 | self.col as u16
    }
}

/// A physical key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: KeyPosition,
    pub pressed: bool,
    pub time: Time16,
}
impl KeyEvent {
    pub const fn new(key: KeyPosition, pressed: bool, time: Time16) -> Self {
        Self { key, pressed, time }
    }

    pub const fn press(row: u8, col: u8, time: u16) -> Self {
        Self::new(KeyPosition::new(row, col), true, Time16(time))
    }

    pub const fn release(row: u8, col: u8, time: u16) -> Self {
        Self::new(KeyPosition::new(row, col), false, Time16(time))
    }

    /// The no-event sentinel. It still carries the time it was sampled so that pending tap
    /// timeouts can be evaluated against it.
    pub const fn tick(time: Time16) -> Self {
        Self {
            key: KeyPosition::none(),
            pressed: false,
            time,
        }
    }

    pub const fn is_none(&self) -> bool {
        self.key.is_none()
    }
}

/// Tapping outcome attached to a record. A count of zero means not (yet) a tap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapState {
    pub(crate) count: u8,
    pub(crate) interrupted: bool,
}
impl TapState {
    pub const MAX_COUNT: u8 = 15;

    pub const fn new(count: u8) -> Self {
        Self {
            count: if count > Self::MAX_COUNT {
                Self::MAX_COUNT
            } else {
                count
            },
            interrupted: false,
        }
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    /// Another key was pressed while this key's tap was still undecided.
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub(crate) fn next(&self) -> Self {
        Self {
            count: if self.count < Self::MAX_COUNT {
                self.count + 1
            } else {
                self.count
            },
            interrupted: self.interrupted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyRecord {
    pub event: KeyEvent,
    pub tap: TapState,
}
impl KeyRecord {
    pub const fn new(event: KeyEvent) -> Self {
        Self {
            event,
            tap: TapState {
                count: 0,
                interrupted: false,
            },
        }
    }

    pub const fn with_tap(event: KeyEvent, tap: TapState) -> Self {
        Self { event, tap }
    }

    pub const fn tap_count(&self) -> u8 {
        self.tap.count
    }

    pub const fn is_none(&self) -> bool {
        self.event.is_none()
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod test;
