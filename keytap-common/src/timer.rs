/// A millisecond timestamp from a free running 16 bit counter. It wraps roughly every 65 seconds so
/// timestamps must only be compared through the wrapping helpers below, never with `<`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time16(pub u16);

impl Time16 {
    pub const fn new(ms: u16) -> Self {
        Self(ms)
    }

    /// Truncate a wide millisecond clock to the 16 bit counter.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms as u16)
    }

    pub const fn as_millis(self) -> u16 {
        self.0
    }

    pub const fn wrapping_add(self, ms: u16) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Milliseconds from `earlier` to `self` using wrapping subtraction.
    pub const fn elapsed_since(self, earlier: Time16) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self` is the same as or later than `other`. Only meaningful when the two are less than
    /// half the counter range apart.
    pub const fn is_at_or_after(self, other: Time16) -> bool {
        self.0.wrapping_sub(other.0) as i16 >= 0
    }

    /// `self` falls in the window `[start, start + term)`.
    pub const fn is_within(self, start: Time16, term: u16) -> bool {
        self.is_at_or_after(start) && self.elapsed_since(start) < term
    }
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod test;
