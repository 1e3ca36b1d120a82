use keytap_common::timer::Time16;

/// Modifiers armed by a single tap that apply to the next key registered, and only that key.
///
/// Hold works as a normal modifier, one tap arms, a double tap cancels and the configured toggle
/// count enables or disables the feature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OneShotState {
    mods: u8,
    time: Time16,
    ready: bool,
    disabled: bool,
}

impl OneShotState {
    pub fn start(&mut self, mods: u8, time: Time16) {
        crate::debug!("oneshot start {:?}", mods);
        self.mods = mods;
        self.time = time;
        self.ready = true;
    }

    pub fn cancel(&mut self) {
        self.mods = 0;
        self.time = Time16::default();
        self.ready = false;
    }

    pub fn toggle(&mut self) {
        self.disabled = !self.disabled;
        crate::debug!("oneshot disabled {}", self.disabled);
    }

    /// Consume the armed modifiers for one key registration.
    pub fn take(&mut self) -> Option<u8> {
        if self.is_armed() {
            self.ready = false;
            Some(self.mods)
        } else {
            None
        }
    }

    pub const fn is_armed(&self) -> bool {
        self.mods != 0 && self.ready && !self.disabled
    }

    pub const fn mods(&self) -> u8 {
        self.mods
    }

    pub const fn time(&self) -> Time16 {
        self.time
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
#[path = "oneshot_test.rs"]
mod test;
