use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use heapless::Deque;
use keytap_common::{
    action::UsagePage,
    keycodes::key_range::{is_mouse, MOUSE_MIN},
};

use crate::{add_key_bit, del_key_bit, event::KeyEvent, event::KeyRecord, waiting_buffer::BufferOverflow};

/// Maximum number of events hooks may queue during one `process_event`.
pub const INJECT_SIZE: usize = 4;

/// Receiver of the effects the core produces. Adding or removing something already present or
/// absent must be harmless.
pub trait Host {
    fn register_key(&mut self, code: u8);
    fn unregister_key(&mut self, code: u8);
    fn add_modifiers(&mut self, bits: u8);
    fn remove_modifiers(&mut self, bits: u8);
    fn set_modifiers(&mut self, bits: u8);
    fn get_modifiers(&self) -> u8;
    /// Release every key, mouse key and usage but keep the modifiers.
    fn clear_all_keys_preserving_modifiers(&mut self);
    fn clear_all_including_modifiers(&mut self) {
        self.clear_all_keys_preserving_modifiers();
        self.set_modifiers(0);
    }
    /// A `code` of 0 releases the usage.
    fn send_usage(&mut self, page: UsagePage, code: u16);
    fn mousekey_on(&mut self, code: u8);
    fn mousekey_off(&mut self, code: u8);
}

/// What macro, function and command hooks may touch.
pub struct HookContext<'h> {
    pub host: &'h mut dyn Host,
    injected: &'h mut Deque<KeyEvent, INJECT_SIZE>,
}

impl<'h> HookContext<'h> {
    pub(crate) fn new(
        host: &'h mut dyn Host,
        injected: &'h mut Deque<KeyEvent, INJECT_SIZE>,
    ) -> Self {
        Self { host, injected }
    }

    /// Queue a key event. It is processed once the current event has been fully processed.
    pub fn inject(&mut self, event: KeyEvent) -> Result<(), BufferOverflow> {
        self.injected.push_back(event).map_err(|_| {
            crate::warn!("injected event overflow");
            BufferOverflow
        })
    }
}

/// Extension points for actions the core does not interpret itself. Every method defaults to
/// doing nothing.
pub trait ActionHooks {
    fn play_macro(&mut self, _ctx: &mut HookContext<'_>, _id: u8, _opt: u8, _record: &KeyRecord) {}

    fn call_function(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _id: u8,
        _opt: u8,
        _record: &KeyRecord,
    ) {
    }

    fn run_command(&mut self, _ctx: &mut HookContext<'_>, _id: u8, _opt: u8, _record: &KeyRecord) {}

    /// Called with the raw code of a binding that does not decode.
    fn unknown_action(&mut self, _code: u16) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;
impl ActionHooks for NoHooks {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostEvent {
    Key(u8, bool),
    /// The whole modifier byte after a change.
    Modifiers(u8),
    Usage(UsagePage, u16),
    MouseKey(u8, bool),
    /// Keys, mouse keys and usages released; modifiers unchanged.
    ClearKeys,
    /// Everything released including modifiers.
    Clear,
}

pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, HostEvent, N>);
impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub async fn receive(&self) -> HostEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<HostEvent> {
        self.0.try_receive().ok()
    }

    /// Returns false if the channel was full; in that case the queue is replaced by a single
    /// [HostEvent::Clear].
    fn report(&self, message: HostEvent) -> bool {
        if self.0.try_send(message).is_err() {
            self.0.clear();
            let _ = self.0.try_send(HostEvent::Clear);
            return false;
        }
        true
    }
}

/// A [Host] that keeps the keyboard report state and forwards each visible change over a
/// [ReportChannel].
pub struct ReportHost<'c, M: RawMutex, const N: usize> {
    channel: &'c ReportChannel<M, N>,
    modifiers: u8,
    keys: [u8; crate::KEY_BITS_SIZE],
    usages: [u16; 2],
    mouse: u16,
}

impl<'c, M: RawMutex, const N: usize> ReportHost<'c, M, N> {
    pub fn new(channel: &'c ReportChannel<M, N>) -> Self {
        Self {
            channel,
            modifiers: 0,
            keys: [0; crate::KEY_BITS_SIZE],
            usages: [0; 2],
            mouse: 0,
        }
    }

    pub fn is_key_down(&self, code: u8) -> bool {
        self.keys[(code >> 3) as usize] & (1 << (code & 7)) != 0
    }

    pub fn usage(&self, page: UsagePage) -> u16 {
        self.usages[page as usize]
    }

    pub fn mouse_keys(&self) -> u16 {
        self.mouse
    }

    /// Nothing but possibly modifiers is held.
    pub fn is_idle(&self) -> bool {
        self.keys.iter().all(|b| *b == 0) && self.usages == [0; 2] && self.mouse == 0
    }

    fn report(&mut self, message: HostEvent) {
        if !self.channel.report(message) {
            crate::warn!("report channel full");
            self.keys = [0; crate::KEY_BITS_SIZE];
            self.usages = [0; 2];
            self.mouse = 0;
            self.modifiers = 0;
        }
    }

    fn update_modifiers(&mut self, bits: u8) {
        if self.modifiers != bits {
            self.modifiers = bits;
            self.report(HostEvent::Modifiers(bits));
        }
    }
}

impl<M: RawMutex, const N: usize> Host for ReportHost<'_, M, N> {
    fn register_key(&mut self, code: u8) {
        if add_key_bit(&mut self.keys, code) {
            self.report(HostEvent::Key(code, true));
        }
    }

    fn unregister_key(&mut self, code: u8) {
        if del_key_bit(&mut self.keys, code) {
            self.report(HostEvent::Key(code, false));
        }
    }

    fn add_modifiers(&mut self, bits: u8) {
        self.update_modifiers(self.modifiers | bits);
    }

    fn remove_modifiers(&mut self, bits: u8) {
        self.update_modifiers(self.modifiers & !bits);
    }

    fn set_modifiers(&mut self, bits: u8) {
        self.update_modifiers(bits);
    }

    fn get_modifiers(&self) -> u8 {
        self.modifiers
    }

    fn clear_all_keys_preserving_modifiers(&mut self) {
        if !self.is_idle() {
            self.keys = [0; crate::KEY_BITS_SIZE];
            self.usages = [0; 2];
            self.mouse = 0;
            self.report(HostEvent::ClearKeys);
        }
    }

    fn clear_all_including_modifiers(&mut self) {
        self.keys = [0; crate::KEY_BITS_SIZE];
        self.usages = [0; 2];
        self.mouse = 0;
        self.modifiers = 0;
        self.report(HostEvent::Clear);
    }

    fn send_usage(&mut self, page: UsagePage, code: u16) {
        let last = &mut self.usages[page as usize];
        if *last != code {
            *last = code;
            self.report(HostEvent::Usage(page, code));
        }
    }

    fn mousekey_on(&mut self, code: u8) {
        if is_mouse(code) {
            let bit = 1u16 << (code - MOUSE_MIN);
            if self.mouse & bit == 0 {
                self.mouse |= bit;
                self.report(HostEvent::MouseKey(code, true));
            }
        }
    }

    fn mousekey_off(&mut self, code: u8) {
        if is_mouse(code) {
            let bit = 1u16 << (code - MOUSE_MIN);
            if self.mouse & bit != 0 {
                self.mouse &= !bit;
                self.report(HostEvent::MouseKey(code, false));
            }
        }
    }
}

#[cfg(test)]
#[path = "host_test.rs"]
mod test;
