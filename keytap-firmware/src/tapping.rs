//! Tap versus hold disambiguation.
//!
//! A key whose binding is tap capable becomes the tapping candidate when pressed. Events that
//! arrive while the candidate is undecided wait in the [WaitingBuffer] and are replayed, in order,
//! once it settles. A candidate settles as a tap when released within the tapping term, as a hold
//! when the term passes or another key is typed while it is down. Pressing the same key again
//! within the term after a tap counts sequential taps.
//!
//! Time only advances with events; a candidate stays pending until some event, possibly a
//! [KeyEvent::tick], arrives after its term.

use keytap_common::{
    action::{Action, ModsTap},
    keycodes::key_range::is_modifier,
    timer::Time16,
};

use crate::{
    config::Config,
    dispatch::ActionDispatcher,
    event::{KeyEvent, KeyRecord},
    host::{ActionHooks, Host, NoHooks},
    keymap::ActionMap,
    layer::LayerState,
    oneshot::OneShotState,
    waiting_buffer::{WaitingBuffer, WAITING_BUFFER_SIZE},
};

/// The key event core: tapping state, waiting buffer and dispatcher for one keyboard.
pub struct TappingCore<
    'k,
    K: ActionMap + ?Sized,
    H: Host,
    X: ActionHooks = NoHooks,
    const N: usize = WAITING_BUFFER_SIZE,
> {
    keymap: &'k K,
    host: H,
    hooks: X,
    dispatcher: ActionDispatcher,
    waiting: WaitingBuffer<N>,
    tapping_key: Option<KeyRecord>,
}

impl<'k, K: ActionMap + ?Sized, H: Host> TappingCore<'k, K, H> {
    pub fn new(keymap: &'k K, host: H, config: Config) -> Self {
        Self::with_hooks(keymap, host, NoHooks, config)
    }
}

impl<'k, K: ActionMap + ?Sized, H: Host, X: ActionHooks, const N: usize>
    TappingCore<'k, K, H, X, N>
{
    pub fn with_hooks(keymap: &'k K, host: H, hooks: X, config: Config) -> Self {
        Self {
            keymap,
            host,
            hooks,
            dispatcher: ActionDispatcher::new(config, 0),
            waiting: WaitingBuffer::default(),
            tapping_key: None,
        }
    }

    /// Start on `layer` instead of layer 0; [Self::reset] returns to it too.
    pub fn with_default_layer(mut self, layer: u8) -> Self {
        self.dispatcher = ActionDispatcher::new(*self.dispatcher.config(), layer);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn hooks(&self) -> &X {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut X {
        &mut self.hooks
    }

    pub fn layers(&self) -> &LayerState {
        self.dispatcher.layers()
    }

    pub fn layers_mut(&mut self) -> &mut LayerState {
        self.dispatcher.layers_mut()
    }

    pub fn oneshot(&self) -> &OneShotState {
        self.dispatcher.oneshot()
    }

    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    pub fn set_config(&mut self, config: Config) {
        self.dispatcher.set_config(config);
    }

    pub fn tapping_key(&self) -> Option<&KeyRecord> {
        self.tapping_key.as_ref()
    }

    /// Number of events waiting for the tapping candidate to settle.
    pub fn pending(&self) -> usize {
        self.waiting.len()
    }

    /// Process one key event, every buffered event it settles and any events hooks injected
    /// along the way.
    pub fn process_event(&mut self, event: KeyEvent) {
        self.exec(event);
        while let Some(event) = self.dispatcher.take_injected() {
            crate::debug!("injected {:?}", event);
            self.exec(event);
        }
    }

    /// Let `time` pass without a key event so pending timeouts are evaluated.
    pub fn tick(&mut self, time: Time16) {
        self.process_event(KeyEvent::tick(time));
    }

    /// Release everything, drop pending events and the candidate, and restore the start up
    /// layers.
    pub fn reset(&mut self) {
        crate::info!("reset key event core");
        self.host.clear_all_including_modifiers();
        self.waiting.clear();
        self.tapping_key = None;
        self.dispatcher.reset();
    }

    fn exec(&mut self, event: KeyEvent) {
        if !event.is_none() {
            crate::debug!("event {:?}", event);
        }

        let mut record = KeyRecord::new(event);
        if !self.process_tapping(&mut record) && self.waiting.enqueue(record).is_err() {
            self.overflow();
        }

        self.drain();
    }

    fn overflow(&mut self) {
        crate::warn!("waiting buffer overflow; clearing keyboard");
        self.host.clear_all_including_modifiers();
        self.waiting.clear();
        self.tapping_key = None;
    }

    /// Replay buffered records until one can not be settled yet. A record that changed the
    /// candidate without being consumed is tried again against the new candidate state.
    fn drain(&mut self) {
        while let Some(mut record) = self.waiting.front().copied() {
            let before = self.tapping_key;
            if self.process_tapping(&mut record) {
                self.waiting.pop_front();
            } else {
                if let Some(front) = self.waiting.front_mut() {
                    *front = record;
                }
                if self.tapping_key == before {
                    break;
                }
            }
        }
    }

    /// Returns true when the record was consumed; false when it must wait in the buffer.
    fn process_tapping(&mut self, keyp: &mut KeyRecord) -> bool {
        let Some(mut tapping) = self.tapping_key else {
            return self.process_idle(keyp);
        };

        let event = keyp.event;
        let within = event
            .time
            .is_within(tapping.event.time, self.config().tapping_term);
        let same_key = event.key == tapping.event.key;

        if !tapping.event.pressed {
            if !within {
                crate::debug!("tapping: timeout after last tap");
                self.tapping_key = None;
                return self.process_idle(keyp);
            }
            if !event.pressed {
                self.dispatch(keyp);
            } else if same_key {
                if !tapping.tap.interrupted && tapping.tap.count > 0 {
                    keyp.tap = tapping.tap.next();
                    crate::debug!("tapping: tap press {}", keyp.tap.count);
                    self.dispatch(keyp);
                    self.tapping_key = Some(*keyp);
                } else {
                    crate::debug!("tapping: restart");
                    self.start_tapping(keyp);
                }
            } else if self.is_tap_key(keyp) {
                crate::debug!("tapping: start with interfering other tap");
                self.start_tapping(keyp);
            } else {
                tapping.tap.interrupted = true;
                self.tapping_key = Some(tapping);
                self.dispatch(keyp);
            }
            return true;
        }

        if tapping.tap.count == 0 {
            if !within {
                crate::debug!("tapping: timeout; hold");
                self.dispatch(&mut tapping);
                self.tapping_key = None;
                return false;
            }

            if same_key && !event.pressed {
                crate::debug!("tapping: first tap");
                tapping.tap.count = 1;
                self.dispatch(&mut tapping);
                keyp.tap = tapping.tap;
                self.tapping_key = if tapping.tap.count == 0 {
                    crate::debug!("tapping: tap cancelled; hold");
                    None
                } else {
                    Some(tapping)
                };
                return false;
            }

            if !event.pressed && !event.is_none() {
                if self.waiting.typed(&event) {
                    crate::debug!("tapping: interfered by typed key; hold");
                    self.dispatch(&mut tapping);
                    self.tapping_key = None;
                    return false;
                }
                if self.retains_modifier(keyp) {
                    return false;
                }
                crate::debug!("tapping: release of key pressed before tapping");
                self.dispatch(keyp);
                return true;
            }

            if event.pressed {
                tapping.tap.interrupted = true;
                self.tapping_key = Some(tapping);
            }
            return false;
        }

        if same_key && !event.pressed {
            crate::debug!("tapping: tap release {}", tapping.tap.count);
            keyp.tap = tapping.tap;
            self.dispatch(keyp);
            self.tapping_key = if within { Some(*keyp) } else { None };
            return true;
        }

        if event.pressed && self.is_tap_key(keyp) {
            if tapping.tap.count > 1 {
                crate::debug!("tapping: start new tap releasing last tap");
                let mut release = KeyRecord::with_tap(
                    KeyEvent::new(tapping.event.key, false, event.time),
                    tapping.tap,
                );
                self.dispatch(&mut release);
            }
            self.start_tapping(keyp);
            return true;
        }

        self.dispatch(keyp);
        true
    }

    fn process_idle(&mut self, keyp: &mut KeyRecord) -> bool {
        if keyp.event.pressed && self.is_tap_key(keyp) {
            crate::debug!("tapping: start");
            self.start_tapping(keyp);
        } else {
            self.dispatch(keyp);
        }
        true
    }

    fn start_tapping(&mut self, keyp: &KeyRecord) {
        self.tapping_key = Some(*keyp);
        self.scan_tap();
    }

    /// Settle a fresh candidate at once if its release is already buffered within the term.
    fn scan_tap(&mut self) {
        let Some(mut tapping) = self.tapping_key else {
            return;
        };
        if tapping.tap.count > 0 || !tapping.event.pressed {
            return;
        }

        let term = self.config().tapping_term;
        let Some(i) = self.waiting.iter().position(|r| {
            r.event.key == tapping.event.key
                && !r.event.pressed
                && r.event.time.is_within(tapping.event.time, term)
        }) else {
            return;
        };

        crate::debug!("tapping: tap release already buffered");
        tapping.tap.count = 1;
        self.dispatch(&mut tapping);
        if let Some(r) = self.waiting.iter_mut().nth(i) {
            r.tap = tapping.tap;
        }
        self.tapping_key = if tapping.tap.count == 0 {
            None
        } else {
            Some(tapping)
        };
    }

    fn is_tap_key(&self, keyp: &KeyRecord) -> bool {
        self.dispatcher.is_tap_key(self.keymap, keyp.event.key)
    }

    /// Modifier releases are held back while a candidate is undecided so the modifier still
    /// applies to its tap.
    fn retains_modifier(&self, keyp: &KeyRecord) -> bool {
        match self.dispatcher.resolve(self.keymap, keyp.event.key) {
            Ok(Action::Key(code)) => is_modifier(code),
            Ok(Action::KeyWithMods(_, code)) => code == 0 || is_modifier(code),
            Ok(Action::ModsOneShotOrTap(mods, tap)) => {
                (!mods.is_empty() && keyp.tap.count == 0)
                    || matches!(tap, ModsTap::Key(code) if is_modifier(code))
            }
            _ => false,
        }
    }

    fn dispatch(&mut self, record: &mut KeyRecord) {
        let waiting_pressed = self.waiting.has_other_pressed(record.event.key);
        self.dispatcher.dispatch(
            self.keymap,
            &mut self.host,
            &mut self.hooks,
            record,
            waiting_pressed,
        );
    }
}

#[cfg(test)]
#[path = "tapping_test.rs"]
mod test;
