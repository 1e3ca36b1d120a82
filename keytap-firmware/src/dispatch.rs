use heapless::Deque;
use keytap_common::{
    action::{Action, LayerOpcode, Mods, ModsTap},
    keycodes::key_range::{is_key, is_modifier, is_mouse, modifier_bit, NO},
};

use crate::{
    config::Config,
    event::{KeyEvent, KeyPosition, KeyRecord},
    host::{ActionHooks, Host, HookContext, INJECT_SIZE},
    keymap::{self, ActionMap},
    layer::{LayerState, LayerTarget},
    oneshot::OneShotState,
};

/// Applies resolved actions: owns the layer and one-shot state and drives the [Host].
pub struct ActionDispatcher {
    layers: LayerState,
    oneshot: OneShotState,
    config: Config,
    default_layer: u8,
    injected: Deque<KeyEvent, INJECT_SIZE>,
}

impl ActionDispatcher {
    pub fn new(config: Config, default_layer: u8) -> Self {
        Self {
            layers: LayerState::new(default_layer),
            oneshot: OneShotState::default(),
            config,
            default_layer,
            injected: Deque::new(),
        }
    }

    pub fn layers(&self) -> &LayerState {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerState {
        &mut self.layers
    }

    pub fn oneshot(&self) -> &OneShotState {
        &self.oneshot
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Restore the start up layers, forget one-shot modifiers and pending injected events.
    pub fn reset(&mut self) {
        self.layers = LayerState::new(self.default_layer);
        self.oneshot = OneShotState::default();
        self.injected.clear();
    }

    pub fn resolve<M: ActionMap + ?Sized>(
        &self,
        keymap: &M,
        key: KeyPosition,
    ) -> Result<Action, keytap_common::action::UnknownAction> {
        keymap::resolve(keymap, &self.layers, &self.config, key)
    }

    /// The binding currently under `key` needs tap versus hold disambiguation.
    pub fn is_tap_key<M: ActionMap + ?Sized>(&self, keymap: &M, key: KeyPosition) -> bool {
        !key.is_none()
            && self
                .resolve(keymap, key)
                .map(|a| a.is_tap_capable())
                .unwrap_or(false)
    }

    pub(crate) fn take_injected(&mut self) -> Option<KeyEvent> {
        self.injected.pop_front()
    }

    /// Apply the action bound to the record's key. `waiting_pressed` reports whether the waiting
    /// buffer holds a press of another key; an interrupted mods-tap key uses it to turn its tap into a hold by
    /// setting the record's tap count to zero.
    pub fn dispatch<M: ActionMap + ?Sized, H: Host, X: ActionHooks>(
        &mut self,
        keymap: &M,
        host: &mut H,
        hooks: &mut X,
        record: &mut KeyRecord,
        waiting_pressed: bool,
    ) {
        let event = record.event;
        if event.is_none() {
            return;
        }

        let action = match self.resolve(keymap, event.key) {
            Ok(action) => action,
            Err(err) => {
                crate::warn!("unknown action {:?}", err.0);
                hooks.unknown_action(err.0);
                return;
            }
        };
        crate::debug!("action {:?} {:?}", action, record);

        let pressed = event.pressed;
        match action {
            Action::NoAction | Action::Transparent => {}
            Action::Key(code) => {
                if pressed {
                    self.register_code(host, code);
                } else {
                    self.unregister_code(host, code);
                }
            }
            Action::KeyWithMods(mods, code) => {
                let bits = mods.hid_bits();
                if pressed {
                    let saved = host.get_modifiers();
                    host.add_modifiers(bits);
                    self.register_code(host, code);
                    if code != NO {
                        host.set_modifiers(saved);
                    }
                } else {
                    if code == NO {
                        host.remove_modifiers(bits);
                    }
                    self.unregister_code(host, code);
                }
            }
            Action::ModsOneShotOrTap(mods, ModsTap::OneShot) => {
                self.oneshot_mods(host, mods, record);
            }
            Action::ModsOneShotOrTap(mods, ModsTap::Key(code)) => {
                let bits = mods.hid_bits();
                let count = record.tap.count;
                if pressed {
                    if count > 0 {
                        if record.tap.interrupted || waiting_pressed {
                            crate::debug!("mods tap: cancel tap, add mods");
                            record.tap.count = 0;
                            host.add_modifiers(bits);
                        } else {
                            self.register_code(host, code);
                        }
                    } else {
                        host.add_modifiers(bits);
                    }
                } else if count > 0 {
                    self.unregister_code(host, code);
                } else {
                    host.remove_modifiers(bits);
                }
            }
            Action::Usage(page, code) => {
                host.send_usage(page, if pressed { code } else { 0 });
            }
            Action::MouseKey(code) => {
                if self.config.mousekeys {
                    if pressed {
                        host.mousekey_on(code);
                    } else {
                        host.mousekey_off(code);
                    }
                }
            }
            Action::LayerOp(layer, op) => {
                self.layer_op(host, LayerTarget::Keymap, layer, op, record);
            }
            Action::OverlayOp(layer, op) => {
                if self.config.overlays {
                    self.layer_op(host, LayerTarget::Overlay, layer, op, record);
                }
            }
            Action::Macro { id, opt } => {
                let mut ctx = HookContext::new(host, &mut self.injected);
                hooks.play_macro(&mut ctx, id, opt, record);
            }
            Action::Command { id, opt } => {
                let mut ctx = HookContext::new(host, &mut self.injected);
                hooks.run_command(&mut ctx, id, opt, record);
            }
            Action::Function { id, opt } => {
                let mut ctx = HookContext::new(host, &mut self.injected);
                hooks.call_function(&mut ctx, id, opt, record);
            }
        }
    }

    /// Press a keycode. An armed one-shot modifier applies to this key only.
    pub fn register_code<H: Host>(&mut self, host: &mut H, code: u8) {
        if is_key(code) {
            match self.take_oneshot() {
                Some(mods) => {
                    let saved = host.get_modifiers();
                    host.add_modifiers(mods);
                    host.register_key(code);
                    host.set_modifiers(saved);
                }
                None => host.register_key(code),
            }
        } else if is_modifier(code) {
            host.add_modifiers(modifier_bit(code));
        } else if is_mouse(code) && self.config.mousekeys {
            host.mousekey_on(code);
        }
    }

    pub fn unregister_code<H: Host>(&mut self, host: &mut H, code: u8) {
        if is_key(code) {
            host.unregister_key(code);
        } else if is_modifier(code) {
            host.remove_modifiers(modifier_bit(code));
        } else if is_mouse(code) && self.config.mousekeys {
            host.mousekey_off(code);
        }
    }

    fn take_oneshot(&mut self) -> Option<u8> {
        if self.config.oneshot {
            self.oneshot.take()
        } else {
            None
        }
    }

    fn oneshot_mods<H: Host>(&mut self, host: &mut H, mods: Mods, record: &KeyRecord) {
        let bits = mods.hid_bits();
        let count = record.tap.count;

        if !self.config.oneshot {
            if record.event.pressed {
                host.add_modifiers(bits);
            } else {
                host.remove_modifiers(bits);
            }
            return;
        }

        if record.event.pressed {
            if count == 0 {
                host.add_modifiers(bits);
            } else if count == 1 {
                self.oneshot.start(bits, record.event.time);
            } else if count == self.config.tapping_toggle {
                self.oneshot.toggle();
            } else {
                // double tap cancels oneshot and works as a normal modifier
                self.oneshot.cancel();
                host.add_modifiers(bits);
            }
        } else {
            if count == 0 {
                // held; not a oneshot
                self.oneshot.cancel();
            }
            host.remove_modifiers(bits);
        }
    }

    fn layer_op<H: Host>(
        &mut self,
        host: &mut H,
        target: LayerTarget,
        layer: u8,
        op: LayerOpcode,
        record: &KeyRecord,
    ) {
        let pressed = record.event.pressed;
        let count = record.tap.count;
        let changed = match op {
            LayerOpcode::Reset(t) => t.fires(pressed) && self.layers.reset(target, layer),
            LayerOpcode::TapKey(code) => {
                if count > 0 {
                    if pressed {
                        self.register_code(host, code);
                    } else {
                        self.unregister_code(host, code);
                    }
                    false
                } else if pressed {
                    self.layers.on(target, layer)
                } else {
                    self.layers.off(target, layer)
                }
            }
            LayerOpcode::TapToggle => {
                if pressed {
                    count < self.config.tapping_toggle && self.layers.invert(target, layer)
                } else {
                    self.layers.invert(target, layer)
                }
            }
            LayerOpcode::Invert(t) => t.fires(pressed) && self.layers.invert(target, layer),
            LayerOpcode::OnOff => {
                if pressed {
                    self.layers.on(target, layer)
                } else {
                    self.layers.off(target, layer)
                }
            }
            LayerOpcode::On(t) => t.fires(pressed) && self.layers.on(target, layer),
            LayerOpcode::OffOn => {
                if pressed {
                    self.layers.off(target, layer)
                } else {
                    self.layers.on(target, layer)
                }
            }
            LayerOpcode::Off(t) => t.fires(pressed) && self.layers.off(target, layer),
            LayerOpcode::SetClear => {
                if pressed {
                    self.layers.set(target, layer)
                } else {
                    self.layers.set_mask(target, 0)
                }
            }
            LayerOpcode::Set(t) => t.fires(pressed) && self.layers.set(target, layer),
        };

        if changed {
            host.clear_all_keys_preserving_modifiers();
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod test;
