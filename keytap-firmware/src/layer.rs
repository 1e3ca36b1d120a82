/// Which layer mask an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerTarget {
    Keymap,
    Overlay,
}

/// Active layers. Bit `n` of a mask set means layer `n` is active. `default_layer` is used when no
/// active layer supplies a binding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    default_layer: u8,
    keymap_mask: u16,
    overlay_mask: u16,
}

impl LayerState {
    pub const fn new(default_layer: u8) -> Self {
        Self {
            default_layer: default_layer & 0xf,
            keymap_mask: 0,
            overlay_mask: 0,
        }
    }

    pub const fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub const fn keymap_mask(&self) -> u16 {
        self.keymap_mask
    }

    pub const fn overlay_mask(&self) -> u16 {
        self.overlay_mask
    }

    pub const fn mask(&self, target: LayerTarget) -> u16 {
        match target {
            LayerTarget::Keymap => self.keymap_mask,
            LayerTarget::Overlay => self.overlay_mask,
        }
    }

    pub fn is_on(&self, target: LayerTarget, layer: u8) -> bool {
        self.mask(target) & bit(layer) != 0
    }

    /// Returns true if the default layer changed.
    pub fn set_default_layer(&mut self, layer: u8) -> bool {
        let old = self.default_layer;
        self.default_layer = layer & 0xf;
        crate::debug!("default layer {}", self.default_layer);
        old != self.default_layer
    }

    /// Reset the target: the keymap target sets the default layer, the overlay target clears every
    /// overlay.
    pub fn reset(&mut self, target: LayerTarget, layer: u8) -> bool {
        match target {
            LayerTarget::Keymap => self.set_default_layer(layer),
            LayerTarget::Overlay => self.set_mask(LayerTarget::Overlay, 0),
        }
    }

    pub fn on(&mut self, target: LayerTarget, layer: u8) -> bool {
        self.set_mask(target, self.mask(target) | bit(layer))
    }

    pub fn off(&mut self, target: LayerTarget, layer: u8) -> bool {
        self.set_mask(target, self.mask(target) & !bit(layer))
    }

    pub fn invert(&mut self, target: LayerTarget, layer: u8) -> bool {
        self.set_mask(target, self.mask(target) ^ bit(layer))
    }

    /// Make `layer` the only active layer of the target.
    pub fn set(&mut self, target: LayerTarget, layer: u8) -> bool {
        self.set_mask(target, bit(layer))
    }

    /// Replace the whole mask. Returns true if it changed.
    pub fn set_mask(&mut self, target: LayerTarget, mask: u16) -> bool {
        let m = match target {
            LayerTarget::Keymap => &mut self.keymap_mask,
            LayerTarget::Overlay => &mut self.overlay_mask,
        };
        if *m == mask {
            return false;
        }
        *m = mask;
        crate::debug!("{:?} mask {:?}", target, mask);
        true
    }

    /// Turn off every keymap and overlay layer, keeping the default layer.
    pub fn clear(&mut self) {
        self.keymap_mask = 0;
        self.overlay_mask = 0;
    }
}

const fn bit(layer: u8) -> u16 {
    1 << (layer & 0xf)
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod test;
