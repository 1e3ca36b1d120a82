use keytap_common::{
    action::{Action, UnknownAction, ACTION_NO, ACTION_TRANSPARENT},
    PROTOCOL_VERSION,
};

use crate::{
    config::Config,
    event::KeyPosition,
    layer::{LayerState, LayerTarget},
};

pub const MAX_LAYERS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    OutOfSpace,
    VersionMismatch,
    RowColMismatch,
    Corrupt,
}

/// A table of bindings: one of the sixteen keymap layers or one of the sixteen overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerId {
    Keymap(u8),
    Overlay(u8),
}

impl LayerId {
    pub const fn new(target: LayerTarget, layer: u8) -> Self {
        match target {
            LayerTarget::Keymap => Self::Keymap(layer),
            LayerTarget::Overlay => Self::Overlay(layer),
        }
    }
}

/// Source of raw action codes. Missing layers and positions read as transparent.
pub trait ActionMap {
    fn action_code(&self, layer: LayerId, key: KeyPosition) -> u16;
}

impl<M: ActionMap + ?Sized> ActionMap for &M {
    fn action_code(&self, layer: LayerId, key: KeyPosition) -> u16 {
        (**self).action_code(layer, key)
    }
}

/// Find the action bound to `key`.
///
/// Active overlays are searched from the highest bit down, then active keymap layers the same
/// way. The first binding that is not transparent wins; if there is none the default layer's
/// binding is used and a transparent default resolves to [Action::NoAction].
pub fn resolve<M: ActionMap + ?Sized>(
    map: &M,
    layers: &LayerState,
    config: &Config,
    key: KeyPosition,
) -> Result<Action, UnknownAction> {
    let search = |target: LayerTarget| {
        let mask = layers.mask(target);
        (0..MAX_LAYERS as u8)
            .rev()
            .filter(move |n| mask & (1u16 << *n) != 0)
            .map(move |n| map.action_code(LayerId::new(target, n), key))
            .find(|code| *code != ACTION_TRANSPARENT)
    };

    let code = if config.overlays {
        search(LayerTarget::Overlay)
    } else {
        None
    }
    .or_else(|| search(LayerTarget::Keymap))
    .unwrap_or_else(
        || match map.action_code(LayerId::Keymap(layers.default_layer()), key) {
            ACTION_TRANSPARENT => ACTION_NO,
            code => code,
        },
    );

    Action::decode(code)
}

/// Compiled in keymap tables indexed `[layer][row][column]`.
pub struct StaticKeymap<'a, const ROWS: usize, const COLS: usize> {
    keymap: &'a [[[u16; COLS]; ROWS]],
    overlays: &'a [[[u16; COLS]; ROWS]],
}

impl<'a, const ROWS: usize, const COLS: usize> StaticKeymap<'a, ROWS, COLS> {
    pub const fn new(keymap: &'a [[[u16; COLS]; ROWS]]) -> Self {
        Self {
            keymap,
            overlays: &[],
        }
    }

    pub const fn with_overlays(self, overlays: &'a [[[u16; COLS]; ROWS]]) -> Self {
        Self {
            keymap: self.keymap,
            overlays,
        }
    }
}

impl<const ROWS: usize, const COLS: usize> ActionMap for StaticKeymap<'_, ROWS, COLS> {
    fn action_code(&self, layer: LayerId, key: KeyPosition) -> u16 {
        let (tables, n) = match layer {
            LayerId::Keymap(n) => (self.keymap, n),
            LayerId::Overlay(n) => (self.overlays, n),
        };
        tables
            .get(n as usize)
            .and_then(|t| t.get(key.row()))
            .and_then(|r| r.get(key.column()))
            .copied()
            .unwrap_or(ACTION_TRANSPARENT)
    }
}

/// One layer body of a loaded [Keymap].
#[derive(Debug)]
pub struct Layer<'l, const ROWS: usize, const COLS: usize>(&'l [u16]);

impl<const ROWS: usize, const COLS: usize> Layer<'_, ROWS, COLS> {
    pub fn get(&self, key: KeyPosition) -> u16 {
        if self.0.len() == ROWS * COLS {
            if key.row() < ROWS && key.column() < COLS {
                self.0[key.row() * COLS + key.column()]
            } else {
                ACTION_TRANSPARENT
            }
        } else {
            search_code(self.0, key.as_code())
        }
    }

    pub fn is_dense(&self) -> bool {
        self.0.len() == ROWS * COLS
    }
}

/// A keymap loaded from a binary image.
pub struct Keymap<const ROWS: usize, const COLS: usize, const SIZE: usize> {
    codes: [u16; SIZE],
    keymap_count: usize,
    overlay_count: usize,
    config: Config,
}

impl<const ROWS: usize, const COLS: usize, const SIZE: usize> Default
    for Keymap<ROWS, COLS, SIZE>
{
    fn default() -> Self {
        Self {
            codes: [0; SIZE],
            keymap_count: 0,
            overlay_count: 0,
            config: Config::default(),
        }
    }
}

impl<const ROWS: usize, const COLS: usize, const SIZE: usize> Keymap<ROWS, COLS, SIZE> {
    /// Load a keymap image. The format of the image is as follows:
    ///
    /// protocol version
    /// row_count (high byte), column_count (low byte) should match `ROWS` and `COLS`
    /// keymap layer count, overlay layer count
    /// globals word count followed by (id, value) pairs
    /// layer directory, then layer bodies.
    /// The directory holds one start index per layer (keymap layers first) plus an end index,
    /// counted from the start of the directory.
    /// A layer is dense if its size == ROWS * COLS, otherwise it is a list of ordered tuples
    /// where the first word is row << 8 | column and the next word is the action code.
    ///
    /// On error the keymap is left empty and the configuration is the default.
    pub fn load(&mut self, iter: impl IntoIterator<Item = u16>) -> Result<(), LoadError> {
        let result = self.load_image(iter);
        if result.is_err() {
            *self = Self::default();
        }
        result
    }

    fn load_image(&mut self, iter: impl IntoIterator<Item = u16>) -> Result<(), LoadError> {
        let mut iter = iter.into_iter();
        let mut next = || iter.next().ok_or(LoadError::Corrupt);
        if next()? != PROTOCOL_VERSION {
            return Err(LoadError::VersionMismatch);
        }
        {
            let n = next()?;
            if (n >> 8) as usize != ROWS || (n & 0xff) as usize != COLS {
                return Err(LoadError::RowColMismatch);
            }
        }

        let keymap_count = next()? as usize;
        let overlay_count = next()? as usize;
        if keymap_count == 0 || keymap_count > MAX_LAYERS || overlay_count > MAX_LAYERS {
            crate::warn!(
                "corrupt keymap: layer counts {} {} out of range",
                keymap_count,
                overlay_count
            );
            return Err(LoadError::Corrupt);
        }

        let globals_count = next()?;
        if globals_count & 1 != 0 {
            crate::warn!("corrupt keymap: globals_count is wrong");
            return Err(LoadError::Corrupt);
        }
        let mut config = Config::default();
        for _ in 0..globals_count / 2 {
            let id = next()?;
            config.apply_global(id, next()?)?;
        }

        let dir_len = keymap_count + overlay_count + 1;
        let mut len = 0;
        for code in iter {
            *self.codes.get_mut(len).ok_or(LoadError::OutOfSpace)? = code;
            len += 1;
        }

        if len < dir_len || self.codes[dir_len - 1] as usize != len {
            crate::warn!("corrupt keymap: image length {} does not match directory", len);
            return Err(LoadError::Corrupt);
        }

        let mut p = dir_len;
        for i in 0..dir_len - 1 {
            let s = self.codes[i] as usize;
            let e = self.codes[i + 1] as usize;
            if s != p || e < s || e > len {
                crate::warn!("corrupt keymap: layer {} index is invalid", i);
                return Err(LoadError::Corrupt);
            }
            let body = &self.codes[s..e];
            if body.len() != ROWS * COLS && !is_sorted_pairs(body) {
                crate::warn!("corrupt keymap: sparse layer {} is malformed", i);
                return Err(LoadError::Corrupt);
            }
            p = e;
        }

        self.keymap_count = keymap_count;
        self.overlay_count = overlay_count;
        self.config = config;
        crate::debug!(
            "keymap loaded: {} layers {} overlays",
            keymap_count,
            overlay_count
        );
        Ok(())
    }

    /// The default configuration updated with the globals of the loaded image.
    pub fn config(&self) -> Config {
        self.config
    }

    pub fn keymap_count(&self) -> usize {
        self.keymap_count
    }

    pub fn overlay_count(&self) -> usize {
        self.overlay_count
    }

    pub fn get_layer(&self, layer: LayerId) -> Option<Layer<'_, ROWS, COLS>> {
        let idx = match layer {
            LayerId::Keymap(n) if (n as usize) < self.keymap_count => n as usize,
            LayerId::Overlay(n) if (n as usize) < self.overlay_count => {
                self.keymap_count + n as usize
            }
            _ => return None,
        };

        let s = self.codes[idx] as usize;
        let e = self.codes[idx + 1] as usize;
        self.codes.get(s..e).map(Layer)
    }
}

impl<const ROWS: usize, const COLS: usize, const SIZE: usize> ActionMap
    for Keymap<ROWS, COLS, SIZE>
{
    fn action_code(&self, layer: LayerId, key: KeyPosition) -> u16 {
        self.get_layer(layer)
            .map(|l| l.get(key))
            .unwrap_or(ACTION_TRANSPARENT)
    }
}

fn is_sorted_pairs(codes: &[u16]) -> bool {
    codes.len() & 1 == 0
        && codes
            .chunks_exact(2)
            .zip(codes.chunks_exact(2).skip(1))
            .all(|(a, b)| a[0] < b[0])
}

fn search_code(codes: &[u16], cmp: u16) -> u16 {
    let mut lo = 0;
    let mut hi = codes.len() >> 1;

    while lo < hi {
        let mid = (lo + hi) >> 1;
        let v = codes[mid << 1];

        #[allow(clippy::comparison_chain)]
        if cmp < v {
            hi = mid;
        } else if cmp > v {
            lo = mid + 1;
        } else {
            return codes[(mid << 1) + 1];
        }
    }
    ACTION_TRANSPARENT
}

#[cfg(test)]
#[path = "keymap_test.rs"]
mod test;
