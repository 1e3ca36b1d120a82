#![no_std]
#[macro_use]
mod macros;

pub mod config;
pub mod dispatch;
pub mod event;
pub mod host;
pub mod keymap;
pub mod layer;
pub mod oneshot;
pub mod runner;
pub mod tapping;
pub mod waiting_buffer;

#[cfg(any(test, feature = "test-utils"))]
pub mod time_driver_test_stub;

pub use keytap_common::{
    action::{Action, UnknownAction},
    timer::Time16,
};

pub(crate) const KEY_BITS_SIZE: usize = 32;

fn add_bit<const SIZE: usize>(keys_down: &mut [u8], kc: u8) -> bool {
    let i = (kc >> 3) as usize;
    if i >= SIZE || i >= keys_down.len() {
        crate::warn!("invalid key! {}", kc);
        return false;
    }
    let bp = 1 << (kc & 7);
    let old = keys_down[i];
    keys_down[i] |= bp;
    old & bp == 0
}

fn del_bit<const SIZE: usize>(keys_down: &mut [u8], kc: u8) -> bool {
    let i = (kc >> 3) as usize;
    if i >= SIZE || i >= keys_down.len() {
        crate::warn!("invalid key! {}", kc);
        return false;
    }
    let bp = !(1 << (kc & 7));
    let old = keys_down[i];
    keys_down[i] &= bp;
    old | bp == 0xff
}

fn add_key_bit(keys_down: &mut [u8], kc: u8) -> bool {
    add_bit::<KEY_BITS_SIZE>(keys_down, kc)
}

fn del_key_bit(keys_down: &mut [u8], kc: u8) -> bool {
    del_bit::<KEY_BITS_SIZE>(keys_down, kc)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
