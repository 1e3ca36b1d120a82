#![no_std]
pub mod action;
pub mod globals;
pub mod keycodes;
pub mod timer;

/// Version of the binary keymap image format. The first word of every image.
pub const PROTOCOL_VERSION: u16 = 1;
