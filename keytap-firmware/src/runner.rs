use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::raw::{NoopRawMutex, RawMutex},
    channel::Channel,
    signal::Signal,
};
use embassy_time::Instant;
use keytap_common::timer::Time16;

use crate::{
    event::{KeyEvent, KeyPosition},
    host::{ActionHooks, Host},
    keymap::ActionMap,
    tapping::TappingCore,
};

/// A switch change as reported by a matrix scanner. The top bit of `row` is set while the switch
/// is down; [ScanKey::none] marks a scan that found no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanKey {
    row: u8,
    col: u8,
}
impl ScanKey {
    pub const fn new(row: u8, col: u8, is_down: bool) -> Self {
        Self {
            row: row | if is_down { 0x80 } else { 0 },
            col,
        }
    }

    pub const fn none() -> Self {
        Self {
            row: 0xff,
            col: 0xff,
        }
    }

    pub const fn is_none(&self) -> bool {
        self.row == 0xff && self.col == 0xff
    }

    pub const fn row(&self) -> u8 {
        self.row & 0x7f
    }

    pub const fn column(&self) -> u8 {
        self.col
    }

    pub const fn is_down(&self) -> bool {
        self.row & 0x80 == 0x80
    }

    /// Stamp the scan with `time`. An empty scan becomes a tick.
    pub const fn event(&self, time: Time16) -> KeyEvent {
        if self.is_none() {
            KeyEvent::tick(time)
        } else {
            KeyEvent::new(KeyPosition::new(self.row(), self.col), self.is_down(), time)
        }
    }
}

pub struct ScanChannel<M: RawMutex, const N: usize>(Channel<M, ScanKey, N>);
impl<M: RawMutex, const N: usize> Default for ScanChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}
impl<M: RawMutex, const N: usize> ScanChannel<M, N> {
    pub async fn receive(&self) -> ScanKey {
        self.0.receive().await
    }

    pub async fn send(&self, key: ScanKey) {
        self.0.send(key).await
    }

    /// Drops `key` when the channel is full.
    pub fn try_send(&self, key: ScanKey) {
        if self.0.try_send(key).is_err() {
            crate::warn!("scan channel full; dropped {:?}", key);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMessage {
    Reset,
    Exit,
}

#[derive(Default)]
pub struct ControlSignal(Signal<NoopRawMutex, ControlMessage>);
impl ControlSignal {
    pub fn reset(&self) {
        self.0.signal(ControlMessage::Reset);
    }

    pub fn exit(&self) {
        self.0.signal(ControlMessage::Exit);
    }

    async fn wait(&self) -> ControlMessage {
        self.0.wait().await
    }

    #[cfg(test)]
    pub fn try_take(&self) -> Option<ControlMessage> {
        self.0.try_take()
    }
}

impl<K: ActionMap + ?Sized, H: Host, X: ActionHooks, const N: usize> TappingCore<'_, K, H, X, N> {
    /// Feed scans into the core, stamped with the embassy clock, until told to exit. Scanners
    /// should send [ScanKey::none] periodically so held keys settle without further presses.
    pub async fn run<M: RawMutex, const S: usize>(
        &mut self,
        scans: &ScanChannel<M, S>,
        control: &ControlSignal,
    ) {
        loop {
            match select(scans.receive(), control.wait()).await {
                Either::First(scan_key) => {
                    let now = Time16::from_millis(Instant::now().as_millis());
                    self.process_event(scan_key.event(now));
                }
                Either::Second(ControlMessage::Reset) => self.reset(),
                Either::Second(ControlMessage::Exit) => {
                    crate::info!("key event core exit");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod test;
