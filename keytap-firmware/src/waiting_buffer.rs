use heapless::Deque;

use crate::event::{KeyEvent, KeyPosition, KeyRecord};

pub const WAITING_BUFFER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferOverflow;

/// Key records waiting for the current tap to settle, oldest first.
pub struct WaitingBuffer<const N: usize = WAITING_BUFFER_SIZE> {
    records: Deque<KeyRecord, N>,
}

impl<const N: usize> Default for WaitingBuffer<N> {
    fn default() -> Self {
        Self {
            records: Deque::new(),
        }
    }
}

impl<const N: usize> WaitingBuffer<N> {
    /// Append a record. The no-event sentinel is never stored.
    pub fn enqueue(&mut self, record: KeyRecord) -> Result<(), BufferOverflow> {
        if record.is_none() {
            return Ok(());
        }
        self.records.push_back(record).map_err(|_| {
            crate::warn!("waiting buffer overflow");
            BufferOverflow
        })?;
        crate::debug!("waiting buffer enqueue {}", self.records.len());
        Ok(())
    }

    pub fn front(&self) -> Option<&KeyRecord> {
        self.records.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut KeyRecord> {
        self.records.front_mut()
    }

    pub fn pop_front(&mut self) -> Option<KeyRecord> {
        self.records.pop_front()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut KeyRecord> {
        self.records.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyRecord> {
        self.records.iter()
    }

    /// True if the opposite transition of `event`'s key is queued; i.e. the key was typed while
    /// its events were being held back.
    pub fn typed(&self, event: &KeyEvent) -> bool {
        self.records
            .iter()
            .any(|r| r.event.key == event.key && r.event.pressed != event.pressed)
    }

    /// Some key other than `key` has a buffered press.
    pub fn has_other_pressed(&self, key: KeyPosition) -> bool {
        self.records
            .iter()
            .any(|r| r.event.pressed && r.event.key != key)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
#[path = "waiting_buffer_test.rs"]
mod test;
