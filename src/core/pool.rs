//! Reusable object pools for log entries and byte buffers
//!
//! A pool is a bounded free list backed by a `crossbeam-channel` queue, so
//! acquire and release are safe from any thread without an external lock.
//! Objects are handed out by value: whoever holds one owns it exclusively
//! until it is released. A pool never promises that a released object will
//! come back; `acquire` may always construct a fresh one.

use super::log_entry::LogEntry;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Number of idle entries kept by the process-wide entry pool
pub const ENTRY_POOL_CAPACITY: usize = 1024;

/// Number of idle buffers kept by the process-wide buffer pool
pub const BUFFER_POOL_CAPACITY: usize = 256;

/// Buffers that grew beyond this are dropped instead of being pooled
pub const MAX_POOLED_BUFFER_BYTES: usize = 64 * 1024;

pub struct ObjectPool<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    create: fn() -> T,
    /// Prepares an object for reuse; returning `false` discards it
    recycle: fn(&mut T) -> bool,
}

impl<T> ObjectPool<T> {
    pub fn new(capacity: usize, create: fn() -> T, recycle: fn(&mut T) -> bool) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            create,
            recycle,
        }
    }

    /// Take an idle object, or build a new one when none is available.
    #[inline]
    pub fn acquire(&self) -> T {
        self.receiver.try_recv().unwrap_or_else(|_| (self.create)())
    }

    /// Reset `item` and keep it for a later `acquire`.
    ///
    /// Dropped when the pool is already full or the recycle hook rejects it.
    #[inline]
    pub fn release(&self, mut item: T) {
        if (self.recycle)(&mut item) {
            let _ = self.sender.try_send(item);
        }
    }

    /// Acquire an object that returns itself to the pool when dropped.
    pub fn get(&self) -> Pooled<'_, T> {
        Pooled {
            item: Some(self.acquire()),
            pool: self,
        }
    }

    /// Number of idle objects currently held
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    /// Drop every idle object.
    pub fn clear(&self) {
        while self.receiver.try_recv().is_ok() {}
    }
}

/// RAII handle over a pooled object.
pub struct Pooled<'a, T> {
    item: Option<T>,
    pool: &'a ObjectPool<T>,
}

impl<T> Pooled<'_, T> {
    /// Take the object out; it will not be returned to the pool.
    pub fn detach(mut self) -> Option<T> {
        self.item.take()
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // only `detach` and `drop` empty the slot, and both consume the handle
        self.item.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

fn recycle_entry(entry: &mut LogEntry) -> bool {
    entry.reset();
    true
}

fn recycle_buffer(buf: &mut Vec<u8>) -> bool {
    buf.clear();
    buf.capacity() <= MAX_POOLED_BUFFER_BYTES
}

/// Process-wide pool of [`LogEntry`] values
pub fn entry_pool() -> &'static ObjectPool<LogEntry> {
    static POOL: OnceLock<ObjectPool<LogEntry>> = OnceLock::new();
    POOL.get_or_init(|| ObjectPool::new(ENTRY_POOL_CAPACITY, LogEntry::new, recycle_entry))
}

/// Process-wide pool of byte buffers used while formatting
pub fn buffer_pool() -> &'static ObjectPool<Vec<u8>> {
    static POOL: OnceLock<ObjectPool<Vec<u8>>> = OnceLock::new();
    POOL.get_or_init(|| ObjectPool::new(BUFFER_POOL_CAPACITY, Vec::new, recycle_buffer))
}

pub fn acquire_entry() -> LogEntry {
    entry_pool().acquire()
}

pub fn release_entry(entry: LogEntry) {
    entry_pool().release(entry);
}

pub fn acquire_buffer() -> Vec<u8> {
    buffer_pool().acquire()
}

pub fn release_buffer(buf: Vec<u8>) {
    buffer_pool().release(buf);
}
