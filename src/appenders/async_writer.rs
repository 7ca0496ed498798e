//! Non-blocking writer draining into a sink on a background thread
//!
//! `write` copies the payload into a pooled buffer and tries to enqueue it;
//! a full queue rejects the payload instead of blocking the producer. One
//! worker thread per writer drains the queue, coalescing everything that is
//! ready into a single sink write.

use crate::core::error::{LoggerError, Result};
use crate::core::pool::{acquire_buffer, release_buffer, MAX_POOLED_BUFFER_BYTES};
use crate::core::{Sink, WriterMetrics, DEFAULT_SHUTDOWN_TIMEOUT};
use crossbeam_channel::{bounded, select, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default number of payloads the queue holds
pub const DEFAULT_ASYNC_CAPACITY: usize = 1024;

enum Control {
    /// Drain, sync the sink, then acknowledge
    Flush(Sender<()>),
    /// Drain, sync the sink, acknowledge and exit
    Close(Sender<()>),
}

/// # Example
///
/// ```
/// use rust_pooled_logger::{AsyncWriter, MemorySink, Sink};
///
/// let memory = MemorySink::new();
/// let writer = AsyncWriter::new(memory.clone()).unwrap();
/// writer.write(b"queued\n").unwrap();
/// writer.close().unwrap();
/// assert_eq!(memory.contents(), b"queued\n");
/// ```
pub struct AsyncWriter {
    data: Sender<Vec<u8>>,
    control: Sender<Control>,
    capacity: usize,
    /// Held shared by `write` across the check and the enqueue, exclusively
    /// by `close` while flipping it, so nothing is accepted after the drain.
    closed: RwLock<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    metrics: Arc<WriterMetrics>,
    shutdown_timeout: Duration,
}

impl AsyncWriter {
    pub fn new<S: Sink + 'static>(sink: S) -> Result<Self> {
        Self::with_capacity(sink, DEFAULT_ASYNC_CAPACITY)
    }

    pub fn with_capacity<S: Sink + 'static>(sink: S, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config("async writer", "capacity must be positive"));
        }

        let sink: Arc<dyn Sink> = Arc::new(sink);
        let (data_tx, data_rx) = bounded(capacity);
        let (control_tx, control_rx) = bounded(1);
        let metrics = Arc::new(WriterMetrics::new());
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name("async-log-writer".to_string())
            .spawn(move || run_worker(sink, data_rx, control_rx, worker_metrics))
            .map_err(|e| LoggerError::io_operation("spawning writer thread", "async-log-writer", e))?;

        Ok(Self {
            data: data_tx,
            control: control_tx,
            capacity,
            closed: RwLock::new(false),
            handle: Mutex::new(Some(handle)),
            metrics,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        })
    }

    /// How long `sync` and `close` wait for the worker
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Payloads currently waiting in the queue
    pub fn queued(&self) -> usize {
        self.data.len()
    }

    pub fn metrics(&self) -> &WriterMetrics {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    fn send_control(&self, make: fn(Sender<()>) -> Control) -> Result<()> {
        let (ack_tx, ack_rx) = bounded(1);
        match self.control.send_timeout(make(ack_tx), self.shutdown_timeout) {
            Ok(()) => {}
            // worker already gone, nothing left to drain
            Err(SendTimeoutError::Disconnected(_)) => return Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                return Err(LoggerError::ShutdownTimeout(self.shutdown_timeout))
            }
        }
        ack_rx
            .recv_timeout(self.shutdown_timeout)
            .map_err(|_| LoggerError::ShutdownTimeout(self.shutdown_timeout))
    }
}

impl Sink for AsyncWriter {
    /// Enqueue a copy of `buf` without blocking.
    ///
    /// A full queue returns [`LoggerError::QueueFull`]; treat it as a
    /// dropped line, retrying would block the caller.
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let closed = self.closed.read();
        if *closed {
            return Err(LoggerError::WriterClosed);
        }

        let mut payload = acquire_buffer();
        payload.extend_from_slice(buf);

        match self.data.try_send(payload) {
            Ok(()) => {
                self.metrics.record_accepted();
                Ok(buf.len())
            }
            Err(TrySendError::Full(payload)) => {
                release_buffer(payload);
                self.metrics.record_dropped();
                Err(LoggerError::queue_full(self.data.len(), self.capacity))
            }
            Err(TrySendError::Disconnected(payload)) => {
                release_buffer(payload);
                Err(LoggerError::WriterClosed)
            }
        }
    }

    /// Block until everything queued so far reached the sink.
    fn sync(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.send_control(Control::Flush)
    }

    /// Drain the queue and stop the worker. Later calls return immediately.
    fn close(&self) -> Result<()> {
        {
            let mut closed = self.closed.write();
            if *closed {
                return Ok(());
            }
            *closed = true;
        }

        if let Err(e) = self.send_control(Control::Close) {
            eprintln!(
                "[LOGGER WARN] Async writer did not drain within {:?}. Some logs may be lost.",
                self.shutdown_timeout
            );
            return Err(e);
        }

        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Async writer thread panicked during shutdown");
            }
        }

        let dropped = self.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARN] Async writer closed with {} dropped payloads (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl Drop for AsyncWriter {
    fn drop(&mut self) {
        let _ = Sink::close(self);
    }
}

fn run_worker(
    sink: Arc<dyn Sink>,
    data: Receiver<Vec<u8>>,
    control: Receiver<Control>,
    metrics: Arc<WriterMetrics>,
) {
    let mut batch = Vec::with_capacity(4096);

    loop {
        select! {
            recv(data) -> payload => match payload {
                Ok(payload) => {
                    append(&mut batch, payload);
                    drain_ready(&data, &mut batch);
                    write_batch(sink.as_ref(), &mut batch, &metrics);
                }
                Err(_) => break,
            },
            recv(control) -> msg => {
                drain_ready(&data, &mut batch);
                write_batch(sink.as_ref(), &mut batch, &metrics);
                if let Err(e) = sink.sync() {
                    eprintln!("[LOGGER ERROR] Sink '{}' sync failed: {}", sink.name(), e);
                }
                match msg {
                    Ok(Control::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    Ok(Control::Close(ack)) => {
                        let _ = ack.send(());
                        break;
                    }
                    Err(_) => break,
                }
            }
        }
    }
}

fn append(batch: &mut Vec<u8>, payload: Vec<u8>) {
    batch.extend_from_slice(&payload);
    release_buffer(payload);
}

fn drain_ready(data: &Receiver<Vec<u8>>, batch: &mut Vec<u8>) {
    while let Ok(payload) = data.try_recv() {
        append(batch, payload);
    }
}

fn write_batch(sink: &dyn Sink, batch: &mut Vec<u8>, metrics: &WriterMetrics) {
    if batch.is_empty() {
        return;
    }

    metrics.record_batch();
    if let Err(e) = sink.write(batch) {
        let failures = metrics.record_sink_error();
        // first failure, then every 1000th
        if failures == 0 || (failures + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER ERROR] Sink '{}' write failed ({} failures): {}",
                sink.name(),
                failures + 1,
                e
            );
        }
    }

    batch.clear();
    if batch.capacity() > MAX_POOLED_BUFFER_BYTES * 4 {
        batch.shrink_to(MAX_POOLED_BUFFER_BYTES);
    }
}
