//! Byte-stream destinations for formatted log output

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A destination accepting formatted log bytes.
///
/// Sinks are shared between logger clones, so every method takes `&self`
/// and implementations synchronize internally.
pub trait Sink: Send + Sync {
    fn write(&self, buf: &[u8]) -> Result<usize>;

    /// Push buffered bytes down to the underlying device.
    fn sync(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn sync(&self) -> Result<()> {
        (**self).sync()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Fans every write out to all inner sinks.
///
/// Every sink is attempted; the first error is returned.
pub struct MultiSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each(&self, mut op: impl FnMut(&dyn Sink) -> Result<()>) -> Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = op(sink.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Sink for MultiSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.each(|sink| sink.write(buf).map(|_| ()))?;
        Ok(buf.len())
    }

    fn sync(&self) -> Result<()> {
        self.each(|sink| sink.sync())
    }

    fn close(&self) -> Result<()> {
        self.each(|sink| sink.close())
    }

    fn name(&self) -> &str {
        "multi"
    }
}

/// Adapts any `std::io::Write` into a [`Sink`].
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    name: String,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    pub fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.writer
            .lock()
            .write_all(buf)
            .map_err(|e| LoggerError::io_operation("writing", self.name.clone(), e))?;
        Ok(buf.len())
    }

    fn sync(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory sink, mostly useful in tests.
#[derive(Default, Clone)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&self, _buf: &[u8]) -> Result<usize> {
            Err(LoggerError::WriterClosed)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.write(b"hello").unwrap(), 5);
        let shared = sink.clone();
        shared.write(b" world").unwrap();
        assert_eq!(sink.contents_string(), "hello world");
        sink.clear();
        assert_eq!(shared.len(), 0);
    }

    #[test]
    fn test_multi_sink_duplicates() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let multi = MultiSink::new(vec![Arc::new(a.clone()), Arc::new(b.clone())]);
        assert_eq!(multi.write(b"line\n").unwrap(), 5);
        assert_eq!(a.contents(), b"line\n");
        assert_eq!(b.contents(), b"line\n");
    }

    #[test]
    fn test_multi_sink_first_error_but_all_attempted() {
        let good = MemorySink::new();
        let multi = MultiSink::new(vec![Arc::new(FailingSink), Arc::new(good.clone())]);
        assert!(matches!(multi.write(b"x"), Err(LoggerError::WriterClosed)));
        assert_eq!(good.contents(), b"x");
    }

    #[test]
    fn test_writer_sink() {
        let sink = WriterSink::new(Vec::new());
        sink.write(b"abc").unwrap();
        sink.sync().unwrap();
        assert_eq!(sink.into_inner(), b"abc");
    }

    #[test]
    fn test_writer_sink_error_context() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = WriterSink::named(Broken, "pipe");
        let err = sink.write(b"data").unwrap_err();
        assert!(err.to_string().contains("pipe"));
    }
}
