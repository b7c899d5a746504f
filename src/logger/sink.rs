use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

/// Destination for finished records.
///
/// Cloning a `Sink` shares the underlying writer and its lock, so every logger
/// derived from the same sink serializes its writes against the others.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Writes one already-encoded record.
    ///
    /// The lock is only held for the write itself. Failures are dropped: a
    /// log call never reports back to its caller.
    pub fn write_record(&self, record: &[u8]) {
        let result = {
            let mut out = self.inner.lock();
            out.write_all(record).and_then(|()| out.flush())
        };

        if let Err(e) = result {
            debug!(error = %e, bytes = record.len(), "dropping log record after sink write failure");
        }
    }

    /// Whether two sinks share the same writer.
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("shared", &Arc::strong_count(&self.inner))
            .finish()
    }
}
