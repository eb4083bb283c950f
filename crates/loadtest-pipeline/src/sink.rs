//! Byte sinks the pipeline drains into.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Default buffer size for file sinks.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Destination of encoded records.
///
/// Records must land in call order. Failures are reported synchronously and
/// end the run.
pub trait Sink {
    /// Write one record, returning the number of bytes it occupied in the output.
    fn write_record(&mut self, record: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Sink over any [`Write`], optionally terminating every record.
///
/// Line-oriented outputs pass `Some(b"\n")`; self-delimiting binary frames
/// pass `None`.
pub struct WriterSink<W: Write> {
    writer: W,
    terminator: Option<&'static [u8]>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, terminator: Option<&'static [u8]>) -> Self {
        Self { writer, terminator }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<File>> {
    /// Create (or truncate) a buffered file sink.
    pub fn create<P: AsRef<Path>>(path: P, terminator: Option<&'static [u8]>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(
            BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
            terminator,
        ))
    }
}

/// Buffered file sink.
pub type FileSink = WriterSink<BufWriter<File>>;

impl<W: Write> Sink for WriterSink<W> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<usize> {
        self.writer.write_all(record)?;
        match self.terminator {
            Some(terminator) => {
                self.writer.write_all(terminator)?;
                Ok(record.len() + terminator.len())
            }
            None => Ok(record.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<usize> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
