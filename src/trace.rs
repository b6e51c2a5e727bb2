//! Trace sink interface.
//!
//! Recognizers and the driver write human-readable lines through an injected
//! [`TraceSink`]; ordering is preserved, flushing is the sink's business.
//! The process-wide report file (see [`crate::report`]) is one implementation,
//! the console and an in-memory buffer are others.

/// A write-only, append-only stream of lines.
pub trait TraceSink {
    /// Appends one line to the stream.
    fn write(&mut self, line: &str);
}

/// Sink that prints every line to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl TraceSink for StdoutSink {
    fn write(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Sink that collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines written so far, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl TraceSink for MemorySink {
    fn write(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Writes a multi-line block to a sink, one line at a time.
pub fn write_block(sink: &mut dyn TraceSink, block: &str) {
    for line in block.lines() {
        sink.write(line);
    }
}
