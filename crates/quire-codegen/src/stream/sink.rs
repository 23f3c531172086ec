//! Output sinks
//!
//! An [`OutputSink`] is where streaming realizations write rendered text.
//! Besides plain content it receives logging-function calls and the
//! boundaries of logged regions, which instrumentation may observe.

use std::io::Write;
use std::ops::Range;

use crate::error::{StreamError, StreamResult};

/// The statement attached to a logged region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogStatement {
    /// Logging element identifier
    pub id: u64,
    /// Optional payload recorded with the element
    pub data: Option<String>,
    /// Whether the region's content is logged but never shown
    pub log_only: bool,
}

impl LogStatement {
    pub fn new(id: u64, log_only: bool) -> Self {
        Self {
            id,
            data: None,
            log_only,
        }
    }
}

/// A call to a logging function that renders as a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoggingFunctionInvocation {
    pub name: String,
    pub placeholder: String,
    pub args: Vec<String>,
}

/// Destination of streamed output.
pub trait OutputSink {
    fn append_str(&mut self, s: &str) -> StreamResult<()>;

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        let mut buf = [0u8; 4];
        self.append_str(c.encode_utf8(&mut buf))
    }

    /// Append `s[range]`; the range must fall on character boundaries.
    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        let slice = s.get(range.clone()).ok_or(StreamError::InvalidRange {
            start: range.start,
            end: range.end,
            len: s.len(),
        })?;
        self.append_str(slice)
    }

    /// Without a logger attached, a logging call renders its placeholder.
    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        self.append_str(&call.placeholder)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()>;

    fn exit_region(&mut self) -> StreamResult<()>;

    fn flush(&mut self) -> StreamResult<()> {
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        (**self).append_str(s)
    }

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        (**self).append_char(c)
    }

    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        (**self).append_range(s, range)
    }

    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        (**self).append_logging_call(call)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        (**self).enter_region(statement)
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        (**self).exit_region()
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        (**self).append_str(s)
    }

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        (**self).append_char(c)
    }

    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        (**self).append_range(s, range)
    }

    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        (**self).append_logging_call(call)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        (**self).enter_region(statement)
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        (**self).exit_region()
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }
}

// ============================================================================
// Concrete sinks
// ============================================================================

/// Collects output in memory; region boundaries are ignored.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl OutputSink for StringSink {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        self.buf.push_str(s);
        Ok(())
    }

    fn enter_region(&mut self, _statement: &LogStatement) -> StreamResult<()> {
        Ok(())
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        Ok(())
    }
}

/// Writes output to any [`std::io::Write`].
pub struct IoSink<W: Write> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for IoSink<W> {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    fn enter_region(&mut self, _statement: &LogStatement) -> StreamResult<()> {
        Ok(())
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One observed region boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionEvent {
    Enter(LogStatement),
    Exit,
}

/// Records content and every region boundary it is sent.
#[derive(Debug, Default)]
pub struct RegionRecorder {
    content: String,
    events: Vec<RegionEvent>,
}

impl RegionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn events(&self) -> &[RegionEvent] {
        &self.events
    }

    pub fn enter_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RegionEvent::Enter(_)))
            .count()
    }

    pub fn exit_count(&self) -> usize {
        self.events.iter().filter(|e| **e == RegionEvent::Exit).count()
    }
}

impl OutputSink for RegionRecorder {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        self.content.push_str(s);
        Ok(())
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        self.events.push(RegionEvent::Enter(statement.clone()));
        Ok(())
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        self.events.push(RegionEvent::Exit);
        Ok(())
    }
}

/// Forwards everything and reports region boundaries through `tracing`.
pub struct TracingSink<S> {
    inner: S,
}

impl<S: OutputSink> TracingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputSink> OutputSink for TracingSink<S> {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        self.inner.append_str(s)
    }

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        self.inner.append_char(c)
    }

    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        self.inner.append_range(s, range)
    }

    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        tracing::debug!(function = %call.name, "logging function call");
        self.inner.append_logging_call(call)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        tracing::debug!(id = statement.id, log_only = statement.log_only, "enter region");
        self.inner.enter_region(statement)
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        tracing::debug!("exit region");
        self.inner.exit_region()
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_sink_appends() {
        let mut sink = StringSink::new();
        sink.append_str("ab").unwrap();
        sink.append_char('c').unwrap();
        sink.append_range("xdefx", 1..4).unwrap();
        sink.append_logging_call(&LoggingFunctionInvocation {
            name: "track".into(),
            placeholder: "P".into(),
            args: vec![],
        })
        .unwrap();
        assert_eq!(sink.as_str(), "abcdefP");
    }

    #[test]
    fn test_append_range_rejects_bad_bounds() {
        let mut sink = StringSink::new();
        let err = sink.append_range("é", 0..1).unwrap_err();
        assert!(matches!(err, StreamError::InvalidRange { start: 0, end: 1, len: 2 }));
        assert!(sink.append_range("abc", 2..9).is_err());
    }

    #[test]
    fn test_io_sink_writes_through() {
        let mut sink = IoSink::new(Vec::new());
        sink.append_str("hi").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"hi");
    }

    #[test]
    fn test_tracing_sink_forwards_regions() {
        let mut sink = TracingSink::new(RegionRecorder::new());
        sink.enter_region(&LogStatement::new(1, false)).unwrap();
        sink.append_str("x").unwrap();
        sink.exit_region().unwrap();
        let recorder = sink.into_inner();
        assert_eq!(recorder.content(), "x");
        assert_eq!(recorder.enter_count(), 1);
        assert_eq!(recorder.exit_count(), 1);
    }
}
