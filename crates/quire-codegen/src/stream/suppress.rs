//! Log-only output suppression
//!
//! Content inside a log-only region is recorded by the logger but never
//! shown. Regions nest: once a log-only region is entered, every region
//! inside it is suppressed too, whatever its own statement says.

use std::ops::Range;

use super::sink::{LogStatement, LoggingFunctionInvocation, OutputSink};
use crate::error::{StreamError, StreamResult};

/// Decorator that drops content while inside a log-only region.
///
/// Region boundaries are always forwarded, so instrumentation below this
/// sink observes every enter and exit. One instance serves one output
/// destination for one render pass.
pub struct LogOnlySink<S> {
    inner: S,
    depth: u32,
}

impl<S: OutputSink> LogOnlySink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, depth: 0 }
    }

    /// Number of enclosing regions currently suppressed.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_suppressing(&self) -> bool {
        self.depth > 0
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    #[cfg(test)]
    pub(crate) fn with_depth(inner: S, depth: u32) -> Self {
        Self { inner, depth }
    }
}

impl<S: OutputSink> OutputSink for LogOnlySink<S> {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        if self.depth > 0 {
            return Ok(());
        }
        self.inner.append_str(s)
    }

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        if self.depth > 0 {
            return Ok(());
        }
        self.inner.append_char(c)
    }

    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        if self.depth > 0 {
            return Ok(());
        }
        self.inner.append_range(s, range)
    }

    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        if self.depth > 0 {
            return Ok(());
        }
        self.inner.append_logging_call(call)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        if self.depth > 0 || statement.log_only {
            self.depth = self
                .depth
                .checked_add(1)
                .ok_or(StreamError::SuppressionOverflow { depth: self.depth })?;
            tracing::trace!(id = statement.id, depth = self.depth, "suppressed region entered");
        }
        self.inner.enter_region(statement)
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        if self.depth > 0 {
            self.depth -= 1;
            tracing::trace!(depth = self.depth, "suppressed region exited");
        }
        self.inner.exit_region()
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::sink::RegionRecorder;

    fn visible() -> LogStatement {
        LogStatement::new(1, false)
    }

    fn log_only() -> LogStatement {
        LogStatement::new(2, true)
    }

    #[test]
    fn test_visible_region_does_not_suppress() {
        let mut sink = LogOnlySink::new(RegionRecorder::new());
        sink.enter_region(&visible()).unwrap();
        assert_eq!(sink.depth(), 0);
        sink.append_str("shown").unwrap();
        sink.exit_region().unwrap();
        assert_eq!(sink.inner().content(), "shown");
    }

    #[test]
    fn test_nested_visible_region_inherits_suppression() {
        let mut sink = LogOnlySink::new(RegionRecorder::new());
        sink.enter_region(&log_only()).unwrap();
        sink.enter_region(&visible()).unwrap();
        assert_eq!(sink.depth(), 2);
        sink.append_str("hidden").unwrap();
        sink.exit_region().unwrap();
        sink.append_char('h').unwrap();
        sink.exit_region().unwrap();
        assert_eq!(sink.depth(), 0);
        sink.append_str("after").unwrap();
        assert_eq!(sink.inner().content(), "after");
    }

    #[test]
    fn test_exit_at_zero_stays_zero() {
        let mut sink = LogOnlySink::new(RegionRecorder::new());
        sink.exit_region().unwrap();
        assert_eq!(sink.depth(), 0);
        assert_eq!(sink.inner().exit_count(), 1);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut sink = LogOnlySink::with_depth(RegionRecorder::new(), u32::MAX);
        let err = sink.enter_region(&visible()).unwrap_err();
        assert!(matches!(err, StreamError::SuppressionOverflow { depth: u32::MAX }));
        assert_eq!(sink.depth(), u32::MAX);
    }
}
