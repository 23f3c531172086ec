//! Streaming escapers
//!
//! Sink-producing forms of escaping operations: the wrapper escapes content
//! as it passes through instead of buffering the whole value.

use std::ops::Range;

use super::sink::{LogStatement, LoggingFunctionInvocation, OutputSink};
use crate::error::StreamResult;

/// How the caller must dispose of a wrapped sink once the value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposalOptions {
    /// Flush the wrapper when the value is complete
    pub flush_on_finish: bool,
    /// The wrapper holds state that is only written out by `finish`
    pub requires_finish: bool,
}

impl Default for DisposalOptions {
    fn default() -> Self {
        Self {
            flush_on_finish: true,
            requires_finish: false,
        }
    }
}

/// A wrapped output destination plus its disposal options.
pub struct SinkAndOptions<'a> {
    pub sink: Box<dyn OutputSink + 'a>,
    pub options: DisposalOptions,
}

impl<'a> SinkAndOptions<'a> {
    /// Complete the value according to the disposal options.
    pub fn finish(mut self) -> StreamResult<()> {
        if self.options.flush_on_finish || self.options.requires_finish {
            self.sink.flush()?;
        }
        Ok(())
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}

/// Streaming form of `escapeHtml`.
pub struct EscapeHtmlSink<S> {
    inner: S,
}

impl<S: OutputSink> EscapeHtmlSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputSink> OutputSink for EscapeHtmlSink<S> {
    fn append_str(&mut self, s: &str) -> StreamResult<()> {
        self.inner.append_str(&escape_html(s))
    }

    fn append_char(&mut self, c: char) -> StreamResult<()> {
        let mut out = String::new();
        push_escaped(&mut out, c);
        self.inner.append_str(&out)
    }

    fn append_range(&mut self, s: &str, range: Range<usize>) -> StreamResult<()> {
        let escaped = match s.get(range.clone()) {
            Some(slice) => escape_html(slice),
            None => return self.inner.append_range(s, range),
        };
        self.inner.append_str(&escaped)
    }

    fn append_logging_call(&mut self, call: &LoggingFunctionInvocation) -> StreamResult<()> {
        let escaped = LoggingFunctionInvocation {
            placeholder: escape_html(&call.placeholder),
            ..call.clone()
        };
        self.inner.append_logging_call(&escaped)
    }

    fn enter_region(&mut self, statement: &LogStatement) -> StreamResult<()> {
        self.inner.enter_region(statement)
    }

    fn exit_region(&mut self) -> StreamResult<()> {
        self.inner.exit_region()
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()
    }
}
