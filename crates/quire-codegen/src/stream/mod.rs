//! Streaming output
//!
//! Sinks that streaming realizations write into, the log-only suppression
//! decorator, and streaming escapers.

pub mod escape;
pub mod sink;
pub mod suppress;

pub use escape::{escape_html, DisposalOptions, EscapeHtmlSink, SinkAndOptions};
pub use sink::{
    IoSink, LogStatement, LoggingFunctionInvocation, OutputSink, RegionEvent, RegionRecorder,
    StringSink, TracingSink,
};
pub use suppress::LogOnlySink;
