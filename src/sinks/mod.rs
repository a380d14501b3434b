//! Built-in sinks

pub mod batched;
#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "http")]
pub mod http;

pub use batched::{BatchedSink, BatchedSinkOptions, Transport};
#[cfg(feature = "console")]
pub use console::{ConsoleSink, ConsoleSinkOptions};
#[cfg(feature = "http")]
pub use http::{normalize_address, HttpTransport};
