//! # Templog
//!
//! A structured logging front end with message templates, a composable
//! event pipeline, and batched remote delivery.
//!
//! ## Features
//!
//! - **Message Templates**: Named holes like `{user}` and `{@order}` bind
//!   positional arguments into structured properties
//! - **Composable Pipeline**: Filter, enrich, and level-switch stages feed
//!   one or more sinks
//! - **Dynamic Levels**: Change the minimum level at runtime, flushing
//!   in-flight events first
//! - **Batched Delivery**: Size- and time-triggered batching with bounded
//!   retries over HTTP
//!
//! ## Quick Start
//!
//! ```
//! use templog::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let logger = Logger::builder()
//!     .min_level(LogEventLevel::INFORMATION)
//!     .write_to(ConsoleSink::new())
//!     .build()
//!     .unwrap();
//!
//! logger.info("User {name} signed in", &[serde_json::json!("alice")]).unwrap();
//! logger.flush().await.unwrap();
//! # });
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        is_enabled, DynamicLevelSwitch, DynamicLevelSwitchStage, EnrichStage, FilterStage,
        FlushDelegate, LogEvent, LogEventLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        MessageTemplate, Pipeline, PipelineStage, Result, SinkConfig, Token,
    };
    pub use crate::sinks::{BatchedSink, BatchedSinkOptions, Transport};
    #[cfg(feature = "console")]
    pub use crate::sinks::{ConsoleSink, ConsoleSinkOptions};
    #[cfg(feature = "http")]
    pub use crate::sinks::{HttpTransport, normalize_address};
}

pub use crate::core::{
    is_enabled, DynamicLevelSwitch, DynamicLevelSwitchStage, EnrichStage, FilterStage,
    FlushDelegate, LogEvent, LogEventLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    MessageTemplate, Pipeline, PipelineStage, Result, SinkConfig, Token,
};
pub use crate::sinks::{BatchedSink, BatchedSinkOptions, Transport};
#[cfg(feature = "console")]
pub use crate::sinks::{ConsoleSink, ConsoleSinkOptions};
#[cfg(feature = "http")]
pub use crate::sinks::{HttpTransport, normalize_address};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}
