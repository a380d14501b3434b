//! Core logging types and pipeline machinery

pub mod config;
pub mod error;
pub mod event;
pub mod level;
pub mod logger;
pub mod pipeline;
pub mod stage;
pub mod switch;
pub mod template;

pub use config::{LoggerConfig, SinkConfig};
pub use error::{LoggerError, Result};
pub use event::LogEvent;
pub use level::{is_enabled, LogEventLevel};
pub use logger::{Logger, LoggerBuilder};
pub use pipeline::Pipeline;
pub use stage::{EnrichStage, FilterStage, PipelineStage};
pub use switch::{DynamicLevelSwitch, DynamicLevelSwitchStage, FlushDelegate};
pub use template::{MessageTemplate, Token};
