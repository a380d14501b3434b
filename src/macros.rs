//! Logging macros for ergonomic templated logging.
//!
//! These macros accept a message template and any serializable values for
//! its properties, so call sites do not have to build `serde_json::Value`
//! slices by hand.
//!
//! # Examples
//!
//! ```
//! use templog::prelude::*;
//! use templog::info;
//!
//! let logger = Logger::builder().build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With template properties
//! let port = 8080;
//! info!(logger, "Server listening on port {port}", port).unwrap();
//! ```

/// Log a templated message at an explicit level.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::log;
/// log!(logger, LogEventLevel::INFORMATION, "Simple message").unwrap();
/// log!(logger, LogEventLevel::ERROR, "Error code: {code}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr) => {
        $logger.log($level, $template, &[])
    };
    ($logger:expr, $level:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.log($level, $template, &[$($crate::__private::json!($arg)),+])
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::fatal;
/// fatal!(logger, "Critical failure in {component}", "scheduler").unwrap();
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::FATAL, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::error;
/// error!(logger, "Request failed with status {status}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::ERROR, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::warn;
/// warn!(logger, "Retry attempt {attempt} of {max}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::WARNING, $($arg)+)
    };
}

/// Log an information-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::info;
/// info!(logger, "Processing {count} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::INFORMATION, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::debug;
/// debug!(logger, "Counter value: {value}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::DEBUG, $($arg)+)
    };
}

/// Log a verbose-level message.
///
/// # Examples
///
/// ```
/// # use templog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use templog::verbose;
/// verbose!(logger, "Entering handler for {route}", "/events").unwrap();
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogEventLevel::VERBOSE, $($arg)+)
    };
}
