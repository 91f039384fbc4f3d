//! # Utility Modules
//!
//! Supporting utilities shared by the codec and transport layers.
//!
//! ## Components
//! - **Buffer Pool**: reusable encode buffers
//! - **Logging**: `tracing-subscriber` setup from [`LoggingConfig`](crate::config::LoggingConfig)

pub mod buffer_pool;
pub mod logging;

pub use buffer_pool::BufferPool;
