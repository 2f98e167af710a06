//! KB Redis Data Layer
//!
//! Async Redis persistence for the knowledge collection.

pub mod backend;
pub mod client;
pub mod queries;

pub use backend::RedisBackend;
pub use client::{init_pool, RedisError, RedisPool, RedisResult};
pub use queries::knowledge;
