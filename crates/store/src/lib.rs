//! Stores behind the presence tracker and the page counter.
//!
//! The hosted backend is reached over its REST interface. An in-memory
//! backend serves local development, and the JSON file counter is the
//! single-process alternative for page views.

pub mod client;
pub mod config;
pub mod file;
pub mod health;
pub mod memory;
pub mod store;

pub use client::*;
pub use config::*;
pub use file::FileViewCounter;
pub use memory::MemoryBackend;
pub use store::*;
