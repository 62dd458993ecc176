//! # ebb-core
//! Foundation types, errors, and traits for the Ebb consensus and yield
//! preview engine.

pub mod constants;
pub mod error;
pub mod timeline;
pub mod traits;
pub mod types;
