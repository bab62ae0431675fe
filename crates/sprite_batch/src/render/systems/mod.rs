//! Rendering systems
//!
//! Higher-level systems built on the device contracts.

pub mod batching;
