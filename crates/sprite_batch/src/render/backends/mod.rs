//! Graphics backend implementations
//!
//! Concrete [`GraphicsDevice`](crate::render::GraphicsDevice) implementations.
//! Only the headless backend ships with the crate; windowed backends live in
//! the host application.

pub mod headless;
