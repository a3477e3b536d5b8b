//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the render layer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
