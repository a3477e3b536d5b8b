//! Primer engine crate.
//!
//! Draws one triangle per frame from GPU objects that are created and
//! validated once, up front. Per-frame work only records and submits commands.

pub mod device;
pub mod window;
pub mod time;

pub mod logging;
pub mod render;
