//! Prevalidated rendering: the long-lived context and the per-frame driver.
//!
//! Convention:
//! - everything expensive lives in `GraphicsContext` and is built exactly once
//! - everything per-frame lives in `FrameSubmission` and dies with the tick

mod context;
mod frame;
pub mod triangle;

pub use context::{ContextConfig, GraphicsContext};
pub use frame::{FrameDriver, FrameOutcome, FrameStats, FrameSubmission};
