//! GPU object model and its backends.
//!
//! This module is responsible for:
//! - the backend-neutral traits for devices, surfaces, queues and encoders
//! - the descriptors and value types passed through them
//! - the wgpu backend that drives a real GPU

mod backend;
mod descriptor;
mod error;
mod gpu;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{
    Backend, CommandBuffer, CommandQueue, Device, Drawable, HostView, Library, RenderEncoder,
    Surface,
};
pub use descriptor::{ColorAttachment, PipelineDescriptor, RenderPassDescriptor, SurfaceDescriptor};
pub use error::{FrameSkip, InitError, SurfaceErrorAction};
pub use gpu::{
    WgpuBackend, WgpuBuffer, WgpuCommandBuffer, WgpuDevice, WgpuDrawable, WgpuFunction, WgpuInit,
    WgpuLibrary, WgpuPipelineState, WgpuQueue, WgpuRenderEncoder, WgpuSurface,
    DEFAULT_LIBRARY_SOURCE,
};
pub use types::{
    ClearColor, DrawPrimitives, Extent, LoadAction, PixelFormat, PrimitiveTopology, ShaderStage,
    StoreAction, VertexAttribute, VertexFormat, VertexLayout,
};
