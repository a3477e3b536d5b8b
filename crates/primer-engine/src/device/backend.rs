//! GPU object model shared by every backend.
//!
//! Each GPU object is an associated type of [`Backend`]. Objects that create
//! other objects implement the matching trait below; plain resources
//! (buffers, functions, pipeline states, textures) are opaque handles.

use super::descriptor::{PipelineDescriptor, RenderPassDescriptor, SurfaceDescriptor};
use super::error::SurfaceErrorAction;
use super::types::{DrawPrimitives, Extent, PixelFormat, ShaderStage};

/// Host view a presentation surface is attached to.
pub trait HostView {
    /// Current bounds in physical pixels.
    fn extent(&self) -> Extent;
}

/// A family of GPU object types plus the entry point that acquires a device.
pub trait Backend: Sized {
    type View: HostView;
    type Device: Device<Self>;
    type Surface: Surface<Self>;
    type Buffer;
    type Library: Library<Self>;
    type Function;
    type PipelineState;
    type CommandQueue: CommandQueue<Self>;
    type Drawable: Drawable<Self>;
    type Texture: Clone;
    type CommandBuffer: CommandBuffer<Self>;
    type RenderEncoder: RenderEncoder<Self>;

    /// Acquires the default GPU for `view`, or `None` when no device is usable.
    fn create_system_default_device(&self, view: &Self::View) -> Option<Self::Device>;
}

/// Creates the long-lived objects. Every method here is expensive.
pub trait Device<B: Backend> {
    fn make_surface(
        &self,
        view: &B::View,
        descriptor: &SurfaceDescriptor,
    ) -> Result<B::Surface, String>;

    /// Allocates an immutable buffer initialized with `contents`.
    fn make_buffer(&self, label: &str, contents: &[u8]) -> Option<B::Buffer>;

    fn make_default_library(&self) -> Option<B::Library>;

    /// Compiles and validates a pipeline; the error carries backend diagnostics.
    fn make_render_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<'_, B>,
    ) -> Result<B::PipelineState, String>;

    fn make_command_queue(&self) -> Option<B::CommandQueue>;
}

pub trait Surface<B: Backend> {
    /// Format drawables are created with.
    fn pixel_format(&self) -> PixelFormat;

    fn extent(&self) -> Extent;

    /// Reconfigures drawables for a new size. Zero-sized requests are deferred.
    fn resize(&self, extent: Extent);

    /// Acquires the next presentable image.
    fn next_drawable(&self) -> Result<B::Drawable, SurfaceErrorAction>;
}

pub trait Library<B: Backend> {
    /// Resolves an entry point by exact name. A function with that name in a
    /// different stage does not match.
    fn make_function(&self, name: &str, stage: ShaderStage) -> Option<B::Function>;
}

pub trait Drawable<B: Backend> {
    /// Texture to render into for this drawable.
    fn texture(&self) -> B::Texture;
}

pub trait CommandQueue<B: Backend> {
    /// Creates a single-use command buffer.
    fn make_command_buffer(&self) -> Option<B::CommandBuffer>;
}

/// Single-use container of encoded commands. `commit` consumes it.
pub trait CommandBuffer<B: Backend> {
    fn make_render_command_encoder(
        &mut self,
        descriptor: &RenderPassDescriptor<B::Texture>,
    ) -> Option<B::RenderEncoder>;

    /// Schedules `drawable` for presentation once this buffer has executed.
    fn present(&mut self, drawable: B::Drawable);

    fn commit(self);
}

/// Single-use recorder of render commands. `end_encoding` consumes it.
pub trait RenderEncoder<B: Backend> {
    fn set_render_pipeline_state(&mut self, state: &B::PipelineState);

    fn set_vertex_buffer(&mut self, buffer: &B::Buffer, offset: u64, index: u32);

    fn draw_primitives(&mut self, draw: DrawPrimitives);

    fn end_encoding(self);
}
