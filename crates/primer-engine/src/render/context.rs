use std::cell::{RefCell, RefMut};

use crate::device::{
    Backend, Device, Extent, HostView, InitError, Library, PipelineDescriptor, PixelFormat,
    PrimitiveTopology, RenderPassDescriptor, ShaderStage, Surface, SurfaceDescriptor,
};

use super::triangle::{self, Vertex};

/// Surface parameters fixed at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextConfig {
    /// Requested drawable format; the surface may settle on another one.
    pub pixel_format: PixelFormat,

    /// Drawables are only ever used as render targets.
    pub framebuffer_only: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::Bgra8Unorm,
            framebuffer_only: true,
        }
    }
}

/// The prevalidated GPU objects, created once and reused by every frame.
///
/// Construction either yields a context with every resource valid or fails
/// with the step that broke; there is no partially built state. After
/// construction only the render-pass descriptor changes, and only from inside
/// a frame.
pub struct GraphicsContext<B: Backend> {
    device: B::Device,
    surface: B::Surface,
    library: B::Library,
    vertex_buffer: B::Buffer,
    pipeline_state: B::PipelineState,
    command_queue: B::CommandQueue,

    /// Rewritten at the start of every frame.
    render_pass: RefCell<RenderPassDescriptor<B::Texture>>,
}

impl<B: Backend> GraphicsContext<B> {
    /// Builds the context for `view` with the default configuration.
    pub fn new(backend: &B, view: &B::View) -> Result<Self, InitError> {
        Self::with_config(backend, view, ContextConfig::default())
    }

    pub fn with_config(
        backend: &B,
        view: &B::View,
        config: ContextConfig,
    ) -> Result<Self, InitError> {
        let device = backend
            .create_system_default_device(view)
            .ok_or(InitError::DeviceUnavailable)?;
        log::debug!("GPU device acquired");

        let surface = device
            .make_surface(
                view,
                &SurfaceDescriptor {
                    pixel_format: config.pixel_format,
                    framebuffer_only: config.framebuffer_only,
                    extent: view.extent(),
                },
            )
            .map_err(InitError::SurfaceConfigurationFailed)?;

        let vertex_buffer = device
            .make_buffer("primer triangle vertices", triangle::vertex_bytes())
            .ok_or(InitError::BufferAllocationFailed)?;

        let library = device
            .make_default_library()
            .ok_or(InitError::LibraryLoadFailed)?;

        let vertex_function =
            resolve_function::<B>(&library, triangle::VERTEX_FUNCTION, ShaderStage::Vertex)?;
        let fragment_function =
            resolve_function::<B>(&library, triangle::FRAGMENT_FUNCTION, ShaderStage::Fragment)?;

        // Most expensive step; the descriptor is dropped once validated.
        let pipeline_state = {
            let descriptor = PipelineDescriptor::<B> {
                label: "primer triangle pipeline",
                vertex_function: &vertex_function,
                fragment_function: &fragment_function,
                color_format: surface.pixel_format(),
                topology: PrimitiveTopology::Triangle,
                vertex_layout: Vertex::LAYOUT,
            };
            device
                .make_render_pipeline_state(&descriptor)
                .map_err(InitError::PipelineValidationFailed)?
        };
        log::debug!("render pipeline state validated");

        let command_queue = device
            .make_command_queue()
            .ok_or(InitError::QueueCreationFailed)?;

        log::debug!("graphics context ready");

        Ok(Self {
            device,
            surface,
            library,
            vertex_buffer,
            pipeline_state,
            command_queue,
            render_pass: RefCell::new(RenderPassDescriptor::new()),
        })
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn surface(&self) -> &B::Surface {
        &self.surface
    }

    pub fn library(&self) -> &B::Library {
        &self.library
    }

    pub fn vertex_buffer(&self) -> &B::Buffer {
        &self.vertex_buffer
    }

    pub fn pipeline_state(&self) -> &B::PipelineState {
        &self.pipeline_state
    }

    pub fn command_queue(&self) -> &B::CommandQueue {
        &self.command_queue
    }

    /// Format the pipeline was validated against.
    pub fn pixel_format(&self) -> PixelFormat {
        self.surface.pixel_format()
    }

    /// Reconfigures the existing surface for new view bounds.
    pub fn resize_surface(&self, extent: Extent) {
        self.surface.resize(extent);
    }

    /// Panics if the descriptor is already borrowed, which would mean two
    /// frames overlap.
    pub(crate) fn render_pass_mut(&self) -> RefMut<'_, RenderPassDescriptor<B::Texture>> {
        self.render_pass.borrow_mut()
    }

    /// Drops the render pass's reference to the current drawable texture.
    pub(crate) fn release_render_target(&self) {
        self.render_pass.borrow_mut().release_target();
    }
}

fn resolve_function<B: Backend>(
    library: &B::Library,
    name: &str,
    stage: ShaderStage,
) -> Result<B::Function, InitError> {
    library
        .make_function(name, stage)
        .ok_or_else(|| InitError::ShaderFunctionNotFound {
            stage,
            name: name.to_string(),
        })
}
