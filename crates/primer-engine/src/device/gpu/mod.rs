//! wgpu implementation of the GPU object model.
//!
//! Device acquisition blocks on wgpu's async adapter/device requests. Shader
//! compilation and pipeline validation run inside wgpu error scopes so invalid
//! input becomes an `Err` instead of reaching the uncaptured-error handler.

mod commands;
mod init;
mod library;
mod surface;

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use super::backend::{Backend, Device, HostView};
use super::descriptor::{PipelineDescriptor, SurfaceDescriptor};
use super::types::{Extent, VertexFormat};

pub use commands::{WgpuBuffer, WgpuCommandBuffer, WgpuPipelineState, WgpuQueue, WgpuRenderEncoder};
pub use init::{WgpuInit, DEFAULT_LIBRARY_SOURCE};
pub use library::{WgpuFunction, WgpuLibrary};
pub use surface::{WgpuDrawable, WgpuSurface};

/// Backend rendering through wgpu into a winit window.
#[derive(Debug, Clone, Default)]
pub struct WgpuBackend {
    init: WgpuInit,
}

impl WgpuBackend {
    pub fn new(init: WgpuInit) -> Self {
        Self { init }
    }
}

impl HostView for Arc<Window> {
    fn extent(&self) -> Extent {
        let size = self.inner_size();
        Extent::new(size.width, size.height)
    }
}

impl Backend for WgpuBackend {
    type View = Arc<Window>;
    type Device = WgpuDevice;
    type Surface = WgpuSurface;
    type Buffer = WgpuBuffer;
    type Library = WgpuLibrary;
    type Function = WgpuFunction;
    type PipelineState = WgpuPipelineState;
    type CommandQueue = WgpuQueue;
    type Drawable = WgpuDrawable;
    type Texture = wgpu::TextureView;
    type CommandBuffer = WgpuCommandBuffer;
    type RenderEncoder = WgpuRenderEncoder;

    fn create_system_default_device(&self, view: &Arc<Window>) -> Option<WgpuDevice> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.init.backends,
            ..Default::default()
        });

        // The adapter must be able to present to this window. If the surface
        // cannot be created here, `make_surface` retries and reports it.
        let surface = match instance.create_surface(Arc::clone(view)) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::debug!("failed to create wgpu surface for adapter selection: {e}");
                None
            }
        };

        let adapter = match pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.init.power_preference,
                compatible_surface: surface.as_ref(),
                force_fallback_adapter: false,
            },
        )) {
            Ok(adapter) => adapter,
            Err(e) => {
                log::debug!("no suitable GPU adapter: {e}");
                return None;
            }
        };

        let info = adapter.get_info();
        log::info!("using adapter \"{}\" ({:?})", info.name, info.backend);

        let (device, queue) = match pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("primer device"),
                required_features: wgpu::Features::empty(),
                required_limits: self.init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            },
        )) {
            Ok(pair) => pair,
            Err(e) => {
                log::debug!("failed to create wgpu device/queue: {e}");
                return None;
            }
        };

        Some(WgpuDevice {
            instance,
            adapter,
            device,
            queue,
            window_surface: Cell::new(surface),
            init: self.init.clone(),
        })
    }
}

/// Logical device plus the objects wgpu hands out alongside it.
pub struct WgpuDevice {
    instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,

    /// wgpu creates the queue together with the device; `make_command_queue`
    /// hands out a handle to it.
    queue: wgpu::Queue,

    /// Surface the adapter was selected against; consumed by `make_surface`.
    window_surface: Cell<Option<wgpu::Surface<'static>>>,

    init: WgpuInit,
}

impl Device<WgpuBackend> for WgpuDevice {
    fn make_surface(
        &self,
        view: &Arc<Window>,
        descriptor: &SurfaceDescriptor,
    ) -> Result<WgpuSurface, String> {
        let extent = descriptor.extent;
        if extent.is_empty() {
            return Err("window has zero size".into());
        }

        // Surface lifetime is tied to the window through the `Arc`.
        let surface = match self.window_surface.take() {
            Some(surface) => surface,
            None => self
                .instance
                .create_surface(Arc::clone(view))
                .map_err(|e| format!("failed to create wgpu surface: {e}"))?,
        };

        let caps = surface.get_capabilities(&self.adapter);
        let pixel_format = surface::choose_surface_format(&caps.formats, descriptor.pixel_format)
            .ok_or_else(|| String::from("no supported surface formats"))?;

        let usage = if descriptor.framebuffer_only {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT | (caps.usages & wgpu::TextureUsages::COPY_SRC)
        };

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface::to_wgpu_format(pixel_format),
            width: extent.width,
            height: extent.height,
            present_mode: surface::choose_present_mode(&caps, self.init.present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps, self.init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.init.desired_maximum_frame_latency,
        };

        surface.configure(&self.device, &config);
        log::debug!(
            "surface configured: {:?} {}x{}",
            pixel_format,
            extent.width,
            extent.height
        );

        Ok(WgpuSurface::new(
            Arc::clone(view),
            surface,
            self.device.clone(),
            pixel_format,
            config,
            extent,
        ))
    }

    fn make_buffer(&self, label: &str, contents: &[u8]) -> Option<WgpuBuffer> {
        if contents.is_empty() {
            return None;
        }

        let (buffer, error) = error_scope(&self.device, wgpu::ErrorFilter::OutOfMemory, || {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        match error {
            None => Some(WgpuBuffer { buffer }),
            Some(e) => {
                log::debug!("buffer allocation failed: {e}");
                None
            }
        }
    }

    fn make_default_library(&self) -> Option<WgpuLibrary> {
        let source: &Cow<'static, str> = &self.init.library_source;
        let entry_points = library::scan_entry_points(source);
        if entry_points.is_empty() {
            log::debug!("default library declares no entry points");
            return None;
        }

        let (module, error) = error_scope(&self.device, wgpu::ErrorFilter::Validation, || {
            self.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("primer default library"),
                    source: wgpu::ShaderSource::Wgsl(source.clone()),
                })
        });

        match error {
            None => Some(WgpuLibrary::new(module, entry_points)),
            Some(e) => {
                log::debug!("default library failed to compile: {e}");
                None
            }
        }
    }

    fn make_render_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<'_, WgpuBackend>,
    ) -> Result<WgpuPipelineState, String> {
        let attributes: Vec<wgpu::VertexAttribute> = descriptor
            .vertex_layout
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: to_wgpu_vertex_format(a.format),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect();

        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: descriptor.vertex_layout.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let (pipeline, error) = error_scope(&self.device, wgpu::ErrorFilter::Validation, || {
            let layout = self
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(descriptor.label),
                    bind_group_layouts: &[],
                    immediate_size: 0,
                });

            self.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(descriptor.label),
                    layout: Some(&layout),

                    vertex: wgpu::VertexState {
                        module: &descriptor.vertex_function.module,
                        entry_point: Some(&descriptor.vertex_function.name),
                        compilation_options: Default::default(),
                        buffers: &vertex_buffers,
                    },

                    fragment: Some(wgpu::FragmentState {
                        module: &descriptor.fragment_function.module,
                        entry_point: Some(&descriptor.fragment_function.name),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface::to_wgpu_format(descriptor.color_format),
                            blend: None,
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),

                    primitive: wgpu::PrimitiveState {
                        topology: commands::to_wgpu_topology(descriptor.topology),
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },

                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
        });

        match error {
            None => Ok(WgpuPipelineState {
                pipeline,
                topology: descriptor.topology,
            }),
            Some(e) => Err(e.to_string()),
        }
    }

    fn make_command_queue(&self) -> Option<WgpuQueue> {
        Some(WgpuQueue::new(self.device.clone(), self.queue.clone()))
    }
}

/// Runs `f` with an error scope pushed and returns whatever the scope caught.
fn error_scope<T>(
    device: &wgpu::Device,
    filter: wgpu::ErrorFilter,
    f: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(filter);
    let value = f();
    let error = pollster::block_on(scope.pop());
    (value, error)
}

fn to_wgpu_vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
    }
}
