//! Recording backend with fault injection.
//!
//! Every object carries a unique id and every call is appended to a shared
//! log, so tests can check call order and handle identity without a GPU.

use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use super::backend::{
    Backend, CommandBuffer, CommandQueue, Device, Drawable, HostView, Library, RenderEncoder,
    Surface,
};
use super::descriptor::{PipelineDescriptor, RenderPassDescriptor, SurfaceDescriptor};
use super::error::SurfaceErrorAction;
use super::types::{
    ClearColor, DrawPrimitives, Extent, LoadAction, PixelFormat, PrimitiveTopology, ShaderStage,
    VertexLayout,
};

pub(crate) type Id = u64;

/// Steps to fail on purpose.
#[derive(Debug, Clone, Default)]
pub(crate) struct Faults {
    pub device: bool,
    pub surface: bool,
    pub buffer: bool,
    pub library: bool,
    pub missing_function: Option<&'static str>,
    pub pipeline: bool,
    pub queue: bool,
    pub drawable: Option<SurfaceErrorAction>,
    pub command_buffer: bool,
    pub encoder: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateDevice {
        device: Id,
        /// Bounds of the view the device was selected for.
        view: Extent,
    },
    MakeSurface {
        surface: Id,
        format: PixelFormat,
        framebuffer_only: bool,
        extent: Extent,
    },
    MakeBuffer {
        buffer: Id,
        contents: Vec<u8>,
    },
    MakeLibrary(Id),
    MakeFunction {
        name: String,
        stage: ShaderStage,
    },
    MakePipeline {
        pipeline: Id,
        vertex: String,
        fragment: String,
        format: PixelFormat,
        topology: PrimitiveTopology,
        layout: VertexLayout,
    },
    MakeQueue(Id),
    Resize(Extent),
    NextDrawable(Option<Id>),
    MakeCommandBuffer(Id),
    MakeEncoder {
        command_buffer: Id,
        encoder: Id,
        texture: Option<Id>,
        load_action: LoadAction,
        clear_color: ClearColor,
    },
    SetPipeline {
        encoder: Id,
        pipeline: Id,
    },
    SetVertexBuffer {
        encoder: Id,
        buffer: Id,
        offset: u64,
        index: u32,
    },
    Draw {
        encoder: Id,
        draw: DrawPrimitives,
    },
    EndEncoding(Id),
    Present {
        command_buffer: Id,
        drawable: Id,
    },
    Commit(Id),
    DropDrawable(Id),
}

/// Shared state behind every mock object.
#[derive(Debug, Default)]
pub(crate) struct MockGpu {
    faults: RefCell<Faults>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<Id>,
}

impl MockGpu {
    fn id(&self) -> Id {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn faults(&self) -> Faults {
        self.faults.borrow().clone()
    }

    pub fn faults_mut(&self) -> RefMut<'_, Faults> {
        self.faults.borrow_mut()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockBackend {
    gpu: Rc<MockGpu>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        let backend = Self::new();
        *backend.gpu.faults_mut() = faults;
        backend
    }

    pub fn gpu(&self) -> Rc<MockGpu> {
        Rc::clone(&self.gpu)
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct MockView {
    pub extent: Extent,
}

impl Default for MockView {
    fn default() -> Self {
        Self {
            extent: Extent::new(800, 600),
        }
    }
}

impl HostView for MockView {
    fn extent(&self) -> Extent {
        self.extent
    }
}

impl Backend for MockBackend {
    type View = MockView;
    type Device = MockDevice;
    type Surface = MockSurface;
    type Buffer = MockBuffer;
    type Library = MockLibrary;
    type Function = MockFunction;
    type PipelineState = MockPipelineState;
    type CommandQueue = MockQueue;
    type Drawable = MockDrawable;
    type Texture = MockTexture;
    type CommandBuffer = MockCommandBuffer;
    type RenderEncoder = MockEncoder;

    fn create_system_default_device(&self, view: &MockView) -> Option<MockDevice> {
        if self.gpu.faults().device {
            return None;
        }
        let id = self.gpu.id();
        self.gpu.record(Call::CreateDevice {
            device: id,
            view: view.extent,
        });
        Some(MockDevice {
            gpu: Rc::clone(&self.gpu),
            id,
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockDevice {
    gpu: Rc<MockGpu>,
    pub id: Id,
}

impl Device<MockBackend> for MockDevice {
    fn make_surface(
        &self,
        _view: &MockView,
        descriptor: &SurfaceDescriptor,
    ) -> Result<MockSurface, String> {
        if self.gpu.faults().surface {
            return Err("injected surface failure".into());
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakeSurface {
            surface: id,
            format: descriptor.pixel_format,
            framebuffer_only: descriptor.framebuffer_only,
            extent: descriptor.extent,
        });
        Ok(MockSurface {
            gpu: Rc::clone(&self.gpu),
            id,
            pixel_format: descriptor.pixel_format,
            extent: Cell::new(descriptor.extent),
        })
    }

    fn make_buffer(&self, _label: &str, contents: &[u8]) -> Option<MockBuffer> {
        if self.gpu.faults().buffer {
            return None;
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakeBuffer {
            buffer: id,
            contents: contents.to_vec(),
        });
        Some(MockBuffer {
            id,
            contents: contents.to_vec(),
        })
    }

    fn make_default_library(&self) -> Option<MockLibrary> {
        let faults = self.gpu.faults();
        if faults.library {
            return None;
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakeLibrary(id));

        let functions = [
            ("basic_vertex", ShaderStage::Vertex),
            ("basic_fragment", ShaderStage::Fragment),
        ]
        .into_iter()
        .filter(|(name, _)| faults.missing_function != Some(*name))
        .collect();

        Some(MockLibrary {
            gpu: Rc::clone(&self.gpu),
            id,
            functions,
        })
    }

    fn make_render_pipeline_state(
        &self,
        descriptor: &PipelineDescriptor<'_, MockBackend>,
    ) -> Result<MockPipelineState, String> {
        if self.gpu.faults().pipeline {
            return Err("injected validation failure".into());
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakePipeline {
            pipeline: id,
            vertex: descriptor.vertex_function.name.clone(),
            fragment: descriptor.fragment_function.name.clone(),
            format: descriptor.color_format,
            topology: descriptor.topology,
            layout: descriptor.vertex_layout,
        });
        Ok(MockPipelineState { id })
    }

    fn make_command_queue(&self) -> Option<MockQueue> {
        if self.gpu.faults().queue {
            return None;
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakeQueue(id));
        Some(MockQueue {
            gpu: Rc::clone(&self.gpu),
            id,
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockSurface {
    gpu: Rc<MockGpu>,
    pub id: Id,
    pixel_format: PixelFormat,
    extent: Cell<Extent>,
}

impl Surface<MockBackend> for MockSurface {
    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn extent(&self) -> Extent {
        self.extent.get()
    }

    fn resize(&self, extent: Extent) {
        self.gpu.record(Call::Resize(extent));
        self.extent.set(extent);
    }

    fn next_drawable(&self) -> Result<MockDrawable, SurfaceErrorAction> {
        if let Some(action) = self.gpu.faults().drawable {
            self.gpu.record(Call::NextDrawable(None));
            return Err(action);
        }
        let id = self.gpu.id();
        self.gpu.record(Call::NextDrawable(Some(id)));
        Ok(MockDrawable {
            gpu: Rc::clone(&self.gpu),
            id,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockBuffer {
    pub id: Id,
    pub contents: Vec<u8>,
}

#[derive(Debug)]
pub(crate) struct MockLibrary {
    gpu: Rc<MockGpu>,
    pub id: Id,
    functions: Vec<(&'static str, ShaderStage)>,
}

impl Library<MockBackend> for MockLibrary {
    fn make_function(&self, name: &str, stage: ShaderStage) -> Option<MockFunction> {
        let found = self
            .functions
            .iter()
            .any(|(n, s)| *n == name && *s == stage);
        if !found {
            return None;
        }
        self.gpu.record(Call::MakeFunction {
            name: name.to_string(),
            stage,
        });
        Some(MockFunction {
            name: name.to_string(),
            stage,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockFunction {
    pub name: String,
    pub stage: ShaderStage,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockPipelineState {
    pub id: Id,
}

#[derive(Debug)]
pub(crate) struct MockQueue {
    gpu: Rc<MockGpu>,
    pub id: Id,
}

impl CommandQueue<MockBackend> for MockQueue {
    fn make_command_buffer(&self) -> Option<MockCommandBuffer> {
        if self.gpu.faults().command_buffer {
            return None;
        }
        let id = self.gpu.id();
        self.gpu.record(Call::MakeCommandBuffer(id));
        Some(MockCommandBuffer {
            gpu: Rc::clone(&self.gpu),
            id,
            drawables: Vec::new(),
        })
    }
}

/// Texture handle of a mock drawable; equal to the drawable's id.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct MockTexture(pub Id);

#[derive(Debug)]
pub(crate) struct MockDrawable {
    gpu: Rc<MockGpu>,
    pub id: Id,
}

impl Drawable<MockBackend> for MockDrawable {
    fn texture(&self) -> MockTexture {
        MockTexture(self.id)
    }
}

impl Drop for MockDrawable {
    fn drop(&mut self) {
        self.gpu.record(Call::DropDrawable(self.id));
    }
}

/// Holds presented drawables until `commit`, like the wgpu command buffer.
#[derive(Debug)]
pub(crate) struct MockCommandBuffer {
    gpu: Rc<MockGpu>,
    pub id: Id,
    drawables: Vec<MockDrawable>,
}

impl CommandBuffer<MockBackend> for MockCommandBuffer {
    fn make_render_command_encoder(
        &mut self,
        descriptor: &RenderPassDescriptor<MockTexture>,
    ) -> Option<MockEncoder> {
        if self.gpu.faults().encoder {
            return None;
        }
        let attachment = &descriptor.color_attachments[0];
        let id = self.gpu.id();
        self.gpu.record(Call::MakeEncoder {
            command_buffer: self.id,
            encoder: id,
            texture: attachment.texture.map(|t| t.0),
            load_action: attachment.load_action,
            clear_color: attachment.clear_color,
        });
        Some(MockEncoder {
            gpu: Rc::clone(&self.gpu),
            id,
        })
    }

    fn present(&mut self, drawable: MockDrawable) {
        self.gpu.record(Call::Present {
            command_buffer: self.id,
            drawable: drawable.id,
        });
        self.drawables.push(drawable);
    }

    fn commit(self) {
        self.gpu.record(Call::Commit(self.id));
        drop(self.drawables);
    }
}

#[derive(Debug)]
pub(crate) struct MockEncoder {
    gpu: Rc<MockGpu>,
    pub id: Id,
}

impl RenderEncoder<MockBackend> for MockEncoder {
    fn set_render_pipeline_state(&mut self, state: &MockPipelineState) {
        self.gpu.record(Call::SetPipeline {
            encoder: self.id,
            pipeline: state.id,
        });
    }

    fn set_vertex_buffer(&mut self, buffer: &MockBuffer, offset: u64, index: u32) {
        self.gpu.record(Call::SetVertexBuffer {
            encoder: self.id,
            buffer: buffer.id,
            offset,
            index,
        });
    }

    fn draw_primitives(&mut self, draw: DrawPrimitives) {
        self.gpu.record(Call::Draw {
            encoder: self.id,
            draw,
        });
    }

    fn end_encoding(self) {
        self.gpu.record(Call::EndEncoding(self.id));
    }
}
