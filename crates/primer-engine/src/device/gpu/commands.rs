use crate::device::backend::{CommandBuffer, CommandQueue, RenderEncoder};
use crate::device::descriptor::RenderPassDescriptor;
use crate::device::types::{ClearColor, DrawPrimitives, LoadAction, PrimitiveTopology, StoreAction};

use super::WgpuBackend;
use super::surface::WgpuDrawable;

/// Immutable GPU buffer.
#[derive(Debug, Clone)]
pub struct WgpuBuffer {
    pub(crate) buffer: wgpu::Buffer,
}

/// Validated render pipeline.
#[derive(Debug, Clone)]
pub struct WgpuPipelineState {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) topology: PrimitiveTopology,
}

/// Submission channel. Carries the device because wgpu records commands on
/// device-created encoders.
#[derive(Debug, Clone)]
pub struct WgpuQueue {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuQueue {
    pub(crate) fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl CommandQueue<WgpuBackend> for WgpuQueue {
    fn make_command_buffer(&self) -> Option<WgpuCommandBuffer> {
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("primer frame command buffer"),
            });

        Some(WgpuCommandBuffer {
            encoder,
            queue: self.queue.clone(),
            drawables: Vec::new(),
        })
    }
}

/// Recorded commands plus the drawables to present after submission.
pub struct WgpuCommandBuffer {
    encoder: wgpu::CommandEncoder,
    queue: wgpu::Queue,
    drawables: Vec<WgpuDrawable>,
}

impl CommandBuffer<WgpuBackend> for WgpuCommandBuffer {
    fn make_render_command_encoder(
        &mut self,
        descriptor: &RenderPassDescriptor<wgpu::TextureView>,
    ) -> Option<WgpuRenderEncoder> {
        let attachment = &descriptor.color_attachments[0];
        let view = attachment.texture.as_ref()?;

        let load = match attachment.load_action {
            LoadAction::Clear => wgpu::LoadOp::Clear(to_wgpu_color(attachment.clear_color)),
            LoadAction::DontCare => wgpu::LoadOp::Load,
        };
        let store = match attachment.store_action {
            StoreAction::Store => wgpu::StoreOp::Store,
        };

        // The pass locks the encoder until it is dropped by `end_encoding`.
        let pass = self
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("primer render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        Some(WgpuRenderEncoder {
            pass,
            topology: None,
        })
    }

    fn present(&mut self, drawable: WgpuDrawable) {
        self.drawables.push(drawable);
    }

    fn commit(self) {
        let WgpuCommandBuffer {
            encoder,
            queue,
            drawables,
        } = self;

        queue.submit(std::iter::once(encoder.finish()));
        for drawable in drawables {
            drawable.present();
        }
    }
}

pub struct WgpuRenderEncoder {
    pass: wgpu::RenderPass<'static>,

    /// Topology baked into the bound pipeline.
    topology: Option<PrimitiveTopology>,
}

impl RenderEncoder<WgpuBackend> for WgpuRenderEncoder {
    fn set_render_pipeline_state(&mut self, state: &WgpuPipelineState) {
        self.pass.set_pipeline(&state.pipeline);
        self.topology = Some(state.topology);
    }

    fn set_vertex_buffer(&mut self, buffer: &WgpuBuffer, offset: u64, index: u32) {
        self.pass.set_vertex_buffer(index, buffer.buffer.slice(offset..));
    }

    fn draw_primitives(&mut self, draw: DrawPrimitives) {
        // wgpu fixes topology at pipeline creation; a mismatch would draw the
        // wrong primitives silently.
        if self.topology != Some(draw.topology) {
            log::warn!(
                "draw topology {:?} does not match bound pipeline ({:?})",
                draw.topology,
                self.topology
            );
        }

        let first = draw.vertex_start;
        self.pass
            .draw(first..first + draw.vertex_count, 0..draw.instance_count);
    }

    fn end_encoding(self) {
        drop(self.pass);
    }
}

fn to_wgpu_color(c: ClearColor) -> wgpu::Color {
    wgpu::Color {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

pub(crate) fn to_wgpu_topology(topology: PrimitiveTopology) -> wgpu::PrimitiveTopology {
    match topology {
        PrimitiveTopology::Triangle => wgpu::PrimitiveTopology::TriangleList,
    }
}
