use crate::device::{
    Backend, CommandBuffer, CommandQueue, Drawable, FrameSkip, RenderEncoder,
    RenderPassDescriptor, Surface, SurfaceErrorAction,
};

use super::context::GraphicsContext;
use super::triangle;

/// What happened to one `render_frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Submitted,
    Skipped(FrameSkip),
}

/// Running totals across frames.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub submitted: u64,
    pub skipped: u64,
}

impl FrameStats {
    fn record(&mut self, outcome: FrameOutcome) {
        match outcome {
            FrameOutcome::Submitted => self.submitted += 1,
            FrameOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// The transient objects of one frame.
///
/// Created and consumed inside a single `render_frame` call. At most one
/// encoder exists per command buffer, and `finish` ends it before the
/// buffer is committed.
pub struct FrameSubmission<B: Backend> {
    command_buffer: B::CommandBuffer,
    encoder: B::RenderEncoder,
}

impl<B: Backend> FrameSubmission<B> {
    fn begin(
        context: &GraphicsContext<B>,
        render_pass: &RenderPassDescriptor<B::Texture>,
    ) -> Result<Self, FrameSkip> {
        let mut command_buffer = context
            .command_queue()
            .make_command_buffer()
            .ok_or(FrameSkip::CommandBufferUnavailable)?;

        // On failure the command buffer is dropped here without being committed.
        let encoder = command_buffer
            .make_render_command_encoder(render_pass)
            .ok_or(FrameSkip::EncoderUnavailable)?;

        Ok(Self {
            command_buffer,
            encoder,
        })
    }

    fn encode_triangle(&mut self, context: &GraphicsContext<B>) {
        self.encoder
            .set_render_pipeline_state(context.pipeline_state());
        self.encoder
            .set_vertex_buffer(context.vertex_buffer(), 0, triangle::VERTEX_BUFFER_INDEX);
        self.encoder.draw_primitives(triangle::TRIANGLE_DRAW);
    }

    fn finish(self, drawable: B::Drawable) {
        let FrameSubmission {
            mut command_buffer,
            encoder,
        } = self;

        encoder.end_encoding();
        command_buffer.present(drawable);
        command_buffer.commit();
    }
}

/// Drives one frame per external clock tick against a borrowed context.
pub struct FrameDriver<'c, B: Backend> {
    context: &'c GraphicsContext<B>,
    stats: FrameStats,
}

impl<'c, B: Backend> FrameDriver<'c, B> {
    pub fn new(context: &'c GraphicsContext<B>) -> Self {
        Self {
            context,
            stats: FrameStats::default(),
        }
    }

    pub fn context(&self) -> &'c GraphicsContext<B> {
        self.context
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Clears the next drawable, draws the triangle and submits.
    ///
    /// Never fails: an unavailable drawable, command buffer or encoder skips
    /// the frame with a log line, and the next tick tries again. The returned
    /// outcome is informational.
    pub fn render_frame(&mut self) -> FrameOutcome {
        let outcome = match self.submit() {
            Ok(()) => FrameOutcome::Submitted,
            Err(skip) => {
                log::log!(skip_level(skip), "frame skipped: {skip}");
                FrameOutcome::Skipped(skip)
            }
        };

        // Nothing acquired this tick may be reachable from the next one.
        self.context.release_render_target();
        self.stats.record(outcome);
        outcome
    }

    fn submit(&self) -> Result<(), FrameSkip> {
        let drawable = self
            .context
            .surface()
            .next_drawable()
            .map_err(FrameSkip::DrawableUnavailable)?;

        let mut submission = {
            let mut render_pass = self.context.render_pass_mut();
            render_pass.target_cleared(drawable.texture(), triangle::CLEAR_COLOR);
            FrameSubmission::begin(self.context, &render_pass)?
        };
        // The encoder has captured the target; the descriptor no longer needs it.
        self.context.release_render_target();

        submission.encode_triangle(self.context);
        submission.finish(drawable);
        Ok(())
    }
}

/// Visible under the default `info` filter, never at `error`: a skipped frame
/// is retried on the next tick.
fn skip_level(skip: FrameSkip) -> log::Level {
    match skip {
        FrameSkip::DrawableUnavailable(SurfaceErrorAction::Fatal) => log::Level::Warn,
        FrameSkip::DrawableUnavailable(_) => log::Level::Info,
        FrameSkip::CommandBufferUnavailable | FrameSkip::EncoderUnavailable => log::Level::Warn,
    }
}
