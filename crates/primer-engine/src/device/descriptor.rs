use super::backend::Backend;
use super::types::{
    ClearColor, Extent, LoadAction, PixelFormat, PrimitiveTopology, StoreAction, VertexLayout,
};

/// Parameters for configuring a presentation surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceDescriptor {
    /// Requested color format. Backends fall back to another supported format
    /// when this one is unavailable; the surface reports what it settled on.
    pub pixel_format: PixelFormat,

    /// Restricts drawables to render-attachment usage only.
    pub framebuffer_only: bool,

    /// Initial drawable size, normally the host view's bounds.
    pub extent: Extent,
}

/// Everything needed to validate a render pipeline state.
///
/// Built once during context construction and discarded after validation.
pub struct PipelineDescriptor<'a, B: Backend> {
    pub label: &'a str,
    pub vertex_function: &'a B::Function,
    pub fragment_function: &'a B::Function,
    pub color_format: PixelFormat,
    pub topology: PrimitiveTopology,
    pub vertex_layout: VertexLayout,
}

/// One color target of a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAttachment<T> {
    /// Texture rendered into; `None` until a drawable is bound for the frame.
    pub texture: Option<T>,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub clear_color: ClearColor,
}

impl<T> Default for ColorAttachment<T> {
    fn default() -> Self {
        Self {
            texture: None,
            load_action: LoadAction::DontCare,
            store_action: StoreAction::Store,
            clear_color: ClearColor::BLACK,
        }
    }
}

/// Targets and load/store behavior of one render pass.
///
/// Allocated once and rewritten at the start of every frame to point at that
/// frame's drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDescriptor<T> {
    pub color_attachments: [ColorAttachment<T>; 1],
}

impl<T> RenderPassDescriptor<T> {
    pub fn new() -> Self {
        Self {
            color_attachments: [ColorAttachment::default()],
        }
    }

    /// Points color attachment 0 at `texture` and clears it to `clear_color`.
    ///
    /// Every field of the attachment is written, so nothing from a previous
    /// frame survives.
    pub fn target_cleared(&mut self, texture: T, clear_color: ClearColor) {
        self.color_attachments[0] = ColorAttachment {
            texture: Some(texture),
            load_action: LoadAction::Clear,
            store_action: StoreAction::Store,
            clear_color,
        };
    }

    /// Drops the reference to the current frame's texture.
    pub fn release_target(&mut self) -> Option<T> {
        self.color_attachments[0].texture.take()
    }
}

impl<T> Default for RenderPassDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_has_no_target() {
        let pass: RenderPassDescriptor<u32> = RenderPassDescriptor::new();
        assert_eq!(pass.color_attachments[0].texture, None);
    }

    #[test]
    fn target_cleared_replaces_previous_frame() {
        let mut pass = RenderPassDescriptor::new();
        pass.target_cleared(1u32, ClearColor::BLACK);

        let red = ClearColor::from_rgba8(221, 0, 0, 255);
        pass.target_cleared(7u32, red);

        let a = &pass.color_attachments[0];
        assert_eq!(a.texture, Some(7));
        assert_eq!(a.load_action, LoadAction::Clear);
        assert_eq!(a.store_action, StoreAction::Store);
        assert_eq!(a.clear_color, red);
    }

    #[test]
    fn release_target_takes_texture_once() {
        let mut pass = RenderPassDescriptor::new();
        pass.target_cleared(3u32, ClearColor::BLACK);
        assert_eq!(pass.release_target(), Some(3));
        assert_eq!(pass.release_target(), None);
    }
}
