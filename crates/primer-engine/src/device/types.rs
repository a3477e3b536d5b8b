use std::fmt;

/// Size of a view or surface in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Surfaces cannot be configured with a zero dimension.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Color formats a presentation surface can be configured with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba8Unorm,
    Rgba8UnormSrgb,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 4] = [
        PixelFormat::Bgra8Unorm,
        PixelFormat::Bgra8UnormSrgb,
        PixelFormat::Rgba8Unorm,
        PixelFormat::Rgba8UnormSrgb,
    ];
}

/// Programmable pipeline stage a shader function runs in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveTopology {
    /// Every three vertices form one triangle.
    Triangle,
}

/// Arguments of a non-indexed draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawPrimitives {
    pub topology: PrimitiveTopology,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub instance_count: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexFormat {
    Float32x3,
}

impl VertexFormat {
    /// Size of one attribute of this format, in bytes.
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float32x3 => 12,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub format: VertexFormat,
    pub offset: u64,
    pub location: u32,
}

/// Layout of one per-vertex buffer slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: &'static [VertexAttribute],
}

/// Linear RGBA color used to clear a render target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const BLACK: ClearColor = ClearColor::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels, each divided by 255.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }
}

/// What happens to an attachment's contents at the start of a render pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadAction {
    /// Previous contents are undefined.
    DontCare,
    Clear,
}

/// What happens to an attachment's contents at the end of a render pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StoreAction {
    Store,
}
