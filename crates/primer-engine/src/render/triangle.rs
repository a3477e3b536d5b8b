//! The fixed scene: one triangle, one shader pair, one clear color.

use bytemuck::{Pod, Zeroable};

use crate::device::{
    ClearColor, DrawPrimitives, PrimitiveTopology, VertexAttribute, VertexFormat, VertexLayout,
};

/// Vertex entry point resolved from the default library.
pub const VERTEX_FUNCTION: &str = "basic_vertex";

/// Fragment entry point resolved from the default library.
pub const FRAGMENT_FUNCTION: &str = "basic_fragment";

/// Buffer slot the triangle's vertices are bound to (`@location(0)` reads it).
pub const VERTEX_BUFFER_INDEX: u32 = 0;

/// Opaque red, `(221, 0, 0, 255) / 255`.
pub const CLEAR_COLOR: ClearColor = ClearColor::from_rgba8(221, 0, 0, 255);

/// The single draw issued per frame.
pub const TRIANGLE_DRAW: DrawPrimitives = DrawPrimitives {
    topology: PrimitiveTopology::Triangle,
    vertex_start: 0,
    vertex_count: 3,
    instance_count: 1,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [VertexAttribute; 1] = [VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        location: 0,
    }];

    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: std::mem::size_of::<Vertex>() as u64,
        attributes: &Self::ATTRS,
    };
}

/// Clip-space triangle, counter-clockwise from the top.
pub static TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0] },
];

/// Raw bytes uploaded into the vertex buffer.
pub fn vertex_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&TRIANGLE)
}
