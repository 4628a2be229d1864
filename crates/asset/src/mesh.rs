//! Flat output buffers handed to a rendering pipeline.

use bytemuck::{Pod, Zeroable};

/// Vertex with position/color, 28 bytes. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Slice of the flat buffers that belongs to one source mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Subset {
    /// Material index.
    pub id: u32,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub face_start: u32,
    pub face_count: u32,
}

impl Subset {
    /// Index range of this subset inside the index buffer.
    #[inline]
    pub fn index_range(&self) -> std::ops::Range<usize> {
        let start = self.face_start as usize * 3;
        start..start + self.face_count as usize * 3
    }

    #[inline]
    pub fn vertex_range(&self) -> std::ops::Range<usize> {
        let start = self.vertex_start as usize;
        start..start + self.vertex_count as usize
    }
}
