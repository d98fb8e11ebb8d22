//! Mesh data for the two primitive classes the renderer draws.
//!
//! Both generators produce interleaved `position / normal / uv` vertices with a
//! 32-byte stride and `u16` index lists. Front faces wind counter-clockwise when
//! viewed from outside the solid.

mod cube;
mod sphere;
mod vertex;

pub use cube::cube;
pub use sphere::sphere;
pub use vertex::Vertex;

/// CPU-side mesh: vertex + index data ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Size of the vertex data in bytes.
    pub fn vertex_byte_len(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<Vertex>()
    }

    /// Size of the index data in bytes.
    pub fn index_byte_len(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u16>()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index bytes, padded to a multiple of 4 as `wgpu` requires for buffer writes.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = bytemuck::cast_slice(&self.indices).to_vec();
        bytes.resize(bytes.len().next_multiple_of(4), 0);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bytes_are_padded_to_four() {
        let mesh = MeshData {
            vertices: vec![Vertex::default(); 3],
            indices: vec![0, 1, 2],
        };
        assert_eq!(mesh.index_byte_len(), 6);
        assert_eq!(mesh.index_bytes().len(), 8);
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn vertex_byte_len_uses_32_byte_stride() {
        let mesh = MeshData {
            vertices: vec![Vertex::default(); 4],
            indices: Vec::new(),
        };
        assert_eq!(mesh.vertex_byte_len(), 128);
        assert_eq!(mesh.vertex_bytes().len(), 128);
    }
}
