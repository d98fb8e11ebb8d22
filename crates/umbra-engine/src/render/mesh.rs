use wgpu::util::DeviceExt;

use crate::geometry::MeshData;
use crate::scene::MeshClass;

/// Mesh resident on the GPU.
pub struct GpuMesh {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("umbra {label} vbo")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("umbra {label} ibo")),
            contents: &mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex,
            index,
            index_count: mesh.index_count(),
        }
    }
}

/// The two meshes the instance pool draws with.
pub struct MeshSet {
    pub cube: GpuMesh,
    pub sphere: GpuMesh,
}

impl MeshSet {
    pub fn upload(device: &wgpu::Device, cube: &MeshData, sphere: &MeshData) -> Self {
        Self {
            cube: GpuMesh::upload(device, "cube", cube),
            sphere: GpuMesh::upload(device, "sphere", sphere),
        }
    }

    pub fn get(&self, class: MeshClass) -> &GpuMesh {
        match class {
            MeshClass::Cube => &self.cube,
            MeshClass::Sphere => &self.sphere,
        }
    }
}
