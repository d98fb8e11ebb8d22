use std::f32::consts::PI;

use anyhow::{ensure, Result};

use super::{MeshData, Vertex};

/// Vertices addressable by a `u16` index buffer.
const MAX_VERTICES: u64 = u16::MAX as u64 + 1;

/// UV sphere centred on the origin.
///
/// Rings run from the north pole (`+Y`) to the south pole; seam vertices are
/// duplicated so uvs wrap cleanly. Degenerate pole triangles are skipped.
///
/// Fails when the tessellation needs more vertices than 16-bit indices reach.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<MeshData> {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let vertex_count = (u64::from(ws) + 1) * (u64::from(hs) + 1);
    ensure!(
        vertex_count <= MAX_VERTICES,
        "sphere {ws}x{hs} needs {vertex_count} vertices, u16 indices address at most {MAX_VERTICES}"
    );

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    let mut indices = Vec::new();

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let phi = v * PI;

        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let theta = u * 2.0 * PI;

            let normal = [
                -theta.cos() * phi.sin(),
                phi.cos(),
                theta.sin() * phi.sin(),
            ];
            vertices.push(Vertex {
                position: normal.map(|c| c * radius),
                normal,
                uv: [u, v],
            });
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = (iy * row + ix + 1) as u16;
            let b = (iy * row + ix) as u16;
            let c = ((iy + 1) * row + ix) as u16;
            let d = ((iy + 1) * row + ix + 1) as u16;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Ok(MeshData { vertices, indices })
}
