use glam::Vec3;

use super::{MeshData, Vertex};

// (normal, u axis, v axis) with u × v == normal so each quad winds CCW from outside.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Unit cube spanning `[-0.5, 0.5]` on every axis.
///
/// Each face carries its own four vertices so normals stay flat.
pub fn cube() -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u_axis, v_axis) in FACES {
        let n = Vec3::from(normal);
        let u = Vec3::from(u_axis);
        let v = Vec3::from(v_axis);
        let base = vertices.len() as u16;

        for (su, sv) in CORNERS {
            let position = (n + u * su + v * sv) * 0.5;
            vertices.push(Vertex {
                position: position.to_array(),
                normal,
                uv: [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
            });
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn vertices_lie_on_unit_cube() {
        for v in cube().vertices {
            assert!(v.position.iter().all(|c| c.abs() <= 0.5 + 1e-6));
            let max = v.position.iter().fold(0.0f32, |m, c| m.max(c.abs()));
            assert!((max - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let mesh = cube();
        for tri in mesh.indices.chunks(3) {
            let p0 = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let p1 = Vec3::from(mesh.vertices[tri[1] as usize].position);
            let p2 = Vec3::from(mesh.vertices[tri[2] as usize].position);
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!((p1 - p0).cross(p2 - p0).dot(n) > 0.0);
        }
    }
}
