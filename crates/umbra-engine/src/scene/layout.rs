use std::ops::Range;

use anyhow::Result;

/// Number of leading pool slots drawn with the cube mesh.
pub const BOX_COUNT: u32 = 2;

/// Geometry class a draw call uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshClass {
    Cube,
    Sphere,
}

/// One instanced, indexed draw: a mesh and the pool slots it covers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshClass,
    pub instances: Range<u32>,
}

/// Partition of the instance pool into per-mesh ranges.
///
/// Computed once per run and shared by both passes so the shadow map always
/// covers exactly the geometry that is shaded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InstanceLayout {
    pub box_range: Range<u32>,
    pub sphere_range: Range<u32>,
}

impl InstanceLayout {
    pub fn new(count: u32) -> Result<Self> {
        anyhow::ensure!(
            count >= BOX_COUNT,
            "instance pool needs at least {BOX_COUNT} slots, got {count}"
        );
        Ok(Self {
            box_range: 0..BOX_COUNT,
            sphere_range: BOX_COUNT..count,
        })
    }

    /// Total pool size.
    pub fn count(&self) -> u32 {
        self.sphere_range.end
    }

    /// Mesh class for a pool slot.
    pub fn mesh_for(&self, slot: u32) -> Option<MeshClass> {
        if self.box_range.contains(&slot) {
            Some(MeshClass::Cube)
        } else if self.sphere_range.contains(&slot) {
            Some(MeshClass::Sphere)
        } else {
            None
        }
    }

    /// Draw order for one pass: cubes, then spheres.
    pub fn draws(&self) -> [DrawCall; 2] {
        [
            DrawCall {
                mesh: MeshClass::Cube,
                instances: self.box_range.clone(),
            },
            DrawCall {
                mesh: MeshClass::Sphere,
                instances: self.sphere_range.clone(),
            },
        ]
    }
}
