use anyhow::{ensure, Context, Result};
use glam::{Mat4, Vec3};

use crate::scene::{LightState, SceneState};

use super::targets::ShadowMap;

// ── binding tables ────────────────────────────────────────────────────────

/// A resource the shaders read, identified independently of its binding index.
///
/// Every binding set is described as an ordered table of slots; the slot's
/// position in the table is its `@binding` index. A slot resolves to exactly
/// one GPU resource, so two tables naming the same slot bind the same bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingSlot {
    /// `array<mat4x4<f32>>`, one model matrix per pool slot.
    ModelMatrices,
    /// `mat4x4<f32>`, camera projection × view.
    CameraProjection,
    /// `mat4x4<f32>`, light projection × view.
    LightProjection,
    /// `array<vec4<f32>>`, one RGBA color per pool slot.
    Colors,
    /// `vec4<f32>`, light position in xyz.
    LightPosition,
    /// Shadow map depth view.
    ShadowDepth,
    /// Shadow map comparison sampler.
    ShadowSampler,
}

/// Shadow pipeline, group 0 (vertex).
pub const SHADOW_BINDINGS: [BindingSlot; 2] = [BindingSlot::ModelMatrices, BindingSlot::LightProjection];

/// Render pipeline, group 0 (vertex).
pub const RENDER_VERTEX_BINDINGS: [BindingSlot; 4] = [
    BindingSlot::ModelMatrices,
    BindingSlot::CameraProjection,
    BindingSlot::LightProjection,
    BindingSlot::Colors,
];

/// Render pipeline, group 1 (fragment).
pub const RENDER_FRAGMENT_BINDINGS: [BindingSlot; 3] = [
    BindingSlot::LightPosition,
    BindingSlot::ShadowDepth,
    BindingSlot::ShadowSampler,
];

impl BindingSlot {
    fn binding_type(self) -> wgpu::BindingType {
        let storage = wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        };
        let uniform = wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        };

        match self {
            BindingSlot::ModelMatrices | BindingSlot::Colors => storage,
            BindingSlot::CameraProjection
            | BindingSlot::LightProjection
            | BindingSlot::LightPosition => uniform,
            BindingSlot::ShadowDepth => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Depth,
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            BindingSlot::ShadowSampler => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison)
            }
        }
    }
}

/// Layout entries for a binding table, `@binding(i)` = table index.
pub(crate) fn layout_entries(
    slots: &[BindingSlot],
    visibility: wgpu::ShaderStages,
) -> Vec<wgpu::BindGroupLayoutEntry> {
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| wgpu::BindGroupLayoutEntry {
            binding: i as u32,
            visibility,
            ty: slot.binding_type(),
            count: None,
        })
        .collect()
}

// ── staged uploads ────────────────────────────────────────────────────────

/// CPU mirror of the per-instance storage buffers.
///
/// Slot `i` of the pool is written at index `i` of both arrays (stride 16 and
/// 4 floats). Rebuilt from the scene every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceUploads {
    pub model_matrices: Vec<[f32; 16]>,
    pub colors: Vec<[f32; 4]>,
}

impl InstanceUploads {
    pub fn from_scene(scene: &SceneState) -> Self {
        let mut uploads = Self::default();
        uploads.stage(scene);
        uploads
    }

    /// Rewrites both arrays from the scene, reusing their allocations.
    pub fn stage(&mut self, scene: &SceneState) {
        self.model_matrices.clear();
        self.colors.clear();
        for obj in scene.objects() {
            self.model_matrices.push(obj.model_matrix().to_cols_array());
            self.colors.push(obj.color.to_array());
        }
    }

    pub fn len(&self) -> usize {
        self.model_matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model_matrices.is_empty()
    }

    pub fn model_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.model_matrices)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Per-frame light uniforms, derived once from a `LightState`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameUniforms {
    pub light_projection: [f32; 16],
    pub light_position: [f32; 4],
}

impl FrameUniforms {
    pub fn from_light(light: &LightState) -> Self {
        Self {
            light_projection: light.view_projection.to_cols_array(),
            light_position: light.position.extend(1.0).to_array(),
        }
    }
}

// ── GPU resources ─────────────────────────────────────────────────────────

const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;
const VEC4_SIZE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

/// Layouts for the three binding sets. Owned by the pipeline set.
pub struct BindingLayouts {
    pub shadow: wgpu::BindGroupLayout,
    pub render_vertex: wgpu::BindGroupLayout,
    pub render_fragment: wgpu::BindGroupLayout,
}

impl BindingLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let shadow = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra shadow bgl"),
            entries: &layout_entries(&SHADOW_BINDINGS, wgpu::ShaderStages::VERTEX),
        });
        let render_vertex = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra render vertex bgl"),
            entries: &layout_entries(&RENDER_VERTEX_BINDINGS, wgpu::ShaderStages::VERTEX),
        });
        let render_fragment = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("umbra render fragment bgl"),
            entries: &layout_entries(&RENDER_FRAGMENT_BINDINGS, wgpu::ShaderStages::FRAGMENT),
        });

        Self {
            shadow,
            render_vertex,
            render_fragment,
        }
    }
}

/// Owns every buffer the shaders read and the binding sets built over them.
///
/// All writes are queued uploads: they become visible to the next submitted
/// command buffer, never to one already in flight. Callers issue the frame's
/// writes before recording its passes.
pub struct ResourceBindingLayer {
    capacity: usize,

    model_matrices: wgpu::Buffer,
    colors: wgpu::Buffer,
    camera_projection: wgpu::Buffer,
    light_projection: wgpu::Buffer,
    light_position: wgpu::Buffer,

    shadow_group: wgpu::BindGroup,
    render_vertex_group: wgpu::BindGroup,
    render_fragment_group: wgpu::BindGroup,
}

impl ResourceBindingLayer {
    /// Allocates buffers for `capacity` instances and builds the binding sets.
    ///
    /// Fails when the per-instance storage buffers would exceed the device
    /// limits.
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindingLayouts,
        shadow_map: &ShadowMap,
        capacity: usize,
    ) -> Result<Self> {
        let capacity = capacity.max(1);
        check_instance_capacity(capacity, &device.limits())?;

        let storage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST;
        let uniform = wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST;

        let model_matrices = buffer(device, "model matrices", MAT4_SIZE * capacity as u64, storage);
        let colors = buffer(device, "colors", VEC4_SIZE * capacity as u64, storage);
        let camera_projection = buffer(device, "camera projection", MAT4_SIZE, uniform);
        let light_projection = buffer(device, "light projection", MAT4_SIZE, uniform);
        let light_position = buffer(device, "light position", VEC4_SIZE, uniform);

        let resolve = |slot: BindingSlot| {
            match slot {
                BindingSlot::ModelMatrices => model_matrices.as_entire_binding(),
                BindingSlot::CameraProjection => camera_projection.as_entire_binding(),
                BindingSlot::LightProjection => light_projection.as_entire_binding(),
                BindingSlot::Colors => colors.as_entire_binding(),
                BindingSlot::LightPosition => light_position.as_entire_binding(),
                BindingSlot::ShadowDepth => wgpu::BindingResource::TextureView(shadow_map.view()),
                BindingSlot::ShadowSampler => wgpu::BindingResource::Sampler(shadow_map.sampler()),
            }
        };

        let group = |label: &str, layout: &wgpu::BindGroupLayout, slots: &[BindingSlot]| {
            let entries: Vec<wgpu::BindGroupEntry<'_>> = slots
                .iter()
                .enumerate()
                .map(|(i, &slot)| wgpu::BindGroupEntry {
                    binding: i as u32,
                    resource: resolve(slot),
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &entries,
            })
        };

        let shadow_group = group("umbra shadow bind group", &layouts.shadow, &SHADOW_BINDINGS);
        let render_vertex_group = group(
            "umbra render vertex bind group",
            &layouts.render_vertex,
            &RENDER_VERTEX_BINDINGS,
        );
        let render_fragment_group = group(
            "umbra render fragment bind group",
            &layouts.render_fragment,
            &RENDER_FRAGMENT_BINDINGS,
        );

        Ok(Self {
            capacity,
            model_matrices,
            colors,
            camera_projection,
            light_projection,
            light_position,
            shadow_group,
            render_vertex_group,
            render_fragment_group,
        })
    }

    /// Number of instance slots the storage buffers hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Uploads the full transform and color arrays.
    ///
    /// The pool is fixed-size: `uploads` must hold exactly `capacity` entries.
    pub fn write_instances(&self, queue: &wgpu::Queue, uploads: &InstanceUploads) -> Result<()> {
        ensure!(
            uploads.len() == self.capacity,
            "staged {} instances for a pool of {}",
            uploads.len(),
            self.capacity
        );
        queue.write_buffer(&self.model_matrices, 0, uploads.model_bytes());
        queue.write_buffer(&self.colors, 0, uploads.color_bytes());
        Ok(())
    }

    pub fn write_camera_projection(&self, queue: &wgpu::Queue, projection: &Mat4) {
        queue.write_buffer(
            &self.camera_projection,
            0,
            bytemuck::cast_slice(&projection.to_cols_array()),
        );
    }

    pub fn write_light_projection(&self, queue: &wgpu::Queue, projection: &Mat4) {
        queue.write_buffer(
            &self.light_projection,
            0,
            bytemuck::cast_slice(&projection.to_cols_array()),
        );
    }

    pub fn write_light_position(&self, queue: &wgpu::Queue, position: Vec3) {
        queue.write_buffer(
            &self.light_position,
            0,
            bytemuck::cast_slice(&position.extend(1.0).to_array()),
        );
    }

    /// Writes both light uniforms from one staged value.
    pub fn write_frame(&self, queue: &wgpu::Queue, frame: &FrameUniforms) {
        self.write_light_projection(queue, &Mat4::from_cols_array(&frame.light_projection));
        self.write_light_position(queue, Vec3::from_slice(&frame.light_position[..3]));
    }

    /// Group 0 of the shadow pipeline.
    pub fn shadow_binding_set(&self) -> &wgpu::BindGroup {
        &self.shadow_group
    }

    /// Groups 0 (vertex) and 1 (fragment) of the render pipeline.
    pub fn render_binding_sets(&self) -> [&wgpu::BindGroup; 2] {
        [&self.render_vertex_group, &self.render_fragment_group]
    }
}

/// Rejects pools whose storage buffers the device cannot bind.
pub(crate) fn check_instance_capacity(capacity: usize, limits: &wgpu::Limits) -> Result<()> {
    let bytes = MAT4_SIZE
        .checked_mul(capacity as u64)
        .context("instance buffer size overflows u64")?;
    let binding_limit = u64::from(limits.max_storage_buffer_binding_size);
    let buffer_limit = limits.max_buffer_size;

    ensure!(
        bytes <= binding_limit,
        "{capacity} instances need a {bytes}-byte transform buffer, device binds at most {binding_limit} bytes"
    );
    ensure!(
        bytes <= buffer_limit,
        "{capacity} instances need a {bytes}-byte transform buffer, device allocates at most {buffer_limit} bytes"
    );
    Ok(())
}

fn buffer(device: &wgpu::Device, name: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("umbra {name}")),
        size,
        usage,
        mapped_at_creation: false,
    })
}
