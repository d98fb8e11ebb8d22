//! GPU rendering subsystem.
//!
//! Two passes per frame, recorded into one command buffer:
//! - shadow pass: depth-only, from the light, into the fixed-size shadow map
//! - main pass: lit shading from the camera, sampling the shadow map through a
//!   comparison sampler
//!
//! `PipelineSet` builds both pipelines, `ResourceBindingLayer` owns the buffers
//! and binding sets, `FrameRenderer` records and submits.

mod bindings;
mod ctx;
mod frame;
mod mesh;
mod pipeline;
mod targets;

#[cfg(test)]
mod testing;

pub use bindings::{
    BindingLayouts, BindingSlot, FrameUniforms, InstanceUploads, ResourceBindingLayer,
    RENDER_FRAGMENT_BINDINGS, RENDER_VERTEX_BINDINGS, SHADOW_BINDINGS,
};
pub use ctx::RenderTarget;
pub use frame::{FramePhase, FramePlan, FrameRenderer, FrameResources};
pub use mesh::{GpuMesh, MeshSet};
pub use pipeline::PipelineSet;
pub use targets::{DepthTarget, ShadowMap, DEPTH_FORMAT, SHADOW_MAP_SIZE};
