use crate::core::{AppControl, FrameCtx};
use crate::scene::{DrawCall, InstanceLayout};

use super::bindings::ResourceBindingLayer;
use super::mesh::MeshSet;
use super::pipeline::PipelineSet;
use super::targets::{DepthTarget, ShadowMap};
use super::RenderTarget;

/// Where the renderer is in the per-frame cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    Idle,
    ShadowPass,
    MainPass,
    Submitted,
}

impl FramePhase {
    /// `Idle → ShadowPass → MainPass → Submitted → Idle`.
    pub fn next(self) -> Self {
        match self {
            FramePhase::Idle => FramePhase::ShadowPass,
            FramePhase::ShadowPass => FramePhase::MainPass,
            FramePhase::MainPass => FramePhase::Submitted,
            FramePhase::Submitted => FramePhase::Idle,
        }
    }
}

/// Draw calls for both passes of one frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FramePlan {
    pub shadow: [DrawCall; 2],
    pub main: [DrawCall; 2],
}

/// Borrowed GPU state a frame is recorded against. Lives for one frame.
pub struct FrameResources<'a> {
    pub pipelines: &'a PipelineSet,
    pub bindings: &'a ResourceBindingLayer,
    pub shadow_map: &'a ShadowMap,
    pub depth: &'a DepthTarget,
    pub meshes: &'a MeshSet,
}

/// Records the shadow pass and the camera pass into one command buffer.
pub struct FrameRenderer {
    layout: InstanceLayout,
    phase: FramePhase,
    clear_color: wgpu::Color,
}

impl FrameRenderer {
    pub fn new(layout: InstanceLayout) -> Self {
        Self {
            layout,
            phase: FramePhase::Idle,
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn layout(&self) -> &InstanceLayout {
        &self.layout
    }

    /// Both passes draw from the same partition.
    pub fn plan(&self) -> FramePlan {
        FramePlan {
            shadow: self.layout.draws(),
            main: self.layout.draws(),
        }
    }

    /// Acquires the surface, records both passes, submits and presents.
    ///
    /// All buffer writes for this frame must already be queued.
    pub fn render(&mut self, ctx: &mut FrameCtx<'_, '_>, resources: &FrameResources<'_>) -> AppControl {
        debug_assert_eq!(self.phase, FramePhase::Idle);

        let control = ctx.present(|target| self.encode(target, resources));

        if self.finish_submitted() {
            log::trace!("frame {} submitted", ctx.time.frame_index);
        }
        control
    }

    /// Records the shadow pass then the main pass into `target.encoder`.
    ///
    /// Leaves the renderer in `MainPass` until the encoder is submitted.
    pub fn encode(&mut self, target: &mut RenderTarget<'_>, resources: &FrameResources<'_>) {
        let plan = self.plan();

        self.advance();
        self.shadow_pass(target, resources, &plan.shadow);

        self.advance();
        self.main_pass(target, resources, &plan.main);
    }

    /// Steps `MainPass → Submitted → Idle` once the encoder was submitted.
    ///
    /// Returns `false`, leaving the phase alone, when nothing was recorded
    /// (the surface could not be acquired).
    pub fn finish_submitted(&mut self) -> bool {
        if self.phase != FramePhase::MainPass {
            return false;
        }
        self.advance();
        self.advance();
        true
    }

    fn advance(&mut self) {
        self.phase = self.phase.next();
    }

    fn shadow_pass(
        &self,
        target: &mut RenderTarget<'_>,
        resources: &FrameResources<'_>,
        draws: &[DrawCall],
    ) {
        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("umbra shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(depth_attachment(resources.shadow_map.view())),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&resources.pipelines.shadow);
        pass.set_bind_group(0, resources.bindings.shadow_binding_set(), &[]);
        draw_instances(&mut pass, resources.meshes, draws);
    }

    fn main_pass(
        &self,
        target: &mut RenderTarget<'_>,
        resources: &FrameResources<'_>,
        draws: &[DrawCall],
    ) {
        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("umbra main pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(depth_attachment(resources.depth.view())),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let [vertex_set, fragment_set] = resources.bindings.render_binding_sets();
        pass.set_pipeline(&resources.pipelines.render);
        pass.set_bind_group(0, vertex_set, &[]);
        pass.set_bind_group(1, fragment_set, &[]);
        draw_instances(&mut pass, resources.meshes, draws);
    }
}

fn depth_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

fn draw_instances(pass: &mut wgpu::RenderPass<'_>, meshes: &MeshSet, draws: &[DrawCall]) {
    for call in draws {
        if call.instances.is_empty() {
            continue;
        }
        let mesh = meshes.get(call.mesh);
        pass.set_vertex_buffer(0, mesh.vertex.slice(..));
        pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..mesh.index_count, 0, call.instances.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cube, sphere};
    use crate::render::testing::{color_view, noop_device, TEST_COLOR_FORMAT};
    use crate::render::{FrameUniforms, InstanceUploads, SHADOW_MAP_SIZE};
    use crate::scene::{
        CameraConfig, CameraState, LightConfig, LightState, MeshClass, SceneConfig, SceneState,
        BOX_COUNT,
    };

    struct Rig {
        device: wgpu::Device,
        queue: wgpu::Queue,
        scene: SceneState,
        pipelines: PipelineSet,
        bindings: ResourceBindingLayer,
        shadow_map: ShadowMap,
        depth: DepthTarget,
        meshes: MeshSet,
    }

    impl Rig {
        fn new(width: u32, height: u32) -> Self {
            let (device, queue) = noop_device();
            let scene = SceneState::new(&SceneConfig {
                seed: Some(3),
                ..SceneConfig::default()
            })
            .unwrap();

            let pipelines = PipelineSet::new(&device, TEST_COLOR_FORMAT).unwrap();
            let shadow_map = ShadowMap::new(&device);
            let depth = DepthTarget::new(&device, width, height);
            let meshes = MeshSet::upload(&device, &cube(), &sphere(1.0, 16, 16).unwrap());
            let bindings =
                ResourceBindingLayer::new(&device, &pipelines.layouts, &shadow_map, scene.len())
                    .unwrap();

            Self {
                device,
                queue,
                scene,
                pipelines,
                bindings,
                shadow_map,
                depth,
                meshes,
            }
        }

        fn upload(&self, elapsed_ms: f64) {
            let light = LightState::at(elapsed_ms, &LightConfig::default());
            self.bindings
                .write_instances(&self.queue, &InstanceUploads::from_scene(&self.scene))
                .unwrap();
            self.bindings.write_frame(&self.queue, &FrameUniforms::from_light(&light));
        }

        /// Records one frame into a fresh encoder and submits it.
        fn draw(&self, renderer: &mut FrameRenderer) {
            let (w, h) = self.depth.size();
            let view = color_view(&self.device, w, h);
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

            let resources = FrameResources {
                pipelines: &self.pipelines,
                bindings: &self.bindings,
                shadow_map: &self.shadow_map,
                depth: &self.depth,
                meshes: &self.meshes,
            };
            {
                let mut target = RenderTarget::new(&mut encoder, &view);
                renderer.encode(&mut target, &resources);
            }
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    #[test]
    fn phase_cycle_returns_to_idle() {
        let mut phase = FramePhase::Idle;
        let mut seen = Vec::new();
        for _ in 0..4 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                FramePhase::ShadowPass,
                FramePhase::MainPass,
                FramePhase::Submitted,
                FramePhase::Idle
            ]
        );
    }

    #[test]
    fn both_passes_draw_identical_partitions() {
        for n in [2, 3, 30, 31] {
            let renderer = FrameRenderer::new(InstanceLayout::new(n).unwrap());
            let plan = renderer.plan();

            assert_eq!(plan.shadow, plan.main);
            assert_eq!(plan.shadow[0].mesh, MeshClass::Cube);
            assert_eq!(plan.shadow[0].instances, 0..BOX_COUNT);
            assert_eq!(plan.shadow[1].mesh, MeshClass::Sphere);
            assert_eq!(plan.shadow[1].instances, BOX_COUNT..n);
        }
    }

    #[test]
    fn plan_is_stable_across_frames() {
        let renderer = FrameRenderer::new(InstanceLayout::new(30).unwrap());
        assert_eq!(renderer.plan(), renderer.plan());
        assert_eq!(renderer.phase(), FramePhase::Idle);
    }

    #[test]
    fn encoded_frame_submits_and_returns_to_idle() {
        let rig = Rig::new(640, 480);
        let mut renderer = FrameRenderer::new(rig.scene.layout().clone());
        rig.upload(0.0);

        rig.draw(&mut renderer);
        assert_eq!(renderer.phase(), FramePhase::MainPass);

        assert!(renderer.finish_submitted());
        assert_eq!(renderer.phase(), FramePhase::Idle);

        // a second frame runs the same cycle
        rig.upload(16.0);
        rig.draw(&mut renderer);
        assert!(renderer.finish_submitted());
        assert_eq!(renderer.phase(), FramePhase::Idle);
    }

    #[test]
    fn finishing_without_a_recorded_frame_keeps_idle() {
        let mut renderer = FrameRenderer::new(InstanceLayout::new(30).unwrap());
        assert!(!renderer.finish_submitted());
        assert_eq!(renderer.phase(), FramePhase::Idle);
    }

    #[test]
    fn resize_only_touches_depth_target_and_camera() {
        let mut rig = Rig::new(1280, 720);
        let mut renderer = FrameRenderer::new(rig.scene.layout().clone());
        let camera_config = CameraConfig::default();

        let uploads_before = InstanceUploads::from_scene(&rig.scene);
        let camera_before = CameraState::new(1280, 720, &camera_config);
        let capacity = rig.bindings.capacity();

        for (w, h) in [(800, 600), (1920, 1080)] {
            rig.depth.resize(&rig.device, w, h);
            let camera = CameraState::new(w, h, &camera_config);
            rig.bindings.write_camera_projection(&rig.queue, &camera.projection);

            assert_eq!(rig.depth.size(), (w, h));
            assert_ne!(camera.projection, camera_before.projection);
            assert_eq!(rig.shadow_map.size(), SHADOW_MAP_SIZE);
            assert_eq!(rig.bindings.capacity(), capacity);

            rig.upload(0.0);
            rig.draw(&mut renderer);
            assert!(renderer.finish_submitted());
        }

        let uploads_after = InstanceUploads::from_scene(&rig.scene);
        assert_eq!(uploads_before.model_bytes(), uploads_after.model_bytes());
        assert_eq!(uploads_before.color_bytes(), uploads_after.color_bytes());
    }
}
