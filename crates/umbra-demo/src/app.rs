use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use umbra_engine::core::{App, AppControl, FrameCtx};
use umbra_engine::device::Gpu;
use umbra_engine::geometry::{cube, sphere};
use umbra_engine::render::{
    DepthTarget, FrameRenderer, FrameResources, FrameUniforms, InstanceUploads, MeshSet,
    PipelineSet, ResourceBindingLayer, ShadowMap,
};
use umbra_engine::scene::{CameraConfig, CameraState, LightConfig, LightState, SceneConfig, SceneState};

/// Sphere tessellation used for every sphere instance.
const SPHERE_RADIUS: f32 = 1.0;
const SPHERE_SEGMENTS: u32 = 16;

/// GPU objects created once the device exists.
struct GpuState {
    pipelines: PipelineSet,
    shadow_map: ShadowMap,
    depth: DepthTarget,
    meshes: MeshSet,
    bindings: ResourceBindingLayer,
}

/// The shadow-mapping scene: wall, floor, and a pool of bouncing spheres lit
/// by an orbiting directional light.
pub struct ShadowScene {
    scene: SceneState,
    light: LightState,
    light_config: LightConfig,
    camera_config: CameraConfig,
    uploads: InstanceUploads,
    renderer: FrameRenderer,

    gpu: Option<GpuState>,
}

impl ShadowScene {
    pub fn new(scene_config: &SceneConfig) -> Result<Self> {
        let scene = SceneState::new(scene_config).context("invalid scene configuration")?;
        let light_config = LightConfig::default();

        log::info!(
            "scene: {} instances ({} spheres)",
            scene.len(),
            scene.layout().sphere_range.len()
        );

        Ok(Self {
            light: LightState::at(0.0, &light_config),
            light_config,
            camera_config: CameraConfig::default(),
            uploads: InstanceUploads::from_scene(&scene),
            renderer: FrameRenderer::new(scene.layout().clone()),
            scene,
            gpu: None,
        })
    }
}

impl App for ShadowScene {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let device = gpu.device();

        let pipelines = PipelineSet::new(device, gpu.surface_format())?;
        let shadow_map = ShadowMap::new(device);

        let size = gpu.size();
        let depth = DepthTarget::new(device, size.width, size.height);

        let sphere_mesh = sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)?;
        let meshes = MeshSet::upload(device, &cube(), &sphere_mesh);

        let bindings =
            ResourceBindingLayer::new(device, &pipelines.layouts, &shadow_map, self.scene.len())
                .context("instance pool does not fit the device")?;

        let camera = CameraState::new(size.width, size.height, &self.camera_config);
        bindings.write_camera_projection(gpu.queue(), &camera.projection);

        self.gpu = Some(GpuState {
            pipelines,
            shadow_map,
            depth,
            meshes,
            bindings,
        });

        Ok(())
    }

    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let Some(state) = self.gpu.as_mut() else {
            return;
        };

        // The shadow map keeps its fixed size; only the camera side follows the window.
        state.depth.resize(gpu.device(), size.width, size.height);

        let camera = CameraState::new(size.width, size.height, &self.camera_config);
        state.bindings.write_camera_projection(gpu.queue(), &camera.projection);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Self {
            scene,
            light,
            light_config,
            uploads,
            renderer,
            gpu,
            ..
        } = self;

        let Some(state) = gpu.as_ref() else {
            return AppControl::Continue;
        };

        scene.advance();
        light.update(ctx.time.elapsed_ms, light_config);

        uploads.stage(scene);
        {
            let queue = ctx.gpu.queue();
            if let Err(err) = state.bindings.write_instances(queue, uploads) {
                log::error!("{err:#}");
                return AppControl::Exit;
            }
            state.bindings.write_frame(queue, &FrameUniforms::from_light(light));
        }

        let resources = FrameResources {
            pipelines: &state.pipelines,
            bindings: &state.bindings,
            shadow_map: &state.shadow_map,
            depth: &state.depth,
            meshes: &state.meshes,
        };

        renderer.render(ctx, &resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_stages_every_instance() {
        let cfg = SceneConfig {
            instance_count: 12,
            seed: Some(7),
            ..SceneConfig::default()
        };
        let app = ShadowScene::new(&cfg).unwrap();

        assert_eq!(app.uploads.len(), 12);
        assert_eq!(app.renderer.layout().count(), 12);
        assert!(app.gpu.is_none());
    }

    #[test]
    fn too_few_instances_is_rejected() {
        let cfg = SceneConfig {
            instance_count: 1,
            ..SceneConfig::default()
        };
        assert!(ShadowScene::new(&cfg).is_err());
    }
}
