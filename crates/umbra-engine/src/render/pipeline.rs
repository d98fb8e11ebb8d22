use anyhow::{Context, Result};

use crate::geometry::Vertex;

use super::bindings::BindingLayouts;
use super::targets::DEPTH_FORMAT;

const SHADOW_DEPTH_WGSL: &str = include_str!("shaders/shadow_depth.wgsl");
const SHADOW_WGSL: &str = include_str!("shaders/shadow.wgsl");

/// The two pipelines of the renderer.
///
/// Both share one vertex layout, one primitive state and one depth-stencil
/// state so the shadow pass and the camera pass agree on depth semantics.
pub struct PipelineSet {
    pub layouts: BindingLayouts,
    /// Depth-only, rendered from the light.
    pub shadow: wgpu::RenderPipeline,
    /// Lit and shadowed, rendered from the camera.
    pub render: wgpu::RenderPipeline,
}

impl PipelineSet {
    /// Validates both shaders and builds both pipelines.
    ///
    /// Failure is fatal; no partial set is ever returned.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self> {
        let shadow_module = compile_shader(device, "shadow_depth", SHADOW_DEPTH_WGSL)?;
        let render_module = compile_shader(device, "shadow", SHADOW_WGSL)?;

        let layouts = BindingLayouts::new(device);

        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra shadow pipeline layout"),
            bind_group_layouts: &[&layouts.shadow],
            immediate_size: 0,
        });

        let render_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("umbra render pipeline layout"),
            bind_group_layouts: &[&layouts.render_vertex, &layouts.render_fragment],
            immediate_size: 0,
        });

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("umbra shadow pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shadow_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: None,
            primitive: primitive_state(),
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let render = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("umbra render pipeline"),
            layout: Some(&render_layout),
            vertex: wgpu::VertexState {
                module: &render_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(),
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("pipelines built for {surface_format:?}");

        Ok(Self {
            layouts,
            shadow,
            render,
        })
    }
}

pub(crate) fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: Some(wgpu::Face::Back),
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Parses and validates WGSL before handing it to wgpu.
///
/// wgpu reports shader errors through its uncaptured-error handler; checking
/// with naga first turns them into an ordinary startup error.
pub(crate) fn validate_wgsl(name: &str, source: &str) -> Result<()> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(source)))
        .with_context(|| format!("failed to parse shader `{name}`"))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow::anyhow!("{e}"))
    .with_context(|| format!("shader `{name}` failed validation"))?;

    Ok(())
}

fn compile_shader(device: &wgpu::Device, name: &str, source: &str) -> Result<wgpu::ShaderModule> {
    validate_wgsl(name, source)?;
    log::debug!("shader `{name}` validated");

    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}
