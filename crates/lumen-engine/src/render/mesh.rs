use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::scene::{Camera, GeometryId, MaterialVariant, MeshVertex, ObjectKind, World};

use super::RenderCtx;
use super::common::{MeshInstance, depth_state, ensure_capacity, premul_alpha_blend};

/// Uploaded geometry: triangles for filled variants, edges for wireframe.
struct GpuMesh {
    vertices: wgpu::Buffer,
    triangles: wgpu::Buffer,
    triangle_count: u32,
    edges: wgpu::Buffer,
    edge_count: u32,
}

#[derive(Debug, Copy, Clone)]
struct MeshDraw {
    geometry: GeometryId,
    instance: u32,
    depth: f32,
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Mesh renderer: lit solid/metallic/glass surfaces plus wireframe edges.
///
/// Geometry is tessellated and uploaded once per `GeometryId`; per-object
/// transforms and materials go through a per-frame instance buffer.
#[derive(Default)]
pub(super) struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    opaque: Option<wgpu::RenderPipeline>,
    translucent: Option<wgpu::RenderPipeline>,
    lines: Option<wgpu::RenderPipeline>,

    cache: HashMap<GeometryId, GpuMesh>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    opaque_draws: Vec<MeshDraw>,
    line_draws: Vec<MeshDraw>,
    translucent_draws: Vec<MeshDraw>,
}

impl MeshRenderer {
    pub(super) fn resident(&self) -> usize {
        self.cache.len()
    }

    /// Drops every geometry upload; returns how many there were.
    pub(super) fn release(&mut self) -> usize {
        let n = self.cache.len();
        self.cache.clear();
        self.instance_vbo = None;
        self.instance_capacity = 0;
        n
    }

    /// Uploads missing geometry and this frame's instances.
    pub(super) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        frame_layout: &wgpu::BindGroupLayout,
        world: &World,
        camera: &Camera,
    ) {
        self.ensure_pipelines(ctx, frame_layout);

        self.opaque_draws.clear();
        self.line_draws.clear();
        self.translucent_draws.clear();

        let mut instances = Vec::new();
        for object in world.objects().iter().filter(|o| o.visible) {
            let ObjectKind::Mesh { geometry, material } = &object.kind else { continue };
            if !self.ensure_geometry(ctx, world, *geometry) {
                continue;
            }

            let draw = MeshDraw {
                geometry: *geometry,
                instance: instances.len() as u32,
                depth: camera.position.distance_squared(object.transform.position),
            };
            instances.push(MeshInstance::new(object.transform.matrix(), material));

            if material.variant == MaterialVariant::Wireframe {
                self.line_draws.push(draw);
            } else if material.is_translucent() {
                self.translucent_draws.push(draw);
            } else {
                self.opaque_draws.push(draw);
            }
        }

        // Back to front.
        self.translucent_draws
            .sort_by(|a, b| b.depth.total_cmp(&a.depth));

        if instances.is_empty() {
            return;
        }
        ensure_capacity::<MeshInstance>(
            ctx,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            "lumen mesh instance vbo",
        );
        if let Some(vbo) = &self.instance_vbo {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&instances));
        }
    }

    pub(super) fn draw_opaque(&self, rpass: &mut wgpu::RenderPass<'_>) {
        self.draw(rpass, self.opaque.as_ref(), &self.opaque_draws, false);
    }

    pub(super) fn draw_wireframe(&self, rpass: &mut wgpu::RenderPass<'_>) {
        self.draw(rpass, self.lines.as_ref(), &self.line_draws, true);
    }

    pub(super) fn draw_translucent(&self, rpass: &mut wgpu::RenderPass<'_>) {
        self.draw(rpass, self.translucent.as_ref(), &self.translucent_draws, false);
    }

    fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        pipeline: Option<&wgpu::RenderPipeline>,
        draws: &[MeshDraw],
        edges: bool,
    ) {
        if draws.is_empty() {
            return;
        }
        let Some(pipeline) = pipeline else { return };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        for draw in draws {
            let Some(mesh) = self.cache.get(&draw.geometry) else { continue };
            let (indices, count) = if edges {
                (&mesh.edges, mesh.edge_count)
            } else {
                (&mesh.triangles, mesh.triangle_count)
            };
            if count == 0 {
                continue;
            }
            rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
            rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..count, 0, draw.instance..draw.instance + 1);
        }
    }

    fn ensure_geometry(&mut self, ctx: &RenderCtx<'_>, world: &World, id: GeometryId) -> bool {
        if self.cache.contains_key(&id) {
            return true;
        }
        let Some(geometry) = world.geometry(id) else {
            log::warn!("mesh references unknown geometry {}", id.raw());
            return false;
        };

        let data = geometry.tessellate();
        if data.vertices.is_empty() {
            return false;
        }
        let label = |what: &str| format!("lumen geometry {} {what}", id.raw());

        let mesh = GpuMesh {
            vertices: ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label("vbo")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            triangles: ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label("ibo")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            triangle_count: data.indices.len() as u32,
            edges: ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label("edges")),
                contents: bytemuck::cast_slice(&data.edges),
                usage: wgpu::BufferUsages::INDEX,
            }),
            edge_count: data.edges.len() as u32,
        };
        log::trace!(
            "uploaded geometry {} ({} vertices, {} triangles)",
            id.raw(),
            data.vertices.len(),
            data.indices.len() / 3
        );
        self.cache.insert(id, mesh);
        true
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>, frame_layout: &wgpu::BindGroupLayout) {
        if self.pipeline_format == Some(ctx.surface_format) && self.opaque.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen mesh pipeline layout"),
            bind_group_layouts: &[frame_layout],
            immediate_size: 0,
        });

        let build = |label: &'static str,
                     fs_entry: &'static str,
                     topology: wgpu::PrimitiveTopology,
                     depth_write: bool| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[MeshVertex::layout(), MeshInstance::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(depth_state(depth_write)),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.opaque = Some(build(
            "lumen mesh opaque pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
            true,
        ));
        self.translucent = Some(build(
            "lumen mesh translucent pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
            false,
        ));
        self.lines = Some(build(
            "lumen mesh wireframe pipeline",
            "fs_line",
            wgpu::PrimitiveTopology::LineList,
            true,
        ));
        self.pipeline_format = Some(ctx.surface_format);
    }
}
