use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene::{ObjectId, ObjectKind, PointCloud, World};

use super::RenderCtx;
use super::common::{depth_state, premul_alpha_blend};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointInstance {
    position: [f32; 3],
    color: [f32; 3],
    phase: f32,
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Float32    // phase
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-cloud uniform (bind group 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CloudUniform {
    model: [[f32; 4]; 4],
    /// time, jitter, point size (px), unused
    params: [f32; 4],
}

struct GpuCloud {
    points: wgpu::Buffer,
    count: u32,
    revision: u64,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Point-cloud renderer. Each point is a camera-facing quad expanded in the
/// vertex shader; jitter is computed there from the cloud's shader clock.
#[derive(Default)]
pub(super) struct PointRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    cloud_layout: Option<wgpu::BindGroupLayout>,

    cache: HashMap<ObjectId, GpuCloud>,
    draws: Vec<ObjectId>,
}

impl PointRenderer {
    pub(super) fn resident(&self) -> usize {
        self.cache.len()
    }

    pub(super) fn release(&mut self) -> usize {
        let n = self.cache.len();
        self.cache.clear();
        self.draws.clear();
        n
    }

    pub(super) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        frame_layout: &wgpu::BindGroupLayout,
        world: &World,
    ) {
        self.ensure_pipeline(ctx, frame_layout);
        self.draws.clear();

        for object in world.objects().iter().filter(|o| o.visible) {
            let ObjectKind::Points(cloud) = &object.kind else { continue };
            if cloud.is_empty() {
                continue;
            }
            self.ensure_cloud(ctx, object.id(), cloud);

            let Some(gpu) = self.cache.get(&object.id()) else { continue };
            let u = CloudUniform {
                model: object.transform.matrix().to_cols_array_2d(),
                params: [cloud.time, cloud.jitter, cloud.point_size, 0.0],
            };
            ctx.queue.write_buffer(&gpu.ubo, 0, bytemuck::bytes_of(&u));
            self.draws.push(object.id());
        }

        let live = &self.draws;
        self.cache.retain(|id, _| live.contains(id));
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.draws.is_empty() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        for id in &self.draws {
            let Some(cloud) = self.cache.get(id) else { continue };
            rpass.set_bind_group(1, &cloud.bind_group, &[]);
            rpass.set_vertex_buffer(0, cloud.points.slice(..));
            rpass.draw(0..6, 0..cloud.count);
        }
    }

    fn ensure_cloud(&mut self, ctx: &RenderCtx<'_>, id: ObjectId, cloud: &PointCloud) {
        if let Some(gpu) = self.cache.get_mut(&id) {
            if gpu.revision == cloud.revision {
                return;
            }
            if gpu.count as usize == cloud.len() {
                ctx.queue
                    .write_buffer(&gpu.points, 0, bytemuck::cast_slice(&instances(cloud)));
                gpu.revision = cloud.revision;
                return;
            }
        }

        let Some(layout) = self.cloud_layout.as_ref() else { return };
        let points = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen point cloud vbo"),
            contents: bytemuck::cast_slice(&instances(cloud)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen point cloud ubo"),
            size: std::mem::size_of::<CloudUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen point cloud bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });
        log::trace!("uploaded point cloud {id} ({} points)", cloud.len());

        self.cache.insert(
            id,
            GpuCloud {
                points,
                count: cloud.len() as u32,
                revision: cloud.revision,
                ubo,
                bind_group,
            },
        );
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, frame_layout: &wgpu::BindGroupLayout) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen points shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let cloud_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen point cloud bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CloudUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen points pipeline layout"),
            bind_group_layouts: &[frame_layout, &cloud_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen points pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PointInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Bind groups made with the old layout are unusable.
        self.cache.clear();
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.cloud_layout = Some(cloud_layout);
    }
}

fn instances(cloud: &PointCloud) -> Vec<PointInstance> {
    cloud
        .positions
        .iter()
        .zip(&cloud.colors)
        .zip(&cloud.phases)
        .map(|((p, c), phase)| PointInstance {
            position: *p,
            color: linear(*c),
            phase: *phase,
        })
        .collect()
}

fn linear(c: [f32; 3]) -> [f32; 3] {
    let [r, g, b, _] = crate::coords::Color::rgb(c[0], c[1], c[2]).to_linear();
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_follow_cloud_order() {
        let cloud = PointCloud::new(
            vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]],
            vec![[1.0, 1.0, 1.0]],
            vec![0.5, 1.5],
        );
        let v = instances(&cloud);
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].position, [3.0, 4.0, 5.0]);
        assert_eq!(v[1].phase, 1.5);
        // Missing colors were padded with white.
        assert_eq!(v[1].color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn cloud_uniform_is_aligned() {
        assert_eq!(std::mem::size_of::<CloudUniform>(), 80);
        assert_eq!(std::mem::size_of::<PointInstance>(), 28);
    }
}
