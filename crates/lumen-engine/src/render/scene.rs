use crate::scene::{Camera, World};

use super::common::{FrameUniform, frame_bind_group_layout};
use super::mesh::MeshRenderer;
use super::points::PointRenderer;
use super::{RenderCtx, RenderTarget};

/// Draws a whole `World` in one render pass.
///
/// Uploads are cached per world generation: rebuilding the world (which bumps
/// the generation) frees every cached upload before the next draw.
#[derive(Default)]
pub struct SceneRenderer {
    frame_layout: Option<wgpu::BindGroupLayout>,
    frame_ubo: Option<wgpu::Buffer>,
    frame_bind_group: Option<wgpu::BindGroup>,

    meshes: MeshRenderer,
    points: PointRenderer,

    generation: Option<u32>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry and point-cloud uploads currently held.
    pub fn resident(&self) -> usize {
        self.meshes.resident() + self.points.resident()
    }

    /// Frees every upload. Returns how many were freed.
    pub fn release(&mut self) -> usize {
        let n = self.meshes.release() + self.points.release();
        self.frame_bind_group = None;
        self.frame_ubo = None;
        self.generation = None;
        n
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        world: &World,
        camera: &Camera,
    ) {
        self.ensure_frame_bindings(ctx);

        if self.generation != Some(world.generation()) {
            let freed = self.meshes.release() + self.points.release();
            if freed > 0 {
                log::debug!("world rebuilt; freed {freed} uploads");
            }
            self.generation = Some(world.generation());
        }

        if let Some(ubo) = &self.frame_ubo {
            let u = FrameUniform::new(ctx, world, camera);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let Some(frame_layout) = self.frame_layout.as_ref() else { return };
        self.meshes.prepare(ctx, frame_layout, world, camera);
        self.points.prepare(ctx, frame_layout, world);

        let Some(frame_bind_group) = self.frame_bind_group.as_ref() else { return };
        let [r, g, b, a] = world.background.to_linear();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, frame_bind_group, &[]);
        self.meshes.draw_opaque(&mut rpass);
        self.meshes.draw_wireframe(&mut rpass);
        self.points.draw(&mut rpass);
        self.meshes.draw_translucent(&mut rpass);
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_layout.is_none() {
            self.frame_layout = Some(frame_bind_group_layout(ctx.device));
        }
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(layout) = self.frame_layout.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen frame bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });
        self.frame_ubo = Some(ubo);
        self.frame_bind_group = Some(bind_group);
    }
}
