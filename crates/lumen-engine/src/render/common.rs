//! Shared GPU types and pipeline helpers.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::device::DEPTH_FORMAT;
use crate::scene::{Camera, Light, Material, World};

use super::RenderCtx;

/// Point lights beyond this count are ignored.
pub(super) const MAX_POINT_LIGHTS: usize = 4;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

pub(super) fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── frame uniform ─────────────────────────────────────────────────────────

/// Per-frame uniform shared by every pipeline (bind group 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb * intensity
    pub ambient: [f32; 4],
    pub sun_dir: [f32; 4],
    pub sun_color: [f32; 4],
    /// xyz + range
    pub point_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_color: [[f32; 4]; MAX_POINT_LIGHTS],
    /// surface width, surface height, point light count, unused
    pub params: [f32; 4],
}

impl FrameUniform {
    pub(super) fn new(ctx: &RenderCtx<'_>, world: &World, camera: &Camera) -> Self {
        let mut u = FrameUniform::zeroed();
        u.view_proj = camera.view_projection().to_cols_array_2d();
        u.camera_pos = camera.position.extend(1.0).to_array();

        let mut points = 0usize;
        let mut has_sun = false;
        for (light, owner) in world.lights() {
            let c = light.color().to_linear();
            match *light {
                Light::Ambient { intensity, .. } => {
                    for i in 0..3 {
                        u.ambient[i] += c[i] * intensity;
                    }
                }
                Light::Directional { intensity, direction, .. } if !has_sun => {
                    has_sun = true;
                    u.sun_dir = direction.extend(0.0).to_array();
                    u.sun_color = [c[0] * intensity, c[1] * intensity, c[2] * intensity, 1.0];
                }
                Light::Directional { .. } => {}
                Light::Point { intensity, range, .. } if points < MAX_POINT_LIGHTS => {
                    u.point_pos[points] = owner.transform.position.extend(range).to_array();
                    u.point_color[points] = [c[0] * intensity, c[1] * intensity, c[2] * intensity, 1.0];
                    points += 1;
                }
                Light::Point { .. } => {}
            }
        }

        u.params = [
            ctx.extent.width as f32,
            ctx.extent.height as f32,
            points as f32,
            0.0,
        ];
        u
    }
}

pub(super) fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("lumen frame bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<FrameUniform>() as u64),
            },
            count: None,
        }],
    })
}

// ── mesh instance ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct MeshInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// metalness, roughness, emissive, opacity
    pub material: [f32; 4],
}

impl MeshInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4, // color
        7 => Float32x4  // material
    ];

    pub(super) fn new(model: Mat4, material: &Material) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: material.color.to_linear(),
            material: [
                material.metalness(),
                material.roughness(),
                material.emissive,
                material.opacity(),
            ],
        }
    }

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Grows `buffer` to hold at least `required` elements of `T`.
pub(super) fn ensure_capacity<T>(
    ctx: &RenderCtx<'_>,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    label: &'static str,
) {
    if required <= *capacity && buffer.is_some() {
        return;
    }
    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<MeshInstance>(), 96);
    }
}
