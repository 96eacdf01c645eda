use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Handle into the world's geometry table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) u32);

impl GeometryId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Primitive shape descriptor, centered on the origin.
///
/// Descriptors are cheap to store and compare; triangles are only produced by
/// [`Geometry::tessellate`] when a renderer uploads them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, segments: u32, rings: u32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, segments: u32 },
    /// Horizontal plane in XZ facing +Y.
    Plane { width: f32, depth: f32 },
}

impl Geometry {
    pub fn cube(size: f32) -> Self {
        Geometry::Box { width: size, height: size, depth: size }
    }

    pub fn sphere(radius: f32) -> Self {
        Geometry::Sphere { radius, segments: 24, rings: 16 }
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        Geometry::Cylinder { radius_top: radius, radius_bottom: radius, height, segments: 20 }
    }

    /// Produces triangle + edge lists for upload.
    pub fn tessellate(&self) -> MeshData {
        let mut mesh = MeshData::default();
        match *self {
            Geometry::Box { width, height, depth } => {
                push_box(&mut mesh, width * 0.5, height * 0.5, depth * 0.5)
            }
            Geometry::Sphere { radius, segments, rings } => {
                push_sphere(&mut mesh, radius, segments.max(3), rings.max(2))
            }
            Geometry::Cylinder { radius_top, radius_bottom, height, segments } => {
                push_cylinder(&mut mesh, radius_top, radius_bottom, height, segments.max(3))
            }
            Geometry::Plane { width, depth } => push_plane(&mut mesh, width * 0.5, depth * 0.5),
        }
        mesh.edges = unique_edges(&mesh.indices);
        mesh
    }
}

/// Vertex layout shared by all mesh geometry.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// CPU-side tessellation result.
///
/// `indices` is a triangle list; `edges` is a line list over the same vertices,
/// used by the wireframe variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub edges: Vec<u32>,
}

impl MeshData {
    fn vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(MeshVertex { position, normal });
        i
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

fn push_box(mesh: &mut MeshData, hx: f32, hy: f32, hz: f32) {
    // (normal, u axis, v axis), each face wound CCW seen from outside.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let half = [hx, hy, hz];

    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| -> [f32; 3] {
            let mut p = [0.0; 3];
            for i in 0..3 {
                p[i] = (n[i] + u[i] * su + v[i] * sv) * half[i];
            }
            p
        };
        let a = mesh.vertex(corner(-1.0, -1.0), n);
        let b = mesh.vertex(corner(1.0, -1.0), n);
        let c = mesh.vertex(corner(1.0, 1.0), n);
        let d = mesh.vertex(corner(-1.0, 1.0), n);
        mesh.quad(a, b, c, d);
    }
}

fn push_sphere(mesh: &mut MeshData, radius: f32, segments: u32, rings: u32) {
    let base = mesh.vertices.len() as u32;
    for ring in 0..=rings {
        let theta = ring as f32 / rings as f32 * PI;
        let (st, ct) = theta.sin_cos();
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * TAU;
            let (sp, cp) = phi.sin_cos();
            let n = [st * cp, ct, -st * sp];
            mesh.vertex([n[0] * radius, n[1] * radius, n[2] * radius], n);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = base + ring * stride + seg;
            let b = a + stride;
            mesh.quad(a, b, b + 1, a + 1);
        }
    }
}

fn push_cylinder(mesh: &mut MeshData, r_top: f32, r_bottom: f32, height: f32, segments: u32) {
    let hy = height * 0.5;
    let slope = (r_bottom - r_top) / height.max(f32::EPSILON);

    // Side.
    let base = mesh.vertices.len() as u32;
    for seg in 0..=segments {
        let phi = seg as f32 / segments as f32 * TAU;
        let (sp, cp) = phi.sin_cos();
        let len = (1.0 + slope * slope).sqrt();
        let n = [cp / len, slope / len, -sp / len];
        mesh.vertex([cp * r_top, hy, -sp * r_top], n);
        mesh.vertex([cp * r_bottom, -hy, -sp * r_bottom], n);
    }
    for seg in 0..segments {
        let top = base + seg * 2;
        let bottom = top + 1;
        mesh.quad(bottom, bottom + 2, top + 2, top);
    }

    // Caps.
    for (y, r, ny) in [(hy, r_top, 1.0f32), (-hy, r_bottom, -1.0f32)] {
        if r <= 0.0 {
            continue;
        }
        let center = mesh.vertex([0.0, y, 0.0], [0.0, ny, 0.0]);
        let ring = mesh.vertices.len() as u32;
        for seg in 0..=segments {
            let phi = seg as f32 / segments as f32 * TAU;
            let (sp, cp) = phi.sin_cos();
            mesh.vertex([cp * r, y, -sp * r], [0.0, ny, 0.0]);
        }
        for seg in 0..segments {
            let (a, b) = (ring + seg, ring + seg + 1);
            if ny > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
}

fn push_plane(mesh: &mut MeshData, hx: f32, hz: f32) {
    let n = [0.0, 1.0, 0.0];
    let a = mesh.vertex([-hx, 0.0, hz], n);
    let b = mesh.vertex([hx, 0.0, hz], n);
    let c = mesh.vertex([hx, 0.0, -hz], n);
    let d = mesh.vertex([-hx, 0.0, -hz], n);
    mesh.quad(a, b, c, d);
}

fn unique_edges(indices: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                edges.extend_from_slice(&[key.0, key.1]);
            }
        }
    }
    edges
}
