//! Tessellation of the analytic boundary shapes.
//!
//! Every shape is aligned with the z axis and produces outward-facing,
//! counter-clockwise triangles, so back-face culling keeps the near surface
//! and front-face culling keeps the far surface.

use std::f32::consts::{FRAC_PI_2, TAU};

use boundaries_assets::{MeshData, Vertex};
use glam::Vec3;

/// Segment counts for curved shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tessellation {
    /// Segments around the z axis.
    pub slices: u32,
    /// Segments from pole to pole (split between the two caps of a capsule).
    pub stacks: u32,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            slices: 32,
            stacks: 16,
        }
    }
}

impl Tessellation {
    pub fn new(slices: u32, stacks: u32) -> Self {
        // Fewer than 3 slices or 2 stacks has no volume.
        Self {
            slices: slices.max(3),
            stacks: stacks.max(2),
        }
    }
}

/// A point on a shape's profile in (radius, z) space, with its normal in the
/// same space. Revolving it around the z axis yields a ring of vertices.
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    radius: f32,
    z: f32,
    normal_radius: f32,
    normal_z: f32,
}

impl ProfilePoint {
    fn new(radius: f32, z: f32, normal_radius: f32, normal_z: f32) -> Self {
        Self {
            radius,
            z,
            normal_radius,
            normal_z,
        }
    }

    /// Point on a circular arc of `radius` around `(0, z_center)` at latitude `phi`.
    /// Poles are pinned to the axis so their bands collapse into fans.
    fn on_arc(radius: f32, z_center: f32, phi: f32, pole: bool) -> Self {
        let (sin, cos) = phi.sin_cos();
        let ring = if pole { 0.0 } else { radius * cos };
        Self::new(ring, z_center + radius * sin, cos, sin)
    }
}

/// Revolves each profile strip (ordered bottom to top) around the z axis.
fn revolve(center: Vec3, strips: &[Vec<ProfilePoint>], slices: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let ring_len = slices + 1;

    for strip in strips {
        let base = mesh.vertices.len() as u32;

        // 1. Rings (the seam vertex is duplicated so every ring closes)
        for point in strip {
            for j in 0..=slices {
                let (sin, cos) = (TAU * j as f32 / slices as f32).sin_cos();
                let position = center + Vec3::new(point.radius * cos, point.radius * sin, point.z);
                let normal = Vec3::new(point.normal_radius * cos, point.normal_radius * sin, point.normal_z)
                    .normalize_or_zero();
                mesh.vertices.push(Vertex::new(position, normal));
            }
        }

        // 2. Quads between consecutive rings; rings on the axis collapse to fans
        for (k, pair) in strip.windows(2).enumerate() {
            let (lower, upper) = (pair[0], pair[1]);
            for j in 0..slices {
                let a = base + k as u32 * ring_len + j;
                let b = a + 1;
                let c = a + ring_len;
                let d = c + 1;

                if lower.radius != 0.0 {
                    mesh.indices.extend_from_slice(&[a, b, c]);
                }
                if upper.radius != 0.0 {
                    mesh.indices.extend_from_slice(&[b, d, c]);
                }
            }
        }
    }

    mesh
}

pub fn sphere(center: Vec3, radius: f32, tessellation: Tessellation) -> MeshData {
    let stacks = tessellation.stacks;
    let profile = (0..=stacks)
        .map(|i| {
            let phi = -FRAC_PI_2 + std::f32::consts::PI * i as f32 / stacks as f32;
            ProfilePoint::on_arc(radius, 0.0, phi, i == 0 || i == stacks)
        })
        .collect();

    revolve(center, &[profile], tessellation.slices)
}

/// Axis-aligned box; `dimensions` are full edge lengths.
pub fn cuboid(center: Vec3, dimensions: Vec3) -> MeshData {
    let half = dimensions * 0.5;
    let mut mesh = MeshData::default();

    // (normal, u, v) with u x v == normal, so the corner order below is CCW
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + (normal + u * su + v * sv) * half;
            mesh.vertices.push(Vertex::new(position, normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// Cone around its centre of mass: base at `-height/4`, apex at `+3*height/4`.
pub fn cone(center: Vec3, radius: f32, height: f32, tessellation: Tessellation) -> MeshData {
    let base_z = -0.25 * height;
    let apex_z = 0.75 * height;

    // Side normal in (radius, z): perpendicular to the slant, pointing out
    let slant = glam::Vec2::new(height, radius).normalize_or_zero();

    let base = vec![
        ProfilePoint::new(0.0, base_z, 0.0, -1.0),
        ProfilePoint::new(radius, base_z, 0.0, -1.0),
    ];
    let side = vec![
        ProfilePoint::new(radius, base_z, slant.x, slant.y),
        ProfilePoint::new(0.0, apex_z, slant.x, slant.y),
    ];

    revolve(center, &[base, side], tessellation.slices)
}

/// Cylinder of `height` centred on `center`.
pub fn cylinder(center: Vec3, radius: f32, height: f32, tessellation: Tessellation) -> MeshData {
    let half = 0.5 * height;

    let bottom = vec![
        ProfilePoint::new(0.0, -half, 0.0, -1.0),
        ProfilePoint::new(radius, -half, 0.0, -1.0),
    ];
    let wall = vec![
        ProfilePoint::new(radius, -half, 1.0, 0.0),
        ProfilePoint::new(radius, half, 1.0, 0.0),
    ];
    let top = vec![
        ProfilePoint::new(radius, half, 0.0, 1.0),
        ProfilePoint::new(0.0, half, 0.0, 1.0),
    ];

    revolve(center, &[bottom, wall, top], tessellation.slices)
}

/// Cylinder of `height` with hemispherical caps of `radius` on both ends.
pub fn capsule(center: Vec3, radius: f32, height: f32, tessellation: Tessellation) -> MeshData {
    let half = 0.5 * height;
    let cap_stacks = (tessellation.stacks / 2).max(1);

    let mut profile = Vec::with_capacity(2 * (cap_stacks as usize + 1));
    for i in 0..=cap_stacks {
        let phi = -FRAC_PI_2 + FRAC_PI_2 * i as f32 / cap_stacks as f32;
        profile.push(ProfilePoint::on_arc(radius, -half, phi, i == 0));
    }
    for i in 0..=cap_stacks {
        let phi = FRAC_PI_2 * i as f32 / cap_stacks as f32;
        profile.push(ProfilePoint::on_arc(radius, half, phi, i == cap_stacks));
    }

    revolve(center, &[profile], tessellation.slices)
}
