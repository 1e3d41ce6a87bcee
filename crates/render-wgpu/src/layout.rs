//! GPU-side data layouts and the CPU packing that fills them.

use crate::camera::OrbitCamera;
use bytemuck::{Pod, Zeroable};
use paperstar_common::{Color, Transform};
use paperstar_geometry::BufferGeometry;
use paperstar_scene::{Light, Material};

pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub ambient: [f32; 4],
    pub point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    pub counts: [u32; 4],
}

impl Globals {
    /// Camera matrices plus the scene's lights, summed per kind.
    ///
    /// Point lights past [`MAX_POINT_LIGHTS`] are dropped.
    pub fn new(camera: &OrbitCamera, lights: &[Light]) -> Self {
        let mut globals = Self::zeroed();
        globals.view_proj = camera.view_projection().to_cols_array_2d();
        globals.eye = camera.eye().extend(1.0).to_array();

        let mut ambient = [0.0_f32; 3];
        let mut points = 0;
        for light in lights {
            let radiance = linear(light.color()).map(|c| c * light.intensity());
            match light {
                Light::Ambient { .. } => {
                    for (sum, c) in ambient.iter_mut().zip(radiance) {
                        *sum += c;
                    }
                }
                Light::Point { position, .. } => {
                    if points == MAX_POINT_LIGHTS {
                        tracing::debug!("point light limit reached, ignoring the rest");
                        continue;
                    }
                    globals.point_positions[points] = position.extend(1.0).to_array();
                    globals.point_colors[points] = [radiance[0], radiance[1], radiance[2], 1.0];
                    points += 1;
                }
            }
        }
        globals.ambient = [ambient[0], ambient[1], ambient[2], 1.0];
        globals.counts = [points as u32, 0, 0, 0];
        globals
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Per-object data, one instance per draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    /// Shading model, flat flag, base map flag, normal map flag.
    pub params: [f32; 4],
    /// Roughness, metalness, shininess.
    pub material: [f32; 4],
    pub specular: [f32; 4],
}

const SHADING_STANDARD: f32 = 0.0;
const SHADING_PHONG: f32 = 1.0;
const SHADING_BASIC: f32 = 2.0;

fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

/// sRGB color to linear light, so an sRGB target reproduces the hex value.
pub fn linear(color: Color) -> [f32; 3] {
    let channel = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(color.r), channel(color.g), channel(color.b)]
}

fn model_columns(transform: &Transform) -> [[f32; 4]; 4] {
    transform.matrix().to_cols_array_2d()
}

impl InstanceData {
    pub fn for_mesh(transform: &Transform, material: &Material) -> Self {
        let [m0, m1, m2, m3] = model_columns(transform);
        let [r, g, b] = linear(material.color());
        let (shading, surface, specular) = match material {
            Material::Standard(m) => (SHADING_STANDARD, [m.roughness, m.metalness, 0.0, 0.0], [0.0; 4]),
            Material::Phong(m) => {
                let [sr, sg, sb] = linear(m.specular);
                (SHADING_PHONG, [0.0, 0.0, m.shininess, 0.0], [sr, sg, sb, 1.0])
            }
            Material::Basic(_) => (SHADING_BASIC, [0.0; 4], [0.0; 4]),
        };
        Self {
            model_0: m0,
            model_1: m1,
            model_2: m2,
            model_3: m3,
            color: [r, g, b, 1.0],
            params: [
                shading,
                flag(material.flat_shading()),
                flag(material.map().is_some()),
                flag(material.normal_map().is_some()),
            ],
            material: surface,
            specular,
        }
    }

    pub fn for_lines(transform: &Transform) -> Self {
        let [m0, m1, m2, m3] = model_columns(transform);
        Self {
            model_0: m0,
            model_1: m1,
            model_2: m2,
            model_3: m3,
            color: [1.0; 4],
            params: [SHADING_BASIC, 0.0, 0.0, 0.0],
            material: [0.0; 4],
            specular: [0.0; 4],
        }
    }
}

/// Interleave positions, normals and UVs. Missing attributes are zero.
pub fn mesh_vertices(geometry: &BufferGeometry) -> Vec<MeshVertex> {
    let normals = geometry.normals();
    let uvs = geometry.uvs();
    geometry
        .positions()
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: p.to_array(),
            normal: normals
                .and_then(|n| n.get(i))
                .unwrap_or_default()
                .to_array(),
            uv: uvs.and_then(|uv| uv.get(i)).unwrap_or_default().to_array(),
        })
        .collect()
}

/// Line vertices with linear colors; uncolored geometry draws white.
pub fn line_vertices(geometry: &BufferGeometry) -> Vec<LineVertex> {
    let colors = geometry.colors();
    geometry
        .positions()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let rgb = colors
                .and_then(|c| c.get(i))
                .map(|c| linear(Color::rgb(c.x, c.y, c.z)))
                .unwrap_or([1.0; 3]);
            LineVertex {
                position: p.to_array(),
                color: [rgb[0], rgb[1], rgb[2], 1.0],
            }
        })
        .collect()
}

/// Clear color for a plain background.
pub fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b] = linear(color);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use paperstar_scene::StandardMaterial;

    #[test]
    fn uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
        assert_eq!(std::mem::size_of::<Globals>(), 240);
        assert_eq!(std::mem::size_of::<InstanceData>(), 8 * 16);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(linear(Color::BLACK), [0.0; 3]);
        let white = linear(Color::WHITE);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        let mid = linear(Color::rgb(0.5, 0.5, 0.5))[0];
        assert!((mid - 0.214).abs() < 1e-3);
    }

    #[test]
    fn globals_sum_ambient_and_cap_points() {
        let mut lights = vec![
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.5,
            },
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.5,
            },
        ];
        for i in 0..6 {
            lights.push(Light::Point {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(i as f32, 0.0, 0.0),
            });
        }
        let globals = Globals::new(&OrbitCamera::default(), &lights);
        assert_eq!(globals.counts[0], MAX_POINT_LIGHTS as u32);
        assert!((globals.ambient[0] - 1.0).abs() < 1e-6);
        assert_eq!(globals.point_positions[3][0], 3.0);
    }

    #[test]
    fn instance_flags_follow_material() {
        let material = Material::Standard(StandardMaterial {
            flat_shading: true,
            roughness: 0.9,
            normal_map: Some(paperstar_scene::TextureRef::new("n.png")),
            ..StandardMaterial::default()
        });
        let instance = InstanceData::for_mesh(&Transform::default(), &material);
        assert_eq!(instance.params, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(instance.material[0], 0.9);
        assert_eq!(instance.model_3, [0.0, 0.0, 0.0, 1.0]);

        let phong = InstanceData::for_mesh(&Transform::default(), &Material::phong(Color::WHITE));
        assert_eq!(phong.params[0], 1.0);
        assert_eq!(phong.material[2], 30.0);
    }

    #[test]
    fn mesh_vertices_fill_missing_attributes() {
        let geo = BufferGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .with_uvs(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        let vertices = mesh_vertices(&geo);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].uv, [1.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
    }

    #[test]
    fn line_vertices_default_to_white() {
        let geo = BufferGeometry::new(vec![Vec3::ZERO, Vec3::X]);
        let vertices = line_vertices(&geo);
        assert_eq!(vertices[0].color, [1.0; 4]);
    }
}
