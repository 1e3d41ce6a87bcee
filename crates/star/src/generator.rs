use crate::outline::star_outline;
use crate::params::StarParams;
use crate::puff::puff;
use paperstar_common::Color;
use paperstar_geometry::{ExtrudeOptions, extrude};
use paperstar_scene::{Material, Mesh, StandardMaterial};

/// Samples per curved outline segment passed to the extrusion.
pub const CURVE_SEGMENTS: u32 = 24;
/// Uniform scale of a freshly generated star.
pub const PRESENTATION_SCALE: f32 = 1.3;
pub const ROUGHNESS: f32 = 0.9;

/// Matte, flat-shaded paper look.
pub fn star_material(color: Color) -> Material {
    Material::Standard(StandardMaterial {
        color,
        roughness: ROUGHNESS,
        metalness: 0.0,
        flat_shading: true,
        ..StandardMaterial::default()
    })
}

/// Build a puffed star mesh from `params`.
///
/// The mesh sits at the origin, unrotated, at [`PRESENTATION_SCALE`]; the
/// caller places it. Never fails: degenerate parameters give degenerate or
/// empty geometry.
pub fn generate(params: &StarParams) -> Mesh {
    let shape = star_outline(params.outer, params.inner);
    let options = ExtrudeOptions {
        depth: params.depth,
        steps: 1,
        bevel_enabled: true,
        bevel_thickness: params.bevel_thickness,
        bevel_size: params.bevel_size,
        bevel_offset: 0.0,
        bevel_segments: params.bevel_segments,
        curve_segments: CURVE_SEGMENTS,
    };
    let mut geometry = extrude(&shape, &options);
    puff(&mut geometry);

    tracing::debug!(
        vertices = geometry.vertex_count(),
        triangles = geometry.triangle_count(),
        bevel_segments = params.bevel_segments,
        "generated star"
    );

    let mut mesh = Mesh::new(geometry, star_material(params.color));
    mesh.transform.set_uniform_scale(PRESENTATION_SCALE);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn expected_vertices(segments: usize) -> usize {
        let n = 10;
        2 * 3 * (n - 2) + 6 * n * (1 + 2 * segments)
    }

    #[test]
    fn default_star_is_pink_and_scaled() {
        let mesh = generate(&StarParams::default());
        assert_eq!(mesh.geometry.vertex_count(), expected_vertices(6));
        assert_eq!(mesh.geometry.vertex_count(), 828);
        assert_eq!(mesh.material.color().to_hex(), 0xffd1dc);
        assert_eq!(mesh.transform.scale, Vec3::splat(1.3));
        assert_eq!(mesh.transform.position, Vec3::ZERO);

        let Material::Standard(standard) = &mesh.material else {
            panic!("expected a standard material");
        };
        assert_eq!(standard.roughness, 0.9);
        assert_eq!(standard.metalness, 0.0);
        assert!(standard.flat_shading);
    }

    #[test]
    fn repeated_calls_are_independent_and_identical() {
        let a = generate(&StarParams::default());
        let b = generate(&StarParams::default());
        assert_ne!(a.geometry.id(), b.geometry.id());
        assert_eq!(a.geometry.positions().as_slice(), b.geometry.positions().as_slice());
        assert_eq!(a.geometry.triangles(), b.geometry.triangles());
        assert_eq!(a.material, b.material);
    }

    #[test]
    fn color_only_changes_material() {
        let pink = generate(&StarParams::default());
        let green = generate(&StarParams {
            color: Color::from_hex(0x00ff00),
            ..StarParams::default()
        });
        assert_eq!(green.material.color().to_hex(), 0x00ff00);
        assert_eq!(pink.geometry.positions().as_slice(), green.geometry.positions().as_slice());
        assert_eq!(pink.transform, green.transform);
    }

    #[test]
    fn bevel_segment_counts_change_resolution() {
        for segments in [1, 6] {
            let mesh = generate(&StarParams {
                bevel_segments: segments,
                ..StarParams::default()
            });
            assert_eq!(mesh.geometry.vertex_count(), expected_vertices(segments as usize));
        }
        assert_eq!(expected_vertices(1), 228);
    }

    #[test]
    fn puff_leaves_positions_marked_and_normals_fresh() {
        let mesh = generate(&StarParams::default());
        assert!(mesh.geometry.positions().version() > 0);
        let normals = mesh.geometry.normals().unwrap();
        assert_eq!(normals.len(), mesh.geometry.vertex_count());
        let unit = normals
            .iter()
            .filter(|n| (n.length() - 1.0).abs() < 1e-4)
            .count();
        assert!(unit > normals.len() / 2);
    }

    #[test]
    fn puff_bulges_the_lids_outward() {
        let params = StarParams::default();
        let mesh = generate(&params);
        let bb = mesh.geometry.bounding_box().unwrap();
        // The back lid sits at -thickness before the puff and moves along -Z.
        assert!(bb.min.z < -params.bevel_thickness);
        assert!(bb.max.z > params.depth + params.bevel_thickness);
    }

    #[test]
    fn equal_radii_still_build() {
        let mesh = generate(&StarParams {
            outer: 3.0,
            inner: 3.0,
            ..StarParams::default()
        });
        assert_eq!(mesh.geometry.vertex_count(), expected_vertices(6));
    }

    #[test]
    fn degenerate_parameters_never_panic() {
        let cases = [
            StarParams {
                outer: f32::NAN,
                ..StarParams::default()
            },
            StarParams {
                outer: 0.0,
                inner: 0.0,
                ..StarParams::default()
            },
            StarParams {
                depth: -1.0,
                bevel_size: -0.5,
                ..StarParams::default()
            },
            StarParams {
                bevel_segments: 0,
                bevel_thickness: 0.0,
                ..StarParams::default()
            },
        ];
        for params in cases {
            let mesh = generate(&params);
            assert_eq!(mesh.transform.scale, Vec3::splat(1.3));
        }
    }

    #[test]
    fn huge_bevel_segment_counts_give_an_empty_mesh() {
        for bevel_segments in [1 << 31, u32::MAX] {
            let mesh = generate(&StarParams {
                bevel_segments,
                ..StarParams::default()
            });
            assert_eq!(mesh.geometry.vertex_count(), 0);
            assert_eq!(mesh.transform.scale, Vec3::splat(1.3));
        }
    }
}
