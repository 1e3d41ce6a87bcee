use glam::Vec3;
use paperstar_geometry::BufferGeometry;

/// Displacement at the center of the star.
pub const PUFF_STRENGTH: f32 = 0.12;
/// Exponential falloff per unit of distance from the Z axis.
pub const PUFF_FALLOFF: f32 = 0.12;

/// Outward push for a vertex at `radial` distance from the Z axis.
pub fn puff_offset(radial: f32) -> f32 {
    PUFF_STRENGTH * (-radial * PUFF_FALLOFF).exp()
}

/// Nudge every vertex along its normal by [`puff_offset`], strongest near
/// the center.
///
/// Offsets use the normals as they were before any vertex moved. Normals
/// are recomputed afterwards and the positions are marked changed.
pub fn puff(geometry: &mut BufferGeometry) {
    if geometry.normals().is_none() {
        geometry.compute_vertex_normals();
    }
    let normals: Vec<Vec3> = geometry
        .normals()
        .map(|n| n.as_slice().to_vec())
        .unwrap_or_default();

    let positions = geometry.positions_mut();
    for (p, n) in positions.as_mut_slice().iter_mut().zip(&normals) {
        let radial = p.truncate().length();
        *p += *n * puff_offset(radial);
    }
    positions.mark_changed();

    geometry.compute_vertex_normals();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_peaks_at_center_and_decays() {
        assert_eq!(puff_offset(0.0), 0.12);
        let mut last = puff_offset(0.0);
        for step in 1..100 {
            let next = puff_offset(step as f32 * 0.1);
            assert!(next < last);
            assert!(next > 0.0);
            last = next;
        }
    }

    #[test]
    fn vertices_move_along_original_normals() {
        // Triangle in the XY plane facing +Z, corners at known radii.
        let corners = vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)];
        let mut geo = BufferGeometry::new(corners.clone());
        geo.compute_vertex_normals();
        puff(&mut geo);

        for (before, after) in corners.iter().zip(geo.positions().iter()) {
            let expected = *before + Vec3::Z * puff_offset(before.truncate().length());
            assert!((after - expected).length() < 1e-6);
        }
    }

    #[test]
    fn marks_positions_and_refreshes_normals() {
        let mut geo = BufferGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        let before = geo.positions().version();
        puff(&mut geo);
        assert_eq!(geo.positions().version(), before + 1);
        // The corners moved by different amounts, so the face tilts a little.
        let n = geo.normals().unwrap().get(0).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.z > 0.99 && n != Vec3::Z);
    }

    #[test]
    fn empty_geometry_is_fine() {
        let mut geo = BufferGeometry::default();
        puff(&mut geo);
        assert!(geo.is_empty());
    }
}
