use crate::attribute::Attribute;
use glam::{Vec2, Vec3};
use uuid::Uuid;

/// Unique identity of a geometry instance. GPU caches key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub Uuid);

impl GeometryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GeometryId {
    fn default() -> Self {
        Self::new()
    }
}

/// A contiguous vertex (or index) range drawn with one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub start: u32,
    pub count: u32,
    pub material_index: u32,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangle geometry stored as flat per-vertex attribute buffers.
///
/// Without an index buffer every three consecutive vertices form a triangle
/// and no vertex is shared between faces.
#[derive(Debug, Clone)]
pub struct BufferGeometry {
    id: GeometryId,
    positions: Attribute<Vec3>,
    normals: Option<Attribute<Vec3>>,
    uvs: Option<Attribute<Vec2>>,
    colors: Option<Attribute<Vec3>>,
    indices: Option<Vec<u32>>,
    groups: Vec<Group>,
}

impl Default for BufferGeometry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BufferGeometry {
    /// Non-indexed geometry from raw positions.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            id: GeometryId::new(),
            positions: Attribute::new(positions),
            normals: None,
            uvs: None,
            colors: None,
            indices: None,
            groups: Vec::new(),
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(Attribute::new(normals));
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(Attribute::new(uvs));
        self
    }

    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        self.colors = Some(Attribute::new(colors));
        self
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn positions(&self) -> &Attribute<Vec3> {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut Attribute<Vec3> {
        &mut self.positions
    }

    pub fn normals(&self) -> Option<&Attribute<Vec3>> {
        self.normals.as_ref()
    }

    pub fn uvs(&self) -> Option<&Attribute<Vec2>> {
        self.uvs.as_ref()
    }

    pub fn colors(&self) -> Option<&Attribute<Vec3>> {
        self.colors.as_ref()
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn add_group(&mut self, start: u32, count: u32, material_index: u32) {
        self.groups.push(Group {
            start,
            count,
            material_index,
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex index triples of every triangle.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.triangle_count() as u32)
                .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                .collect(),
        }
    }

    /// Index buffer for drawing: the stored one, or `0..n` when non-indexed.
    pub fn to_indexed_triangles(&self) -> Vec<u32> {
        match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.positions.len() as u32).collect(),
        }
    }

    /// Recompute per-vertex normals from the current positions.
    ///
    /// Indexed geometry accumulates area-weighted face normals on shared
    /// vertices. Non-indexed geometry gives each corner its face normal.
    /// Degenerate faces contribute a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let positions = self.positions.as_slice();
        let mut normals = vec![Vec3::ZERO; positions.len()];

        match &self.indices {
            Some(indices) => {
                for tri in indices.chunks_exact(3) {
                    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                    let (Some(pa), Some(pb), Some(pc)) =
                        (positions.get(a), positions.get(b), positions.get(c))
                    else {
                        continue;
                    };
                    let face = face_normal(*pa, *pb, *pc);
                    normals[a] += face;
                    normals[b] += face;
                    normals[c] += face;
                }
            }
            None => {
                for (corners, out) in positions.chunks_exact(3).zip(normals.chunks_exact_mut(3)) {
                    let face = face_normal(corners[0], corners[1], corners[2]);
                    out.fill(face);
                }
            }
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }

        match &mut self.normals {
            Some(attr) => attr.replace(normals),
            None => self.normals = Some(Attribute::new(normals)),
        }
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut iter = self.positions.iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }
}

/// Unnormalized normal of triangle `a, b, c` (counter-clockwise front).
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (c - b).cross(a - b)
}
