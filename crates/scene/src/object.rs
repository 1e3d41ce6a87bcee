use crate::material::Material;
use paperstar_common::Transform;
use paperstar_geometry::BufferGeometry;

/// Triangle geometry drawn with one material.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: BufferGeometry,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: BufferGeometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Line-list geometry with per-vertex colors, drawn unlit.
#[derive(Debug, Clone)]
pub struct LineSegments {
    pub geometry: BufferGeometry,
    pub transform: Transform,
}

impl LineSegments {
    pub fn new(geometry: BufferGeometry) -> Self {
        Self {
            geometry,
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn segment_count(&self) -> usize {
        self.geometry.vertex_count() / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Lines,
}

#[derive(Debug, Clone)]
pub enum SceneObject {
    Mesh(Mesh),
    Lines(LineSegments),
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Mesh(_) => ObjectKind::Mesh,
            Self::Lines(_) => ObjectKind::Lines,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Self::Mesh(m) => &m.transform,
            Self::Lines(l) => &l.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Self::Mesh(m) => &mut m.transform,
            Self::Lines(l) => &mut l.transform,
        }
    }

    pub fn geometry(&self) -> &BufferGeometry {
        match self {
            Self::Mesh(m) => &m.geometry,
            Self::Lines(l) => &l.geometry,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(m) => Some(m),
            Self::Lines(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Self::Mesh(m) => Some(m),
            Self::Lines(_) => None,
        }
    }
}

impl From<Mesh> for SceneObject {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<LineSegments> for SceneObject {
    fn from(lines: LineSegments) -> Self {
        Self::Lines(lines)
    }
}
