use paperstar_common::Color;
use std::fmt;
use std::path::{Path, PathBuf};

/// Path of an image relative to the asset directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureRef(PathBuf);

impl TextureRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Resolve against an asset directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Physically based material: base color plus roughness/metalness.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub flat_shading: bool,
    pub map: Option<TextureRef>,
    pub normal_map: Option<TextureRef>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            flat_shading: false,
            map: None,
            normal_map: None,
        }
    }
}

/// Blinn-Phong material with a specular highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub flat_shading: bool,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            flat_shading: false,
        }
    }
}

/// Unlit material.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub map: Option<TextureRef>,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Phong(PhongMaterial),
    Basic(BasicMaterial),
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self::Standard(StandardMaterial {
            color,
            ..StandardMaterial::default()
        })
    }

    pub fn phong(color: Color) -> Self {
        Self::Phong(PhongMaterial {
            color,
            ..PhongMaterial::default()
        })
    }

    pub fn basic(color: Color) -> Self {
        Self::Basic(BasicMaterial { color, map: None })
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Standard(m) => m.color,
            Self::Phong(m) => m.color,
            Self::Basic(m) => m.color,
        }
    }

    pub fn flat_shading(&self) -> bool {
        match self {
            Self::Standard(m) => m.flat_shading,
            Self::Phong(m) => m.flat_shading,
            Self::Basic(_) => false,
        }
    }

    /// Base color texture, if any.
    pub fn map(&self) -> Option<&TextureRef> {
        match self {
            Self::Standard(m) => m.map.as_ref(),
            Self::Basic(m) => m.map.as_ref(),
            Self::Phong(_) => None,
        }
    }

    pub fn normal_map(&self) -> Option<&TextureRef> {
        match self {
            Self::Standard(m) => m.normal_map.as_ref(),
            _ => None,
        }
    }

    /// Whether the material reacts to scene lights.
    pub fn is_lit(&self) -> bool {
        !matches!(self, Self::Basic(_))
    }

    /// Short lowercase name, used in logs and text dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard(_) => "standard",
            Self::Phong(_) => "phong",
            Self::Basic(_) => "basic",
        }
    }

    /// Every texture the material references.
    pub fn textures(&self) -> impl Iterator<Item = &TextureRef> {
        self.map().into_iter().chain(self.normal_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_values() {
        let standard = StandardMaterial::default();
        assert_eq!(standard.roughness, 1.0);
        assert_eq!(standard.metalness, 0.0);
        assert!(!standard.flat_shading);

        let phong = PhongMaterial::default();
        assert_eq!(phong.specular.to_hex(), 0x111111);
        assert_eq!(phong.shininess, 30.0);
    }

    #[test]
    fn accessors_cover_every_variant() {
        let red = Color::from_hex(0xff0000);
        for material in [Material::standard(red), Material::phong(red), Material::basic(red)] {
            assert_eq!(material.color(), red);
            assert!(material.map().is_none());
        }
        assert!(!Material::basic(red).is_lit());
        assert_eq!(Material::phong(red).kind(), "phong");
    }

    #[test]
    fn textures_lists_map_and_normal_map() {
        let material = Material::Standard(StandardMaterial {
            map: Some(TextureRef::new("a.png")),
            normal_map: Some(TextureRef::new("n.png")),
            ..StandardMaterial::default()
        });
        let paths: Vec<String> = material.textures().map(|t| t.to_string()).collect();
        assert_eq!(paths, vec!["a.png", "n.png"]);
    }

    #[test]
    fn texture_ref_resolves_under_root() {
        let tex = TextureRef::new("images/smile.jpg");
        assert_eq!(
            tex.resolve(Path::new("assets")),
            PathBuf::from("assets/images/smile.jpg")
        );
    }
}
