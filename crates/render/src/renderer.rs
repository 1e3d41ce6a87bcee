use glam::Vec3;
use paperstar_scene::{Background, Light, Scene, SceneObject};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-3.0, 0.0, 50.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the scene.
///
/// Used for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (objects={}, meshes={}, lines={}) ===\n",
            scene.object_count(),
            scene.mesh_count(),
            scene.line_count()
        ));
        out.push_str(&format!(
            "Camera: eye={} target={} fov={:.0}\n",
            vec3(view.eye),
            vec3(view.target),
            view.fov_degrees
        ));
        match scene.background() {
            Background::Color(color) => out.push_str(&format!("Background: color {color}\n")),
            Background::Texture(texture) => out.push_str(&format!("Background: texture {texture}\n")),
        }

        out.push_str(&format!("Lights: {}\n", scene.lights().len()));
        for light in scene.lights() {
            match light {
                Light::Ambient { color, intensity } => {
                    out.push_str(&format!("  ambient {color} x{intensity:.2}\n"));
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                } => {
                    out.push_str(&format!(
                        "  point {color} x{intensity:.2} at {}\n",
                        vec3(*position)
                    ));
                }
            }
        }

        for (id, entry) in scene.objects() {
            let t = entry.object.transform();
            let vertices = entry.object.geometry().vertex_count();
            let look = match &entry.object {
                SceneObject::Mesh(mesh) => {
                    format!("{} {}", mesh.material.kind(), mesh.material.color())
                }
                SceneObject::Lines(lines) => format!("{} segments", lines.segment_count()),
            };
            out.push_str(&format!(
                "  [{id}] {} {:?} vertices={vertices} pos={} rot={} scale={} {look}\n",
                entry.name,
                entry.object.kind(),
                vec3(t.position),
                vec3(t.rotation),
                vec3(t.scale),
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperstar_common::{Color, Transform};
    use paperstar_geometry::BufferGeometry;
    use paperstar_scene::{LineSegments, Material, Mesh, TextureRef};

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &RenderView::default());

        assert!(output.contains("objects=0"));
        assert!(output.contains("Lights: 0"));
        assert!(output.contains("Background: color 0x000000"));
    }

    #[test]
    fn debug_renderer_lists_objects_in_order() {
        let mut scene = Scene::new();
        let triangle = || BufferGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        scene.add(
            "cube",
            Mesh::new(triangle(), Material::standard(Color::from_hex(0xff6347)))
                .with_transform(Transform::from_position(Vec3::new(1.0, 2.0, 3.0))),
        );
        scene.add("grid", LineSegments::new(triangle()));
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        });
        scene.set_background(Background::Texture(TextureRef::new("images/night_sky.jpg")));

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("objects=2, meshes=1, lines=1"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("standard 0xff6347"));
        assert!(output.contains("ambient 0xffffff"));
        assert!(output.contains("texture images/night_sky.jpg"));
        let cube = output.find("cube").unwrap();
        let grid = output.find("grid").unwrap();
        assert!(cube < grid);
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.eye, Vec3::new(-3.0, 0.0, 50.0));
        assert_eq!(view.target, Vec3::ZERO);
    }
}
