use glam::Vec3;
use paperstar_common::{Color, ObjectId, Transform};
use paperstar_geometry::primitives;
use paperstar_render::RenderView;
use paperstar_scene::{
    Animation, Background, BasicMaterial, Light, LineSegments, Material, Mesh, Pulse, Scene, SceneError,
    StandardMaterial, TextureRef,
};
use paperstar_star::{StarParams, generate};

/// Asset paths, relative to the asset directory.
pub mod assets {
    pub const NIGHT_SKY: &str = "images/night_sky.jpg";
    pub const SMILE: &str = "images/smile.jpg";
    pub const TORUS_NORMALS: &str = "images/normals/textureNormal.png";
}

const STAR_POSITION: Vec3 = Vec3::new(0.0, 20.0, 0.0);
const LIGHT_POSITION: Vec3 = Vec3::new(0.0, -10.0, 10.0);

/// Breathing of the star: +-4% around its natural size, about once a second.
pub const STAR_PULSE: Pulse = Pulse {
    base: 1.0,
    amplitude: 0.04,
    frequency: 0.006,
};

/// The demo scene and the handle of its star.
pub struct Showcase {
    pub scene: Scene,
    pub star: ObjectId,
    pub view: RenderView,
}

impl Showcase {
    pub fn build(params: &StarParams) -> Self {
        let mut scene = Scene::new();

        let cube = scene.add(
            "cube",
            Mesh::new(
                primitives::box_geometry(10.0, 10.0, 10.0),
                Material::standard(Color::from_hex(0xff6347)),
            )
            .with_transform(Transform {
                position: Vec3::new(-15.0, 0.0, -15.0),
                rotation: Vec3::new(2.0, 0.5, 0.0),
                ..Transform::default()
            }),
        );

        let icosahedron = scene.add(
            "icosahedron",
            Mesh::new(
                primitives::icosahedron(10.0),
                Material::phong(Color::from_hex(0x00ff00)),
            )
            .with_transform(Transform::from_position(Vec3::new(15.0, 0.0, -15.0))),
        );

        let smile = scene.add(
            "smile",
            Mesh::new(
                primitives::sphere(10.0, 22, 10),
                Material::Basic(BasicMaterial {
                    map: Some(TextureRef::new(assets::SMILE)),
                    ..BasicMaterial::default()
                }),
            ),
        );

        scene.add(
            "torus knot",
            Mesh::new(
                primitives::torus_knot(5.0, 1.0, 250, 5, 9, 15),
                Material::Standard(StandardMaterial {
                    roughness: 0.0,
                    metalness: 0.8,
                    normal_map: Some(TextureRef::new(assets::TORUS_NORMALS)),
                    ..StandardMaterial::default()
                }),
            )
            .with_transform(Transform::from_position(STAR_POSITION)),
        );

        let mut star_mesh = generate(params);
        star_mesh.transform.position = STAR_POSITION;
        let star = scene.add("lucky star", star_mesh);

        scene.add(
            "grid",
            LineSegments::new(primitives::grid_lines(
                200.0,
                50,
                Color::from_hex(0x444444),
                Color::from_hex(0x888888),
            )),
        );

        let light_color = Color::WHITE;
        scene.add(
            "light helper",
            LineSegments::new(primitives::wire_sphere(1.0, 4, 2, light_color))
                .with_transform(Transform::from_position(LIGHT_POSITION)),
        );
        scene.add_light(Light::Point {
            color: light_color,
            intensity: 1.0,
            position: LIGHT_POSITION,
        });
        scene.add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 1.0,
        });
        scene.set_background(Background::Texture(TextureRef::new(assets::NIGHT_SKY)));

        let animations = [
            (cube, Animation::spin(Vec3::new(0.01, 0.01, 0.0))),
            (icosahedron, Animation::spin(Vec3::new(0.0, -0.03, -0.03))),
            (smile, Animation::spin(Vec3::new(0.0, 0.05, 0.0))),
            (
                star,
                Animation::spin(Vec3::new(0.0, 0.015, 0.0)).with_pulse(STAR_PULSE),
            ),
        ];
        for (id, animation) in animations {
            // Ids come from the scene just built.
            if let Err(e) = scene.set_animation(id, animation) {
                tracing::error!("{e}");
            }
        }

        tracing::info!(
            objects = scene.object_count(),
            lights = scene.lights().len(),
            "showcase built"
        );

        Self {
            scene,
            star,
            view: RenderView::default(),
        }
    }

    /// Regenerate the star from `params`, keeping its placement and motion.
    pub fn rebuild_star(&mut self, params: &StarParams) -> Result<(), SceneError> {
        let mesh = generate(params);
        self.scene.replace_mesh(self.star, mesh.geometry, mesh.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperstar_scene::{FrameTime, ObjectKind};

    #[test]
    fn build_creates_every_object() {
        let show = Showcase::build(&StarParams::default());
        assert_eq!(show.scene.object_count(), 7);
        assert_eq!(show.scene.mesh_count(), 5);
        assert_eq!(show.scene.line_count(), 2);
        assert_eq!(show.scene.lights().len(), 2);
        assert_eq!(show.scene.find("lucky star"), Some(show.star));
        assert!(matches!(show.scene.background(), Background::Texture(_)));

        let smile = show.scene.find("smile").unwrap();
        let material = &show.scene.get(smile).unwrap().object.as_mesh().unwrap().material;
        assert!(matches!(material, Material::Basic(_)));
        assert_eq!(material.map(), Some(&TextureRef::new(assets::SMILE)));
        assert_eq!(material.color(), Color::WHITE);
    }

    #[test]
    fn star_sits_above_the_origin_with_its_color() {
        let params = StarParams::default();
        let show = Showcase::build(&params);
        let entry = show.scene.get(show.star).unwrap();
        assert_eq!(entry.object.kind(), ObjectKind::Mesh);
        assert_eq!(entry.object.transform().position, STAR_POSITION);
        let mesh = entry.object.as_mesh().unwrap();
        assert_eq!(mesh.material.color(), params.color);
        assert_eq!(mesh.geometry.vertex_count(), 828);
    }

    #[test]
    fn rebuild_keeps_transform_and_swaps_geometry() {
        let mut show = Showcase::build(&StarParams::default());
        for frame in 1..=10 {
            show.scene.update(&FrameTime::fixed(frame, 60.0));
        }
        let before = *show.scene.get(show.star).unwrap().object.transform();
        let old_id = show.scene.get(show.star).unwrap().object.geometry().id();

        let params = StarParams {
            bevel_segments: 1,
            color: Color::from_hex(0x00ff00),
            ..StarParams::default()
        };
        show.rebuild_star(&params).unwrap();

        let entry = show.scene.get(show.star).unwrap();
        assert_eq!(*entry.object.transform(), before);
        assert_ne!(entry.object.geometry().id(), old_id);
        assert_eq!(entry.object.geometry().vertex_count(), 228);
        assert_eq!(
            entry.object.as_mesh().unwrap().material.color(),
            Color::from_hex(0x00ff00)
        );
    }

    #[test]
    fn animations_follow_the_frame_clock() {
        let mut show = Showcase::build(&StarParams::default());
        let cube = show.scene.find("cube").unwrap();
        let start = show.scene.get(cube).unwrap().object.transform().rotation;
        show.scene.update(&FrameTime::fixed(1, 60.0));
        let rotation = show.scene.get(cube).unwrap().object.transform().rotation;
        assert!((rotation.x - start.x - 0.01).abs() < 1e-4);
        assert!((rotation.y - start.y - 0.01).abs() < 1e-4);

        let star = show.scene.get(show.star).unwrap().object.transform();
        let expected = STAR_PULSE.scale_at(FrameTime::fixed(1, 60.0).elapsed_ms());
        assert!((star.scale.x - expected).abs() < 1e-5);
    }

    #[test]
    fn camera_matches_the_demo_framing() {
        let show = Showcase::build(&StarParams::default());
        assert_eq!(show.view.eye, Vec3::new(-3.0, 0.0, 50.0));
        assert_eq!(show.view.fov_degrees, 75.0);
    }
}
