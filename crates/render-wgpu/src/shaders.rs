/// Shared per-frame uniforms. Must match `layout::Globals`.
const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    ambient: vec4<f32>,
    point_positions: array<vec4<f32>, 4>,
    point_colors: array<vec4<f32>, 4>,
    counts: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

const MESH_BODY: &str = r#"
@group(1) @binding(0)
var base_map: texture_2d<f32>;
@group(1) @binding(1)
var normal_map: texture_2d<f32>;
@group(1) @binding(2)
var material_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

// params: x = shading model (0 standard, 1 phong, 2 basic), y = flat,
//         z = has base map, w = has normal map
// material: x = roughness, y = metalness, z = shininess
struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
    @location(8) params: vec4<f32>,
    @location(9) material: vec4<f32>,
    @location(10) specular: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) color: vec4<f32>,
    @location(4) params: vec4<f32>,
    @location(5) material: vec4<f32>,
    @location(6) specular: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    // Geometry UVs have v pointing up, texture rows start at the top.
    out.uv = vec2<f32>(vertex.uv.x, 1.0 - vertex.uv.y);
    out.color = instance.color;
    out.params = instance.params;
    out.material = instance.material;
    out.specular = instance.specular;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Derivatives and samples first, while control flow is still uniform.
    let dp_x = dpdx(in.world_pos);
    let dp_y = dpdy(in.world_pos);
    let duv_x = dpdx(in.uv);
    let duv_y = dpdy(in.uv);
    let base = textureSample(base_map, material_sampler, in.uv);
    let bump = textureSample(normal_map, material_sampler, in.uv).xyz * 2.0 - 1.0;

    let view_dir = normalize(globals.eye.xyz - in.world_pos);

    var n = normalize(in.world_normal);
    if (in.params.y > 0.5) {
        n = normalize(cross(dp_x, dp_y));
        if (dot(n, view_dir) < 0.0) {
            n = -n;
        }
    }

    if (in.params.w > 0.5) {
        // Cotangent frame from screen-space derivatives.
        let dp2perp = cross(dp_y, n);
        let dp1perp = cross(n, dp_x);
        let t = dp2perp * duv_x.x + dp1perp * duv_y.x;
        let b = dp2perp * duv_x.y + dp1perp * duv_y.y;
        let inv_max = inverseSqrt(max(max(dot(t, t), dot(b, b)), 1e-12));
        let frame = mat3x3<f32>(t * inv_max, b * inv_max, n);
        n = normalize(frame * bump);
    }

    var albedo = in.color.rgb;
    if (in.params.z > 0.5) {
        albedo = albedo * base.rgb;
    }

    if (in.params.x > 1.5) {
        return vec4<f32>(albedo, 1.0);
    }

    var shininess = in.material.z;
    var spec_color = in.specular.rgb;
    var diffuse_albedo = albedo;
    if (in.params.x < 0.5) {
        let roughness = clamp(in.material.x, 0.0, 1.0);
        let metalness = clamp(in.material.y, 0.0, 1.0);
        shininess = mix(256.0, 2.0, roughness);
        spec_color = mix(vec3<f32>(0.04), albedo, metalness) * (1.0 - roughness);
        diffuse_albedo = albedo * (1.0 - metalness);
    }

    var diffuse = globals.ambient.rgb;
    var specular = vec3<f32>(0.0);
    for (var i = 0u; i < globals.counts.x; i = i + 1u) {
        let light_dir = normalize(globals.point_positions[i].xyz - in.world_pos);
        let radiance = globals.point_colors[i].rgb;
        let n_dot_l = max(dot(n, light_dir), 0.0);
        diffuse = diffuse + radiance * n_dot_l;
        if (n_dot_l > 0.0) {
            let half_dir = normalize(light_dir + view_dir);
            specular = specular + radiance * spec_color * pow(max(dot(n, half_dir), 0.0), shininess);
        }
    }

    return vec4<f32>(diffuse_albedo * diffuse + specular, in.color.a);
}
"#;

const LINE_BODY: &str = r#"
struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineInstance {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex, instance: LineInstance) -> LineOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: LineOutput;
    out.clip_position = globals.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Full-screen triangle sampling the background image.
pub const BACKGROUND_SHADER: &str = r#"
@group(0) @binding(0)
var background: texture_2d<f32>;
@group(0) @binding(1)
var background_sampler: sampler;

struct BackgroundOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_background(@builtin(vertex_index) idx: u32) -> BackgroundOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: BackgroundOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 1.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_background(in: BackgroundOutput) -> @location(0) vec4<f32> {
    return textureSample(background, background_sampler, in.uv);
}
"#;

/// Lit, textured triangle meshes.
pub fn mesh_shader() -> String {
    format!("{GLOBALS}{MESH_BODY}")
}

/// Unlit vertex-colored line lists.
pub fn line_shader() -> String {
    format!("{GLOBALS}{LINE_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_the_globals_block() {
        for source in [mesh_shader(), line_shader()] {
            assert!(source.contains("struct Globals"));
            assert_eq!(source.matches("@group(0) @binding(0)").count(), 1);
        }
    }

    #[test]
    fn entry_points_are_present() {
        let mesh = mesh_shader();
        assert!(mesh.contains("fn vs_main") && mesh.contains("fn fs_main"));
        let line = line_shader();
        assert!(line.contains("fn vs_line") && line.contains("fn fs_line"));
        assert!(BACKGROUND_SHADER.contains("fn vs_background"));
    }
}
