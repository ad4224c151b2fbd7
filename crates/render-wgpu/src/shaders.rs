/// WGSL shader for scene meshes.
///
/// Per-fragment Lambertian diffuse from a directional light plus an ambient
/// term. Textured draws sample the texture for the diffuse color and are
/// boosted; ambient always uses the vertex color. Texture rows are stored
/// top-down, so `v` is flipped.
pub const SCENE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_color: vec4<f32>,
    // xyz: direction toward the light
    light_dir: vec4<f32>,
    // rgb: ambient light, w: textured diffuse boost
    ambient: vec4<f32>,
};

struct Draw {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    color: vec4<f32>,
    // x: 1 when textured
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> draw: Draw;

@group(2) @binding(0)
var scene_texture: texture_2d<f32>;
@group(2) @binding(1)
var scene_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = draw.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_normal = normalize((draw.normal * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vec2<f32>(vertex.uv.x, 1.0 - vertex.uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(scene_texture, scene_sampler, in.uv);

    let normal = normalize(in.world_normal);
    let light_dir = normalize(globals.light_dir.xyz);
    let n_dot_l = max(dot(light_dir, normal), 0.0);

    var diffuse = globals.light_color.rgb * draw.color.rgb * n_dot_l;
    if (draw.flags.x != 0u) {
        diffuse = globals.light_color.rgb * texel.rgb * n_dot_l * globals.ambient.w;
    }
    let ambient = globals.ambient.rgb * draw.color.rgb;
    return vec4<f32>(diffuse + ambient, draw.color.a);
}
"#;
