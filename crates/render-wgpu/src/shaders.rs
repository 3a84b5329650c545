/// WGSL shader for lit meshes (instanced cubes and standard-material planes).
pub const MESH_SHADER: &str = r#"
struct Light {
    // xyz: direction towards the sky, w: intensity
    direction: vec4<f32>,
    diffuse: vec4<f32>,
    ground: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    lights: array<Light, 4>,
    light_count: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
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
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var lit = vec3<f32>(0.0, 0.0, 0.0);
    for (var i = 0u; i < min(uniforms.light_count.x, 4u); i = i + 1u) {
        let light = uniforms.lights[i];
        let t = 0.5 * dot(n, light.direction.xyz) + 0.5;
        lit = lit + mix(light.ground.rgb, light.diffuse.rgb, t) * light.direction.w;
    }
    return vec4<f32>(in.color.rgb * lit, in.color.a);
}
"#;

/// WGSL shader for grid-material ground planes.
pub const GRID_SHADER: &str = r#"
struct Light {
    direction: vec4<f32>,
    diffuse: vec4<f32>,
    ground: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    lights: array<Light, 4>,
    light_count: vec4<u32>,
};

struct GridUniforms {
    model: mat4x4<f32>,
    main_color: vec4<f32>,
    line_color: vec4<f32>,
    // x: grid ratio, y: major unit frequency, z: minor visibility, w: opacity
    params: vec4<f32>,
    // x: back-face culling (1.0 = on)
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var<uniform> grid: GridUniforms;

struct GridOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
};

@vertex
fn vs_grid(@location(0) position: vec3<f32>) -> GridOutput {
    let world = grid.model * vec4<f32>(position, 1.0);
    var out: GridOutput;
    out.clip_position = uniforms.view_proj * world;
    out.world_pos = world.xyz;
    return out;
}

// 1.0 on a cell boundary, fading to 0.0 one screen pixel away.
fn line_strength(coord: vec2<f32>) -> f32 {
    let width = max(fwidth(coord), vec2<f32>(0.0001, 0.0001));
    let dist = abs(fract(coord - 0.5) - 0.5) / width;
    return 1.0 - min(min(dist.x, dist.y), 1.0);
}

@fragment
fn fs_grid(in: GridOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let coord = in.world_pos.xz / grid.params.x;
    let minor = line_strength(coord) * grid.params.z;
    let major = line_strength(coord / grid.params.y);
    let strength = max(minor, major);

    if (grid.flags.x > 0.5 && !front) {
        discard;
    }

    let color = mix(grid.main_color.rgb, grid.line_color.rgb, strength);
    let alpha = mix(grid.params.w, 1.0, strength);
    return vec4<f32>(color, alpha);
}
"#;
