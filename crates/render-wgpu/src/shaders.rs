/// Instanced box shader. The model matrix arrives as four column vectors
/// followed by the tint.
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) col0: vec4<f32>,
    @location(3) col1: vec4<f32>,
    @location(4) col2: vec4<f32>,
    @location(5) col3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) tint: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(instance.col0, instance.col1, instance.col2, instance.col3);
    // Non-uniform scale: transform normals by the rotation part only.
    let rot = mat3x3<f32>(
        normalize(instance.col0.xyz),
        normalize(instance.col1.xyz),
        normalize(instance.col2.xyz),
    );

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.normal = rot * vertex.normal;
    out.tint = instance.tint;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.4, 1.0, 0.6));
    let diffuse = max(dot(normalize(in.normal), light_dir), 0.0);
    let lighting = 0.35 + diffuse * 0.65;
    return vec4<f32>(in.tint.rgb * lighting, in.tint.a);
}
"#;

/// Floor grid lines, fading out with distance from the origin.
pub const GRID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) radius: f32,
};

@vertex
fn vs_grid(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    out.radius = length(vertex.position.xz);
    return out;
}

@fragment
fn fs_grid(in: LineOutput) -> @location(0) vec4<f32> {
    let fade = clamp(1.0 - in.radius / 90.0, 0.0, 1.0);
    return vec4<f32>(in.color.rgb * (0.3 + 0.7 * fade), 1.0);
}
"#;
