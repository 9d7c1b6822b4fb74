//! WGSL sources and GPU-side structs for the viewer.
//!
//! Bodies are drawn as camera-facing quads, one instance per body plus one
//! for the anchor. Edges are drawn straight from the [`EdgeBuffer`] as a
//! line list: the position buffer feeds location 0 and the colour buffer
//! feeds location 1, both three floats per vertex.
//!
//! [`EdgeBuffer`]: crate::EdgeBuffer

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::body::Body;

/// Per-frame uniforms shared by both pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Camera right vector (xyz), w unused.
    pub camera_right: [f32; 4],
    /// Camera up vector (xyz), w unused.
    pub camera_up: [f32; 4],
    /// Edge tint (rgb), w is the overall edge opacity.
    pub edge_color: [f32; 4],
}

impl Uniforms {
    pub fn new(view_proj: Mat4, view: Mat4, edge_color: Vec3, edge_opacity: f32) -> Self {
        // Rows of the view rotation are the camera basis in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            edge_color: edge_color.extend(edge_opacity).to_array(),
        }
    }
}

/// One body quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    /// 1.0 for the anchor, 0.0 for bodies.
    pub anchor: f32,
}

impl BodyInstance {
    pub fn from_body(body: &Body) -> Self {
        Self {
            position: body.position.to_array(),
            size: body.size,
            color: body.emissive.rgb(),
            anchor: 0.0,
        }
    }

    /// The fixed centre attractor.
    pub fn anchor(size: f32, color: [f32; 3]) -> Self {
        Self {
            position: [0.0; 3],
            size,
            color,
            anchor: 1.0,
        }
    }
}

/// Instanced body quads with a soft round falloff.
pub const BODY_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    edge_color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) anchor: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position_size: vec4<f32>,
    @location(1) color_anchor: vec4<f32>,
) -> VertexOutput {
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = quad[vertex_index];
    // Quads are drawn larger than the body so the glow has room to fade.
    let half = position_size.w * 2.5;
    let world = position_size.xyz
        + uniforms.camera_right.xyz * corner.x * half
        + uniforms.camera_up.xyz * corner.y * half;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.color = color_anchor.xyz;
    out.uv = corner;
    out.anchor = color_anchor.w;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let r = length(in.uv);
    if r > 1.0 {
        discard;
    }
    let core = 1.0 - smoothstep(0.3, 0.45, r);
    let glow = pow(1.0 - r, 2.0) * mix(0.6, 1.0, in.anchor);
    let dark = vec3<f32>(0.114, 0.114, 0.18);
    let color = mix(in.color * glow * 1.6, mix(dark, in.color, 0.35), core);
    return vec4<f32>(color, max(core, glow));
}
"#;

/// Edge line list fed directly from the edge buffer.
pub const EDGE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    edge_color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) intensity: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) intensity: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(position, 1.0);
    out.intensity = intensity;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = uniforms.edge_color.rgb * in.intensity;
    return vec4<f32>(color, in.intensity.r * uniforms.edge_color.a);
}
"#;
