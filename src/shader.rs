//! Generative backgrounds. Each pattern is a pure per-pixel function of
//! `(uv, time, pointer)`; the GPU runs the GLSL version, the CPU version
//! feeds the static fallback colour.

use glam::{Vec2, Vec3};

use crate::effects::ShaderKind;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

pub fn shade(kind: ShaderKind, uv: Vec2, time: f32, pointer: Vec2) -> Vec3 {
    match kind {
        ShaderKind::Metaballs => metaballs(uv, time, pointer),
        ShaderKind::Grid => grid(uv, time, pointer),
        ShaderKind::Ink => ink(uv, time, pointer),
    }
}

const ASPECT: f32 = 16.0 / 9.0;

pub fn metaballs(uv: Vec2, time: f32, pointer: Vec2) -> Vec3 {
    let st = Vec2::new(uv.x * ASPECT, uv.y);
    let mouse = Vec2::new(pointer.x * ASPECT, pointer.y);

    let orbits = [
        Vec2::new(0.5 + (time * 0.5).sin() * 0.3, 0.5 + (time * 0.3).cos() * 0.3),
        Vec2::new(1.5 + (time * 0.3).sin() * 0.5, 0.5 + (time * 0.5).cos() * 0.5),
        Vec2::new(1.0 + (time * 0.2).sin() * 0.7, 1.0 + (time * 0.7).cos() * 0.2),
    ];
    let mut d = 0.12 / st.distance(mouse);
    for centre in orbits {
        d += 0.12 / st.distance(centre);
    }
    let d = smoothstep(0.8, 1.0, d);

    let deep = Vec3::new(0.02, 0.03, 0.07);
    let blue = Vec3::new(0.05, 0.2, 0.5);
    let cyan = Vec3::new(0.2, 0.5, 0.7);
    let colour = mix(deep, blue, d);
    mix(colour, cyan, smoothstep(0.9, 1.0, d))
}

const GRID_TILES: f32 = 30.0;

pub fn grid(uv: Vec2, time: f32, pointer: Vec2) -> Vec3 {
    let st = uv * GRID_TILES;
    let ipos = st.floor();
    let fpos = st - ipos;

    let mut colour = Vec3::new(0.03, 0.0, 0.06);

    let mouse_dist = st.distance(pointer * GRID_TILES);
    let glow = 1.5 / (mouse_dist * mouse_dist + 1.0);

    let point_size = 0.08 + glow * 0.2;
    let centre_dist = (fpos - Vec2::splat(0.5)).length();
    if centre_dist < point_size {
        let point = Vec3::new(0.6, 0.3, 0.8);
        colour = mix(colour, point, 1.0 - smoothstep(0.0, point_size, centre_dist));
    }

    let pulse = (ipos.x * 0.5 + time).sin() + (ipos.y * 0.5 + time).cos();
    if (fpos.x - 0.5).abs() < 0.01 || (fpos.y - 0.5).abs() < 0.01 {
        colour += Vec3::new(0.4, 0.15, 0.6) * (0.05 + glow * 0.2) * (0.5 + pulse.sin() * 0.5);
    }
    colour
}

fn random(st: Vec2) -> f32 {
    fract(st.dot(Vec2::new(12.9898, 78.233)).sin() * 43_758.547)
}

fn value_noise(st: Vec2) -> f32 {
    let i = st.floor();
    let f = st - i;
    let a = random(i);
    let b = random(i + Vec2::new(1.0, 0.0));
    let c = random(i + Vec2::new(0.0, 1.0));
    let d = random(i + Vec2::new(1.0, 1.0));
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    a + (b - a) * u.x + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

// Same matrix as GLSL `mat2(cos a, -sin a, sin a, cos a) * v`, column-major.
fn rotate(a: f32, v: Vec2) -> Vec2 {
    let (s, c) = a.sin_cos();
    Vec2::new(c * v.x + s * v.y, -s * v.x + c * v.y)
}

fn fbm(mut st: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..5 {
        value += amplitude * value_noise(st);
        st = rotate(1.5, st) * 2.0;
        amplitude *= 0.5;
    }
    value
}

pub fn ink(uv: Vec2, time: f32, pointer: Vec2) -> Vec3 {
    let st = uv * 2.0;
    let mouse_dist = st.distance(pointer * 2.0);
    let turbulence = 1.0 / (mouse_dist * 5.0 + 1.0);

    let drift = Vec2::splat(time * 0.1);
    let q = Vec2::new(fbm(st + drift), fbm(st + Vec2::new(5.2, 1.3) + drift));
    let swirl = Vec2::splat(time * 0.2 + turbulence * 0.2);
    let r = Vec2::new(
        fbm(st + q * 2.0 + Vec2::new(1.7, 9.2) + swirl),
        fbm(st + q * 2.0 + Vec2::new(8.3, 2.8) + swirl),
    );
    let n = fbm(st + r);

    let night = Vec3::new(0.05, 0.0, 0.1);
    let violet = Vec3::new(0.3, 0.05, 0.4);
    let pink = Vec3::new(0.6, 0.3, 0.5);
    let colour = mix(night, violet, smoothstep(0.2, 0.5, n));
    mix(colour, pink, smoothstep(0.5, 0.7, n))
}

/// Mean colour of a pattern over an `n × n` sample grid at rest
/// (time 0, pointer centred). Used when WebGL is unavailable.
pub fn resting_colour(kind: ShaderKind, n: usize) -> Vec3 {
    let n = n.max(1);
    let mut sum = Vec3::ZERO;
    for j in 0..n {
        for i in 0..n {
            let uv = Vec2::new((i as f32 + 0.5) / n as f32, (j as f32 + 0.5) / n as f32);
            sum += shade(kind, uv, 0.0, Vec2::splat(0.5));
        }
    }
    sum / (n * n) as f32
}

pub fn css_rgb(colour: Vec3) -> String {
    let c = (colour.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    format!("rgb({}, {}, {})", c.x as u8, c.y as u8, c.z as u8)
}

pub const VERTEX_SRC: &str = r#"#version 300 es
in vec2 a_position;
out vec2 vUv;
void main() {
    vUv = a_position * 0.5 + 0.5;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

const METABALLS_SRC: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
uniform float u_time;
uniform vec2 u_mouse;
out vec4 fragColor;

void main() {
    vec2 st = vUv;
    st.x *= (16.0 / 9.0);
    vec2 mouse_pos = u_mouse;
    mouse_pos.x *= (16.0 / 9.0);

    float d = 0.12 / distance(st, mouse_pos);
    d += 0.12 / distance(st, vec2(0.5 + sin(u_time * 0.5) * 0.3, 0.5 + cos(u_time * 0.3) * 0.3));
    d += 0.12 / distance(st, vec2(1.5 + sin(u_time * 0.3) * 0.5, 0.5 + cos(u_time * 0.5) * 0.5));
    d += 0.12 / distance(st, vec2(1.0 + sin(u_time * 0.2) * 0.7, 1.0 + cos(u_time * 0.7) * 0.2));
    d = smoothstep(0.8, 1.0, d);

    vec3 color = mix(vec3(0.02, 0.03, 0.07), vec3(0.05, 0.2, 0.5), d);
    color = mix(color, vec3(0.2, 0.5, 0.7), smoothstep(0.9, 1.0, d));
    fragColor = vec4(color, 1.0);
}
"#;

const GRID_SRC: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
uniform float u_time;
uniform vec2 u_mouse;
out vec4 fragColor;

void main() {
    vec2 st = vUv * 30.0;
    vec2 ipos = floor(st);
    vec2 fpos = fract(st);
    vec3 color = vec3(0.03, 0.0, 0.06);

    float mouse_dist = distance(st, u_mouse * 30.0);
    float glow = 1.5 / (mouse_dist * mouse_dist + 1.0);

    float point_size = 0.08 + glow * 0.2;
    float centre = length(fpos - 0.5);
    if (centre < point_size) {
        color = mix(color, vec3(0.6, 0.3, 0.8), 1.0 - smoothstep(0.0, point_size, centre));
    }

    float pulse = sin(ipos.x * 0.5 + u_time) + cos(ipos.y * 0.5 + u_time);
    if (abs(fpos.x - 0.5) < 0.01 || abs(fpos.y - 0.5) < 0.01) {
        color += vec3(0.4, 0.15, 0.6) * (0.05 + glow * 0.2) * (0.5 + sin(pulse) * 0.5);
    }
    fragColor = vec4(color, 1.0);
}
"#;

const INK_SRC: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
uniform float u_time;
uniform vec2 u_mouse;
out vec4 fragColor;

float random(vec2 st) { return fract(sin(dot(st, vec2(12.9898, 78.233))) * 43758.5453123); }
float noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);
    float a = random(i);
    float b = random(i + vec2(1.0, 0.0));
    float c = random(i + vec2(0.0, 1.0));
    float d = random(i + vec2(1.0, 1.0));
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}
mat2 rotate(float a) { return mat2(cos(a), -sin(a), sin(a), cos(a)); }
float fbm(vec2 st) {
    float v = 0.0;
    float a = 0.5;
    for (int i = 0; i < 5; ++i) {
        v += a * noise(st);
        st = rotate(1.5) * st * 2.0;
        a *= 0.5;
    }
    return v;
}

void main() {
    vec2 st = vUv * 2.0;
    float mouse_dist = distance(st, u_mouse * 2.0);
    float turbulence = 1.0 / (mouse_dist * 5.0 + 1.0);

    vec2 q = vec2(fbm(st + u_time * 0.1), fbm(st + vec2(5.2, 1.3) + u_time * 0.1));
    vec2 r = vec2(fbm(st + q * 2.0 + vec2(1.7, 9.2) + u_time * 0.2 + turbulence * 0.2),
                  fbm(st + q * 2.0 + vec2(8.3, 2.8) + u_time * 0.2 + turbulence * 0.2));
    float n = fbm(st + r);

    vec3 color = mix(vec3(0.05, 0.0, 0.1), vec3(0.3, 0.05, 0.4), smoothstep(0.2, 0.5, n));
    color = mix(color, vec3(0.6, 0.3, 0.5), smoothstep(0.5, 0.7, n));
    fragColor = vec4(color, 1.0);
}
"#;

pub fn fragment_source(kind: ShaderKind) -> &'static str {
    match kind {
        ShaderKind::Metaballs => METABALLS_SRC,
        ShaderKind::Grid => GRID_SRC,
        ShaderKind::Ink => INK_SRC,
    }
}
