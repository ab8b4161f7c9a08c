use glam::{Mat4, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::config::SiteConfig;
use crate::effects::{EffectConfig, ShaderKind};
use crate::engine::{Animation, AnimationState, Viewport};
use crate::error::SiteError;
use crate::particles::{hex_rgb, ParticleCloud, BACKDROP};
use crate::shader;

const PARTICLE_VERT: &str = r#"#version 300 es
in vec3 a_position;
in vec3 a_color;
uniform mat4 u_projection;
uniform mat4 u_model_view;
uniform float u_point_size;
uniform float u_scale;
out vec3 v_color;
out float v_depth;
void main() {
    vec4 mv = u_model_view * vec4(a_position, 1.0);
    v_color = a_color;
    v_depth = -mv.z;
    gl_PointSize = u_point_size * (u_scale / max(-mv.z, 0.0001));
    gl_Position = u_projection * mv;
}
"#;

const PARTICLE_FRAG: &str = r#"#version 300 es
precision highp float;
in vec3 v_color;
in float v_depth;
uniform vec3 u_fog_color;
uniform float u_fog_density;
out vec4 fragColor;
void main() {
    float fog = 1.0 - exp(-u_fog_density * u_fog_density * v_depth * v_depth);
    fragColor = vec4(mix(v_color, u_fog_color, clamp(fog, 0.0, 1.0)), 1.0);
}
"#;

const FOG_DENSITY: f32 = 0.0015;
const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 2000.0;

fn compile(gl: &GL, kind: u32, src: &str) -> Result<WebGlShader, SiteError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(SiteError::GlAlloc("shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SiteError::ShaderCompile(info))
    }
}

fn link(gl: &GL, vert: &str, frag: &str) -> Result<WebGlProgram, SiteError> {
    let vs = compile(gl, GL::VERTEX_SHADER, vert)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, frag)?;
    let program = gl
        .create_program()
        .ok_or(SiteError::GlAlloc("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders are reference counted by the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SiteError::ProgramLink(info))
    }
}

fn upload(gl: &GL, program: &WebGlProgram, name: &str, data: &[f32], size: i32) -> Result<WebGlBuffer, SiteError> {
    let buffer = gl.create_buffer().ok_or(SiteError::GlAlloc("buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    let location = gl.get_attrib_location(program, name);
    if location >= 0 {
        gl.enable_vertex_attrib_array(location as u32);
        gl.vertex_attrib_pointer_with_i32(location as u32, size, GL::FLOAT, false, 0, 0);
    }
    Ok(buffer)
}

pub fn webgl2(canvas: &HtmlCanvasElement) -> Result<GL, SiteError> {
    canvas
        .get_context("webgl2")?
        .ok_or(SiteError::WebGlUnavailable)?
        .dyn_into::<GL>()
        .map_err(|_| SiteError::WebGlUnavailable)
}

/// Hand the context back to the browser now instead of at garbage
/// collection; pages only get a handful of live WebGL contexts.
pub fn lose_context(gl: &GL) {
    match gl.get_extension("WEBGL_lose_context") {
        Ok(Some(ext)) => ext.unchecked_into::<WebglLoseContext>().lose_context(),
        Ok(None) => log::debug!("WEBGL_lose_context not supported"),
        Err(err) => log::warn!("WEBGL_lose_context lookup failed: {err:?}"),
    }
}

struct ParticleRenderer {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffers: [WebGlBuffer; 2],
    count: i32,
    point_size: f32,
    u_projection: Option<WebGlUniformLocation>,
    u_model_view: Option<WebGlUniformLocation>,
    u_point_size: Option<WebGlUniformLocation>,
    u_scale: Option<WebGlUniformLocation>,
    u_fog_color: Option<WebGlUniformLocation>,
    u_fog_density: Option<WebGlUniformLocation>,
}

impl ParticleRenderer {
    fn new(gl: &GL, cfg: &SiteConfig, rng: &mut fastrand::Rng) -> Result<Self, SiteError> {
        let program = link(gl, PARTICLE_VERT, PARTICLE_FRAG)?;
        let cloud = ParticleCloud::generate(&cfg.particles, rng);
        let vao = gl
            .create_vertex_array()
            .ok_or(SiteError::GlAlloc("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let positions = upload(gl, &program, "a_position", &cloud.positions, 3)?;
        let colors = upload(gl, &program, "a_color", &cloud.colors, 3)?;
        gl.bind_vertex_array(None);

        Ok(Self {
            u_projection: gl.get_uniform_location(&program, "u_projection"),
            u_model_view: gl.get_uniform_location(&program, "u_model_view"),
            u_point_size: gl.get_uniform_location(&program, "u_point_size"),
            u_scale: gl.get_uniform_location(&program, "u_scale"),
            u_fog_color: gl.get_uniform_location(&program, "u_fog_color"),
            u_fog_density: gl.get_uniform_location(&program, "u_fog_density"),
            program,
            vao,
            buffers: [positions, colors],
            count: cloud.len() as i32,
            point_size: cfg.particles.point_size,
        })
    }

    fn draw(&self, gl: &GL, anim: &Animation) {
        let AnimationState::Particles(motion) = &anim.state else {
            return;
        };
        let [r, g, b] = hex_rgb(BACKDROP);
        gl.clear_color(r, g, b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        let projection = Mat4::perspective_rh_gl(
            FOV_DEGREES.to_radians(),
            anim.viewport.aspect(),
            NEAR,
            FAR,
        );
        let model_view = Mat4::from_translation(Vec3::new(0.0, 0.0, -motion.camera_z))
            * Mat4::from_rotation_x(motion.rotation.x)
            * Mat4::from_rotation_y(motion.rotation.y);

        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(self.u_projection.as_ref(), false, &projection.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(self.u_model_view.as_ref(), false, &model_view.to_cols_array());
        gl.uniform1f(self.u_point_size.as_ref(), self.point_size);
        gl.uniform1f(self.u_scale.as_ref(), anim.viewport.height * 0.5);
        gl.uniform3f(self.u_fog_color.as_ref(), r, g, b);
        gl.uniform1f(self.u_fog_density.as_ref(), FOG_DENSITY);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::POINTS, 0, self.count);
        gl.bind_vertex_array(None);
    }

    fn release(&self, gl: &GL) {
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_program(Some(&self.program));
    }
}

const QUAD: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, //
    -1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
];

struct ShaderRenderer {
    kind: ShaderKind,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    quad: WebGlBuffer,
    u_time: Option<WebGlUniformLocation>,
    u_mouse: Option<WebGlUniformLocation>,
}

impl ShaderRenderer {
    fn new(gl: &GL, kind: ShaderKind) -> Result<Self, SiteError> {
        let program = link(gl, shader::VERTEX_SRC, shader::fragment_source(kind))?;
        let vao = gl
            .create_vertex_array()
            .ok_or(SiteError::GlAlloc("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let quad = upload(gl, &program, "a_position", &QUAD, 2)?;
        gl.bind_vertex_array(None);
        Ok(Self {
            kind,
            u_time: gl.get_uniform_location(&program, "u_time"),
            u_mouse: gl.get_uniform_location(&program, "u_mouse"),
            program,
            vao,
            quad,
        })
    }

    fn draw(&self, gl: &GL, anim: &Animation) {
        let AnimationState::Shader(state) = &anim.state else {
            return;
        };
        debug_assert_eq!(state.kind, self.kind);
        gl.use_program(Some(&self.program));
        gl.uniform1f(self.u_time.as_ref(), state.time);
        gl.uniform2f(self.u_mouse.as_ref(), state.pointer.x, state.pointer.y);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 6);
        gl.bind_vertex_array(None);
    }

    fn release(&self, gl: &GL) {
        gl.delete_buffer(Some(&self.quad));
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_program(Some(&self.program));
    }
}

enum Pipeline {
    Particles(ParticleRenderer),
    Shader(ShaderRenderer),
}

/// GL state for one engine surface.
pub struct Renderer {
    canvas: HtmlCanvasElement,
    gl: GL,
    pipeline: Pipeline,
}

impl Renderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        effect: EffectConfig,
        cfg: &SiteConfig,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, SiteError> {
        let gl = webgl2(&canvas)?;
        let pipeline = match effect {
            EffectConfig::ParticleField => Pipeline::Particles(ParticleRenderer::new(&gl, cfg, rng)?),
            EffectConfig::Shader(kind) => Pipeline::Shader(ShaderRenderer::new(&gl, kind)?),
        };
        Ok(Self { canvas, gl, pipeline })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn sync_size(&self, viewport: Viewport) {
        let w = viewport.width.max(1.0) as u32;
        let h = viewport.height.max(1.0) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        self.gl.viewport(0, 0, w as i32, h as i32);
    }

    pub fn draw(&self, anim: &Animation) {
        self.sync_size(anim.viewport);
        match &self.pipeline {
            Pipeline::Particles(p) => p.draw(&self.gl, anim),
            Pipeline::Shader(s) => s.draw(&self.gl, anim),
        }
    }

    /// Delete GL objects and drop the context. The canvas is blank afterwards.
    pub fn release(&self) {
        match &self.pipeline {
            Pipeline::Particles(p) => p.release(&self.gl),
            Pipeline::Shader(s) => s.release(&self.gl),
        }
        lose_context(&self.gl);
    }
}
