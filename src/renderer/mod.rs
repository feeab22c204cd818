pub mod mesh;
pub mod shader;

use glam::{Mat4, Vec3};
use hecs::World;
use mesh::{Mesh, MeshData};
use shader::ShaderProgram;

use crate::components::{Color, GlobalTransform, MeshHandle};
use crate::error::ShaderError;

const VERT_SRC: &str = include_str!("../../shaders/cel.vert");
const FRAG_SRC: &str = include_str!("../../shaders/cel.frag");

const LIGHT_DIR: Vec3 = Vec3::new(-0.5, -1.0, -0.3);

/// Per-scene clear colour and fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub sky: Vec3,
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            sky: Vec3::new(0.55, 0.75, 0.95),
            fog_start: 80.0,
            fog_end: 400.0,
        }
    }
}

/// Holds all meshes of one scene. Entities reference meshes by MeshHandle index.
///
/// `add` only records geometry; GPU buffers are created by [`upload`](Self::upload)
/// from the render loop, so scenes can be built without a GL context.
#[derive(Default)]
pub struct MeshStore {
    gpu: Vec<Mesh>,
    pending: Vec<MeshData>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, data: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.len());
        self.pending.push(data);
        handle
    }

    /// Create GPU buffers for everything added since the last call.
    /// Requires a current GL context.
    pub fn upload(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        log::debug!("uploading {} meshes", self.pending.len());
        self.gpu.extend(self.pending.drain(..).map(|data| Mesh::upload(&data)));
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.gpu.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.gpu.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Renderer {
    shader: ShaderProgram,
}

impl Renderer {
    pub fn init() -> Result<Self, ShaderError> {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
        }
        let shader = ShaderProgram::from_sources(VERT_SRC, FRAG_SRC)?;
        log::info!("renderer ready");
        Ok(Self { shader })
    }

    pub fn draw_scene(
        &mut self,
        world: &World,
        meshes: &mut MeshStore,
        atmosphere: &Atmosphere,
        view: &Mat4,
        proj: &Mat4,
        camera_pos: Vec3,
    ) {
        meshes.upload();
        let sky = atmosphere.sky;
        unsafe {
            gl::ClearColor(sky.x, sky.y, sky.z, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.shader.bind();
        self.shader.set_mat4("u_view", view);
        self.shader.set_mat4("u_projection", proj);
        self.shader.set_vec3("u_light_dir", LIGHT_DIR);
        self.shader.set_vec3("u_camera_pos", camera_pos);
        self.shader.set_vec3("u_ambient_color", Vec3::splat(0.2));
        self.shader.set_vec3("u_fog_color", sky);
        self.shader.set_float("u_fog_start", atmosphere.fog_start);
        self.shader.set_float("u_fog_end", atmosphere.fog_end);

        for (_entity, (global_transform, mesh_handle, color)) in world
            .query::<(&GlobalTransform, &MeshHandle, &Color)>()
            .iter()
        {
            let Some(mesh) = meshes.get(*mesh_handle) else {
                continue;
            };
            self.shader.set_mat4("u_model", &global_transform.0);
            self.shader.set_vec3("u_object_color", color.0);
            mesh.draw();
        }
    }
}
