use anyhow::{anyhow, Result};
use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::Sdl;

use crate::config::WindowConfig;

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, config: &WindowConfig) -> Result<Self> {
        let video = sdl.video().map_err(|e| anyhow!("init SDL2 video: {e}"))?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .resizable()
            .position_centered()
            .build()?;

        let gl_context = window
            .gl_create_context()
            .map_err(|e| anyhow!("create GL context: {e}"))?;

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);
        log::info!(
            "window {}x{} with GL 3.3 core context",
            config.width,
            config.height
        );

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.window.size();
        w as f32 / h.max(1) as f32
    }

    /// Match the GL viewport to the drawable after a resize.
    pub fn resize_viewport(&self) {
        let (w, h) = self.window.drawable_size();
        unsafe {
            gl::Viewport(0, 0, w as i32, h as i32);
        }
    }
}
