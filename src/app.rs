use anyhow::{anyhow, Result};
use sdl2::Sdl;

use crate::config::GameConfig;
use crate::engine::input::{InputEvent, InputState};
use crate::engine::time::FrameTimer;
use crate::engine::window::GameWindow;
use crate::renderer::Renderer;
use crate::scene::{SceneContext, SceneId};

pub struct GameApp {
    config: GameConfig,
    scene: SceneContext,
    renderer: Renderer,
}

impl GameApp {
    /// Needs a current GL context: the renderer compiles its shaders here.
    pub fn new(config: GameConfig, start: SceneId) -> Result<Self> {
        let scene = SceneContext::build(start, &config)?;
        let renderer = Renderer::init()?;
        Ok(Self { config, scene, renderer })
    }

    pub fn run(&mut self, sdl: &Sdl, window: &GameWindow) -> Result<()> {
        let mut event_pump = sdl.event_pump().map_err(|e| anyhow!("SDL2 event pump: {e}"))?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();

        window.resize_viewport();
        loop {
            timer.tick();
            input.update(&mut event_pump);

            if input.should_quit() {
                log::info!("quit after {:.1}s", timer.elapsed);
                return Ok(());
            }
            if input.events.iter().any(|e| matches!(e, InputEvent::Resized { .. })) {
                window.resize_viewport();
            }

            if let Some(next) = self.scene.update(&input, timer.dt) {
                self.switch_to(next)?;
            }

            self.render(window);
            window.swap();
        }
    }

    /// Replace the current scene. Everything the old scene owned, pending
    /// timelines included, is dropped with it.
    fn switch_to(&mut self, next: SceneId) -> Result<()> {
        log::info!("switching scene {} -> {next}", self.scene.id);
        self.scene = SceneContext::build(next, &self.config)?;
        Ok(())
    }

    fn render(&mut self, window: &GameWindow) {
        let scene = &mut self.scene;
        let view = scene.camera.view_matrix();
        let proj = scene.camera.projection_matrix(window.aspect_ratio());
        self.renderer.draw_scene(
            &scene.world,
            &mut scene.meshes,
            &scene.atmosphere,
            &view,
            &proj,
            scene.camera.position,
        );
    }
}
