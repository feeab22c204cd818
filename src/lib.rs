pub mod animation;
pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod renderer;
pub mod scene;
pub mod systems;
pub mod timeline;
