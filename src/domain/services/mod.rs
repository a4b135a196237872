mod app_state;
mod chat_session;
mod context_injector;
pub mod events;
mod orbit_controls;
mod orientation_controller;
mod panorama_scene;
mod panorama_viewer;
mod rasterizer;
mod staging_sessions;
mod transcript;

pub use app_state::*;
pub use chat_session::*;
pub use context_injector::*;
pub use orbit_controls::*;
pub use orientation_controller::*;
pub use panorama_scene::*;
pub use panorama_viewer::*;
pub use rasterizer::*;
pub use staging_sessions::*;
pub use transcript::*;
