mod camera;
mod event;
mod message;
mod orientation;
mod property;
mod scene;
mod slash_commands;
mod slider;
mod staging;
mod storage;
mod summary;
mod textarea;

pub use camera::*;
pub use event::*;
pub use message::*;
pub use orientation::*;
pub use property::*;
pub use scene::*;
pub use slash_commands::*;
pub use slider::*;
pub use staging::*;
pub use storage::*;
pub use summary::*;
pub use textarea::*;
