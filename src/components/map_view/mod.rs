mod component;
mod render;
mod scene;
mod state;

pub use component::MapView;
pub use scene::MapScene;
