mod component;
mod controls;

pub use component::ControlPanel;
