mod component;
mod resolver;

pub use component::LocationInput;
